//! End-to-end tests for the render pipeline.
//!
//! Each test builds a small project in a temp directory and renders its
//! component through the same API the dev server uses.

use loupe_render::{
    EntrySet, InvalidationPolicy, LoadError, ModuleId, OutputAliases, PipelineError,
    RenderOptions, RenderPipeline, RenderRequest, RouterMode,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

struct Project {
    temp: TempDir,
}

impl Project {
    fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    fn root(&self) -> &Path {
        self.temp.path()
    }

    fn component_dir(&self) -> PathBuf {
        self.root().join("button")
    }

    fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    fn pipeline(&self, options: RenderOptions) -> RenderPipeline {
        let entries = EntrySet::resolve(self.component_dir());
        let policy = InvalidationPolicy::new(self.root())
            .with_framework_path(self.root().join("node_modules/loupe"));
        RenderPipeline::from_entries(&entries, policy, options).unwrap()
    }
}

fn bundles() -> OutputAliases {
    OutputAliases::new(Some("/bundle.js".into()), Some("/bundle.css".into()))
}

fn request(path: &str) -> RenderRequest {
    RenderRequest::new(path, bundles())
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::test]
async fn test_end_to_end_success() {
    let project = Project::new();
    project.write("button/entry.jsx", "<h1>Hi</h1>");
    project.write("button/example/entry.css", "h1 { color: red }");

    let html = project
        .pipeline(RenderOptions::default())
        .render(&request("/"))
        .await
        .unwrap();

    assert_eq!(html.matches("<link").count(), 1);
    assert!(html.contains("<link rel=\"stylesheet\" href=\"/bundle.css\">"));
    assert_eq!(html.matches("<script").count(), 1);
    assert!(html.contains("<script src=\"/bundle.js\"></script>"));
    assert!(html.contains("<div id=\"app\"><h1>Hi</h1></div>"));
    assert!(html.contains("<title>button</title>"));
}

#[tokio::test]
async fn test_end_to_end_render_error() {
    let project = Project::new();
    project.write("button/entry.jsx", r#"<h1>{{ raise("boom") }}</h1>"#);

    let html = project
        .pipeline(RenderOptions::default())
        .render(&request("/"))
        .await
        .unwrap();

    assert!(!html.contains("<script"));
    assert!(html.contains("boom"));
    assert!(html.contains("class=\"loupe-error\""));
    assert!(html.contains("<div id=\"app\"></div></body></html>"));
}

#[tokio::test]
async fn test_strict_undefined_is_a_render_error() {
    let project = Project::new();
    project.write("button/entry.jsx", "<h1>{{ label }}</h1>");

    let html = project
        .pipeline(RenderOptions {
            debug: true,
            ..RenderOptions::default()
        })
        .render(&request("/"))
        .await
        .unwrap();

    assert!(html.contains("loupe-error"));
    assert!(!html.contains("<script"));
}

#[tokio::test]
async fn test_data_payload_is_passed_as_props() {
    let project = Project::new();
    project.write("button/entry.jsx", "<button>{{ label }}</button>");
    project.write("button/example/data.js", "module.exports = {\"label\": \"Save\"};\n");

    let html = project
        .pipeline(RenderOptions::default())
        .render(&request("/"))
        .await
        .unwrap();

    assert!(html.contains("<div id=\"app\"><button>Save</button></div>"));
}

#[tokio::test]
async fn test_invalid_data_is_a_load_error() {
    let project = Project::new();
    project.write("button/entry.jsx", "<p>x</p>");
    project.write("button/example/data.json", "{ not json");

    let err = project
        .pipeline(RenderOptions::default())
        .render(&request("/"))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Load(LoadError::Data { .. })));
}

#[tokio::test]
async fn test_syntax_error_is_a_load_error() {
    let project = Project::new();
    project.write("button/entry.jsx", "<p>{% for %}</p>");

    let err = project
        .pipeline(RenderOptions::default())
        .render(&request("/"))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Load(LoadError::Syntax { .. })));
}

#[tokio::test]
async fn test_document_head_overrides_title() {
    let project = Project::new();
    project.write(
        "button/entry.jsx",
        r#"{{ document_head(title="Buttons", description="Every button") }}<p>x</p>"#,
    );

    let pipeline = project.pipeline(RenderOptions {
        title: Some("Configured".into()),
        ..RenderOptions::default()
    });
    let html = pipeline.render(&request("/")).await.unwrap();
    assert!(html.contains("<title>Buttons</title>"));
    assert!(html.contains("<meta name=\"description\" content=\"Every button\">"));
}

#[tokio::test]
async fn test_configured_title_without_head_override() {
    let project = Project::new();
    project.write("button/entry.jsx", "<p>x</p>");

    let pipeline = project.pipeline(RenderOptions {
        title: Some("Configured".into()),
        ..RenderOptions::default()
    });
    let html = pipeline.render(&request("/")).await.unwrap();
    assert!(html.contains("<title>Configured</title>"));
}

#[tokio::test]
async fn test_edits_are_picked_up_on_next_render() {
    let project = Project::new();
    project.write("button/entry.jsx", r#"{% include "./parts/label.html" %}"#);
    project.write("button/parts/label.html", "<b>one</b>");

    let pipeline = project.pipeline(RenderOptions::default());
    let first = pipeline.render(&request("/")).await.unwrap();
    assert!(first.contains("<b>one</b>"));

    project.write("button/parts/label.html", "<b>two</b>");
    let second = pipeline.render(&request("/")).await.unwrap();
    assert!(second.contains("<b>two</b>"));
}

#[tokio::test]
async fn test_vendored_modules_survive_renders() {
    let project = Project::new();
    project.write(
        "button/entry.jsx",
        r#"{% include "kit/icon.html" %}{% include "loupe/frame.html" %}"#,
    );
    let icon = project.write("node_modules/kit/icon.html", "<i>icon</i>");
    let frame = project.write("node_modules/loupe/frame.html", "<div>frame</div>");

    let pipeline = project.pipeline(RenderOptions::default());
    pipeline.render(&request("/")).await.unwrap();
    let icon_id = ModuleId::new(&icon).unwrap();
    let frame_id = ModuleId::new(&frame).unwrap();
    let icon_before = pipeline.cache().get(&icon_id).unwrap();
    let frame_before = pipeline.cache().get(&frame_id).unwrap();

    project.write("node_modules/kit/icon.html", "<i>changed</i>");
    project.write("node_modules/loupe/frame.html", "<div>new frame</div>");
    let html = pipeline.render(&request("/")).await.unwrap();

    // Vendored dependency: still the cached copy.
    assert!(html.contains("<i>icon</i>"));
    assert!(Arc::ptr_eq(
        &icon_before,
        &pipeline.cache().get(&icon_id).unwrap()
    ));

    // Framework path: reloaded.
    assert!(html.contains("<div>new frame</div>"));
    assert!(!Arc::ptr_eq(
        &frame_before,
        &pipeline.cache().get(&frame_id).unwrap()
    ));
}

const ROUTES: &str = r#"<Route path="/" handler="./pages/home.jsx">
  <Route path="users/:id" handler="./pages/user.jsx" />
</Route>
"#;

fn routed_project() -> Project {
    let project = Project::new();
    project.write("button/entry.jsx", ROUTES);
    project.write("button/pages/home.jsx", "<h1>Home</h1>");
    project.write("button/pages/user.jsx", "<h1>User {{ params.id }}</h1>");
    project
}

#[tokio::test]
async fn test_router_auto_detect_warns_once() {
    let project = routed_project();
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    let _default = tracing::subscriber::set_default(subscriber);

    let pipeline = project.pipeline(RenderOptions::default());
    assert_eq!(pipeline.router_mode(), RouterMode::Auto);

    let first = pipeline.render(&request("/")).await.unwrap();
    assert_eq!(pipeline.router_mode(), RouterMode::Enabled);
    let second = pipeline.render(&request("/users/7")).await.unwrap();
    assert_eq!(pipeline.router_mode(), RouterMode::Enabled);

    assert!(first.contains("<div id=\"app\"><h1>Home</h1></div>"));
    assert!(second.contains("<div id=\"app\"><h1>User 7</h1></div>"));
    assert_eq!(
        logs.contents()
            .matches("routing was enabled automatically")
            .count(),
        1
    );
}

#[tokio::test]
async fn test_explicit_router_is_not_overridden() {
    let project = Project::new();
    project.write("button/entry.jsx", "<div>not a route</div>");

    let pipeline = project.pipeline(RenderOptions {
        router: RouterMode::Disabled,
        ..RenderOptions::default()
    });
    pipeline.render(&request("/")).await.unwrap();
    assert_eq!(pipeline.router_mode(), RouterMode::Disabled);
}

#[tokio::test]
async fn test_unmatched_route_renders_diagnostic() {
    let project = routed_project();
    let pipeline = project.pipeline(RenderOptions {
        router: RouterMode::Enabled,
        ..RenderOptions::default()
    });

    let html = pipeline.render(&request("/nowhere")).await.unwrap();
    assert!(html.contains("No route matches /nowhere"));
    assert!(!html.contains("<script"));
}

#[tokio::test]
async fn test_missing_route_handler_renders_diagnostic() {
    let project = Project::new();
    project.write("button/entry.jsx", r#"<Route path="/" handler="./gone.jsx" />"#);

    let html = project
        .pipeline(RenderOptions::default())
        .render(&request("/"))
        .await
        .unwrap();
    assert!(html.contains("Module not found"));
    assert!(html.contains("<div id=\"app\"></div>"));
}

#[tokio::test]
async fn test_concurrent_requests_complete() {
    let project = Project::new();
    project.write("button/entry.jsx", "<p>{{ 6 * 7 }}</p>");
    let pipeline = Arc::new(project.pipeline(RenderOptions::default()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move { pipeline.request(request("/")).await })
        })
        .collect();

    for handle in handles {
        let html = handle.await.unwrap().unwrap();
        assert!(html.contains("<p>42</p>"));
    }
}

#[test]
fn test_entry_precedence() {
    let project = Project::new();
    project.write("button/index.js", "<p>index</p>");
    project.write("button/entry.js", "<p>entry</p>");

    let entries = EntrySet::resolve(project.component_dir());
    assert_eq!(
        entries.component,
        Some(project.component_dir().join("entry.js"))
    );
}
