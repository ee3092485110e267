//! Startup configuration handed to the dev server.
//!
//! Built once from the loaded [`PreviewConfig`] and the entry files resolved
//! in the component directory. Entries are not re-resolved while the server
//! runs.

use crate::config::PreviewConfig;
use loupe_render::{EntrySet, InvalidationPolicy, RenderOptions, RenderPipeline, RouterMode};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// URL of the style bundle.
pub const STYLE_ALIAS: &str = "/bundle.css";

/// URL of the script bundle.
pub const SCRIPT_ALIAS: &str = "/bundle.js";

/// Extensions resolved by the script bundle.
pub const SCRIPT_EXTENSIONS: &[&str] = &[".js", ".json", ".jsx"];

/// Where HTML responses come from.
#[derive(Clone)]
pub enum HtmlSource {
    /// Serve the example markup file as-is.
    Static(PathBuf),
    /// Render the component on every request.
    Render(Arc<RenderPipeline>),
    /// Serve an empty document shell.
    None,
}

impl HtmlSource {
    pub fn pipeline(&self) -> Option<&Arc<RenderPipeline>> {
        match self {
            HtmlSource::Render(pipeline) => Some(pipeline),
            _ => None,
        }
    }
}

impl fmt::Debug for HtmlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HtmlSource::Static(path) => f.debug_tuple("Static").field(path).finish(),
            HtmlSource::Render(pipeline) => f
                .debug_tuple("Render")
                .field(&pipeline.component_path())
                .finish(),
            HtmlSource::None => f.write_str("None"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub live_reload_port: u16,
    pub html: HtmlSource,
    /// Extension-less unknown paths are answered with HTML instead of 404.
    pub spa_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssConfig {
    pub entry: PathBuf,
    pub alias: String,
    pub debug: bool,
    pub autoprefix: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsConfig {
    pub entry: PathBuf,
    pub alias: String,
    pub debug: bool,
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    pub root: PathBuf,
    pub ignore: Vec<String>,
    pub debounce_ms: u64,
}

/// Everything the dev server needs to start.
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub entries: EntrySet,
    pub server: ServerConfig,
    pub css: Option<CssConfig>,
    pub js: Option<JsConfig>,
    pub watch: WatchConfig,
}

impl StartupConfig {
    pub fn from_config(config: &PreviewConfig) -> Self {
        Self::with_entries(config, EntrySet::resolve(&config.dir))
    }

    pub fn with_entries(config: &PreviewConfig, entries: EntrySet) -> Self {
        let html = html_source(config, &entries);

        let css = entries.style.as_ref().map(|entry| CssConfig {
            entry: entry.clone(),
            alias: STYLE_ALIAS.to_string(),
            debug: config.debug,
            autoprefix: config.autoprefix,
        });

        let js = entries.script.as_ref().map(|entry| JsConfig {
            entry: entry.clone(),
            alias: SCRIPT_ALIAS.to_string(),
            debug: config.debug,
            extensions: SCRIPT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        });

        Self {
            server: ServerConfig {
                port: config.port,
                live_reload_port: config.live_reload_port,
                html,
                spa_mode: config.router == Some(true),
            },
            css,
            js,
            watch: WatchConfig {
                root: config.root.clone(),
                ignore: config.watch_ignore.clone(),
                debounce_ms: config.debounce_ms,
            },
            entries,
        }
    }

    /// Directory whose files are served as static assets.
    pub fn static_dir(&self) -> PathBuf {
        self.entries.example_dir()
    }

    /// `label: value` rows describing this configuration.
    pub fn summary(&self) -> Vec<(String, String)> {
        let mut rows = vec![("directory".to_string(), self.entries.dir.display().to_string())];

        let entry = |path: &Option<PathBuf>| match path {
            Some(path) => relative(path, &self.entries.dir),
            None => "-".to_string(),
        };
        rows.push(("component".to_string(), entry(&self.entries.component)));
        rows.push(("script".to_string(), entry(&self.entries.script)));
        rows.push(("style".to_string(), entry(&self.entries.style)));
        rows.push(("markup".to_string(), entry(&self.entries.markup)));
        rows.push(("data".to_string(), entry(&self.entries.data)));

        let html = match &self.server.html {
            HtmlSource::Render(pipeline) => {
                format!("render {}", relative(pipeline.component_path(), &self.entries.dir))
            }
            HtmlSource::Static(path) => format!("static {}", relative(path, &self.entries.dir)),
            HtmlSource::None => "shell".to_string(),
        };
        rows.push(("html".to_string(), html));

        if let Some(pipeline) = self.server.html.pipeline() {
            let router = match pipeline.router_mode() {
                RouterMode::Auto => "auto",
                RouterMode::Enabled => "enabled",
                RouterMode::Disabled => "disabled",
            };
            rows.push(("router".to_string(), router.to_string()));
        }

        rows.push((
            "ports".to_string(),
            format!(
                "{} (live reload {})",
                self.server.port, self.server.live_reload_port
            ),
        ));
        rows
    }
}

/// Render when the component is JSX-flavoured, otherwise fall back to the
/// example markup.
fn html_source(config: &PreviewConfig, entries: &EntrySet) -> HtmlSource {
    if entries.component.is_some() && entries.uses_jsx() {
        let options = RenderOptions {
            title: config.title.clone(),
            router: RouterMode::from(config.router),
            debug: config.debug,
        };
        if let Some(pipeline) = RenderPipeline::from_entries(entries, policy(config), options) {
            return HtmlSource::Render(Arc::new(pipeline));
        }
    }

    match &entries.markup {
        Some(markup) => HtmlSource::Static(markup.clone()),
        None => HtmlSource::None,
    }
}

fn policy(config: &PreviewConfig) -> InvalidationPolicy {
    config
        .framework
        .iter()
        .fold(InvalidationPolicy::new(&config.root), |policy, path| {
            policy.with_framework_path(path)
        })
}

fn relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}
