//! Render-on-request pipeline.
//!
//! Every HTML request runs the same sequence under the render lock:
//!
//! 1. purge stale modules from the cache;
//! 2. build a fresh rendering framework;
//! 3. prepare the routing layer unless routing is disabled;
//! 4. load the component (failures end the request, no HTML);
//! 5. auto-enable routing for route declarations when the mode is unset;
//! 6. load the data payload (failures end the request, no HTML);
//! 7. render, through the routing layer when enabled;
//! 8. turn render failures into an in-page diagnostic;
//! 9. merge document head overrides;
//! 10. assemble the document.

use crate::cache::ModuleCache;
use crate::completion::Completion;
use crate::diagnostic::htmlify_error;
use crate::engine::{DocumentHead, EngineOptions, Renderer};
use crate::entry::EntrySet;
use crate::error::{LoadError, PipelineError, RenderError};
use crate::html::{DocumentOptions, OutputAliases, assemble};
use crate::invalidate::InvalidationPolicy;
use crate::loader::{FsModuleLoader, ModuleLoader};
use crate::module::{Module, ModuleKind};
use crate::module_id::ModuleId;
use crate::router::{RouterMode, RoutingLayer, detect_router};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Options fixed for the lifetime of the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Document title; the component directory name when unset.
    pub title: Option<String>,
    pub router: RouterMode,
    pub debug: bool,
}

/// An HTML request handed to the pipeline by the dev server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderRequest {
    pub path: String,
    pub aliases: OutputAliases,
}

impl RenderRequest {
    pub fn new(path: impl Into<String>, aliases: OutputAliases) -> Self {
        Self {
            path: path.into(),
            aliases,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered { markup: String, head: DocumentHead },
    Failed { diagnostic: String },
}

pub struct RenderPipeline {
    component: PathBuf,
    data: Option<PathBuf>,
    project_name: String,
    options: RenderOptions,
    router_mode: parking_lot::Mutex<RouterMode>,
    cache: Arc<ModuleCache>,
    loader: Arc<dyn ModuleLoader>,
    policy: InvalidationPolicy,
    render_lock: tokio::sync::Mutex<()>,
}

impl RenderPipeline {
    pub fn new(
        component: impl Into<PathBuf>,
        policy: InvalidationPolicy,
        options: RenderOptions,
    ) -> Self {
        let component = component.into();
        let project_name = component
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            component,
            data: None,
            project_name,
            router_mode: parking_lot::Mutex::new(options.router),
            options,
            cache: Arc::new(ModuleCache::new()),
            loader: Arc::new(FsModuleLoader),
            policy,
            render_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Pipeline for a resolved component directory, if it has a component.
    pub fn from_entries(
        entries: &EntrySet,
        policy: InvalidationPolicy,
        options: RenderOptions,
    ) -> Option<Self> {
        let component = entries.component.clone()?;
        let mut pipeline = Self::new(component, policy, options).with_data(entries.data.clone());
        if let Some(name) = entries.dir.file_name() {
            pipeline.project_name = name.to_string_lossy().into_owned();
        }
        Some(pipeline)
    }

    pub fn with_data(mut self, data: Option<PathBuf>) -> Self {
        self.data = data;
        self
    }

    pub fn with_loader(mut self, loader: Arc<dyn ModuleLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_cache(mut self, cache: Arc<ModuleCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &Arc<ModuleCache> {
        &self.cache
    }

    pub fn policy(&self) -> &InvalidationPolicy {
        &self.policy
    }

    pub fn component_path(&self) -> &Path {
        &self.component
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Current router mode, including a mode switched on by auto-detection.
    pub fn router_mode(&self) -> RouterMode {
        *self.router_mode.lock()
    }

    /// Render the document for `request`.
    ///
    /// Load failures of the component or its data are returned as errors.
    /// Render failures produce a document with an in-page diagnostic.
    pub async fn render(&self, request: &RenderRequest) -> Result<String, PipelineError> {
        let _guard = self.render_lock.lock().await;
        info!("load: {}", request.path);

        self.policy.apply(&self.cache);

        let engine_options = EngineOptions::new(self.policy.project_root(), self.options.debug);
        let mut renderer = Renderer::new(
            Arc::clone(&self.cache),
            Arc::clone(&self.loader),
            &engine_options,
        );

        let mut mode = self.router_mode();
        let mut routing = (mode != RouterMode::Disabled).then(|| self.routing_layer());

        let component = self.load(&self.component, ModuleKind::Component)?;

        if let Some(detected) = component
            .as_component()
            .and_then(|c| detect_router(mode, c))
        {
            mode = detected;
            *self.router_mode.lock() = detected;
            routing.get_or_insert_with(|| self.routing_layer());
            warn!(
                "{} declares <Route> elements, routing was enabled automatically; \
                 pass --router false to disable it",
                self.component.display()
            );
        }

        let props = match &self.data {
            Some(path) => self
                .load(path, ModuleKind::Data)?
                .as_data()
                .cloned()
                .unwrap_or_default(),
            None => serde_json::Value::Null,
        };

        let routing = routing.filter(|_| mode.is_enabled());
        let outcome = self
            .render_outcome(&mut renderer, routing.as_ref(), &component, &props, &request.path)
            .await;

        let mut document = DocumentOptions::new(self.options.title.clone(), &self.project_name);
        let body = match outcome {
            RenderOutcome::Rendered { markup, head } => {
                document.merge_head(head);
                markup
            }
            RenderOutcome::Failed { diagnostic } => {
                document.is_error = true;
                diagnostic
            }
        };

        Ok(assemble(&request.aliases, &body, &document))
    }

    /// Render `request` on a spawned task and complete `completion` with the
    /// document.
    pub fn handle(
        self: &Arc<Self>,
        request: RenderRequest,
        completion: Completion<Result<String, PipelineError>>,
    ) {
        let pipeline = Arc::clone(self);
        tokio::spawn(async move {
            let result = pipeline.render(&request).await;
            completion.complete(result);
        });
    }

    /// [`handle`](Self::handle) and wait for the completion.
    pub async fn request(self: &Arc<Self>, request: RenderRequest) -> Result<String, PipelineError> {
        let (completion, receiver) = Completion::channel();
        self.handle(request, completion);
        receiver.wait().await.map_err(|_| PipelineError::Abandoned)?
    }

    async fn render_outcome(
        &self,
        renderer: &mut Renderer,
        routing: Option<&RoutingLayer>,
        component: &Module,
        props: &serde_json::Value,
        path: &str,
    ) -> RenderOutcome {
        let result = match routing {
            Some(layer) => Self::render_routed(renderer, layer, component, props, path).await,
            None => renderer.render(component, props, &BTreeMap::new()),
        };

        let head = renderer.context().take_head();
        match result {
            Ok(markup) => RenderOutcome::Rendered { markup, head },
            Err(err) => {
                warn!(component = %component.id(), "render failed: {err}");
                RenderOutcome::Failed {
                    diagnostic: htmlify_error(&err),
                }
            }
        }
    }

    async fn render_routed(
        renderer: &mut Renderer,
        layer: &RoutingLayer,
        routes: &Module,
        props: &serde_json::Value,
        path: &str,
    ) -> Result<String, RenderError> {
        let (completion, receiver) = Completion::channel();
        layer.run(routes, path, completion);
        let resolution = receiver
            .wait()
            .await
            .map_err(|_| RenderError::RouteAbandoned)??;
        renderer.render(&resolution.component, props, &resolution.params)
    }

    fn routing_layer(&self) -> RoutingLayer {
        RoutingLayer::new(Arc::clone(&self.cache), Arc::clone(&self.loader))
    }

    fn load(&self, path: &Path, kind: ModuleKind) -> Result<Arc<Module>, LoadError> {
        let id = ModuleId::new(path)?;
        self.cache.get_or_load(&id, kind, self.loader.as_ref())
    }
}

impl std::fmt::Debug for RenderPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderPipeline")
            .field("component", &self.component)
            .field("data", &self.data)
            .field("project_name", &self.project_name)
            .field("options", &self.options)
            .field("router_mode", &self.router_mode())
            .field("cached_modules", &self.cache.len())
            .finish_non_exhaustive()
    }
}
