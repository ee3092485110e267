//! The rendering framework.
//!
//! A [`Renderer`] wraps a MiniJinja environment that is built fresh for every
//! render, so no template compiled from an older version of a file can leak
//! into the next request. Includes and imports are pulled through the module
//! cache:
//!
//! - `./x.html` / `../x.html` resolve against the including template;
//! - absolute names are used as they are;
//! - bare names (`loupe/card.html`) resolve under `<root>/node_modules`.
//!
//! Components can call two functions:
//!
//! - `raise(message)` fails the render with `message`;
//! - `document_head(title=..., description=...)` overrides the document
//!   metadata through the per-render [`RenderContext`].

use crate::cache::ModuleCache;
use crate::error::{LoadError, RenderError};
use crate::invalidate::VENDOR_DIR;
use crate::lint;
use crate::loader::ModuleLoader;
use crate::module::{Module, ModuleKind};
use crate::module_id::ModuleId;
use minijinja::value::Kwargs;
use minijinja::{AutoEscape, Environment, Error, ErrorKind, UndefinedBehavior, Value};
use parking_lot::Mutex;
use path_clean::PathClean;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Metadata a component wants in the document head.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentHead {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl DocumentHead {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// State shared between the pipeline and the functions a component calls
/// while rendering. One context per render.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    head: Arc<Mutex<DocumentHead>>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current head overrides.
    pub fn head(&self) -> DocumentHead {
        self.head.lock().clone()
    }

    /// Read the head overrides and reset the slot.
    pub fn take_head(&self) -> DocumentHead {
        std::mem::take(&mut *self.head.lock())
    }
}

#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Attach source locations to template errors.
    pub debug: bool,
    /// Directory bare include names resolve against.
    pub vendor_root: PathBuf,
}

impl EngineOptions {
    pub fn new(project_root: &Path, debug: bool) -> Self {
        Self {
            debug,
            vendor_root: project_root.join(VENDOR_DIR),
        }
    }
}

pub struct Renderer {
    env: Environment<'static>,
    context: RenderContext,
}

impl Renderer {
    pub fn new(
        cache: Arc<ModuleCache>,
        loader: Arc<dyn ModuleLoader>,
        options: &EngineOptions,
    ) -> Self {
        let context = RenderContext::new();
        let mut env = Environment::new();
        env.set_debug(options.debug);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::Html);

        let vendor_root = options.vendor_root.clone();
        env.set_path_join_callback(move |name, parent| join_include(name, parent, &vendor_root));
        env.set_loader(move |name| load_partial(&cache, loader.as_ref(), name));

        env.add_function("raise", raise);
        let head = Arc::clone(&context.head);
        env.add_function("document_head", move |kwargs: Kwargs| {
            document_head(&head, kwargs)
        });

        Self { env, context }
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Render a component module with the given props and route params.
    ///
    /// Object props are spread into the top-level context; the full payload
    /// is also available as `props`, route params as `params`.
    pub fn render(
        &mut self,
        module: &Module,
        props: &serde_json::Value,
        params: &BTreeMap<String, String>,
    ) -> Result<String, RenderError> {
        let name = module.id().template_name();
        let source = module.template_source().unwrap_or_default().to_string();
        self.env.add_template_owned(name.clone(), source)?;

        let mut ctx = serde_json::Map::new();
        if let serde_json::Value::Object(fields) = props {
            ctx.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        ctx.insert("props".to_string(), props.clone());
        ctx.insert(
            "params".to_string(),
            serde_json::to_value(params).unwrap_or_default(),
        );

        let markup = self
            .env
            .get_template(&name)?
            .render(Value::from_serialize(&ctx))?;
        lint::report(&name, &markup);
        Ok(markup)
    }
}

fn join_include<'s>(name: &'s str, parent: &'s str, vendor_root: &Path) -> Cow<'s, str> {
    if name.starts_with("./") || name.starts_with("../") {
        let base = Path::new(parent).parent().unwrap_or_else(|| Path::new("/"));
        Cow::Owned(base.join(name).clean().to_string_lossy().into_owned())
    } else if Path::new(name).is_absolute() {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(vendor_root.join(name).to_string_lossy().into_owned())
    }
}

fn load_partial(
    cache: &ModuleCache,
    loader: &dyn ModuleLoader,
    name: &str,
) -> Result<Option<String>, Error> {
    let id = ModuleId::new(name).map_err(|err| include_error(name, err))?;
    match cache.get_or_load(&id, ModuleKind::Partial, loader) {
        Ok(module) => Ok(module.template_source().map(str::to_owned)),
        Err(LoadError::NotFound(_)) => Ok(None),
        Err(err) => Err(include_error(name, err)),
    }
}

fn include_error<E>(name: &str, err: E) -> Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    Error::new(
        ErrorKind::InvalidOperation,
        format!("failed to load template {name}"),
    )
    .with_source(err)
}

fn raise(message: String) -> Result<String, Error> {
    Err(Error::new(ErrorKind::InvalidOperation, message))
}

fn document_head(head: &Mutex<DocumentHead>, kwargs: Kwargs) -> Result<String, Error> {
    let title: Option<String> = kwargs.get("title")?;
    let description: Option<String> = kwargs.get("description")?;
    kwargs.assert_all_used()?;

    let mut head = head.lock();
    if title.is_some() {
        head.title = title;
    }
    if description.is_some() {
        head.description = description;
    }
    Ok(String::new())
}
