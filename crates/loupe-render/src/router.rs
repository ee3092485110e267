//! Routing layer.
//!
//! A routing component declares its routes as nested `<Route>` elements:
//!
//! ```html
//! <Route path="/" handler="./pages/home.jsx">
//!   <Route path="users/:id" handler="./pages/user.jsx" />
//!   <Route path="/about" handler="./pages/about.jsx" />
//! </Route>
//! ```
//!
//! Child paths starting with `/` are absolute, others are appended to their
//! parent's path. `:name` segments capture a parameter and a `*` segment
//! captures the rest of the path. Handler paths resolve against the directory
//! of the routing component. The deepest route matching the requested path
//! renders its handler component.

use crate::cache::ModuleCache;
use crate::completion::Completion;
use crate::error::RenderError;
use crate::loader::ModuleLoader;
use crate::module::{Component, Module, ModuleKind};
use crate::module_id::ModuleId;
use path_clean::PathClean;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use tracing::debug;

/// Type tag marking a component as a route declaration.
pub const ROUTE_MARKER: &str = "Route";

static ROUTE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(/?)Route\b((?:[^>/]|/[^>])*)(/?)>").expect("valid route tag regex")
});
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][\w-]*)\s*=\s*"([^"]*)""#).expect("valid attribute regex")
});

/// Tri-state routing switch.
///
/// `Auto` lets the pipeline turn routing on when the component is a route
/// declaration; an explicit choice is never overridden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterMode {
    #[default]
    Auto,
    Enabled,
    Disabled,
}

impl RouterMode {
    pub fn is_enabled(self) -> bool {
        self == RouterMode::Enabled
    }

    pub fn is_explicit(self) -> bool {
        self != RouterMode::Auto
    }
}

impl From<Option<bool>> for RouterMode {
    fn from(flag: Option<bool>) -> Self {
        match flag {
            None => RouterMode::Auto,
            Some(true) => RouterMode::Enabled,
            Some(false) => RouterMode::Disabled,
        }
    }
}

/// Router mode to switch to after loading `component`, if any.
///
/// Only an unset mode is upgraded, and only for components whose root element
/// is a route declaration.
pub fn detect_router(mode: RouterMode, component: &Component) -> Option<RouterMode> {
    (mode == RouterMode::Auto && component.type_tag() == Some(ROUTE_MARKER))
        .then_some(RouterMode::Enabled)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// Declared pattern, `:param` syntax.
    pub pattern: String,
    pub handler: PathBuf,
}

/// Compiled route declarations of one routing component.
pub struct RouteTable {
    routes: Vec<RouteEntry>,
    router: matchit::Router<usize>,
}

/// A request path matched against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub entry: &'a RouteEntry,
    pub params: BTreeMap<String, String>,
}

impl RouteTable {
    /// Parse the route declarations in `source`. Relative handlers resolve
    /// against `base_dir`.
    pub fn parse(source: &str, base_dir: &Path) -> Result<Self, String> {
        let mut table = Self {
            routes: Vec::new(),
            router: matchit::Router::new(),
        };
        let mut stack: Vec<String> = Vec::new();

        for caps in ROUTE_TAG.captures_iter(source) {
            if &caps[1] == "/" {
                stack
                    .pop()
                    .ok_or_else(|| "closing </Route> without a matching <Route>".to_string())?;
                continue;
            }

            let attrs: BTreeMap<&str, &str> = ATTRIBUTE
                .captures_iter(&caps[2])
                .filter_map(|a| Some((a.get(1)?.as_str(), a.get(2)?.as_str())))
                .collect();
            let parent = stack.last().map(String::as_str).unwrap_or("/");
            let pattern = match attrs.get("path") {
                Some(path) => join_route(parent, path),
                None => parent.to_string(),
            };

            if let Some(handler) = attrs.get("handler") {
                table.insert(pattern.clone(), base_dir.join(handler).clean())?;
            }
            if caps[3].is_empty() {
                stack.push(pattern);
            }
        }

        if !stack.is_empty() {
            return Err(format!("{} <Route> element(s) left unclosed", stack.len()));
        }
        if table.routes.is_empty() {
            return Err("no <Route> declares a handler".to_string());
        }
        Ok(table)
    }

    fn insert(&mut self, pattern: String, handler: PathBuf) -> Result<(), String> {
        self.router
            .insert(to_matchit(&pattern), self.routes.len())
            .map_err(|err| format!("route {pattern}: {err}"))?;
        self.routes.push(RouteEntry { pattern, handler });
        Ok(())
    }

    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }

    pub fn at(&self, path: &str) -> Option<RouteMatch<'_>> {
        let normalized = normalize_request_path(path);
        let matched = self.router.at(&normalized).ok()?;
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Some(RouteMatch {
            entry: &self.routes[*matched.value],
            params,
        })
    }
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

fn join_route(parent: &str, path: &str) -> String {
    if path.starts_with('/') {
        return path.to_string();
    }
    let parent = parent.trim_end_matches('/');
    format!("{parent}/{path}")
}

/// `:id` → `{id}`, `*` → `{*splat}`.
fn to_matchit(pattern: &str) -> String {
    let trimmed = if pattern.len() > 1 {
        pattern.trim_end_matches('/')
    } else {
        pattern
    };
    trimmed
        .split('/')
        .map(|segment| {
            if let Some(name) = segment.strip_prefix(':') {
                format!("{{{name}}}")
            } else if segment == "*" {
                "{*splat}".to_string()
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn normalize_request_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    match path.trim_end_matches('/') {
        "" => "/".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Component chosen by the routing layer for a request.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub component: Arc<Module>,
    pub params: BTreeMap<String, String>,
    pub pattern: String,
}

/// Resolves requested paths against a routing component.
#[derive(Debug, Clone)]
pub struct RoutingLayer {
    cache: Arc<ModuleCache>,
    loader: Arc<dyn ModuleLoader>,
}

impl RoutingLayer {
    pub fn new(cache: Arc<ModuleCache>, loader: Arc<dyn ModuleLoader>) -> Self {
        Self { cache, loader }
    }

    /// Resolve `path` against the routes declared by `routes` and complete
    /// `completion` with the handler to render.
    ///
    /// Every failure is delivered through the completion; nothing runs after
    /// it has been completed.
    pub fn run(
        &self,
        routes: &Module,
        path: &str,
        completion: Completion<Result<Resolution, RenderError>>,
    ) {
        completion.complete(self.resolve(routes, path));
    }

    pub fn resolve(&self, routes: &Module, path: &str) -> Result<Resolution, RenderError> {
        let source = routes.template_source().unwrap_or_default();
        let base_dir = routes.id().parent().unwrap_or_else(|| Path::new("/"));
        let table =
            RouteTable::parse(source, base_dir).map_err(|message| RenderError::RouteTable {
                path: routes.id().path().to_path_buf(),
                message,
            })?;

        let matched = table.at(path).ok_or_else(|| RenderError::NoRoute {
            path: path.to_string(),
        })?;
        debug!(path, pattern = %matched.entry.pattern, "route matched");

        let id = ModuleId::new(&matched.entry.handler)?;
        let component = self
            .cache
            .get_or_load(&id, ModuleKind::Component, self.loader.as_ref())?;

        Ok(Resolution {
            component,
            params: matched.params,
            pattern: matched.entry.pattern.clone(),
        })
    }
}
