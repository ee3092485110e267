//! Loaded module values held by the module cache.

use crate::module_id::ModuleId;
use serde_json::Value;

/// What the caller expects a module to be when loading it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    /// A renderable component (entry component or route handler).
    Component,
    /// A static data payload.
    Data,
    /// A template pulled in by `{% include %}` / `{% import %}`.
    Partial,
}

/// A loaded unit of code, shared out of the cache as `Arc<Module>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    id: ModuleId,
    body: ModuleBody,
}

/// Parsed contents of a module.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleBody {
    Component(Component),
    Data(Value),
    Partial(String),
}

impl Module {
    pub fn new(id: ModuleId, body: ModuleBody) -> Self {
        Self { id, body }
    }

    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    pub fn body(&self) -> &ModuleBody {
        &self.body
    }

    pub fn kind(&self) -> ModuleKind {
        match self.body {
            ModuleBody::Component(_) => ModuleKind::Component,
            ModuleBody::Data(_) => ModuleKind::Data,
            ModuleBody::Partial(_) => ModuleKind::Partial,
        }
    }

    pub fn as_component(&self) -> Option<&Component> {
        match &self.body {
            ModuleBody::Component(component) => Some(component),
            _ => None,
        }
    }

    pub fn as_data(&self) -> Option<&Value> {
        match &self.body {
            ModuleBody::Data(value) => Some(value),
            _ => None,
        }
    }

    /// Template source, for components and partials alike.
    pub fn template_source(&self) -> Option<&str> {
        match &self.body {
            ModuleBody::Component(component) => Some(component.source()),
            ModuleBody::Partial(source) => Some(source),
            ModuleBody::Data(_) => None,
        }
    }
}

/// Description of a loaded component.
///
/// The type tag is the name of the root element when that element is itself
/// a component (capitalised name such as `Route`), not a plain HTML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    source: String,
    type_tag: Option<String>,
}

impl Component {
    pub fn parse(source: String) -> Self {
        let type_tag = root_type_tag(&source).map(str::to_owned);
        Self { source, type_tag }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn type_tag(&self) -> Option<&str> {
        self.type_tag.as_deref()
    }
}

/// Name of the first element when it is a component element.
///
/// Leading whitespace and template comments (`{# ... #}`) are skipped.
fn root_type_tag(source: &str) -> Option<&str> {
    let mut rest = source.trim_start();
    while let Some(after_open) = rest.strip_prefix("{#") {
        let end = after_open.find("#}")?;
        rest = after_open[end + 2..].trim_start();
    }

    let tag = rest.strip_prefix('<')?;
    let len = tag
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-'))
        .unwrap_or(tag.len());
    let name = &tag[..len];

    name.chars()
        .next()
        .filter(char::is_ascii_uppercase)
        .map(|_| name)
}
