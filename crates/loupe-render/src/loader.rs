//! Module loading seam.
//!
//! The cache never touches the filesystem itself: it asks a [`ModuleLoader`]
//! on a miss. [`FsModuleLoader`] is the production loader; tests inject their
//! own to observe loads without real files.

use crate::error::LoadError;
use crate::module::{Component, Module, ModuleBody, ModuleKind};
use crate::module_id::ModuleId;
use std::fmt;
use std::io;
use tracing::debug;

/// Loads a module from its identity.
pub trait ModuleLoader: Send + Sync + fmt::Debug {
    /// Read and parse the module behind `id` as the requested kind.
    fn load(&self, id: &ModuleId, kind: ModuleKind) -> Result<Module, LoadError>;
}

/// Loader reading modules from disk.
///
/// Components and partials are compiled once to surface syntax errors as load
/// failures; data modules are parsed as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsModuleLoader;

impl ModuleLoader for FsModuleLoader {
    fn load(&self, id: &ModuleId, kind: ModuleKind) -> Result<Module, LoadError> {
        let source = std::fs::read_to_string(id.path()).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                LoadError::NotFound(id.path().to_path_buf())
            } else {
                LoadError::Io {
                    path: id.path().to_path_buf(),
                    source,
                }
            }
        })?;

        let body = match kind {
            ModuleKind::Component => {
                check_syntax(id, &source)?;
                ModuleBody::Component(Component::parse(source))
            }
            ModuleKind::Partial => {
                check_syntax(id, &source)?;
                ModuleBody::Partial(source)
            }
            ModuleKind::Data => ModuleBody::Data(parse_data(id, &source)?),
        };

        debug!(module = %id, ?kind, "loaded module");
        Ok(Module::new(id.clone(), body))
    }
}

/// Compile the template once and discard it.
fn check_syntax(id: &ModuleId, source: &str) -> Result<(), LoadError> {
    let env = minijinja::Environment::new();
    let name = id.template_name();
    env.template_from_named_str(&name, source)
        .map(|_| ())
        .map_err(|err| LoadError::Syntax {
            path: id.path().to_path_buf(),
            message: format!("{err:#}"),
        })
}

/// Parse a data module.
///
/// Accepts plain JSON as well as a JSON value exported the CommonJS or ESM way
/// (`module.exports = {...};`, `export default {...};`).
pub fn parse_data(id: &ModuleId, source: &str) -> Result<serde_json::Value, LoadError> {
    let mut body = source.trim();
    for prefix in ["module.exports", "export default"] {
        if let Some(rest) = body.strip_prefix(prefix) {
            let rest = rest.trim_start();
            body = rest.strip_prefix('=').unwrap_or(rest).trim_start();
            break;
        }
    }
    let body = body.trim_end().trim_end_matches(';');

    serde_json::from_str(body).map_err(|source| LoadError::Data {
        path: id.path().to_path_buf(),
        source,
    })
}
