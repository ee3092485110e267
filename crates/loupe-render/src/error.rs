//! Error types for the render core.
//!
//! The taxonomy follows how a failure is surfaced to the caller:
//!
//! - [`LoadError`] - a module could not be read or parsed. Returned to the
//!   render callback as a request-level error, no HTML is produced.
//! - [`RenderError`] - the component loaded but rendering it failed. Recovered
//!   inside the pipeline into an in-page diagnostic.
//! - [`PipelineError`] - what the render callback completes with on failure.

use crate::module_id::ModuleIdError;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a module into the cache.
#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    /// The module file does not exist (any more).
    #[error("Module not found: {}", .0.display())]
    #[diagnostic(
        code(loupe::load::not_found),
        help("Entry files are resolved once at startup; restart the preview if you renamed one")
    )]
    NotFound(PathBuf),

    /// The module file exists but could not be read.
    #[error("Failed to read module {}: {source}", .path.display())]
    #[diagnostic(code(loupe::load::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The component or partial does not compile as a template.
    #[error("Syntax error in {}: {message}", .path.display())]
    #[diagnostic(
        code(loupe::load::syntax),
        help("Fix the template syntax, the next request picks up the change")
    )]
    Syntax { path: PathBuf, message: String },

    /// The data module is not a valid JSON payload.
    #[error("Invalid data module {}: {source}", .path.display())]
    #[diagnostic(
        code(loupe::load::data),
        help("Data modules hold a JSON value, optionally prefixed with `module.exports =` or `export default`")
    )]
    Data {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The module path could not be turned into a module identity.
    #[error(transparent)]
    #[diagnostic(code(loupe::load::module_id))]
    ModuleId(#[from] ModuleIdError),
}

/// Errors raised while rendering a loaded component.
#[derive(Debug, Error, Diagnostic)]
pub enum RenderError {
    /// Evaluation of the component template failed.
    #[error("{0}")]
    #[diagnostic(code(loupe::render::template))]
    Template(#[from] minijinja::Error),

    /// The routing layer found no route for the requested path.
    #[error("No route matches {path}")]
    #[diagnostic(
        code(loupe::render::no_route),
        help("Add a <Route> whose path matches the request, or disable routing with --router false")
    )]
    NoRoute { path: String },

    /// The `<Route>` table could not be built.
    #[error("Invalid route table in {}: {message}", .path.display())]
    #[diagnostic(code(loupe::render::route_table))]
    RouteTable { path: PathBuf, message: String },

    /// The routing layer dropped its completion without resolving.
    #[error("Routing layer finished without resolving a component")]
    #[diagnostic(code(loupe::render::route_abandoned))]
    RouteAbandoned,

    /// A module needed during rendering (route handler) failed to load.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),
}

impl From<ModuleIdError> for RenderError {
    fn from(err: ModuleIdError) -> Self {
        RenderError::Load(LoadError::ModuleId(err))
    }
}

/// Errors delivered to the render callback.
#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    /// The component or data module failed to load before rendering.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),

    /// The render task went away without completing.
    #[error("Render finished without producing a document")]
    #[diagnostic(code(loupe::pipeline::abandoned))]
    Abandoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_not_found_message() {
        let err = LoadError::NotFound(PathBuf::from("/project/entry.jsx"));
        assert!(err.to_string().contains("/project/entry.jsx"));
    }

    #[test]
    fn test_render_error_wraps_load_error() {
        let err: RenderError = LoadError::NotFound(PathBuf::from("/p/home.jsx")).into();
        assert!(matches!(err, RenderError::Load(LoadError::NotFound(_))));
        assert!(err.to_string().contains("home.jsx"));
    }

    #[test]
    fn test_no_route_message() {
        let err = RenderError::NoRoute {
            path: "/missing".to_string(),
        };
        assert_eq!(err.to_string(), "No route matches /missing");
    }

    #[test]
    fn test_pipeline_error_is_transparent_over_load() {
        let err: PipelineError = LoadError::Syntax {
            path: PathBuf::from("entry.jsx"),
            message: "unexpected end of input".to_string(),
        }
        .into();
        assert!(err.to_string().starts_with("Syntax error in entry.jsx"));
    }
}
