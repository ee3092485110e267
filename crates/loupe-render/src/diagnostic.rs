//! In-page diagnostics for failed renders.

use crate::error::RenderError;
use crate::html::html_escape;
use std::error::Error as _;

/// Format a render failure as an HTML fragment.
///
/// Template errors include the engine's debug output (source excerpt and
/// referenced variables) when the environment was built in debug mode.
pub fn htmlify_error(err: &RenderError) -> String {
    let mut detail = match err {
        RenderError::Template(inner) => format!("{inner:#}"),
        other => other.to_string(),
    };

    let mut source = err.source();
    while let Some(cause) = source {
        let line = cause.to_string();
        if !detail.contains(&line) {
            detail.push_str("\n\ncaused by: ");
            detail.push_str(&line);
        }
        source = cause.source();
    }

    format!(
        "<div class=\"loupe-error\"><h1>{}</h1><pre>{}</pre></div>",
        html_escape(title(err)),
        html_escape(&detail)
    )
}

fn title(err: &RenderError) -> &'static str {
    match err {
        RenderError::Template(_) => "Render error",
        RenderError::NoRoute { .. } => "No matching route",
        RenderError::RouteTable { .. } => "Invalid routes",
        RenderError::RouteAbandoned => "Routing error",
        RenderError::Load(_) => "Load error",
    }
}
