//! Error overlay shown in place of the preview while a bundle is broken.
//!
//! The live-reload script is injected like into any other page, so the
//! overlay goes away on the next successful build.

use loupe_render::html_escape;

/// Generate the overlay page for a build error.
pub fn generate_error_overlay(error: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><meta charset="utf-8"><title>Build Error</title><style>
body {{ margin: 0; background: #1e1e1e; color: #e6e6e6; font: 14px/1.5 ui-monospace, Menlo, monospace; }}
main {{ padding: 32px; }}
h1 {{ color: #ff6b6b; font-size: 20px; margin: 0 0 16px; }}
pre {{ white-space: pre-wrap; background: #2a2a2a; padding: 16px; border-left: 4px solid #ff6b6b; }}
p {{ color: #9a9a9a; }}
</style></head><body><main><h1>Build Error</h1><pre>{}</pre><p>Save a file to rebuild.</p></main></body></html>"#,
        html_escape(error)
    )
}
