//! HTML document assembly.

use crate::engine::DocumentHead;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

const VIEWPORT: &str = "width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=0";

/// URLs under which the bundler serves the script and style bundles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputAliases {
    pub script: Option<String>,
    pub style: Option<String>,
}

impl OutputAliases {
    pub fn new(script: Option<String>, style: Option<String>) -> Self {
        Self { script, style }
    }
}

/// Per-document options derived from the render options and what the
/// component wrote to its document head.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentOptions {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Used when no title was configured or set by the component.
    pub fallback_title: String,
    pub is_error: bool,
}

impl DocumentOptions {
    pub fn new(title: Option<String>, fallback_title: impl Into<String>) -> Self {
        Self {
            title,
            fallback_title: fallback_title.into(),
            ..Self::default()
        }
    }

    /// Apply overrides set by the component during render.
    pub fn merge_head(&mut self, head: DocumentHead) {
        if head.title.is_some() {
            self.title = head.title;
        }
        if head.description.is_some() {
            self.description = head.description;
        }
    }

    pub fn resolved_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.fallback_title)
    }
}

/// Wrap a rendered body in a full document.
///
/// On success the body goes inside the `#app` mount point followed by the
/// script bundle. An error body is placed before an empty mount point and the
/// script is left out so client code never runs against a failed render. The
/// document always ends with `</body></html>`.
pub fn assemble(aliases: &OutputAliases, body: &str, options: &DocumentOptions) -> String {
    let mut html = String::with_capacity(body.len() + 512);
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    let _ = write!(html, "<meta name=\"viewport\" content=\"{VIEWPORT}\">");
    let _ = write!(html, "<title>{}</title>", html_escape(options.resolved_title()));
    if let Some(description) = &options.description {
        let _ = write!(
            html,
            "<meta name=\"description\" content=\"{}\">",
            html_escape(description)
        );
    }
    html.push_str("</head><body>");

    if let Some(style) = &aliases.style {
        let _ = write!(html, "<link rel=\"stylesheet\" href=\"{}\">", html_escape(style));
    }

    if options.is_error {
        html.push_str(body);
        html.push_str("<div id=\"app\"></div>");
    } else {
        let _ = write!(html, "<div id=\"app\">{body}</div>");
        if let Some(script) = &aliases.script {
            let _ = write!(html, "<script src=\"{}\"></script>", html_escape(script));
        }
    }

    html.push_str("</body></html>");
    html
}

/// Escape text for use in element content and quoted attribute values.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
