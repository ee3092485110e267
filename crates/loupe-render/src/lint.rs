//! Accessibility lint over rendered markup.
//!
//! Runs on every successful render. Findings are reported as `warn!` events
//! and never fail the render.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tracing::warn;

static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b([^>]*)>").expect("valid img regex"));
static ANCHOR_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b([^>]*)>").expect("valid anchor regex"));
static BUTTON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<button\b([^>]*)>(.*?)</button>").expect("valid button regex")
});
// Name with an optional value; quoted values are consumed whole.
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'=<>/]+)(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'>]+))?"#)
        .expect("valid attribute regex")
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum A11yRule {
    ImgAlt,
    AnchorHref,
    ButtonName,
}

impl fmt::Display for A11yRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            A11yRule::ImgAlt => "<img> elements must have an alt attribute",
            A11yRule::AnchorHref => "<a> elements must have an href attribute",
            A11yRule::ButtonName => "<button> elements must have text or an aria-label",
        };
        f.write_str(message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A11yFinding {
    pub rule: A11yRule,
    pub element: String,
}

/// Check rendered markup.
pub fn check(markup: &str) -> Vec<A11yFinding> {
    let mut findings = Vec::new();

    for caps in IMG_TAG.captures_iter(markup) {
        if !has_attr(&caps[1], "alt") {
            findings.push(finding(A11yRule::ImgAlt, &caps[0]));
        }
    }
    for caps in ANCHOR_TAG.captures_iter(markup) {
        if !has_attr(&caps[1], "href") {
            findings.push(finding(A11yRule::AnchorHref, &caps[0]));
        }
    }
    for caps in BUTTON.captures_iter(markup) {
        let text = TAG.replace_all(&caps[2], "");
        if text.trim().is_empty() && !has_attr(&caps[1], "aria-label") {
            findings.push(finding(A11yRule::ButtonName, &caps[0]));
        }
    }

    findings
}

/// Check markup and report findings through tracing.
pub fn report(component: &str, markup: &str) -> usize {
    let findings = check(markup);
    for finding in &findings {
        warn!(component, element = %finding.element, "accessibility: {}", finding.rule);
    }
    findings.len()
}

fn finding(rule: A11yRule, element: &str) -> A11yFinding {
    A11yFinding {
        rule,
        element: element.to_string(),
    }
}

fn has_attr(attrs: &str, name: &str) -> bool {
    ATTRIBUTE
        .captures_iter(attrs)
        .any(|caps| caps[1].eq_ignore_ascii_case(name))
}
