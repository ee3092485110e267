//! Builds the style and script bundles into a [`BundleCache`].
//!
//! ```text
//! entry.css → lightningcss parse → lower for targets → print (minified unless debug) → /bundle.css
//! entry.js  → read (sourceURL appended in debug) → /bundle.js
//! ```

use crate::dev::BundleCache;
use crate::error::BuildError;
use crate::startup::{CssConfig, JsConfig, StartupConfig};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use std::path::Path;
use std::time::Instant;

/// Browsers the style bundle is lowered and prefixed for.
fn autoprefix_targets() -> Targets {
    Targets::from(Browsers {
        chrome: Some(64 << 16),
        edge: Some(79 << 16),
        firefox: Some(67 << 16),
        safari: Some(12 << 16),
        ios_saf: Some(12 << 16),
        ..Browsers::default()
    })
}

#[derive(Debug, Clone, Default)]
pub struct BundleBuilder {
    css: Option<CssConfig>,
    js: Option<JsConfig>,
}

impl BundleBuilder {
    pub fn new(css: Option<CssConfig>, js: Option<JsConfig>) -> Self {
        Self { css, js }
    }

    pub fn from_startup(startup: &StartupConfig) -> Self {
        Self::new(startup.css.clone(), startup.js.clone())
    }

    /// Build every configured bundle.
    ///
    /// Returns the build duration in milliseconds with the bundles.
    pub fn build(&self) -> Result<(u64, BundleCache), BuildError> {
        let start = Instant::now();
        let mut cache = BundleCache::new();

        if let Some(css) = &self.css {
            let code = build_style(css)?;
            cache.insert(css.alias.clone(), code.into_bytes(), "text/css; charset=utf-8");
        }

        if let Some(js) = &self.js {
            let code = build_script(js)?;
            cache.insert(
                js.alias.clone(),
                code.into_bytes(),
                "application/javascript; charset=utf-8",
            );
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::debug!("built {} bundle(s) in {}ms", cache.len(), duration_ms);
        Ok((duration_ms, cache))
    }
}

fn read_entry(path: &Path) -> Result<String, BuildError> {
    std::fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => BuildError::EntryNotFound(path.to_path_buf()),
        _ => BuildError::ReadFailed {
            file: path.to_path_buf(),
            source,
        },
    })
}

fn build_style(config: &CssConfig) -> Result<String, BuildError> {
    let source = read_entry(&config.entry)?;
    process_css(&config.entry, &source, config.autoprefix, !config.debug)
}

/// Run a stylesheet through lightningcss.
pub fn process_css(
    path: &Path,
    source: &str,
    autoprefix: bool,
    minify: bool,
) -> Result<String, BuildError> {
    let style_error = |error: String, hint: &str| BuildError::StyleError {
        file: path.to_path_buf(),
        error,
        hint: hint.to_string(),
    };

    let mut stylesheet = StyleSheet::parse(
        source,
        ParserOptions {
            filename: path.to_string_lossy().to_string(),
            ..Default::default()
        },
    )
    .map_err(|e| style_error(e.to_string(), "Fix the stylesheet syntax"))?;

    let targets = if autoprefix {
        autoprefix_targets()
    } else {
        Targets::default()
    };

    stylesheet
        .minify(MinifyOptions {
            targets,
            ..Default::default()
        })
        .map_err(|e| style_error(e.to_string(), "Check the rule the error points at"))?;

    let result = stylesheet
        .to_css(PrinterOptions {
            minify,
            targets,
            ..Default::default()
        })
        .map_err(|e| style_error(e.to_string(), "The stylesheet could not be printed"))?;

    Ok(result.code)
}

fn build_script(config: &JsConfig) -> Result<String, BuildError> {
    let mut code = read_entry(&config.entry)?;
    if config.debug {
        let name = config
            .entry
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !code.ends_with('\n') {
            code.push('\n');
        }
        code.push_str(&format!("//# sourceURL={}\n", name));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn css_config(entry: PathBuf, debug: bool, autoprefix: bool) -> CssConfig {
        CssConfig {
            entry,
            alias: "/bundle.css".to_string(),
            debug,
            autoprefix,
        }
    }

    fn js_config(entry: PathBuf, debug: bool) -> JsConfig {
        JsConfig {
            entry,
            alias: "/bundle.js".to_string(),
            debug,
            extensions: vec![".js".to_string()],
        }
    }

    #[test]
    fn test_style_minified_by_default() {
        let css = process_css(Path::new("a.css"), ".a {\n  color: red;\n}\n", false, true).unwrap();
        assert_eq!(css, ".a{color:red}");
    }

    #[test]
    fn test_style_kept_readable_in_debug() {
        let css = process_css(Path::new("a.css"), ".a { color: red }", false, false).unwrap();
        assert!(css.contains('\n'));
        assert!(css.contains("color: red"));
    }

    #[test]
    fn test_autoprefix_adds_vendor_prefix() {
        let source = ".a { user-select: none }";
        let prefixed = process_css(Path::new("a.css"), source, true, true).unwrap();
        assert!(prefixed.contains("-webkit-user-select:none"));

        let plain = process_css(Path::new("a.css"), source, false, true).unwrap();
        assert!(!plain.contains("-webkit-"));
    }

    #[test]
    fn test_style_syntax_error() {
        let err = process_css(Path::new("bad.css"), "..a { color: red }", false, true).unwrap_err();
        match err {
            BuildError::StyleError { file, hint, .. } => {
                assert_eq!(file, PathBuf::from("bad.css"));
                assert_eq!(hint, "Fix the stylesheet syntax");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_build_both_bundles() {
        let temp = TempDir::new().unwrap();
        let css = temp.path().join("entry.css");
        let js = temp.path().join("entry.js");
        std::fs::write(&css, "b { margin: 0 }").unwrap();
        std::fs::write(&js, "console.log('hi')").unwrap();

        let builder = BundleBuilder::new(
            Some(css_config(css, false, true)),
            Some(js_config(js, false)),
        );
        let (_, cache) = builder.build().unwrap();

        assert_eq!(cache.len(), 2);
        let (content, content_type) = cache.get("/bundle.css").unwrap();
        assert_eq!(content, b"b{margin:0}");
        assert!(content_type.starts_with("text/css"));
        let (content, _) = cache.get("/bundle.js").unwrap();
        assert_eq!(content, b"console.log('hi')");
    }

    #[test]
    fn test_script_source_url_in_debug() {
        let temp = TempDir::new().unwrap();
        let js = temp.path().join("entry.js");
        std::fs::write(&js, "run()").unwrap();

        let (_, cache) = BundleBuilder::new(None, Some(js_config(js, true)))
            .build()
            .unwrap();
        let (content, _) = cache.get("/bundle.js").unwrap();
        assert_eq!(
            String::from_utf8(content.clone()).unwrap(),
            "run()\n//# sourceURL=entry.js\n"
        );
    }

    #[test]
    fn test_missing_entry() {
        let builder = BundleBuilder::new(
            Some(css_config(PathBuf::from("/nonexistent/entry.css"), false, false)),
            None,
        );
        assert!(matches!(
            builder.build().unwrap_err(),
            BuildError::EntryNotFound(_)
        ));
    }

    #[test]
    fn test_nothing_configured() {
        let (_, cache) = BundleBuilder::default().build().unwrap();
        assert!(cache.is_empty());
    }
}
