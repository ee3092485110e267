//! Configuration for the preview server, loaded from several sources.
//!
//! Priority: CLI > Environment > File > Defaults

mod loading;
mod tests;
mod validation;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use loading::CONFIG_FILE_NAME;

/// Preview configuration - loaded from loupe.config.json, `LOUPE_*`
/// variables and CLI args.
///
/// Relative paths are resolved by [`PreviewConfig::load`]: `dir` and `root`
/// against the working directory, `framework` entries against `root`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PreviewConfig {
    /// Component directory
    pub dir: PathBuf,

    /// Project root, the boundary for module reloads
    pub root: PathBuf,

    /// Preview server port
    pub port: u16,

    /// Live-reload event stream port
    pub live_reload_port: u16,

    /// Unminified bundles and template debug info
    pub debug: bool,

    /// Vendor-prefix the style bundle
    pub autoprefix: bool,

    /// Explicit routing switch; `None` auto-detects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router: Option<bool>,

    /// Document title override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Framework package paths, always reloaded even when vendored
    pub framework: Vec<PathBuf>,

    /// Extra path fragments the watcher ignores
    pub watch_ignore: Vec<String>,

    /// Quiet period before a change triggers a rebuild
    pub debounce_ms: u64,

    /// Open a browser once the server is up
    pub open: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            root: PathBuf::from("."),
            port: 4000,
            live_reload_port: 4001,
            debug: false,
            autoprefix: true,
            router: None,
            title: None,
            framework: vec![PathBuf::from("node_modules/loupe")],
            watch_ignore: Vec::new(),
            debounce_ms: 100,
            open: false,
        }
    }
}

/// Values passed explicitly on the command line.
///
/// Unset fields are skipped when serialized so they never shadow the file
/// or environment layers.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    live_reload_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    debug: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    autoprefix: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    router: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    open: Option<bool>,
}

impl From<&crate::cli::PreviewArgs> for CliOverrides {
    fn from(args: &crate::cli::PreviewArgs) -> Self {
        Self {
            dir: args.dir.clone(),
            root: args.root.clone(),
            port: args.port,
            live_reload_port: args.live_reload_port,
            // Flags only override when set.
            debug: args.debug.then_some(true),
            autoprefix: args.autoprefix,
            router: args.router,
            title: args.title.clone(),
            open: args.open.then_some(true),
        }
    }
}
