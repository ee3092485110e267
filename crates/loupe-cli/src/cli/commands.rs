use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available loupe subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Preview a component with live reload
    ///
    /// Renders the component on every HTML request, serves the example
    /// bundles and reloads connected browsers when files change.
    Preview(PreviewArgs),

    /// Resolve entries and print the startup configuration
    ///
    /// Does everything `preview` does up to starting the servers.
    Check(CheckArgs),
}

/// Arguments for the preview command
#[derive(Args, Debug, Default)]
pub struct PreviewArgs {
    /// Component directory
    ///
    /// Holds the component entry and its `example/` directory. Defaults to
    /// the current directory.
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Keep bundles unminified and include template debug info
    #[arg(long)]
    pub debug: bool,

    /// Add vendor prefixes to the style bundle (default: true)
    #[arg(long, value_name = "BOOL")]
    pub autoprefix: Option<bool>,

    /// Force routing on or off
    ///
    /// When omitted, routing is switched on automatically for components
    /// whose root element is `<Route>`.
    #[arg(long, value_name = "BOOL")]
    pub router: Option<bool>,

    /// Document title (defaults to the component directory name)
    #[arg(long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Port for the preview server
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Port for the live-reload event stream
    #[arg(long, value_name = "PORT")]
    pub live_reload_port: Option<u16>,

    /// Project root used to decide which modules are reloaded
    ///
    /// Defaults to the current working directory.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Path to a config file (defaults to DIR/loupe.config.json)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Open the preview in a browser once the server is up
    #[arg(long)]
    pub open: bool,
}

/// Arguments for the check command
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Component directory
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Project root used to decide which modules are reloaded
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Path to a config file (defaults to DIR/loupe.config.json)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl From<&CheckArgs> for PreviewArgs {
    fn from(args: &CheckArgs) -> Self {
        Self {
            dir: args.dir.clone(),
            root: args.root.clone(),
            config: args.config.clone(),
            ..Self::default()
        }
    }
}
