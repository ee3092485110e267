//! Command-line interface definition for loupe.
//!
//! # Command Structure
//!
//! - `loupe preview` - Render a component and serve it with live reload
//! - `loupe check` - Resolve entries and print the startup configuration

mod commands;
mod tests;

use clap::Parser;

pub use commands::{CheckArgs, Command, PreviewArgs};

/// Loupe - live preview server for a single UI component
#[derive(Parser, Debug)]
#[command(
    name = "loupe",
    version,
    about = "Live preview server for a single UI component",
    long_about = "Loupe renders a component on every page request, rebuilds its example\n\
                  script and style bundles when files change, and reloads the browser."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    ///
    /// Shows cache invalidation counts, module loads and bundle rebuilds.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
