//! Loupe CLI - live preview server for a single UI component.
//!
//! - [`config`] - `loupe.config.json`, `LOUPE_*` variables and flags
//! - [`startup`] - entry resolution into the server's startup configuration
//! - [`dev`] - preview server, live reload, bundles and file watching
//! - [`error`] - error types with actionable messages
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - terminal status output
//!
//! The rendering itself lives in `loupe-render`.
//!
//! # Example
//!
//! ```rust,no_run
//! use loupe_cli::{cli::PreviewArgs, config::PreviewConfig, startup::StartupConfig};
//!
//! # fn main() -> loupe_cli::Result<()> {
//! let config = PreviewConfig::load(&PreviewArgs::default())?;
//! let startup = StartupConfig::from_config(&config);
//! println!("{:?}", startup.server.html);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod dev;
pub mod error;
pub mod logger;
pub mod startup;
pub mod ui;

pub use error::{BuildError, CliError, ConfigError, Result, ResultExt};
