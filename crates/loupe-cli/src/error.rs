//! Error handling for the loupe CLI.
//!
//! The hierarchy follows these principles:
//! - **Top-level errors** (`CliError`) represent broad categories of failures
//! - **Domain-specific errors** (`ConfigError`, `BuildError`) carry detailed context
//! - **Error conversion** is automatic via `#[from]` attributes
//! - **Context helpers** ([`ResultExt`]) attach paths and hints
//!
//! # Example
//!
//! ```rust,no_run
//! use loupe_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_markup(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_path(path)
//!         .with_hint("The markup entry lives in the example/ directory")
//! }
//! ```

mod miette;

pub use self::miette::{build_error_to_miette, cli_error_to_miette};

use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration-related errors (invalid file, bad values, etc.)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Bundle build errors (unparseable stylesheet, unreadable entry, etc.)
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// A render failed before producing a document
    #[error("Render error: {0}")]
    Render(#[from] loupe_render::PipelineError),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Preview server errors
    #[error("Server error: {0}")]
    Server(String),

    /// File watching errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file passed with --config doesn't exist
    #[error("Config file not found: {}\n\nHint: Create a loupe.config.json file or fix the --config path", .0.display())]
    NotFound(PathBuf),

    /// Config sources could not be merged into a valid configuration
    #[error("Invalid configuration: {message}\n\nHint: Check loupe.config.json syntax and LOUPE_* environment variables")]
    Extract {
        /// Error reported by the config loader
        message: String,
    },

    /// Mutually exclusive options were specified
    #[error("Conflicting options: {0}\n\nHint: These options cannot be used together")]
    ConflictingOptions(String),

    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },
}

/// Bundle build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Entry file disappeared after startup
    #[error("Entry not found: {}\n\nHint: Entries are resolved at startup, restart loupe after renaming one", .0.display())]
    EntryNotFound(PathBuf),

    /// Stylesheet could not be parsed, transformed or printed
    #[error("Style error in {}: {error}\n\nHint: {hint}", .file.display())]
    StyleError {
        /// Stylesheet that failed
        file: PathBuf,
        /// The lightningcss error
        error: String,
        /// Helpful hint for fixing
        hint: String,
    },

    /// Entry could not be read
    #[error("Failed to read {}: {source}", .file.display())]
    ReadFailed {
        /// File that failed to read
        file: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Append a hint to the error message.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;

    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            match err {
                CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                    CliError::FileNotFound(path.as_ref().to_path_buf())
                }
                other => other,
            }
        })
    }

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}\n\nHint: {}", err, hint))
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}: {}", msg, err))
        })
    }
}
