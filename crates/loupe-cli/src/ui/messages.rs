//! Status message functions for terminal output.

use owo_colors::{OwoColorize, Stream, Style};

/// Print a success message to stderr.
///
/// ```no_run
/// use loupe_cli::ui::success;
///
/// success("Preview server running at http://localhost:4000");
/// ```
pub fn success(message: &str) {
    eprintln!(
        "{} {}",
        "✓".if_supports_color(Stream::Stderr, |s| s.style(Style::new().green().bold())),
        message
    );
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    eprintln!(
        "{} {}",
        "ℹ".if_supports_color(Stream::Stderr, |s| s.style(Style::new().blue().bold())),
        message
    );
}

/// Print a warning message to stderr.
pub fn warning(message: &str) {
    eprintln!(
        "{} {}",
        "⚠".if_supports_color(Stream::Stderr, |s| s.style(Style::new().yellow().bold())),
        message.if_supports_color(Stream::Stderr, |s| s.yellow())
    );
}

/// Print an error message to stderr.
pub fn error(message: &str) {
    eprintln!(
        "{} {}",
        "✗".if_supports_color(Stream::Stderr, |s| s.style(Style::new().red().bold())),
        message.if_supports_color(Stream::Stderr, |s| s.red())
    );
}
