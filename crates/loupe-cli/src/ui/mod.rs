//! Terminal UI utilities for status messages and formatted output.
//!
//! # Examples
//!
//! ```no_run
//! use loupe_cli::ui;
//!
//! ui::init_colors(false);
//! ui::success("Preview server running");
//! ui::error("Failed to parse stylesheet");
//! ```

mod format;
mod messages;

pub use format::{format_duration, format_size, print_summary};
pub use messages::{error, info, success, warning};

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR environment variables, falls back to
/// terminal capability detection.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::user_attended_stderr()
}

/// Initialize color support based on environment and `--no-color`.
///
/// Status messages are painted through `if_supports_color`, which honours
/// the override set here.
pub fn init_colors(no_color: bool) {
    owo_colors::set_override(!no_color && should_use_color());
}

#[cfg(test)]
mod tests {
    use super::*;
    use owo_colors::{OwoColorize, Stream};

    #[test]
    fn test_no_color_disables_styling() {
        init_colors(true);
        let painted = "✓".if_supports_color(Stream::Stderr, |s| s.green()).to_string();
        assert_eq!(painted, "✓");
    }
}
