//! Formatting utilities for sizes, durations and summaries.

use console::Term;
use owo_colors::{OwoColorize, Stream, Style};
use std::time::Duration;

/// Format file size in human-readable format.
///
/// ```
/// use loupe_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Format duration in human-readable format.
///
/// ```
/// use std::time::Duration;
/// use loupe_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print a titled list of `label: value` rows to stderr.
pub fn print_summary(title: &str, rows: &[(String, String)]) {
    let width = (Term::stderr().size().1 as usize).min(80);
    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    eprintln!(
        "\n{}",
        title.if_supports_color(Stream::Stderr, |s| s.style(Style::new().bold().underline()))
    );
    eprintln!("{}", "─".repeat(width));
    for (label, value) in rows {
        eprintln!(
            "  {} {:<label_width$}  {}",
            "▸".if_supports_color(Stream::Stderr, |s| s.blue()),
            label.if_supports_color(Stream::Stderr, |s| s.style(Style::new().bright_white().bold())),
            value.if_supports_color(Stream::Stderr, |s| s.dimmed())
        );
    }
    eprintln!("{}", "─".repeat(width));
}
