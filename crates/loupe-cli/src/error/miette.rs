//! Miette diagnostic conversion for CLI errors.

use crate::error::{BuildError, CliError};
use miette::Report;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Build(e) => build_error_to_miette(e),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        // Render core errors carry their own diagnostic codes and help.
        CliError::Render(e) => Report::new(e),
        _ => miette::miette!("{}", err),
    }
}

/// Convert BuildError to miette Report
pub fn build_error_to_miette(err: BuildError) -> Report {
    match err {
        BuildError::StyleError { file, error, hint } => {
            miette::miette!(
                "Style error in {}: {}\n\nHint: {}",
                file.display(),
                error,
                hint
            )
        }
        _ => miette::miette!("{}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_render_error_keeps_diagnostic_code() {
        let err = CliError::Render(loupe_render::PipelineError::Load(
            loupe_render::LoadError::NotFound(PathBuf::from("/p/entry.jsx")),
        ));
        let report = cli_error_to_miette(err);
        let code = report.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("loupe::load::not_found"));
    }

    #[test]
    fn test_generic_error_message() {
        let report = cli_error_to_miette(CliError::Server("bind failed".into()));
        assert_eq!(report.to_string(), "Server error: bind failed");
    }
}
