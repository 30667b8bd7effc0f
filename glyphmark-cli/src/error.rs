//! Error handling for the CLI application

use std::fmt;
use std::path::PathBuf;

/// Errors the CLI raises itself; library errors pass through `anyhow`
#[derive(Debug)]
pub enum CliError {
    /// No input pattern matched a file
    NoInputFiles(Vec<String>),
    /// A pattern could not be parsed as a glob
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Parser message
        reason: String,
    },
    /// `glyphmark.toml` could not be parsed
    InvalidCliConfig {
        /// Config file path
        path: PathBuf,
        /// Parser message
        message: String,
    },
    /// Rule file loaded but carried issues
    ValidationFailed(usize),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NoInputFiles(patterns) => {
                write!(f, "No input files match: {}", patterns.join(", "))
            }
            CliError::InvalidPattern { pattern, reason } => {
                write!(f, "Invalid file pattern '{pattern}': {reason}")
            }
            CliError::InvalidCliConfig { path, message } => {
                write!(f, "Invalid CLI config {}: {message}", path.display())
            }
            CliError::ValidationFailed(count) => {
                write!(f, "Validation failed: {count} issue(s) found")
            }
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_input_files_lists_patterns() {
        let error = CliError::NoInputFiles(vec!["*.txt".to_string(), "a.md".to_string()]);
        assert_eq!(error.to_string(), "No input files match: *.txt, a.md");
    }

    #[test]
    fn test_invalid_pattern_display() {
        let error = CliError::InvalidPattern {
            pattern: "[".to_string(),
            reason: "invalid range pattern".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid file pattern '[': invalid range pattern"
        );
    }

    #[test]
    fn test_invalid_cli_config_display() {
        let error = CliError::InvalidCliConfig {
            path: PathBuf::from("glyphmark.toml"),
            message: "unknown variant `pdf`".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid CLI config glyphmark.toml: unknown variant `pdf`"
        );
    }

    #[test]
    fn test_validation_failed_display() {
        let error = CliError::ValidationFailed(3);
        assert_eq!(error.to_string(), "Validation failed: 3 issue(s) found");
    }

    #[test]
    fn test_cli_error_converts_to_anyhow() {
        let result: CliResult<()> = Err(CliError::ValidationFailed(1).into());
        let err = result.unwrap_err();
        assert!(err.downcast_ref::<CliError>().is_some());
    }
}
