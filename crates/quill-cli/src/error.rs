//! Error handling for the Quill CLI.
//!
//! Commands return [`CliError`]. Domain errors from `quill-docs` and the LLM
//! layer convert automatically through `#[from]`, and [`cli_error_to_miette`]
//! turns the final error into a report for the terminal.

use std::path::PathBuf;

use miette::Report;
use quill_docs::llm::LlmError;
use quill_docs::DocsError;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration-related errors (file not found, invalid values, etc.)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reading or parsing a source file failed
    #[error(transparent)]
    Docs(#[from] DocsError),

    /// The LLM backend could not be reached or is misconfigured
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Walking a directory failed
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Writing a rewritten file or its backup failed
    #[error("{0:#}")]
    Write(#[from] anyhow::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file given with `--config` doesn't exist
    #[error("Config file not found: {}\n\nHint: Create a quill.config.json file or fix the --config path", .0.display())]
    NotFound(PathBuf),

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

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        CliError::Llm(e @ (LlmError::ServiceUnavailable { .. } | LlmError::ModelNotFound { .. })) => {
            miette::miette!("{}\n\nHint: Run without --llm to use the heuristic templates", e)
        }
        other => miette::miette!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_not_found() {
        let err = ConfigError::NotFound(PathBuf::from("quill.config.json"));
        let msg = err.to_string();
        assert!(msg.contains("Config file not found"));
        assert!(msg.contains("quill.config.json"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn test_cli_error_from_config_error() {
        let cli_err: CliError = ConfigError::NotFound(PathBuf::from("test.json")).into();
        assert!(matches!(cli_err, CliError::Config(_)));
    }

    #[test]
    fn test_write_error_keeps_context_chain() {
        let err: CliError = anyhow::anyhow!("disk full")
            .context("Failed to write Widget.cs")
            .into();
        assert_eq!(err.to_string(), "Failed to write Widget.cs: disk full");
    }

    #[test]
    fn test_unreachable_llm_gets_a_hint() {
        let err = CliError::Llm(LlmError::ModelNotFound {
            model: "codellama".to_string(),
            available_models: vec![],
        });
        let report = cli_error_to_miette(err);
        assert!(report.to_string().contains("Run without --llm"));
    }
}
