//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// SDK error
    #[error("SDK error: {0}")]
    Sdk(#[from] depmap_sdk::SdkError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Readline error
    #[error("Input error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    /// The respondent aborted the interview
    #[error("Interview aborted")]
    Aborted,
}
