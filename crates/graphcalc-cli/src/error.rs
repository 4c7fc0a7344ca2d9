//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Malformed `--bind NAME=VALUE`
    #[error("Invalid binding '{input}': {reason}")]
    InvalidBinding {
        /// The offending argument
        input: String,
        /// What is wrong with it
        reason: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an invalid binding error
    #[must_use]
    pub fn invalid_binding(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBinding {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
