//! Error types for language-model access.

use thiserror::Error;

/// Result type for completion operations.
pub type LlmResult<T> = Result<T, LlmError>;

/// Errors raised while talking to the completion service.
///
/// Malformed model *content* is not an error here; see [`crate::recover`].
#[derive(Debug, Error)]
pub enum LlmError {
    /// Service answered with a non-success status.
    #[error("Completion service returned status {status}: {body}")]
    ServiceStatus { status: u16, body: String },

    /// Service answered without any choice content.
    #[error("Completion service returned no choices")]
    EmptyResponse,

    /// Client was configured incorrectly.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Transport failure (connect, timeout, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl LlmError {
    /// Create a configuration error from any message.
    pub fn config<M: std::fmt::Display>(message: M) -> Self {
        Self::ConfigError {
            message: message.to_string(),
        }
    }
}
