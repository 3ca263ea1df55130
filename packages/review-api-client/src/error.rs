//! Error types for the review API client.

use thiserror::Error;

/// Result type for review API client operations.
pub type Result<T> = std::result::Result<T, ReviewApiError>;

/// Review API client errors.
#[derive(Debug, Error)]
pub enum ReviewApiError {
    /// Configuration error (missing or invalid base URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response)
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ReviewApiError {
    /// HTTP status code for API errors, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
