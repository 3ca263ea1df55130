//! Structured error taxonomy for review sessions.
//!
//! Every failure at the API boundary is converted into a [`ReviewError`] value
//! at the point of call. Nothing here is allowed to leave the session's queue,
//! selection or reviewed count half-updated.

use thiserror::Error;

use review_api_client::{PairKey, ReviewApiError};

/// Result type for review session operations.
pub type Result<T> = std::result::Result<T, ReviewError>;

/// Pattern-matchable review session errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    /// `select()` targeted a pair that is not in the queue.
    #[error("Candidate match {key} is not in the queue")]
    NotFound { key: PairKey },

    /// A decision was issued while another is still being submitted.
    ///
    /// The controller treats this as a silent no-op and never surfaces it.
    #[error("A decision is already being submitted")]
    ConcurrentSubmission,

    /// Transport failure, including timeouts.
    #[error("Network error: {0}")]
    Network(String),

    /// The server rejected the request.
    #[error("Server error ({code}): {message}")]
    Server { code: u16, message: String },

    /// The server answered with a body that could not be understood.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Operator input that cannot be used as-is.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ReviewError {
    /// Whether repeating the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Server { code, .. } => *code >= 500 || *code == 429,
            _ => false,
        }
    }

    /// Whether this error should be reported to the operator.
    pub fn is_surfaced(&self) -> bool {
        !matches!(self, Self::ConcurrentSubmission)
    }
}

impl From<ReviewApiError> for ReviewError {
    fn from(err: ReviewApiError) -> Self {
        match err {
            ReviewApiError::Network(msg) => Self::Network(msg),
            ReviewApiError::Api { status, message } => Self::Server {
                code: status,
                message,
            },
            ReviewApiError::Parse(msg) => Self::InvalidResponse(msg),
            // Client misconfiguration means no request could reach the server.
            ReviewApiError::Config(msg) => Self::Network(msg),
        }
    }
}
