//! Backend error types.

use thiserror::Error;

/// Failures reported by the external systems the gateway delegates to.
///
/// The gateway never retries; every variant is surfaced to the caller
/// as an upstream error by the dispatch layer.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Credentials were rejected by the backend.
    #[error("credentials rejected: {message}")]
    CredentialsRejected { message: String },

    /// The backend is unreachable or reported itself unavailable.
    #[error("service unavailable: {message}")]
    Unavailable { message: String },

    /// The backend throttled the request.
    #[error("request throttled: {message}")]
    Throttled { message: String },

    /// An item read from the table does not carry the expected fields.
    #[error("malformed item: {message}")]
    MalformedItem { message: String },

    /// Any other backend failure.
    #[error("backend error: {message}")]
    Other { message: String },
}

impl BackendError {
    /// Convenience constructor for unavailability failures.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Convenience constructor for malformed-item failures.
    pub fn malformed_item(message: impl Into<String>) -> Self {
        Self::MalformedItem {
            message: message.into(),
        }
    }
}

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
