//! Handler error taxonomy.
//!
//! Handlers never let a failure escape past the dispatcher. Every
//! external-call failure is caught and tagged, and the dispatcher maps
//! each tag deterministically to a status code and JSON body.

use serde_json::json;
use thiserror::Error;
use tracing::error;

use talentgate_backends::BackendError;

use crate::envelope::Envelope;

/// Tagged handler outcome.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The caller omitted a required field. Mapped to 400; never retried.
    #[error("{0}")]
    Client(String),

    /// The request was well-formed but the backend holds no matching
    /// item. Mapped to 404; distinct from `Client`.
    #[error("{0}")]
    NotFound(String),

    /// A failure from the storage backend, the table, or the
    /// notification service. Mapped to 500 with the upstream message
    /// text; never retried at this layer.
    #[error(transparent)]
    Upstream(#[from] BackendError),
}

impl HandlerError {
    /// Maps this error to its response envelope.
    ///
    /// Upstream failures are logged before responding; the caller only
    /// ever sees a JSON body, never a raw failure.
    pub fn into_envelope(self) -> Envelope {
        match self {
            HandlerError::Client(message) => Envelope::error(400, json!({ "error": message })),
            HandlerError::NotFound(message) => Envelope::error(404, json!({ "message": message })),
            HandlerError::Upstream(err) => {
                error!(error = %err, "upstream call failed");
                Envelope::error(500, json!({ "error": err.to_string() }))
            }
        }
    }
}

/// Result type for handler operations.
pub type HandlerResult<T> = Result<T, HandlerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_error_maps_to_400_with_error_body() {
        let env = HandlerError::Client("Email is required".to_string()).into_envelope();
        assert_eq!(env.status, 400);
        assert_eq!(env.body["error"], "Email is required");
    }

    #[test]
    fn not_found_maps_to_404_with_message_body() {
        let env = HandlerError::NotFound("Job not found".to_string()).into_envelope();
        assert_eq!(env.status, 404);
        assert_eq!(env.body["message"], "Job not found");
    }

    #[test]
    fn upstream_maps_to_500_with_upstream_message_text() {
        let err = HandlerError::Upstream(BackendError::unavailable("table offline"));
        let env = err.into_envelope();
        assert_eq!(env.status, 500);
        assert_eq!(env.body["error"], "service unavailable: table offline");
    }

    #[test]
    fn every_variant_carries_cors_origin() {
        for env in [
            HandlerError::Client("x".to_string()).into_envelope(),
            HandlerError::NotFound("x".to_string()).into_envelope(),
            HandlerError::Upstream(BackendError::unavailable("x")).into_envelope(),
        ] {
            assert_eq!(env.header("Access-Control-Allow-Origin"), Some("*"));
        }
    }
}
