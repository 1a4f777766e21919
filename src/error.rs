//! Error types for the NEON access layer
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Neon Error Enum ==
/// Classified failure of an upstream call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NeonError {
    /// Upstream rejected the request (4xx). Never retried.
    #[error("Client error ({status}): {detail}")]
    Client { status: u16, detail: String },

    /// Network failure, timeout, or a 5xx response
    #[error("Transient error: {0}")]
    Transient(String),

    /// Every attempt ended in a transient failure
    #[error("Gave up after {attempts} attempts: {last}")]
    ExhaustedRetries { attempts: u32, last: Box<NeonError> },

    /// A 2xx body that does not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// The HTTP client could not be built
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl NeonError {
    /// Whether retrying the same request unchanged could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, NeonError::Transient(_))
    }

    /// Whether the upstream reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, NeonError::Client { status: 404, .. })
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for NeonError {
    fn into_response(self) -> Response {
        let status = match &self {
            NeonError::Client { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
            }
            NeonError::Transient(_) | NeonError::ExhaustedRetries { .. } => StatusCode::BAD_GATEWAY,
            NeonError::Decode(_) => StatusCode::BAD_GATEWAY,
            NeonError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the access layer.
pub type Result<T> = std::result::Result<T, NeonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_keeps_upstream_status() {
        let err = NeonError::Client {
            status: 404,
            detail: "No such site".to_string(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_transient());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_exhausted_retries_maps_to_bad_gateway() {
        let err = NeonError::ExhaustedRetries {
            attempts: 3,
            last: Box::new(NeonError::Transient("HTTP 503".to_string())),
        };
        assert!(err.to_string().contains("3 attempts"));
        assert!(err.to_string().contains("HTTP 503"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
