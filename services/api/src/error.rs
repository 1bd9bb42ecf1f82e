//! services/api/src/error.rs
//!
//! Defines the startup error type for the API service, and the mapping from store
//! errors to HTTP responses used by every handler.

use crate::config::ConfigError;
use axum::http::StatusCode;
use docgen_core::{PortError, StoreError};
use tracing::error;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// The `(status, message)` pair handlers return for a failed store operation.
pub fn store_error_response(err: StoreError) -> (StatusCode, String) {
    let status = match &err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        StoreError::Validation(_) | StoreError::UnsupportedFile(_) => StatusCode::BAD_REQUEST,
        StoreError::Cancelled => StatusCode::CONFLICT,
        StoreError::Backend(PortError::Unauthorized) => StatusCode::UNAUTHORIZED,
        StoreError::Backend(PortError::NotFound(_)) => StatusCode::NOT_FOUND,
        StoreError::Backend(PortError::Unexpected(_)) => StatusCode::BAD_GATEWAY,
    };
    if status.is_server_error() {
        error!("Request failed: {}", err);
    }
    (status, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        let cases = [
            (StoreError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
            (StoreError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (StoreError::Validation("x".to_string()), StatusCode::BAD_REQUEST),
            (StoreError::UnsupportedFile("x".to_string()), StatusCode::BAD_REQUEST),
            (StoreError::Cancelled, StatusCode::CONFLICT),
            (
                StoreError::Backend(PortError::Unexpected("x".to_string())),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(store_error_response(err).0, expected);
        }
    }

    #[test]
    fn message_is_the_error_display() {
        let (_, message) = store_error_response(StoreError::NotFound("doc-9".to_string()));
        assert_eq!(message, "Document not found: doc-9");
    }
}
