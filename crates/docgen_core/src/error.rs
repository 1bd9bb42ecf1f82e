//! crates/docgen_core/src/error.rs
//!
//! The error type returned by the session and document stores.

use crate::ports::PortError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),

    /// The operation was cancelled before it could apply its result.
    #[error("Operation cancelled")]
    Cancelled,

    /// Catch-all for simulated backend failures.
    #[error("Operation failed: {0}")]
    Backend(#[from] PortError),
}

pub type StoreResult<T> = Result<T, StoreError>;
