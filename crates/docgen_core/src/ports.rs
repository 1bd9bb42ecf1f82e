//! crates/docgen_core/src/ports.rs
//!
//! Defines the service contracts (traits) the stores depend on.
//! These traits form the boundary of the hexagonal architecture: the stores never
//! know whether they talk to the simulated backend, a real one, or a test double.

use async_trait::async_trait;
use crate::domain::{
    Document, DocumentType, ExportArtifact, ExportFormat, FileUpload, GeneratedDraft,
    ParsedFile, Session,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Returns `PortError::Unauthorized` when the credentials do not match.
    async fn login(&self, email: &str, password: &str) -> PortResult<Session>;

    async fn signup(&self, name: &str, email: &str, password: &str) -> PortResult<Session>;
}

#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Drafts the body of a brand new document. The content must embed `prompt`.
    async fn draft_document(&self, doc_type: DocumentType, prompt: &str)
        -> PortResult<GeneratedDraft>;

    /// Produces a section to append to an existing document.
    async fn extend_document(&self, document: &Document, prompt: &str) -> PortResult<String>;
}

#[async_trait]
pub trait FileParsingService: Send + Sync {
    async fn parse_file(&self, upload: &FileUpload) -> PortResult<ParsedFile>;
}

#[async_trait]
pub trait ExportService: Send + Sync {
    async fn export_document(
        &self,
        document: &Document,
        format: ExportFormat,
    ) -> PortResult<ExportArtifact>;
}

/// Persisted string entries that survive process restarts.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> PortResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> PortResult<()>;
    fn remove(&self, key: &str) -> PortResult<()>;
}
