pub mod analytics;
pub mod document_state;
pub mod document_store;
pub mod domain;
pub mod error;
pub mod export;
pub mod ingest;
pub mod ports;
pub mod seed;
pub mod session_store;
pub mod storage;

pub use analytics::{Analytics, PlanQuota, QuotaUsage};
pub use document_state::{DocumentCommand, DocumentState};
pub use document_store::{DocumentBackends, DocumentStore};
pub use domain::{
    ChatMessage, ChatRole, Document, DocumentPatch, DocumentQuery, DocumentStatus, DocumentType,
    ExportArtifact, ExportFormat, FileUpload, GeneratedDraft, NewDocument, ParsedFile, Plan,
    Session, UsageStats, User,
};
pub use error::{StoreError, StoreResult};
pub use ports::{
    AuthService, ExportService, FileParsingService, GenerationService, KeyValueStore, PortError,
    PortResult,
};
pub use session_store::{AuthCommand, AuthState, SessionStore};
pub use storage::MemoryStorage;
