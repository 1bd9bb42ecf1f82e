//! crates/docgen_core/src/document_store.rs
//!
//! The document store: sole owner and mutator of the document collection, the
//! current-document pointer, the chat transcript and the usage counters.
//!
//! State lives inside a `watch` channel. Every mutation goes through
//! `document_state::reduce`, and every subscriber sees the new snapshot. Views get
//! a `watch::Receiver` (read-only) and issue commands through the methods below.

use crate::analytics::{self, Analytics};
use crate::document_state::{reduce, DocumentCommand, DocumentState, UsageDelta};
use crate::domain::{
    prefixed_id, word_count, ChatMessage, ChatRole, Document, DocumentPatch, DocumentQuery,
    DocumentType, ExportArtifact, ExportFormat, FileUpload, NewDocument, Plan,
};
use crate::error::{StoreError, StoreResult};
use crate::ingest::SupportedFormat;
use crate::ports::{ExportService, FileParsingService, GenerationService, PortResult};
use crate::seed;
use chrono::Utc;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// The backend ports the document store calls into.
#[derive(Clone)]
pub struct DocumentBackends {
    pub generation: Arc<dyn GenerationService>,
    pub parsing: Arc<dyn FileParsingService>,
    pub export: Arc<dyn ExportService>,
}

pub struct DocumentStore {
    state: watch::Sender<DocumentState>,
    backends: DocumentBackends,
    /// Cancelled by `cancel_pending`, then replaced with a fresh token.
    cancel: Mutex<CancellationToken>,
}

/// Decrements the pending counter even when the operation's future is dropped.
struct PendingGuard<'a>(&'a watch::Sender<DocumentState>);

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.send_modify(|state| {
            let prev = std::mem::take(state);
            *state = reduce(prev, DocumentCommand::OperationFinished);
        });
    }
}

impl DocumentStore {
    pub fn new(backends: DocumentBackends, initial: DocumentState) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            state,
            backends,
            cancel: Mutex::new(CancellationToken::new()),
        }
    }

    /// A store preloaded with the three demo documents and demo counters.
    pub fn with_demo_data(backends: DocumentBackends) -> Self {
        Self::new(
            backends,
            DocumentState {
                documents: seed::demo_documents(),
                usage_stats: seed::demo_usage(),
                ..Default::default()
            },
        )
    }

    //=====================================================================================
    // Read-only views
    //=====================================================================================

    pub fn subscribe(&self) -> watch::Receiver<DocumentState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> DocumentState {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn current_document(&self) -> Option<Document> {
        self.state.borrow().current_document().cloned()
    }

    /// All documents matching `query`, most recent first.
    pub fn list(&self, query: &DocumentQuery) -> Vec<Document> {
        self.state
            .borrow()
            .documents
            .iter()
            .filter(|doc| query.matches(doc))
            .cloned()
            .collect()
    }

    pub fn chat_messages(&self) -> Vec<ChatMessage> {
        self.state.borrow().chat_messages.clone()
    }

    pub fn analytics(&self, plan: Option<Plan>) -> Analytics {
        analytics::summarize(&self.state.borrow(), plan)
    }

    fn find(&self, id: &str) -> Option<Document> {
        self.state.borrow().find(id).cloned()
    }

    //=====================================================================================
    // Commands
    //=====================================================================================

    fn dispatch(&self, command: DocumentCommand) {
        self.state.send_modify(|state| {
            let prev = std::mem::take(state);
            *state = reduce(prev, command);
        });
    }

    /// Records `message` in the error flag and hands `err` back.
    fn fail(&self, err: StoreError, message: &str) -> StoreError {
        if err != StoreError::Cancelled {
            warn!(error = %err, "{}", message);
            self.dispatch(DocumentCommand::SetError(Some(message.to_string())));
        }
        err
    }

    fn cancellation_token(&self) -> CancellationToken {
        self.cancel
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Aborts every in-flight simulated operation. Their callers get
    /// `StoreError::Cancelled` and no state is mutated on their behalf.
    pub fn cancel_pending(&self) {
        let mut token = self.cancel.lock().unwrap_or_else(|e| e.into_inner());
        token.cancel();
        *token = CancellationToken::new();
        info!("Cancelled pending document operations.");
    }

    /// Runs one backend call with the loading flag raised and the current
    /// cancellation token armed.
    async fn run_backend<T, F>(&self, failure: &str, call: F) -> StoreResult<T>
    where
        F: Future<Output = PortResult<T>>,
    {
        let token = self.cancellation_token();
        self.dispatch(DocumentCommand::OperationStarted);
        let _pending = PendingGuard(&self.state);

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => Err(StoreError::Cancelled),
            result = call => result.map_err(StoreError::from),
        };
        outcome.map_err(|e| self.fail(e, failure))
    }

    pub fn clear_error(&self) {
        self.dispatch(DocumentCommand::SetError(None));
    }

    /// Generates and inserts a new draft at the front of the collection.
    pub async fn create(&self, request: NewDocument) -> StoreResult<Document> {
        let doc_type: DocumentType = request
            .doc_type
            .ok_or_else(|| StoreError::Validation("a document type is required".to_string()))?;

        let draft = self
            .run_backend(
                "Failed to create document",
                self.backends.generation.draft_document(doc_type, &request.prompt),
            )
            .await?;

        let title = request
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(draft.title);
        let document = Document::new_draft(
            prefixed_id("doc"),
            title,
            doc_type,
            draft.content,
            request.author,
            Utc::now(),
        );

        self.dispatch(DocumentCommand::AddDocument(document.clone()));
        self.dispatch(DocumentCommand::RecordUsage(UsageDelta {
            documents_created: 1,
            ai_generations: 1,
            words_generated: word_count(&document.content),
            hours_saved: 1,
        }));
        info!(document_id = %document.id, doc_type = %doc_type, "Created document.");
        Ok(document)
    }

    /// Opens a document: it becomes the current document.
    pub fn read(&self, id: &str) -> StoreResult<Document> {
        let mut found = None;
        self.state.send_if_modified(|state| {
            let Some(doc) = state.find(id).cloned() else {
                return false;
            };
            let prev = std::mem::take(state);
            *state = reduce(prev, DocumentCommand::SetCurrentDocument(Some(doc.id.clone())));
            found = Some(doc);
            true
        });
        found.ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Merges `patch` into the document, bumping its version. Fails without
    /// touching the collection when `id` is unknown.
    pub fn update(&self, id: &str, patch: DocumentPatch) -> StoreResult<Document> {
        self.apply(id, |doc| doc.patched(&patch, Utc::now()))
    }

    /// Looks up and replaces a document inside a single state transition.
    fn apply<F>(&self, id: &str, change: F) -> StoreResult<Document>
    where
        F: FnOnce(&Document) -> Document,
    {
        let mut updated = None;
        self.state.send_if_modified(|state| {
            let Some(existing) = state.find(id) else {
                return false;
            };
            let next = change(existing);
            updated = Some(next.clone());
            let prev = std::mem::take(state);
            *state = reduce(prev, DocumentCommand::ReplaceDocument(next));
            true
        });
        updated.ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Removes a document. Unknown ids are ignored; returns whether anything was removed.
    pub fn delete(&self, id: &str) -> bool {
        let mut removed = false;
        self.state.send_if_modified(|state| {
            if state.find(id).is_none() {
                return false;
            }
            let prev = std::mem::take(state);
            *state = reduce(prev, DocumentCommand::DeleteDocument(id.to_string()));
            removed = true;
            true
        });
        if removed {
            info!(document_id = %id, "Deleted document.");
        }
        removed
    }

    /// Appends a generated section to the document. The section is appended to
    /// the content as it stands when the backend returns, so overlapping calls
    /// on the same document both land.
    pub async fn generate_content(&self, id: &str, prompt: &str) -> StoreResult<Document> {
        const FAILURE: &str = "Failed to generate content";

        let document = self
            .find(id)
            .ok_or_else(|| self.fail(StoreError::NotFound(id.to_string()), FAILURE))?;

        let section = self
            .run_backend(FAILURE, self.backends.generation.extend_document(&document, prompt))
            .await?;

        let now = Utc::now();
        let updated = self
            .apply(id, |doc| {
                let patch = DocumentPatch {
                    content: Some(format!("{}{}", doc.content, section)),
                    ..Default::default()
                };
                doc.patched(&patch, now)
            })
            .map_err(|e| self.fail(e, FAILURE))?;

        self.dispatch(DocumentCommand::RecordUsage(UsageDelta {
            ai_generations: 1,
            words_generated: word_count(&section),
            ..Default::default()
        }));
        info!(document_id = %id, version = updated.version, "Generated content.");
        Ok(updated)
    }

    pub async fn export_document(&self, id: &str, format: ExportFormat) -> StoreResult<ExportArtifact> {
        const FAILURE: &str = "Failed to export document";

        let document = self
            .find(id)
            .ok_or_else(|| self.fail(StoreError::NotFound(id.to_string()), FAILURE))?;

        self.run_backend(FAILURE, self.backends.export.export_document(&document, format))
            .await
    }

    /// Turns an uploaded file into a placeholder draft at the front of the collection.
    pub async fn parse_file(&self, upload: FileUpload, author: &str) -> StoreResult<Document> {
        SupportedFormat::from_file_name(&upload.file_name)?;

        let parsed = self
            .run_backend("Failed to parse file", self.backends.parsing.parse_file(&upload))
            .await?;

        let document = Document::new_draft(
            prefixed_id("parsed"),
            parsed.title,
            DocumentType::Prd,
            parsed.content,
            author.to_string(),
            Utc::now(),
        );
        self.dispatch(DocumentCommand::AddDocument(document.clone()));
        self.dispatch(DocumentCommand::RecordUsage(UsageDelta {
            documents_created: 1,
            words_generated: word_count(&document.content),
            hours_saved: 1,
            ..Default::default()
        }));
        info!(document_id = %document.id, file_name = %upload.file_name, "Parsed uploaded file.");
        Ok(document)
    }

    pub fn add_chat_message(&self, role: ChatRole, content: impl Into<String>) -> ChatMessage {
        let message = ChatMessage {
            id: prefixed_id("msg"),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        };
        self.dispatch(DocumentCommand::AddChatMessage(message.clone()));
        message
    }

    pub fn clear_chat(&self) {
        self.dispatch(DocumentCommand::ClearChat);
    }
}
