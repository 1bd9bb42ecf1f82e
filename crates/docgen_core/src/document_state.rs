//! crates/docgen_core/src/document_state.rs
//!
//! The document store's state and the single transition function that changes it.
//! `reduce` is pure: every mutation the store performs is expressed as one of the
//! `DocumentCommand` variants.

use crate::domain::{ChatMessage, Document, UsageStats};
use serde::Serialize;

/// A snapshot of everything the document store holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentState {
    /// Most recent first.
    pub documents: Vec<Document>,
    /// Non-owning pointer into `documents`.
    pub current_document_id: Option<String>,
    pub chat_messages: Vec<ChatMessage>,
    pub usage_stats: UsageStats,
    /// Number of simulated operations currently in flight.
    pub pending_operations: usize,
    pub error: Option<String>,
}

impl DocumentState {
    pub fn is_loading(&self) -> bool {
        self.pending_operations > 0
    }

    pub fn find(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    /// Resolves the current pointer. `None` if nothing is open.
    pub fn current_document(&self) -> Option<&Document> {
        self.current_document_id
            .as_deref()
            .and_then(|id| self.find(id))
    }
}

/// Increments applied to the usage counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageDelta {
    pub documents_created: u64,
    pub ai_generations: u64,
    pub words_generated: u64,
    pub hours_saved: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentCommand {
    OperationStarted,
    OperationFinished,
    SetError(Option<String>),
    SetCurrentDocument(Option<String>),
    /// Inserted at the front.
    AddDocument(Document),
    /// Replaces the document with the same id. No-op when absent.
    ReplaceDocument(Document),
    DeleteDocument(String),
    AddChatMessage(ChatMessage),
    ClearChat,
    RecordUsage(UsageDelta),
}

pub fn reduce(mut state: DocumentState, command: DocumentCommand) -> DocumentState {
    match command {
        DocumentCommand::OperationStarted => {
            state.pending_operations += 1;
        }
        DocumentCommand::OperationFinished => {
            state.pending_operations = state.pending_operations.saturating_sub(1);
        }
        DocumentCommand::SetError(error) => {
            state.error = error;
        }
        DocumentCommand::SetCurrentDocument(id) => {
            state.current_document_id = id;
        }
        DocumentCommand::AddDocument(document) => {
            state.documents.insert(0, document);
        }
        DocumentCommand::ReplaceDocument(document) => {
            if let Some(slot) = state.documents.iter_mut().find(|d| d.id == document.id) {
                *slot = document;
            }
        }
        DocumentCommand::DeleteDocument(id) => {
            state.documents.retain(|d| d.id != id);
            if state.current_document_id.as_deref() == Some(id.as_str()) {
                state.current_document_id = None;
            }
        }
        DocumentCommand::AddChatMessage(message) => {
            state.chat_messages.push(message);
        }
        DocumentCommand::ClearChat => {
            state.chat_messages.clear();
        }
        DocumentCommand::RecordUsage(delta) => {
            let stats = &mut state.usage_stats;
            stats.documents_created += delta.documents_created;
            stats.ai_generations += delta.ai_generations;
            stats.words_generated += delta.words_generated;
            stats.hours_saved += delta.hours_saved;
        }
    }
    state
}
