//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between a browser client and the API server.
//! The socket is a live view of the document store: the server pushes a snapshot
//! whenever the store changes, and the client can only send control commands.

use docgen_core::{ChatMessage, Document, DocumentState};
use serde::{Deserialize, Serialize};

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Represents the structured text messages a client can send to the server.
#[derive(Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Abandons every in-flight backend call. Their results will never land.
    CancelPending,

    /// Clears the error flag shown by the UI.
    ClearError,
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The full observable document state after a change.
    StateChanged {
        documents: Vec<Document>,
        current_document_id: Option<String>,
        chat_messages: Vec<ChatMessage>,
        is_loading: bool,
        /// Message of the last failed operation, if it is still flagged.
        error: Option<String>,
    },

    /// Reports a problem with the connection or a client message.
    Error { message: String },
}

impl From<&DocumentState> for ServerMessage {
    fn from(state: &DocumentState) -> Self {
        ServerMessage::StateChanged {
            documents: state.documents.clone(),
            current_document_id: state.current_document_id.clone(),
            chat_messages: state.chat_messages.clone(),
            is_loading: state.is_loading(),
            error: state.error.clone(),
        }
    }
}
