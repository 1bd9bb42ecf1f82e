//! services/api/src/web/chat.rs
//!
//! The assistant chat log kept alongside the documents.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use docgen_core::{ChatMessage, ChatRole};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::web::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatMessageRequest {
    pub role: ChatRole,
    pub content: String,
}

/// GET /chat - The chat log, oldest first
#[utoipa::path(
    get,
    path = "/chat",
    responses(
        (status = 200, description = "Chat messages", body = [ChatMessage])
    ),
    security(("bearer" = []))
)]
pub async fn list_chat_handler(State(state): State<Arc<AppState>>) -> Json<Vec<ChatMessage>> {
    Json(state.documents.chat_messages())
}

/// POST /chat - Append a message
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatMessageRequest,
    responses(
        (status = 201, description = "Message appended", body = ChatMessage),
        (status = 400, description = "Empty message")
    ),
    security(("bearer" = []))
)]
pub async fn add_chat_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatMessageRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.content.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Message content is empty".to_string()));
    }
    let message = state.documents.add_chat_message(req.role, req.content);
    Ok((StatusCode::CREATED, Json(message)))
}

/// DELETE /chat - Clear the chat log
#[utoipa::path(
    delete,
    path = "/chat",
    responses(
        (status = 204, description = "Chat cleared")
    ),
    security(("bearer" = []))
)]
pub async fn clear_chat_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    state.documents.clear_chat();
    StatusCode::NO_CONTENT
}
