//! services/api/src/web/ws_handler.rs
//!
//! The control loop for a WebSocket connection. Each connection is a read-only
//! subscriber of the document store plus a small channel for control commands.

use crate::web::{
    protocol::{ClientMessage, ServerMessage},
    state::AppState,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
    Extension,
};
use docgen_core::Session;
use futures::{stream::SplitSink, SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{error, info, warn};

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state, session))
}

/// True while `opened_with` is still the active session. A new login, even for
/// the same user, mints a new token and ends the old session.
fn session_is_active(active: Option<&Session>, opened_with: &Session) -> bool {
    active.is_some_and(|active| active.token() == opened_with.token())
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>, session: Session) {
    let user = &session.user;
    info!("New WebSocket connection established for user: {}", user.id);

    let (mut sender, mut receiver) = socket.split();
    let mut documents_rx = app_state.documents.subscribe();
    let mut auth_rx = app_state.sessions.subscribe();
    if !session_is_active(auth_rx.borrow_and_update().session.as_ref(), &session) {
        info!("Session ended before the socket opened for user: {}", user.id);
        return;
    }

    // --- 1. Initial snapshot ---
    let initial = ServerMessage::from(&*documents_rx.borrow_and_update());
    if send_message(&mut sender, &initial).await.is_err() {
        error!("Failed to send the initial state snapshot.");
        return;
    }

    // --- 2. Main Loop ---
    loop {
        tokio::select! {
            changed = documents_rx.changed() => {
                if changed.is_err() {
                    info!("Document store dropped; closing socket.");
                    break;
                }
                let snapshot = ServerMessage::from(&*documents_rx.borrow_and_update());
                if send_message(&mut sender, &snapshot).await.is_err() {
                    info!("Client stopped accepting updates.");
                    break;
                }
            }
            changed = auth_rx.changed() => {
                let still_authorized = changed.is_ok()
                    && session_is_active(auth_rx.borrow_and_update().session.as_ref(), &session);
                if !still_authorized {
                    info!("Session ended; closing socket for user: {}", user.id);
                    let _ = send_message(
                        &mut sender,
                        &ServerMessage::Error { message: "Session ended.".to_string() },
                    )
                    .await;
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Err(message) = handle_text_message(text.as_str(), &app_state) {
                            let _ = send_message(&mut sender, &ServerMessage::Error { message }).await;
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("Client sent close message.");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("WebSocket receive error: {}", e);
                        break;
                    }
                    None => {
                        info!("Client disconnected.");
                        break;
                    }
                }
            }
        }
    }

    info!("WebSocket connection closed.");
}

/// Applies one client command. Returns the message to report back on failure.
fn handle_text_message(text: &str, app_state: &Arc<AppState>) -> Result<(), String> {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::CancelPending) => {
            info!("CancelPending message received.");
            app_state.documents.cancel_pending();
            Ok(())
        }
        Ok(ClientMessage::ClearError) => {
            app_state.documents.clear_error();
            Ok(())
        }
        Err(e) => {
            warn!("Failed to deserialize client message: {}", e);
            Err(format!("Unrecognized message: {}", e))
        }
    }
}

async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize server message: {}", e);
            return Ok(());
        }
    };
    sender.send(Message::Text(json.into())).await
}
