pub mod auth;
pub mod chat;
pub mod documents;
pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod state;
pub mod ws_handler;

pub use middleware::require_auth;
pub use ws_handler::ws_handler;

use crate::error::ApiError;
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Builds the API router: public auth and health routes, everything else behind
/// `require_auth`.
pub fn build_router(app_state: Arc<AppState>) -> Result<Router, ApiError> {
    let origin = app_state
        .config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|e| ApiError::Internal(format!("Invalid CORS origin: {}", e)))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(rest::health_handler))
        .route("/auth/signup", post(auth::signup_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route(
            "/documents",
            get(documents::list_documents_handler).post(documents::create_document_handler),
        )
        .route("/documents/upload", post(documents::upload_documents_handler))
        .route(
            "/documents/references",
            post(documents::extract_references_handler),
        )
        .route(
            "/documents/{id}",
            get(documents::get_document_handler)
                .patch(documents::update_document_handler)
                .delete(documents::delete_document_handler),
        )
        .route(
            "/documents/{id}/generate",
            post(documents::generate_content_handler),
        )
        .route("/documents/{id}/export", get(documents::export_document_handler))
        .route(
            "/chat",
            get(chat::list_chat_handler)
                .post(chat::add_chat_handler)
                .delete(chat::clear_chat_handler),
        )
        .route("/analytics", get(rest::analytics_handler))
        .route("/operations/cancel", post(rest::cancel_pending_handler))
        .route("/ws", get(ws_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    Ok(Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(app_state))
}
