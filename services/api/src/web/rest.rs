//! services/api/src/web/rest.rs
//!
//! Contains the small REST handlers that don't belong to a resource (health,
//! analytics, cancellation) and the master definition for the OpenAPI specification.

use crate::web::{auth, chat, documents, state::AppState};
use axum::{extract::State, http::StatusCode, response::Json, Extension};
use docgen_core::{
    Analytics, ChatMessage, ChatRole, Document, DocumentPatch, DocumentStatus, DocumentType,
    ExportArtifact, Plan, PlanQuota, QuotaUsage, UsageStats, User,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi, ToSchema,
};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        auth::me_handler,
        documents::list_documents_handler,
        documents::create_document_handler,
        documents::get_document_handler,
        documents::update_document_handler,
        documents::delete_document_handler,
        documents::generate_content_handler,
        documents::export_document_handler,
        documents::upload_documents_handler,
        documents::extract_references_handler,
        chat::list_chat_handler,
        chat::add_chat_handler,
        chat::clear_chat_handler,
        analytics_handler,
        cancel_pending_handler,
    ),
    components(
        schemas(
            HealthResponse,
            auth::SignupRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            documents::CreateDocumentRequest,
            documents::GenerateRequest,
            documents::ReferenceContextResponse,
            chat::ChatMessageRequest,
            User,
            Plan,
            Document,
            DocumentPatch,
            DocumentType,
            DocumentStatus,
            ExportArtifact,
            ChatMessage,
            ChatRole,
            UsageStats,
            Analytics,
            PlanQuota,
            QuotaUsage,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "DocGen API", description = "Document drafting workspace with simulated AI generation.")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme referenced by the protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

//=========================================================================================
// API Response Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
    authenticated: bool,
    pending_operations: usize,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// GET /health - Liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        authenticated: state.sessions.is_authenticated(),
        pending_operations: state.documents.snapshot().pending_operations,
    })
}

/// GET /analytics - Dashboard counters and plan quota usage
#[utoipa::path(
    get,
    path = "/analytics",
    responses(
        (status = 200, description = "Analytics summary", body = Analytics)
    ),
    security(("bearer" = []))
)]
pub async fn analytics_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Json<Analytics> {
    Json(state.documents.analytics(Some(user.plan)))
}

/// POST /operations/cancel - Abandon every in-flight generation, export or parse
#[utoipa::path(
    post,
    path = "/operations/cancel",
    responses(
        (status = 204, description = "Pending operations cancelled")
    ),
    security(("bearer" = []))
)]
pub async fn cancel_pending_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    state.documents.cancel_pending();
    StatusCode::NO_CONTENT
}
