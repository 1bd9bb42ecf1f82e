//! services/api/src/web/documents.rs
//!
//! Document endpoints: CRUD, simulated generation, export and file upload. Every
//! handler goes through the `DocumentStore`; none touches document state directly.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use docgen_core::ingest;
use docgen_core::{
    Document, DocumentPatch, DocumentQuery, DocumentStatus, DocumentType, ExportArtifact,
    ExportFormat, FileUpload, NewDocument, User,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::error::store_error_response;
use crate::web::state::AppState;

type HandlerError = (StatusCode, String);

fn bad_request(message: impl Into<String>) -> HandlerError {
    (StatusCode::BAD_REQUEST, message.into())
}

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListParams {
    /// Case-insensitive match on title or content.
    pub search: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    #[param(rename = "type")]
    pub doc_type: Option<String>,
}

impl ListParams {
    fn into_query(self) -> Result<DocumentQuery, HandlerError> {
        let status = self
            .status
            .filter(|s| !s.is_empty() && s != "all")
            .map(|s| s.parse::<DocumentStatus>())
            .transpose()
            .map_err(|e| bad_request(e.to_string()))?;
        let doc_type = self
            .doc_type
            .filter(|t| !t.is_empty() && t != "all")
            .map(|t| t.parse::<DocumentType>())
            .transpose()
            .map_err(|e| bad_request(e.to_string()))?;
        Ok(DocumentQuery {
            search: self.search,
            status,
            doc_type,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDocumentRequest {
    /// One of the document type wire names, e.g. `prd` or `tech-spec`.
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    pub title: Option<String>,
    pub prompt: String,
    /// Text gathered from reference files; wraps the prompt in the full
    /// generation instructions when present.
    pub reference_context: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReferenceContextResponse {
    /// Pass back as `reference_context` when creating a document.
    pub reference_context: String,
    pub files: Vec<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ExportParams {
    /// `markdown`, `text`, `html`, `doc` or `pdf`.
    pub format: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /documents - List documents, most recent first
#[utoipa::path(
    get,
    path = "/documents",
    params(ListParams),
    responses(
        (status = 200, description = "Matching documents", body = [Document]),
        (status = 400, description = "Unknown status or type filter")
    ),
    security(("bearer" = []))
)]
pub async fn list_documents_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Document>>, HandlerError> {
    let query = params.into_query()?;
    Ok(Json(state.documents.list(&query)))
}

/// POST /documents - Generate a new draft
#[utoipa::path(
    post,
    path = "/documents",
    request_body = CreateDocumentRequest,
    responses(
        (status = 201, description = "Document created", body = Document),
        (status = 400, description = "Missing or unknown document type"),
        (status = 409, description = "Cancelled while generating")
    ),
    security(("bearer" = []))
)]
pub async fn create_document_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(req): Json<CreateDocumentRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let doc_type = req
        .doc_type
        .filter(|t| !t.trim().is_empty())
        .map(|t| t.parse::<DocumentType>())
        .transpose()
        .map_err(|e| bad_request(e.to_string()))?;

    let prompt = match (doc_type, req.reference_context.as_deref()) {
        (Some(doc_type), Some(context)) => ingest::compose_prompt(doc_type, &req.prompt, Some(context)),
        _ => req.prompt,
    };

    let document = state
        .documents
        .create(NewDocument {
            doc_type,
            title: req.title,
            prompt,
            author: user.name,
        })
        .await
        .map_err(store_error_response)?;

    Ok((StatusCode::CREATED, Json(document)))
}

/// GET /documents/{id} - Open a document; it becomes the current document
#[utoipa::path(
    get,
    path = "/documents/{id}",
    params(("id" = String, Path, description = "Document id")),
    responses(
        (status = 200, description = "The document", body = Document),
        (status = 404, description = "No such document")
    ),
    security(("bearer" = []))
)]
pub async fn get_document_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Document>, HandlerError> {
    state
        .documents
        .read(&id)
        .map(Json)
        .map_err(store_error_response)
}

/// PATCH /documents/{id} - Merge fields and bump the version
#[utoipa::path(
    patch,
    path = "/documents/{id}",
    params(("id" = String, Path, description = "Document id")),
    request_body = DocumentPatch,
    responses(
        (status = 200, description = "Updated document", body = Document),
        (status = 404, description = "No such document")
    ),
    security(("bearer" = []))
)]
pub async fn update_document_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<DocumentPatch>,
) -> Result<Json<Document>, HandlerError> {
    state
        .documents
        .update(&id, patch)
        .map(Json)
        .map_err(store_error_response)
}

/// DELETE /documents/{id} - Remove a document (idempotent)
#[utoipa::path(
    delete,
    path = "/documents/{id}",
    params(("id" = String, Path, description = "Document id")),
    responses(
        (status = 204, description = "Deleted, or never existed")
    ),
    security(("bearer" = []))
)]
pub async fn delete_document_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> StatusCode {
    state.documents.delete(&id);
    StatusCode::NO_CONTENT
}

/// POST /documents/{id}/generate - Append an AI-generated section
#[utoipa::path(
    post,
    path = "/documents/{id}/generate",
    params(("id" = String, Path, description = "Document id")),
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Updated document", body = Document),
        (status = 404, description = "No such document")
    ),
    security(("bearer" = []))
)]
pub async fn generate_content_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<Document>, HandlerError> {
    state
        .documents
        .generate_content(&id, &req.prompt)
        .await
        .map(Json)
        .map_err(store_error_response)
}

/// GET /documents/{id}/export - Render a downloadable rendition
#[utoipa::path(
    get,
    path = "/documents/{id}/export",
    params(("id" = String, Path, description = "Document id"), ExportParams),
    responses(
        (status = 200, description = "Export artifact", body = ExportArtifact),
        (status = 400, description = "Unknown format"),
        (status = 404, description = "No such document")
    ),
    security(("bearer" = []))
)]
pub async fn export_document_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<ExportParams>,
) -> Result<Json<ExportArtifact>, HandlerError> {
    let format = params
        .format
        .parse::<ExportFormat>()
        .map_err(|e| bad_request(e.to_string()))?;
    state
        .documents
        .export_document(&id, format)
        .await
        .map(Json)
        .map_err(store_error_response)
}

/// POST /documents/upload - Turn uploaded files into placeholder drafts
///
/// Accepts a multipart/form-data request; every part with a file name is parsed.
#[utoipa::path(
    post,
    path = "/documents/upload",
    request_body(content_type = "multipart/form-data", description = "TXT, MD, PDF, DOC or DOCX files."),
    responses(
        (status = 201, description = "Documents created", body = [Document]),
        (status = 400, description = "Unsupported file or empty form")
    ),
    security(("bearer" = []))
)]
pub async fn upload_documents_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HandlerError> {
    let uploads = read_uploads(multipart).await?;

    let mut created = Vec::with_capacity(uploads.len());
    for upload in uploads {
        let document = state
            .documents
            .parse_file(upload, &user.name)
            .await
            .map_err(store_error_response)?;
        created.push(document);
    }
    info!("Parsed {} uploaded file(s).", created.len());

    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /documents/references - Extract reference text for a generation prompt
///
/// Each file is read as text and cut to a fixed-length excerpt. Nothing is stored.
#[utoipa::path(
    post,
    path = "/documents/references",
    request_body(content_type = "multipart/form-data", description = "TXT, MD, PDF, DOC or DOCX files."),
    responses(
        (status = 200, description = "Joined reference excerpts", body = ReferenceContextResponse),
        (status = 400, description = "Unsupported file or empty form")
    ),
    security(("bearer" = []))
)]
pub async fn extract_references_handler(
    multipart: Multipart,
) -> Result<Json<ReferenceContextResponse>, HandlerError> {
    let uploads = read_uploads(multipart).await?;
    let excerpts: Vec<String> = uploads
        .iter()
        .map(|upload| ingest::reference_excerpt(&upload.file_name, &upload.bytes))
        .collect();

    Ok(Json(ReferenceContextResponse {
        reference_context: ingest::reference_context(excerpts.iter().map(String::as_str)),
        files: uploads.into_iter().map(|upload| upload.file_name).collect(),
    }))
}

/// Collects every file part of the form. The whole batch is rejected if any
/// file is outside the allow-list, before anything is parsed.
async fn read_uploads(mut multipart: Multipart) -> Result<Vec<FileUpload>, HandlerError> {
    let mut uploads = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Failed to read multipart data: {}", e)))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        ingest::SupportedFormat::from_file_name(&file_name).map_err(store_error_response)?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| bad_request(format!("Failed to read file bytes: {}", e)))?;
        uploads.push(FileUpload {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    if uploads.is_empty() {
        return Err(bad_request("Multipart form must include a file"));
    }
    Ok(uploads)
}
