/// Document management REST API endpoints
///
/// Creation takes the completed-upload payload produced by the ingestion
/// collaborator; listing applies the same predicate composition the browse
/// views use (folder scope, free text, type/status membership, date range)
/// and returns results most-recently-updated first.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{error_status, AppState};
use crate::domain::{Document, DocumentPatch, DocumentSpec, DocumentStatus};
use crate::query::{filter_documents, DateRange, DocumentFilters, DocumentQuery};

/// Query parameters for `GET /api/documents`
///
/// `type` and `status` take comma-separated token lists, matching the
/// multi-select filters of the frontend.
#[derive(Debug, Deserialize)]
pub struct DocumentListParams {
    pub folder_id: Option<String>,
    /// Case-insensitive substring match on the name
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    pub status: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Request body for `POST /api/documents/:id/move`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveDocumentRequest {
    pub folder_id: String,
}

/// Create document management routes
pub fn document_routes() -> Router<AppState> {
    Router::new()
        .route("/api/documents", post(create_document))
        .route("/api/documents", get(list_documents))
        .route("/api/documents/{id}", get(get_document))
        .route("/api/documents/{id}", put(update_document))
        .route("/api/documents/{id}", delete(delete_document))
        .route("/api/documents/{id}/move", post(move_document))
}

/// POST /api/documents
async fn create_document(
    State(state): State<AppState>,
    Json(spec): Json<DocumentSpec>,
) -> Result<Json<Document>, StatusCode> {
    if spec.name.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    match state.store.add_document(spec) {
        Ok(document) => Ok(Json(document)),
        Err(e) => {
            tracing::warn!("Failed to create document: {}", e);
            Err(error_status(&e))
        }
    }
}

/// GET /api/documents
async fn list_documents(
    State(state): State<AppState>,
    Query(params): Query<DocumentListParams>,
) -> Result<Json<Value>, StatusCode> {
    let mut status = Vec::new();
    if let Some(tokens) = &params.status {
        for token in tokens.split(',').filter(|t| !t.is_empty()) {
            // an unknown status token is a caller mistake, not an empty match
            status.push(DocumentStatus::parse(token).ok_or(StatusCode::BAD_REQUEST)?);
        }
    }
    let types = params
        .doc_type
        .as_deref()
        .unwrap_or("")
        .split(',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    let query = DocumentQuery {
        folder_id: params.folder_id,
        text: params.q,
        filters: DocumentFilters {
            types,
            status,
            date_range: DateRange {
                start: params.from,
                end: params.to,
            },
        },
    };

    let snapshot = state.store.snapshot();
    let documents = filter_documents(&snapshot.documents, &query);
    Ok(Json(json!({ "documents": documents })))
}

/// GET /api/documents/:id
async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, StatusCode> {
    state
        .store
        .snapshot()
        .documents
        .iter()
        .find(|d| d.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// PUT /api/documents/:id
async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<DocumentPatch>,
) -> Result<Json<Document>, StatusCode> {
    match state.store.update_document(&id, patch) {
        Ok(document) => Ok(Json(document)),
        Err(e) => {
            tracing::warn!("Failed to update document {}: {}", id, e);
            Err(error_status(&e))
        }
    }
}

/// DELETE /api/documents/:id
async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    match state.store.delete_document(&id) {
        Ok(()) => Ok(Json(json!({ "message": "Document deleted successfully" }))),
        Err(e) => {
            tracing::warn!("Failed to delete document {}: {}", id, e);
            Err(error_status(&e))
        }
    }
}

/// POST /api/documents/:id/move
async fn move_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MoveDocumentRequest>,
) -> Result<Json<Document>, StatusCode> {
    match state.store.move_document(&id, &request.folder_id) {
        Ok(document) => Ok(Json(document)),
        Err(e) => {
            tracing::warn!("Failed to move document {}: {}", id, e);
            Err(error_status(&e))
        }
    }
}
