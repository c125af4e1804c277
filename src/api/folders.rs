/// Folder management REST API endpoints
///
/// CRUD over the folder tree. Creation and reparenting validate that the
/// parent exists and the tree stays acyclic; violations come back as 404
/// and 409 respectively.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{error_status, AppState};
use crate::domain::{Folder, FolderPatch, FolderSpec};
use crate::query;

/// Query parameters for `GET /api/folders`
#[derive(Debug, Deserialize)]
pub struct FolderListParams {
    /// List only the direct children of this folder
    pub parent_id: Option<String>,
    /// List only top-level folders
    #[serde(default)]
    pub top_level: bool,
}

/// Create folder management routes
pub fn folder_routes() -> Router<AppState> {
    Router::new()
        .route("/api/folders", post(create_folder))
        .route("/api/folders", get(list_folders))
        .route("/api/folders/{id}", get(get_folder))
        .route("/api/folders/{id}", put(update_folder))
        .route("/api/folders/{id}", delete(delete_folder))
}

/// POST /api/folders
async fn create_folder(
    State(state): State<AppState>,
    Json(spec): Json<FolderSpec>,
) -> Result<Json<Folder>, StatusCode> {
    if spec.name.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    match state.store.add_folder(spec) {
        Ok(folder) => Ok(Json(folder)),
        Err(e) => {
            tracing::warn!("Failed to create folder: {}", e);
            Err(error_status(&e))
        }
    }
}

/// GET /api/folders
///
/// Optionally scoped to one tree level via `parent_id` or `top_level`.
async fn list_folders(
    State(state): State<AppState>,
    Query(params): Query<FolderListParams>,
) -> Json<Value> {
    let snapshot = state.store.snapshot();
    let folders: Vec<Folder> = if params.top_level {
        query::child_folders(&snapshot.folders, None)
            .into_iter()
            .cloned()
            .collect()
    } else if let Some(parent_id) = &params.parent_id {
        query::child_folders(&snapshot.folders, Some(parent_id))
            .into_iter()
            .cloned()
            .collect()
    } else {
        snapshot.folders.clone()
    };
    Json(json!({ "folders": folders }))
}

/// GET /api/folders/:id
async fn get_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Folder>, StatusCode> {
    state
        .store
        .snapshot()
        .folders
        .iter()
        .find(|f| f.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// PUT /api/folders/:id
async fn update_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<FolderPatch>,
) -> Result<Json<Folder>, StatusCode> {
    match state.store.update_folder(&id, patch) {
        Ok(folder) => Ok(Json(folder)),
        Err(e) => {
            tracing::warn!("Failed to update folder {}: {}", id, e);
            Err(error_status(&e))
        }
    }
}

/// DELETE /api/folders/:id
async fn delete_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    match state.store.delete_folder(&id) {
        Ok(()) => Ok(Json(json!({ "message": "Folder deleted successfully" }))),
        Err(e) => {
            tracing::warn!("Failed to delete folder {}: {}", id, e);
            Err(error_status(&e))
        }
    }
}
