/// User management REST API endpoints
///
/// Flat-list CRUD; no lifecycle logic beyond generated identity.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};

use crate::api::{error_status, AppState};
use crate::domain::{User, UserPatch, UserSpec};

/// Create user management routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(create_user))
        .route("/api/users", get(list_users))
        .route("/api/users/{id}", get(get_user))
        .route("/api/users/{id}", put(update_user))
        .route("/api/users/{id}", delete(delete_user))
}

/// POST /api/users
async fn create_user(
    State(state): State<AppState>,
    Json(spec): Json<UserSpec>,
) -> Result<Json<User>, StatusCode> {
    if spec.name.is_empty() || spec.email.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(Json(state.store.add_user(spec)))
}

/// GET /api/users
async fn list_users(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.store.snapshot();
    Json(json!({ "users": snapshot.users }))
}

/// GET /api/users/:id
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, StatusCode> {
    state
        .store
        .snapshot()
        .users
        .iter()
        .find(|u| u.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// PUT /api/users/:id
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<User>, StatusCode> {
    match state.store.update_user(&id, patch) {
        Ok(user) => Ok(Json(user)),
        Err(e) => {
            tracing::warn!("Failed to update user {}: {}", id, e);
            Err(error_status(&e))
        }
    }
}

/// DELETE /api/users/:id
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    match state.store.delete_user(&id) {
        Ok(()) => Ok(Json(json!({ "message": "User deleted successfully" }))),
        Err(e) => {
            tracing::warn!("Failed to delete user {}: {}", id, e);
            Err(error_status(&e))
        }
    }
}
