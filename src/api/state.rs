/// Snapshot read and transient UI state endpoints
///
/// `GET /api/state` hands the frontend one consistent snapshot of every
/// collection plus the transient UI state; the PUT endpoints are the
/// setters the frontend calls as the user navigates.

use axum::{
    extract::State,
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::AppState;
use crate::domain::User;
use crate::query::DocumentFilters;
use crate::store::Snapshot;

/// Request body for `PUT /api/state/selection`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
    pub folder_id: Option<String>,
}

/// Request body for `PUT /api/state/search`
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// Request body for `PUT /api/state/current-user`
#[derive(Debug, Deserialize)]
pub struct CurrentUserRequest {
    pub user: Option<User>,
}

/// Create snapshot and UI state routes
pub fn state_routes() -> Router<AppState> {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/state/selection", put(set_selection))
        .route("/api/state/search", put(set_search))
        .route("/api/state/filters", put(set_filters))
        .route("/api/state/current-user", put(set_current_user))
}

/// GET /api/state
async fn get_state(State(state): State<AppState>) -> Json<Snapshot> {
    Json((*state.store.snapshot()).clone())
}

/// PUT /api/state/selection
///
/// Echoes the stored selection back, like the entity handlers echo the
/// updated resource.
async fn set_selection(
    State(state): State<AppState>,
    Json(request): Json<SelectionRequest>,
) -> Json<Value> {
    state.store.set_selected_folder(request.folder_id);
    let snapshot = state.store.snapshot();
    Json(json!({ "selectedFolderId": snapshot.selected_folder_id }))
}

/// PUT /api/state/search
async fn set_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Json<Value> {
    state.store.set_search_query(request.query);
    let snapshot = state.store.snapshot();
    Json(json!({ "searchQuery": snapshot.search_query }))
}

/// PUT /api/state/filters
async fn set_filters(
    State(state): State<AppState>,
    Json(filters): Json<DocumentFilters>,
) -> Json<DocumentFilters> {
    state.store.set_filters(filters);
    Json(state.store.snapshot().filters.clone())
}

/// PUT /api/state/current-user
async fn set_current_user(
    State(state): State<AppState>,
    Json(request): Json<CurrentUserRequest>,
) -> Json<Value> {
    state.store.set_current_user(request.user);
    let snapshot = state.store.snapshot();
    Json(json!({ "currentUser": snapshot.current_user }))
}
