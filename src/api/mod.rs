/// HTTP API Layer
///
/// REST endpoints over the entity store and workflow engine, one module per
/// resource. Handlers translate typed core errors into status codes:
/// NotFound -> 404, rejected transitions and folder cycles -> 409,
/// malformed bodies -> 400 (axum rejection).

use axum::http::StatusCode;
use axum::Router;
use std::sync::Arc;

use crate::engine::WorkflowEngine;
use crate::error::Error;
use crate::store::EntityStore;

// Folder tree CRUD
pub mod folders;

// Document CRUD, move, and filtered listing
pub mod documents;

// Workflow lifecycle and step resolution
pub mod workflows;

// Notification feed
pub mod notifications;

// User CRUD
pub mod users;

// Snapshot read and transient UI state setters
pub mod state;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Entity store, single source of truth for all collections
    pub store: Arc<EntityStore>,
    /// Workflow engine operating on the same store
    pub engine: WorkflowEngine,
}

impl AppState {
    /// Wire a fresh store and engine pair
    pub fn new() -> Self {
        let store = Arc::new(EntityStore::new());
        let engine = WorkflowEngine::new(Arc::clone(&store));
        Self { store, engine }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the full /api router
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(folders::folder_routes())
        .merge(documents::document_routes())
        .merge(workflows::workflow_routes())
        .merge(notifications::notification_routes())
        .merge(users::user_routes())
        .merge(state::state_routes())
}

/// Map a core error to the HTTP status the caller sees
///
/// Malformed request bodies never reach the core; axum's Json extractor
/// rejects them with 400 before a handler runs.
pub(crate) fn error_status(err: &Error) -> StatusCode {
    match err {
        Error::NotFound { .. } => StatusCode::NOT_FOUND,
        Error::StepOutOfOrder { .. }
        | Error::StepsExhausted { .. }
        | Error::WorkflowClosed { .. }
        | Error::FolderCycle { .. } => StatusCode::CONFLICT,
    }
}
