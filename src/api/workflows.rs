/// Workflow management REST API endpoints
///
/// Creation, listing, renaming, step resolution, and cancellation. Step
/// resolution is strict: only the step at `currentStep` may be resolved,
/// so out-of-order or repeated attempts come back as 409 with the conflict
/// logged.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{error_status, AppState};
use crate::domain::{Workflow, WorkflowPatch, WorkflowSpec};

/// Request body for step resolution
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteStepRequest {
    /// `true` approves the step and advances the workflow; `false` rejects
    /// it in place
    pub approved: bool,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Create workflow management routes
pub fn workflow_routes() -> Router<AppState> {
    Router::new()
        .route("/api/workflows", post(create_workflow))
        .route("/api/workflows", get(list_workflows))
        .route("/api/workflows/{id}", get(get_workflow))
        .route("/api/workflows/{id}", put(update_workflow))
        .route("/api/workflows/{id}", delete(delete_workflow))
        .route(
            "/api/workflows/{id}/steps/{step_id}/complete",
            post(complete_step),
        )
        .route("/api/workflows/{id}/cancel", post(cancel_workflow))
}

/// POST /api/workflows
///
/// Body: { "name": "...", "documentId": "...", "steps": [{ "name": "...", "type": "review", ... }] }
async fn create_workflow(
    State(state): State<AppState>,
    Json(spec): Json<WorkflowSpec>,
) -> Result<Json<Workflow>, StatusCode> {
    if spec.name.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    match state.engine.create_workflow(spec) {
        Ok(workflow) => Ok(Json(workflow)),
        Err(e) => {
            tracing::error!("Failed to create workflow: {}", e);
            Err(error_status(&e))
        }
    }
}

/// GET /api/workflows
async fn list_workflows(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.store.snapshot();
    Json(json!({ "workflows": snapshot.workflows }))
}

/// GET /api/workflows/:id
async fn get_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Workflow>, StatusCode> {
    state
        .store
        .snapshot()
        .workflows
        .iter()
        .find(|w| w.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// PUT /api/workflows/:id
async fn update_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<WorkflowPatch>,
) -> Result<Json<Workflow>, StatusCode> {
    match state.engine.update_workflow(&id, patch) {
        Ok(workflow) => Ok(Json(workflow)),
        Err(e) => {
            tracing::warn!("Failed to update workflow {}: {}", id, e);
            Err(error_status(&e))
        }
    }
}

/// POST /api/workflows/:id/steps/:step_id/complete
///
/// Body: { "approved": true, "comment": "optional reviewer note" }
async fn complete_step(
    State(state): State<AppState>,
    Path((id, step_id)): Path<(String, String)>,
    Json(request): Json<CompleteStepRequest>,
) -> Result<Json<Workflow>, StatusCode> {
    match state
        .engine
        .complete_step(&id, &step_id, request.approved, request.comment)
    {
        Ok(workflow) => Ok(Json(workflow)),
        Err(e) => {
            tracing::warn!(
                "Rejected step resolution {} on workflow {}: {}",
                step_id,
                id,
                e
            );
            Err(error_status(&e))
        }
    }
}

/// POST /api/workflows/:id/cancel
async fn cancel_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Workflow>, StatusCode> {
    match state.engine.cancel_workflow(&id) {
        Ok(workflow) => Ok(Json(workflow)),
        Err(e) => {
            tracing::warn!("Failed to cancel workflow {}: {}", id, e);
            Err(error_status(&e))
        }
    }
}

/// DELETE /api/workflows/:id
async fn delete_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    match state.engine.delete_workflow(&id) {
        Ok(()) => Ok(Json(json!({ "message": "Workflow deleted successfully" }))),
        Err(e) => {
            tracing::warn!("Failed to delete workflow {}: {}", id, e);
            Err(error_status(&e))
        }
    }
}
