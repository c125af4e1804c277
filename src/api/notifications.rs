/// Notification feed REST API endpoints
///
/// The feed is newest-first. Marking a notification read is idempotent;
/// the clear endpoint sweeps read notifications and reports how many went.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{error_status, AppState};
use crate::domain::{Notification, NotificationSpec};

/// Query parameters for `GET /api/notifications`
#[derive(Debug, Deserialize)]
pub struct NotificationListParams {
    /// If `true`, return only unread notifications
    #[serde(default)]
    pub unread_only: bool,
}

/// Create notification routes
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/api/notifications", post(create_notification))
        .route("/api/notifications", get(list_notifications))
        .route("/api/notifications", delete(clear_notifications))
        .route("/api/notifications/{id}/read", post(mark_read))
}

/// POST /api/notifications
async fn create_notification(
    State(state): State<AppState>,
    Json(spec): Json<NotificationSpec>,
) -> Json<Notification> {
    Json(state.store.add_notification(spec))
}

/// GET /api/notifications
async fn list_notifications(
    State(state): State<AppState>,
    Query(params): Query<NotificationListParams>,
) -> Json<Value> {
    let snapshot = state.store.snapshot();
    let notifications: Vec<&Notification> = snapshot
        .notifications
        .iter()
        .filter(|n| !params.unread_only || !n.read)
        .collect();
    Json(json!({ "notifications": notifications }))
}

/// POST /api/notifications/:id/read
async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Notification>, StatusCode> {
    match state.store.mark_notification_as_read(&id) {
        Ok(notification) => Ok(Json(notification)),
        Err(e) => {
            tracing::warn!("Failed to mark notification {} as read: {}", id, e);
            Err(error_status(&e))
        }
    }
}

/// DELETE /api/notifications
///
/// Sweeps read notifications, keeping unread ones.
async fn clear_notifications(State(state): State<AppState>) -> Json<Value> {
    let cleared = state.store.clear_notifications();
    Json(json!({ "cleared": cleared }))
}
