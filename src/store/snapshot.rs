/// Store snapshot and change events
///
/// A `Snapshot` is one immutable, internally consistent view of every
/// collection plus the transient UI state. Readers always hold a complete
/// snapshot; mutations build the next one and swap it in atomically.

use serde::Serialize;

use crate::domain::types::{Document, Folder, Notification, User, Workflow};
use crate::query::DocumentFilters;

/// One immutable view of the whole store
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub folders: Vec<Folder>,
    pub documents: Vec<Document>,
    pub workflows: Vec<Workflow>,
    /// Kept newest-first; creation prepends
    pub notifications: Vec<Notification>,
    pub users: Vec<User>,
    /// The user the frontend is acting as, if any
    pub current_user: Option<User>,
    pub selected_folder_id: Option<String>,
    pub search_query: String,
    pub filters: DocumentFilters,
}

/// A committed store mutation, published to subscribers
///
/// External consumers re-render on each event; tests use the stream to
/// observe the store without any UI attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Created { entity: &'static str, id: String },
    Updated { entity: &'static str, id: String },
    Deleted { entity: &'static str, id: String },
    /// Read notifications were swept
    NotificationsCleared { removed: usize },
    /// Selection, search text, filters, or current user changed
    UiStateChanged,
}

/// Entity names as they appear in events and `NotFound` errors
pub mod entity {
    pub const FOLDER: &str = "folder";
    pub const DOCUMENT: &str = "document";
    pub const WORKFLOW: &str = "workflow";
    pub const NOTIFICATION: &str = "notification";
    pub const USER: &str = "user";
}
