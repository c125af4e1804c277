/// Snapshot-swapping entity store using ArcSwap
///
/// Single source of truth for all domain collections. Reads are lock-free
/// snapshot loads; every mutation clones the current snapshot, applies one
/// change, and atomically swaps the pointer, so readers never observe a
/// partial write. Each committed mutation is published on a broadcast
/// channel for subscribers.

use arc_swap::ArcSwap;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::domain::specs::{
    DocumentPatch, DocumentSpec, FolderPatch, FolderSpec, NotificationSpec, UserPatch, UserSpec,
};
use crate::domain::types::{Document, Folder, Notification, User};
use crate::error::{Error, Result};
use crate::query::{self, DocumentFilters};
use crate::store::snapshot::{entity, Snapshot, StoreEvent};

/// Capacity of the change-event channel; slow subscribers lag, they never
/// block a writer.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Lock-free entity store with subscriber notification
///
/// The store assumes one logical writer at a time (the current user's UI);
/// mutations apply in invocation order and each is atomic with respect to
/// readers.
#[derive(Debug)]
pub struct EntityStore {
    /// Atomic pointer to the current snapshot
    state: ArcSwap<Snapshot>,
    /// Change feed for external consumers
    events: broadcast::Sender<StoreEvent>,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    /// Create an empty store
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: ArcSwap::new(Arc::new(Snapshot::default())),
            events,
        }
    }

    /// Current snapshot (lock-free read)
    ///
    /// The returned snapshot is immutable; later mutations produce new
    /// snapshots and never touch ones already handed out.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.state.load_full()
    }

    /// Subscribe to the change feed
    ///
    /// Only mutations committed after the call are delivered.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Apply a mutation that can be rejected
    ///
    /// Clones the current snapshot, runs `mutate` on the clone, and swaps
    /// the pointer only on success. A rejected mutation leaves the store
    /// untouched and publishes nothing.
    pub(crate) fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut Snapshot) -> Result<(T, StoreEvent)>,
    ) -> Result<T> {
        let current = self.state.load();
        let mut next = (**current).clone();
        let (value, event) = mutate(&mut next)?;
        self.state.store(Arc::new(next));
        let _ = self.events.send(event);
        Ok(value)
    }

    /// Apply a mutation that cannot fail
    fn commit_ok<T>(&self, mutate: impl FnOnce(&mut Snapshot) -> (T, StoreEvent)) -> T {
        let current = self.state.load();
        let mut next = (**current).clone();
        let (value, event) = mutate(&mut next);
        self.state.store(Arc::new(next));
        let _ = self.events.send(event);
        value
    }

    // -- Folders ----------------------------------------------------------

    /// Create a folder
    ///
    /// A named parent must already exist. A fresh folder cannot close a
    /// cycle, so no cycle check is needed here.
    pub fn add_folder(&self, spec: FolderSpec) -> Result<Folder> {
        self.commit(|state| {
            if let Some(parent_id) = &spec.parent_id {
                if !state.folders.iter().any(|f| &f.id == parent_id) {
                    return Err(Error::not_found(entity::FOLDER, parent_id.clone()));
                }
            }
            let now = Utc::now();
            let folder = Folder {
                id: Uuid::new_v4().to_string(),
                name: spec.name,
                parent_id: spec.parent_id,
                folder_type: spec.folder_type,
                department_id: spec.department_id,
                created_at: now,
                updated_at: now,
            };
            state.folders.push(folder.clone());
            let event = StoreEvent::Created {
                entity: entity::FOLDER,
                id: folder.id.clone(),
            };
            Ok((folder, event))
        })
    }

    /// Merge a patch into a folder
    ///
    /// Reparenting is validated: the new parent must exist and the parent
    /// chain must stay acyclic.
    pub fn update_folder(&self, id: &str, patch: FolderPatch) -> Result<Folder> {
        self.commit(|state| {
            if let Some(Some(parent_id)) = &patch.parent_id {
                if !state.folders.iter().any(|f| &f.id == parent_id) {
                    return Err(Error::not_found(entity::FOLDER, parent_id.clone()));
                }
                if query::would_create_cycle(&state.folders, id, parent_id) {
                    return Err(Error::FolderCycle {
                        folder_id: id.to_string(),
                        parent_id: parent_id.clone(),
                    });
                }
            }
            let folder = state
                .folders
                .iter_mut()
                .find(|f| f.id == id)
                .ok_or_else(|| Error::not_found(entity::FOLDER, id))?;
            if let Some(name) = patch.name {
                folder.name = name;
            }
            if let Some(parent_id) = patch.parent_id {
                folder.parent_id = parent_id;
            }
            if let Some(folder_type) = patch.folder_type {
                folder.folder_type = folder_type;
            }
            if let Some(department_id) = patch.department_id {
                folder.department_id = department_id;
            }
            folder.updated_at = Utc::now();
            let folder = folder.clone();
            let event = StoreEvent::Updated {
                entity: entity::FOLDER,
                id: folder.id.clone(),
            };
            Ok((folder, event))
        })
    }

    /// Delete a folder
    ///
    /// Non-cascading: documents and child folders keep their (now dangling)
    /// references.
    pub fn delete_folder(&self, id: &str) -> Result<()> {
        self.commit(|state| {
            let before = state.folders.len();
            state.folders.retain(|f| f.id != id);
            if state.folders.len() == before {
                return Err(Error::not_found(entity::FOLDER, id));
            }
            let event = StoreEvent::Deleted {
                entity: entity::FOLDER,
                id: id.to_string(),
            };
            Ok(((), event))
        })
    }

    // -- Documents --------------------------------------------------------

    /// Create a document from a completed-upload payload
    pub fn add_document(&self, spec: DocumentSpec) -> Result<Document> {
        self.commit(|state| {
            let now = Utc::now();
            let document = Document {
                id: Uuid::new_v4().to_string(),
                name: spec.name,
                description: spec.description,
                folder_id: spec.folder_id,
                doc_type: spec.doc_type,
                url: spec.url,
                size: spec.size,
                status: spec.status,
                created_by: spec.created_by,
                assigned_to: spec.assigned_to,
                workflow_id: spec.workflow_id,
                created_at: now,
                updated_at: now,
                tags: spec.tags,
                metadata: spec.metadata,
            };
            state.documents.push(document.clone());
            let event = StoreEvent::Created {
                entity: entity::DOCUMENT,
                id: document.id.clone(),
            };
            Ok((document, event))
        })
    }

    /// Merge a patch into a document
    pub fn update_document(&self, id: &str, patch: DocumentPatch) -> Result<Document> {
        self.commit(|state| {
            let document = state
                .documents
                .iter_mut()
                .find(|d| d.id == id)
                .ok_or_else(|| Error::not_found(entity::DOCUMENT, id))?;
            if let Some(name) = patch.name {
                document.name = name;
            }
            if let Some(description) = patch.description {
                document.description = description;
            }
            if let Some(folder_id) = patch.folder_id {
                document.folder_id = folder_id;
            }
            if let Some(status) = patch.status {
                document.status = status;
            }
            if let Some(assigned_to) = patch.assigned_to {
                document.assigned_to = assigned_to;
            }
            if let Some(workflow_id) = patch.workflow_id {
                document.workflow_id = workflow_id;
            }
            if let Some(tags) = patch.tags {
                document.tags = tags;
            }
            if let Some(metadata) = patch.metadata {
                document.metadata = metadata;
            }
            document.updated_at = Utc::now();
            let document = document.clone();
            let event = StoreEvent::Updated {
                entity: entity::DOCUMENT,
                id: document.id.clone(),
            };
            Ok((document, event))
        })
    }

    /// Delete a document (no tombstone)
    pub fn delete_document(&self, id: &str) -> Result<()> {
        self.commit(|state| {
            let before = state.documents.len();
            state.documents.retain(|d| d.id != id);
            if state.documents.len() == before {
                return Err(Error::not_found(entity::DOCUMENT, id));
            }
            let event = StoreEvent::Deleted {
                entity: entity::DOCUMENT,
                id: id.to_string(),
            };
            Ok(((), event))
        })
    }

    /// Move a document into another folder
    ///
    /// The target folder must exist; everything else about the document is
    /// left as-is apart from the `updated_at` refresh.
    pub fn move_document(&self, id: &str, new_folder_id: &str) -> Result<Document> {
        self.commit(|state| {
            if !state.folders.iter().any(|f| f.id == new_folder_id) {
                return Err(Error::not_found(entity::FOLDER, new_folder_id));
            }
            let document = state
                .documents
                .iter_mut()
                .find(|d| d.id == id)
                .ok_or_else(|| Error::not_found(entity::DOCUMENT, id))?;
            document.folder_id = new_folder_id.to_string();
            document.updated_at = Utc::now();
            let document = document.clone();
            let event = StoreEvent::Updated {
                entity: entity::DOCUMENT,
                id: document.id.clone(),
            };
            Ok((document, event))
        })
    }

    // -- Notifications ----------------------------------------------------

    /// Create a notification (prepended, so the feed stays newest-first)
    pub fn add_notification(&self, spec: NotificationSpec) -> Notification {
        self.commit_ok(|state| {
            let notification = Notification {
                id: Uuid::new_v4().to_string(),
                user_id: spec.user_id,
                notification_type: spec.notification_type,
                title: spec.title,
                message: spec.message,
                read: false,
                created_at: Utc::now(),
            };
            state.notifications.insert(0, notification.clone());
            let event = StoreEvent::Created {
                entity: entity::NOTIFICATION,
                id: notification.id.clone(),
            };
            (notification, event)
        })
    }

    /// Mark a notification as read
    ///
    /// Flips `read` to `true` at most once; calling again on an already-read
    /// notification succeeds without publishing another event.
    pub fn mark_notification_as_read(&self, id: &str) -> Result<Notification> {
        if let Some(existing) = self.state.load().notifications.iter().find(|n| n.id == id) {
            if existing.read {
                return Ok(existing.clone());
            }
        }
        self.commit(|state| {
            let notification = state
                .notifications
                .iter_mut()
                .find(|n| n.id == id)
                .ok_or_else(|| Error::not_found(entity::NOTIFICATION, id))?;
            notification.read = true;
            let notification = notification.clone();
            let event = StoreEvent::Updated {
                entity: entity::NOTIFICATION,
                id: notification.id.clone(),
            };
            Ok((notification, event))
        })
    }

    /// Sweep all read notifications, keeping unread ones
    ///
    /// Returns how many were removed.
    pub fn clear_notifications(&self) -> usize {
        self.commit_ok(|state| {
            let before = state.notifications.len();
            state.notifications.retain(|n| !n.read);
            let removed = before - state.notifications.len();
            (removed, StoreEvent::NotificationsCleared { removed })
        })
    }

    // -- Users ------------------------------------------------------------

    /// Create a user
    pub fn add_user(&self, spec: UserSpec) -> User {
        self.commit_ok(|state| {
            let user = User {
                id: Uuid::new_v4().to_string(),
                name: spec.name,
                email: spec.email,
                role: spec.role,
                department_id: spec.department_id,
            };
            state.users.push(user.clone());
            let event = StoreEvent::Created {
                entity: entity::USER,
                id: user.id.clone(),
            };
            (user, event)
        })
    }

    /// Merge a patch into a user
    pub fn update_user(&self, id: &str, patch: UserPatch) -> Result<User> {
        self.commit(|state| {
            let user = state
                .users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or_else(|| Error::not_found(entity::USER, id))?;
            if let Some(name) = patch.name {
                user.name = name;
            }
            if let Some(email) = patch.email {
                user.email = email;
            }
            if let Some(role) = patch.role {
                user.role = role;
            }
            if let Some(department_id) = patch.department_id {
                user.department_id = department_id;
            }
            let user = user.clone();
            let event = StoreEvent::Updated {
                entity: entity::USER,
                id: user.id.clone(),
            };
            Ok((user, event))
        })
    }

    /// Delete a user
    pub fn delete_user(&self, id: &str) -> Result<()> {
        self.commit(|state| {
            let before = state.users.len();
            state.users.retain(|u| u.id != id);
            if state.users.len() == before {
                return Err(Error::not_found(entity::USER, id));
            }
            let event = StoreEvent::Deleted {
                entity: entity::USER,
                id: id.to_string(),
            };
            Ok(((), event))
        })
    }

    // -- Transient UI state -----------------------------------------------

    /// Set (or clear) the user the frontend acts as
    pub fn set_current_user(&self, user: Option<User>) {
        self.commit_ok(|state| {
            state.current_user = user;
            ((), StoreEvent::UiStateChanged)
        })
    }

    /// Set (or clear) the selected folder
    pub fn set_selected_folder(&self, folder_id: Option<String>) {
        self.commit_ok(|state| {
            state.selected_folder_id = folder_id;
            ((), StoreEvent::UiStateChanged)
        })
    }

    /// Set the free-text search query
    pub fn set_search_query(&self, query: String) {
        self.commit_ok(|state| {
            state.search_query = query;
            ((), StoreEvent::UiStateChanged)
        })
    }

    /// Replace the active document filters
    pub fn set_filters(&self, filters: DocumentFilters) {
        self.commit_ok(|state| {
            state.filters = filters;
            ((), StoreEvent::UiStateChanged)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{DocumentStatus, FolderType, NotificationType, UserRole};
    use std::collections::HashMap;

    fn folder_spec(name: &str, parent_id: Option<&str>) -> FolderSpec {
        FolderSpec {
            name: name.to_string(),
            parent_id: parent_id.map(str::to_string),
            folder_type: FolderType::Folder,
            department_id: "dept-1".to_string(),
        }
    }

    fn document_spec(name: &str, folder_id: &str) -> DocumentSpec {
        DocumentSpec {
            name: name.to_string(),
            description: String::new(),
            folder_id: folder_id.to_string(),
            doc_type: "pdf".to_string(),
            url: format!("mem://{name}"),
            size: 2048,
            status: DocumentStatus::Draft,
            created_by: "user-1".to_string(),
            assigned_to: None,
            workflow_id: None,
            tags: vec!["contract".to_string()],
            metadata: HashMap::new(),
        }
    }

    fn notification_spec(title: &str) -> NotificationSpec {
        NotificationSpec {
            user_id: "user-1".to_string(),
            notification_type: NotificationType::Document,
            title: title.to_string(),
            message: "hello".to_string(),
        }
    }

    #[test]
    fn creation_assigns_unique_ids() {
        let store = EntityStore::new();
        let a = store.add_folder(folder_spec("a", None)).unwrap();
        let b = store.add_folder(folder_spec("b", None)).unwrap();
        let doc = store.add_document(document_spec("x.pdf", &a.id)).unwrap();

        assert_ne!(a.id, b.id);
        assert_ne!(a.id, doc.id);
        assert_eq!(store.snapshot().folders.len(), 2);
    }

    #[test]
    fn update_refreshes_updated_at_and_keeps_created_at() {
        let store = EntityStore::new();
        let folder = store.add_folder(folder_spec("a", None)).unwrap();
        assert!(folder.updated_at >= folder.created_at);

        let updated = store
            .update_folder(
                &folder.id,
                FolderPatch {
                    name: Some("renamed".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.created_at, folder.created_at);
        assert!(updated.updated_at >= folder.updated_at);
        assert_eq!(updated.name, "renamed");
    }

    #[test]
    fn null_parent_patch_moves_folder_to_top_level() {
        let store = EntityStore::new();
        let root = store.add_folder(folder_spec("root", None)).unwrap();
        let child = store.add_folder(folder_spec("child", Some(&root.id))).unwrap();

        let patch: FolderPatch = serde_json::from_str(r#"{"parentId": null}"#).unwrap();
        let moved = store.update_folder(&child.id, patch).unwrap();

        assert_eq!(moved.parent_id, None);
    }

    #[test]
    fn missing_ids_surface_not_found() {
        let store = EntityStore::new();

        assert!(matches!(
            store.update_folder("nope", FolderPatch::default()),
            Err(Error::NotFound { entity: "folder", .. })
        ));
        assert!(matches!(
            store.delete_document("nope"),
            Err(Error::NotFound { entity: "document", .. })
        ));
        assert!(matches!(
            store.mark_notification_as_read("nope"),
            Err(Error::NotFound { entity: "notification", .. })
        ));
    }

    #[test]
    fn rejected_mutation_leaves_store_untouched() {
        let store = EntityStore::new();
        let folder = store.add_folder(folder_spec("a", None)).unwrap();

        let err = store
            .update_folder(
                &folder.id,
                FolderPatch {
                    parent_id: Some(Some("missing-parent".to_string())),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.folders[0].parent_id, None);
    }

    #[test]
    fn reparenting_under_a_descendant_is_rejected() {
        let store = EntityStore::new();
        let root = store.add_folder(folder_spec("root", None)).unwrap();
        let child = store
            .add_folder(folder_spec("child", Some(&root.id)))
            .unwrap();

        let err = store
            .update_folder(
                &root.id,
                FolderPatch {
                    parent_id: Some(Some(child.id.clone())),
                    ..Default::default()
                },
            )
            .unwrap_err();

        assert!(matches!(err, Error::FolderCycle { .. }));
    }

    #[test]
    fn move_document_requires_existing_target_folder() {
        let store = EntityStore::new();
        let a = store.add_folder(folder_spec("a", None)).unwrap();
        let b = store.add_folder(folder_spec("b", None)).unwrap();
        let doc = store.add_document(document_spec("x.pdf", &a.id)).unwrap();

        let moved = store.move_document(&doc.id, &b.id).unwrap();
        assert_eq!(moved.folder_id, b.id);
        assert!(moved.updated_at >= doc.updated_at);

        assert!(matches!(
            store.move_document(&doc.id, "missing"),
            Err(Error::NotFound { entity: "folder", .. })
        ));
    }

    #[test]
    fn notifications_are_newest_first() {
        let store = EntityStore::new();
        store.add_notification(notification_spec("first"));
        store.add_notification(notification_spec("second"));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.notifications[0].title, "second");
        assert_eq!(snapshot.notifications[1].title, "first");
    }

    #[test]
    fn mark_read_is_idempotent() {
        let store = EntityStore::new();
        let n = store.add_notification(notification_spec("hello"));

        let first = store.mark_notification_as_read(&n.id).unwrap();
        assert!(first.read);
        let second = store.mark_notification_as_read(&n.id).unwrap();
        assert!(second.read);
    }

    #[test]
    fn clear_removes_read_and_keeps_unread() {
        let store = EntityStore::new();
        let read_me = store.add_notification(notification_spec("read"));
        store.add_notification(notification_spec("unread"));
        store.mark_notification_as_read(&read_me.id).unwrap();

        let removed = store.clear_notifications();
        assert_eq!(removed, 1);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.notifications.len(), 1);
        assert_eq!(snapshot.notifications[0].title, "unread");
    }

    #[test]
    fn user_crud_round_trip() {
        let store = EntityStore::new();
        let user = store.add_user(UserSpec {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            role: UserRole::Reviewer,
            department_id: "dept-1".to_string(),
        });

        let updated = store
            .update_user(
                &user.id,
                UserPatch {
                    role: Some(UserRole::Approver),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.role, UserRole::Approver);

        store.delete_user(&user.id).unwrap();
        assert!(matches!(
            store.delete_user(&user.id),
            Err(Error::NotFound { entity: "user", .. })
        ));
    }

    #[test]
    fn committed_mutations_reach_subscribers() {
        let store = EntityStore::new();
        let mut events = store.subscribe();

        let folder = store.add_folder(folder_spec("a", None)).unwrap();
        store.set_search_query("contracts".to_string());

        assert_eq!(
            events.try_recv().unwrap(),
            StoreEvent::Created {
                entity: entity::FOLDER,
                id: folder.id.clone(),
            }
        );
        assert_eq!(events.try_recv().unwrap(), StoreEvent::UiStateChanged);
    }

    #[test]
    fn ui_state_setters_are_visible_in_snapshots() {
        let store = EntityStore::new();
        let user = store
            .add_user(UserSpec {
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                role: UserRole::Admin,
                department_id: "dept-1".to_string(),
            });

        store.set_selected_folder(Some("f-1".to_string()));
        store.set_search_query("report".to_string());
        store.set_filters(DocumentFilters {
            types: vec!["pdf".to_string()],
            ..Default::default()
        });
        store.set_current_user(Some(user.clone()));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.selected_folder_id.as_deref(), Some("f-1"));
        assert_eq!(snapshot.search_query, "report");
        assert_eq!(snapshot.filters.types, vec!["pdf".to_string()]);
        assert_eq!(
            snapshot.current_user.as_ref().map(|u| u.id.as_str()),
            Some(user.id.as_str())
        );
    }

    #[test]
    fn snapshots_are_immutable_views() {
        let store = EntityStore::new();
        store.add_folder(folder_spec("a", None)).unwrap();
        let before = store.snapshot();

        store.add_folder(folder_spec("b", None)).unwrap();

        assert_eq!(before.folders.len(), 1);
        assert_eq!(store.snapshot().folders.len(), 2);
    }
}
