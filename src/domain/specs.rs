/// Creation payloads and partial-update patches
///
/// Specs carry everything a caller provides when creating an entity; the
/// store supplies the identifier and timestamps. Patches carry only the
/// fields a caller wants to change; absent fields are left untouched and
/// `updated_at` is refreshed on every successful merge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::domain::types::{
    DocumentStatus, FolderType, NotificationType, StepType, UserRole,
};

/// Payload for creating a folder
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderSpec {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(rename = "type")]
    pub folder_type: FolderType,
    pub department_id: String,
}

/// Partial update for a folder
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FolderPatch {
    pub name: Option<String>,
    /// Reparent the folder; `null` moves it to top level, and the new
    /// parent chain must stay acyclic
    #[serde(deserialize_with = "nullable")]
    pub parent_id: Option<Option<String>>,
    #[serde(rename = "type")]
    pub folder_type: Option<FolderType>,
    pub department_id: Option<String>,
}

/// Payload for creating a document
///
/// This is the completed-upload shape handed over by the ingestion
/// collaborator once the raw bytes have been read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub folder_id: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub url: String,
    pub size: u64,
    pub status: DocumentStatus,
    pub created_by: String,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub workflow_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

/// Partial update for a document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub folder_id: Option<String>,
    pub status: Option<DocumentStatus>,
    /// `null` clears the assignee
    #[serde(deserialize_with = "nullable")]
    pub assigned_to: Option<Option<String>>,
    /// `null` detaches the document from its workflow
    #[serde(deserialize_with = "nullable")]
    pub workflow_id: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub metadata: Option<HashMap<String, Value>>,
}

/// Payload for creating a workflow
///
/// Steps are given in pipeline order; the engine assigns step IDs and
/// starts every step as pending with no comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSpec {
    pub name: String,
    pub document_id: String,
    pub steps: Vec<StepSpec>,
}

/// One step of a workflow-to-be
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub step_type: StepType,
    #[serde(default)]
    pub assigned_to: Vec<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update for a workflow
///
/// Status and step progress are owned by the engine's transition rules and
/// cannot be patched directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowPatch {
    pub name: Option<String>,
}

/// Payload for creating a notification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSpec {
    pub user_id: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
}

/// Payload for creating a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSpec {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub department_id: String,
}

/// Partial update for a user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub department_id: Option<String>,
}

/// Keep "field absent" and an explicit JSON `null` distinguishable.
///
/// The plain derive folds both into the outer `None`; nullable patch
/// fields deserialize through this so `null` arrives as `Some(None)`
/// and clears the field on merge.
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_patch_distinguishes_null_parent_from_absent() {
        let cleared: FolderPatch = serde_json::from_str(r#"{"parentId": null}"#).unwrap();
        assert_eq!(cleared.parent_id, Some(None));

        let untouched: FolderPatch = serde_json::from_str("{}").unwrap();
        assert_eq!(untouched.parent_id, None);

        let reparented: FolderPatch =
            serde_json::from_str(r#"{"parentId": "folder-1"}"#).unwrap();
        assert_eq!(reparented.parent_id, Some(Some("folder-1".to_string())));
    }

    #[test]
    fn document_patch_null_clears_assignee_and_workflow() {
        let patch: DocumentPatch =
            serde_json::from_str(r#"{"assignedTo": null, "workflowId": null}"#).unwrap();
        assert_eq!(patch.assigned_to, Some(None));
        assert_eq!(patch.workflow_id, Some(None));

        let untouched: DocumentPatch = serde_json::from_str("{}").unwrap();
        assert_eq!(untouched.assigned_to, None);
        assert_eq!(untouched.workflow_id, None);
    }
}
