/// Core domain type definitions
///
/// Defines the entities managed by the store: folders, documents, workflows
/// with their steps, notifications, and users. All types serialize to the
/// camelCase JSON shape the frontend consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A folder in the navigation tree
///
/// Folders form a tree through `parent_id`. The store rejects parent chains
/// that would loop back on themselves, so tree traversal always terminates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique folder identifier (UUID v4, assigned on creation)
    pub id: String,
    /// Human-readable folder name
    pub name: String,
    /// Parent folder ID, `None` for top-level folders
    pub parent_id: Option<String>,
    /// Folder kind (plain folder or curated collection)
    #[serde(rename = "type")]
    pub folder_type: FolderType,
    /// Owning department
    pub department_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Folder kinds supported by the sidebar tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderType {
    Folder,
    Collection,
}

/// A managed document
///
/// The `url` is an opaque content reference produced by the upload
/// collaborator; the store never inspects it. `workflow_id` is advisory:
/// deleting a workflow does not touch the documents that reference it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique document identifier (UUID v4, assigned on creation)
    pub id: String,
    pub name: String,
    pub description: String,
    /// Containing folder
    pub folder_id: String,
    /// Mime/extension-derived type string (e.g., "pdf", "png")
    #[serde(rename = "type")]
    pub doc_type: String,
    /// Opaque content reference from the upload collaborator
    pub url: String,
    /// Size in bytes
    pub size: u64,
    pub status: DocumentStatus,
    pub created_by: String,
    /// Optional user this document is assigned to
    pub assigned_to: Option<String>,
    /// Optional workflow governing this document (advisory reference)
    pub workflow_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<String>,
    /// Free-form metadata (string keys to JSON scalars)
    pub metadata: HashMap<String, Value>,
}

/// Document review status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl DocumentStatus {
    /// Parse a status token as it appears on the wire ("draft", "approved", ...)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// An approval workflow attached to one document
///
/// `current_step` is an index into `steps`: everything before it has been
/// approved, and the step at the index (if any) is the one awaiting
/// resolution. Invariant: `0 <= current_step <= steps.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// Unique workflow identifier (UUID v4, assigned on creation)
    pub id: String,
    pub name: String,
    /// The document this workflow governs (advisory reference)
    pub document_id: String,
    /// Ordered review/approval/notify pipeline
    pub steps: Vec<WorkflowStep>,
    /// Index of the step awaiting resolution; equals `steps.len()` once all
    /// steps have been approved
    pub current_step: usize,
    pub status: WorkflowStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Workflow lifecycle status
///
/// Transitions are monotonic: `Active` may move to `Completed` or
/// `Cancelled`; terminal states never transition again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    Active,
    Completed,
    Cancelled,
}

impl WorkflowStatus {
    /// Whether this status admits no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// One gated unit of work within a workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    /// Step identifier, unique within its workflow
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub step_type: StepType,
    /// User IDs this step is assigned to
    pub assigned_to: Vec<String>,
    /// Starts `Pending`; resolved to `Completed` or `Rejected` exactly once
    pub status: StepStatus,
    /// Reviewer comments, in the order they were left
    pub comments: Vec<String>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Kind of gate a workflow step represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    Review,
    Approve,
    Notify,
}

/// Resolution state of a workflow step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Completed,
    Rejected,
}

/// A notification addressed to one user
///
/// The store keeps notifications newest-first. `read` flips to `true` at
/// most once; read notifications are swept by the clear operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier (UUID v4, assigned on creation)
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Categories a notification can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Document,
    Workflow,
    System,
    Deadline,
}

/// A user known to the system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier (UUID v4, assigned on creation)
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub department_id: String,
}

/// Roles that gate what the frontend offers a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
    Reviewer,
    Approver,
}
