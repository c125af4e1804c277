/// Domain Model Layer
///
/// This module defines the entities the store manages and the payload
/// shapes used to create and patch them:
/// - Entity types (Folder, Document, Workflow, Notification, User)
/// - Creation specs (store assigns ids and timestamps)
/// - Partial-update patches (merge semantics, updated_at refresh)

// Entity type definitions
pub mod types;

// Creation specs and update patches
pub mod specs;

// Re-export commonly used types
pub use specs::{
    DocumentPatch, DocumentSpec, FolderPatch, FolderSpec, NotificationSpec, StepSpec, UserPatch,
    UserSpec, WorkflowPatch, WorkflowSpec,
};
pub use types::{
    Document, DocumentStatus, Folder, FolderType, Notification, NotificationType, StepStatus,
    StepType, User, UserRole, Workflow, WorkflowStatus, WorkflowStep,
};
