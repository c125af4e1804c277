/// Typed errors for store and engine operations
///
/// Every mutation boundary surfaces its failure as a value so callers and
/// tests can assert on the exact condition instead of observing a silent
/// no-op. Nothing here is fatal to the process; the worst case is a
/// rejected mutation.

use thiserror::Error;

use crate::domain::types::WorkflowStatus;

/// A `Result` alias with [`enum@Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by store and engine operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An operation referenced an id absent from its collection.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A step other than the one at `current_step` was named for resolution.
    /// Out-of-order and duplicate resolution attempts both land here.
    #[error(
        "step {step_id} is not the current step of workflow {workflow_id} (expected {expected_step_id})"
    )]
    StepOutOfOrder {
        workflow_id: String,
        step_id: String,
        /// The step that is actually awaiting resolution.
        expected_step_id: String,
    },

    /// Every step of the workflow has already been approved.
    #[error("workflow {workflow_id} has no pending step left to resolve")]
    StepsExhausted { workflow_id: String },

    /// A transition was attempted on a workflow already in a terminal state.
    #[error("workflow {workflow_id} is {status:?} and admits no further transitions")]
    WorkflowClosed {
        workflow_id: String,
        status: WorkflowStatus,
    },

    /// Reparenting a folder would make it its own ancestor.
    #[error("folder {folder_id} cannot be moved under its own descendant {parent_id}")]
    FolderCycle {
        folder_id: String,
        parent_id: String,
    },
}

impl Error {
    /// Shorthand for a [`Error::NotFound`] with an owned id.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            entity,
            id: id.into(),
        }
    }
}
