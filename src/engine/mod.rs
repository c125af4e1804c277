/// Workflow Engine
///
/// Transition rules for workflows and their steps. The engine validates a
/// command, computes the next workflow state, and commits it through the
/// entity store's mutation primitive, so every committed transition is
/// atomic and published to subscribers like any other store change.
///
/// Progress is tracked by `current_step`: the steps before it have been
/// approved, and only the step at the index may be resolved. Naming any
/// other step id is rejected, which also covers resolving a step twice.
/// A rejected step stays at `current_step` and does not end the workflow;
/// ending it early is an explicit cancel.

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::specs::{WorkflowPatch, WorkflowSpec};
use crate::domain::types::{StepStatus, Workflow, WorkflowStatus, WorkflowStep};
use crate::error::{Error, Result};
use crate::store::snapshot::{entity, StoreEvent};
use crate::store::EntityStore;

/// Step-transition engine over the entity store
#[derive(Debug, Clone)]
pub struct WorkflowEngine {
    store: Arc<EntityStore>,
}

impl WorkflowEngine {
    /// Create an engine over the given store
    pub fn new(store: Arc<EntityStore>) -> Self {
        Self { store }
    }

    /// Create a workflow from a spec
    ///
    /// The new workflow starts at `current_step = 0` with status `active`;
    /// every step starts `pending` with no comments. It is visible to
    /// readers as soon as this returns.
    pub fn create_workflow(&self, spec: WorkflowSpec) -> Result<Workflow> {
        self.store.commit(|state| {
            let now = Utc::now();
            let steps = spec
                .steps
                .into_iter()
                .map(|step| WorkflowStep {
                    id: Uuid::new_v4().to_string(),
                    name: step.name,
                    step_type: step.step_type,
                    assigned_to: step.assigned_to,
                    status: StepStatus::Pending,
                    comments: vec![],
                    due_date: step.due_date,
                })
                .collect();
            let workflow = Workflow {
                id: Uuid::new_v4().to_string(),
                name: spec.name,
                document_id: spec.document_id,
                steps,
                current_step: 0,
                status: WorkflowStatus::Active,
                created_at: now,
                updated_at: now,
            };
            state.workflows.push(workflow.clone());
            tracing::info!("🧭 Created workflow {} ({})", workflow.id, workflow.name);
            let event = StoreEvent::Created {
                entity: entity::WORKFLOW,
                id: workflow.id.clone(),
            };
            Ok((workflow, event))
        })
    }

    /// Merge a patch into a workflow
    ///
    /// Only descriptive fields are patchable; status and step progress move
    /// exclusively through [`Self::complete_step`] and [`Self::cancel_workflow`].
    pub fn update_workflow(&self, id: &str, patch: WorkflowPatch) -> Result<Workflow> {
        self.store.commit(|state| {
            let workflow = state
                .workflows
                .iter_mut()
                .find(|w| w.id == id)
                .ok_or_else(|| Error::not_found(entity::WORKFLOW, id))?;
            if let Some(name) = patch.name {
                workflow.name = name;
            }
            workflow.updated_at = Utc::now();
            let workflow = workflow.clone();
            let event = StoreEvent::Updated {
                entity: entity::WORKFLOW,
                id: workflow.id.clone(),
            };
            Ok((workflow, event))
        })
    }

    /// Resolve the current step of a workflow
    ///
    /// `step_id` must name the step at `current_step`; anything else is an
    /// out-of-order (or duplicate) attempt and is rejected with the step
    /// that is actually expected. Approval advances `current_step` and,
    /// when the resolved step was the last one, completes the workflow.
    /// Rejection marks the step and leaves both `current_step` and the
    /// workflow status unchanged.
    pub fn complete_step(
        &self,
        workflow_id: &str,
        step_id: &str,
        approved: bool,
        comment: Option<String>,
    ) -> Result<Workflow> {
        self.store.commit(|state| {
            let workflow = state
                .workflows
                .iter_mut()
                .find(|w| w.id == workflow_id)
                .ok_or_else(|| Error::not_found(entity::WORKFLOW, workflow_id))?;
            if workflow.status.is_terminal() {
                return Err(Error::WorkflowClosed {
                    workflow_id: workflow.id.clone(),
                    status: workflow.status,
                });
            }

            let current = workflow.current_step;
            let last = workflow.steps.len().saturating_sub(1);
            let step = workflow
                .steps
                .get_mut(current)
                .ok_or_else(|| Error::StepsExhausted {
                    workflow_id: workflow_id.to_string(),
                })?;
            if step.id != step_id {
                return Err(Error::StepOutOfOrder {
                    workflow_id: workflow_id.to_string(),
                    step_id: step_id.to_string(),
                    expected_step_id: step.id.clone(),
                });
            }

            step.status = if approved {
                StepStatus::Completed
            } else {
                StepStatus::Rejected
            };
            if let Some(comment) = comment {
                step.comments.push(comment);
            }
            if approved {
                workflow.current_step += 1;
                if current == last {
                    workflow.status = WorkflowStatus::Completed;
                    tracing::info!("✅ Workflow {} completed", workflow.id);
                }
            } else {
                tracing::info!("🚫 Step {} of workflow {} rejected", step_id, workflow.id);
            }
            workflow.updated_at = Utc::now();

            let workflow = workflow.clone();
            let event = StoreEvent::Updated {
                entity: entity::WORKFLOW,
                id: workflow.id.clone(),
            };
            Ok((workflow, event))
        })
    }

    /// Cancel an active workflow
    ///
    /// Terminal states admit no further transitions, so cancelling a
    /// completed or already-cancelled workflow is rejected.
    pub fn cancel_workflow(&self, id: &str) -> Result<Workflow> {
        self.store.commit(|state| {
            let workflow = state
                .workflows
                .iter_mut()
                .find(|w| w.id == id)
                .ok_or_else(|| Error::not_found(entity::WORKFLOW, id))?;
            if workflow.status.is_terminal() {
                return Err(Error::WorkflowClosed {
                    workflow_id: workflow.id.clone(),
                    status: workflow.status,
                });
            }
            workflow.status = WorkflowStatus::Cancelled;
            workflow.updated_at = Utc::now();
            let workflow = workflow.clone();
            let event = StoreEvent::Updated {
                entity: entity::WORKFLOW,
                id: workflow.id.clone(),
            };
            Ok((workflow, event))
        })
    }

    /// Delete a workflow
    ///
    /// Non-cascading: documents referencing it keep their `workflow_id`.
    pub fn delete_workflow(&self, id: &str) -> Result<()> {
        self.store.commit(|state| {
            let before = state.workflows.len();
            state.workflows.retain(|w| w.id != id);
            if state.workflows.len() == before {
                return Err(Error::not_found(entity::WORKFLOW, id));
            }
            let event = StoreEvent::Deleted {
                entity: entity::WORKFLOW,
                id: id.to_string(),
            };
            Ok(((), event))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::specs::StepSpec;
    use crate::domain::types::StepType;

    fn engine() -> WorkflowEngine {
        WorkflowEngine::new(Arc::new(EntityStore::new()))
    }

    fn step(name: &str, step_type: StepType) -> StepSpec {
        StepSpec {
            name: name.to_string(),
            step_type,
            assigned_to: vec!["reviewer-1".to_string()],
            due_date: None,
        }
    }

    fn review_workflow(engine: &WorkflowEngine) -> Workflow {
        engine
            .create_workflow(WorkflowSpec {
                name: "Review".to_string(),
                document_id: "doc-1".to_string(),
                steps: vec![
                    step("Review", StepType::Review),
                    step("Approve", StepType::Approve),
                ],
            })
            .unwrap()
    }

    #[test]
    fn new_workflow_starts_active_at_step_zero() {
        let engine = engine();
        let wf = review_workflow(&engine);

        assert_eq!(wf.current_step, 0);
        assert_eq!(wf.status, WorkflowStatus::Active);
        assert!(wf
            .steps
            .iter()
            .all(|s| s.status == StepStatus::Pending && s.comments.is_empty()));
    }

    #[test]
    fn approving_all_steps_in_order_completes_the_workflow() {
        let engine = engine();
        let wf = review_workflow(&engine);

        let after_first = engine
            .complete_step(&wf.id, &wf.steps[0].id, true, None)
            .unwrap();
        assert_eq!(after_first.current_step, 1);
        assert_eq!(after_first.status, WorkflowStatus::Active);

        let after_second = engine
            .complete_step(&wf.id, &wf.steps[1].id, true, Some("lgtm".to_string()))
            .unwrap();
        assert_eq!(after_second.current_step, 2);
        assert_eq!(after_second.status, WorkflowStatus::Completed);
        assert_eq!(after_second.steps[1].comments, vec!["lgtm".to_string()]);
    }

    #[test]
    fn three_step_pipeline_ends_at_current_step_three() {
        let engine = engine();
        let wf = engine
            .create_workflow(WorkflowSpec {
                name: "Long".to_string(),
                document_id: "doc-1".to_string(),
                steps: vec![
                    step("s1", StepType::Review),
                    step("s2", StepType::Approve),
                    step("s3", StepType::Notify),
                ],
            })
            .unwrap();

        for s in &wf.steps {
            engine.complete_step(&wf.id, &s.id, true, None).unwrap();
        }

        let snapshot = engine.store.snapshot();
        let done = &snapshot.workflows[0];
        assert_eq!(done.current_step, 3);
        assert_eq!(done.status, WorkflowStatus::Completed);
    }

    #[test]
    fn out_of_order_resolution_is_rejected() {
        let engine = engine();
        let wf = review_workflow(&engine);

        let err = engine
            .complete_step(&wf.id, &wf.steps[1].id, true, None)
            .unwrap_err();
        assert!(matches!(err, Error::StepOutOfOrder { expected_step_id, .. }
            if expected_step_id == wf.steps[0].id));

        // the failed attempt must not have advanced anything
        let snapshot = engine.store.snapshot();
        assert_eq!(snapshot.workflows[0].current_step, 0);
        assert_eq!(snapshot.workflows[0].steps[1].status, StepStatus::Pending);
    }

    #[test]
    fn resolving_the_same_step_twice_is_rejected() {
        let engine = engine();
        let wf = review_workflow(&engine);

        engine
            .complete_step(&wf.id, &wf.steps[0].id, true, None)
            .unwrap();
        let err = engine
            .complete_step(&wf.id, &wf.steps[0].id, true, None)
            .unwrap_err();

        assert!(matches!(err, Error::StepOutOfOrder { .. }));
    }

    #[test]
    fn rejection_marks_the_step_and_changes_nothing_else() {
        let engine = engine();
        let wf = review_workflow(&engine);

        let after = engine
            .complete_step(&wf.id, &wf.steps[0].id, false, Some("missing signature".to_string()))
            .unwrap();

        assert_eq!(after.steps[0].status, StepStatus::Rejected);
        assert_eq!(after.steps[0].comments, vec!["missing signature".to_string()]);
        assert_eq!(after.current_step, 0);
        assert_eq!(after.status, WorkflowStatus::Active);
    }

    #[test]
    fn completed_workflow_admits_no_further_transitions() {
        let engine = engine();
        let wf = review_workflow(&engine);
        engine
            .complete_step(&wf.id, &wf.steps[0].id, true, None)
            .unwrap();
        engine
            .complete_step(&wf.id, &wf.steps[1].id, true, None)
            .unwrap();

        assert!(matches!(
            engine.complete_step(&wf.id, &wf.steps[1].id, true, None),
            Err(Error::WorkflowClosed { .. })
        ));
        assert!(matches!(
            engine.cancel_workflow(&wf.id),
            Err(Error::WorkflowClosed { .. })
        ));
    }

    #[test]
    fn cancel_is_terminal() {
        let engine = engine();
        let wf = review_workflow(&engine);

        let cancelled = engine.cancel_workflow(&wf.id).unwrap();
        assert_eq!(cancelled.status, WorkflowStatus::Cancelled);

        assert!(matches!(
            engine.complete_step(&wf.id, &wf.steps[0].id, true, None),
            Err(Error::WorkflowClosed { .. })
        ));
    }

    #[test]
    fn stepless_workflow_has_nothing_to_resolve() {
        let engine = engine();
        let wf = engine
            .create_workflow(WorkflowSpec {
                name: "Empty".to_string(),
                document_id: "doc-1".to_string(),
                steps: vec![],
            })
            .unwrap();

        assert!(matches!(
            engine.complete_step(&wf.id, "any", true, None),
            Err(Error::StepsExhausted { .. })
        ));
    }

    #[test]
    fn unknown_workflow_surfaces_not_found() {
        let engine = engine();
        assert!(matches!(
            engine.complete_step("missing", "step", true, None),
            Err(Error::NotFound { entity: "workflow", .. })
        ));
    }

    #[test]
    fn update_workflow_renames_and_refreshes_timestamp() {
        let engine = engine();
        let wf = review_workflow(&engine);

        let renamed = engine
            .update_workflow(
                &wf.id,
                WorkflowPatch {
                    name: Some("Contract review".to_string()),
                },
            )
            .unwrap();

        assert_eq!(renamed.name, "Contract review");
        assert_eq!(renamed.created_at, wf.created_at);
        assert!(renamed.updated_at >= wf.updated_at);
    }

    #[test]
    fn delete_workflow_removes_it_without_tombstone() {
        let engine = engine();
        let wf = review_workflow(&engine);

        engine.delete_workflow(&wf.id).unwrap();
        assert!(engine.store.snapshot().workflows.is_empty());
        assert!(matches!(
            engine.delete_workflow(&wf.id),
            Err(Error::NotFound { .. })
        ));
    }
}
