//! # Plan Executor
//!
//! Applies a reconciliation plan against the availability storage.
//!
//! Phases run in a fixed order: deletes, updates, creates. Removing old
//! footprints first keeps a range that moved within a day from colliding
//! with its previous position. Operations are awaited one at a time; the
//! first failure stops the run. Operations that already succeeded are not
//! undone; the caller reloads persisted state instead.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info};

use crate::domain::models::TeacherId;
use crate::domain::reconciliation::{PlanOperation, ReconciliationPlan};
use crate::storage::traits::{AvailabilityStorage, StorageError};

/// Counts of successfully applied operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecutionSummary {
    pub deleted: usize,
    pub updated: usize,
    pub created: usize,
}

impl ExecutionSummary {
    pub fn total(&self) -> usize {
        self.deleted + self.updated + self.created
    }
}

impl fmt::Display for ExecutionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} deleted, {} updated, {} created",
            self.deleted, self.updated, self.created
        )
    }
}

/// Failure of one plan operation, with what had been applied before it
#[derive(Debug, Error)]
#[error("{failed_operation} failed after {completed}: {source}")]
pub struct PlanExecutionError {
    pub failed_operation: PlanOperation,
    pub completed: ExecutionSummary,
    #[source]
    pub source: StorageError,
}

pub struct PlanExecutor<S: AvailabilityStorage + ?Sized> {
    storage: Arc<S>,
}

impl<S: AvailabilityStorage + ?Sized> PlanExecutor<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    pub async fn execute(
        &self,
        teacher_id: TeacherId,
        plan: &ReconciliationPlan,
    ) -> Result<ExecutionSummary, PlanExecutionError> {
        info!(
            "Executing plan for teacher {}: {} deletes, {} updates, {} creates",
            teacher_id,
            plan.deletes.len(),
            plan.updates.len(),
            plan.creates.len()
        );

        let mut summary = ExecutionSummary::default();
        for operation in plan.operations() {
            debug!("Applying {}", operation);

            if let Err(source) = self.apply(teacher_id, &operation).await {
                error!(
                    "Plan for teacher {} stopped at '{}' ({}): {}",
                    teacher_id, operation, summary, source
                );
                return Err(PlanExecutionError {
                    failed_operation: operation,
                    completed: summary,
                    source,
                });
            }

            match operation {
                PlanOperation::Delete { .. } => summary.deleted += 1,
                PlanOperation::Update(update) if update.unchanged => {
                    debug!("Availability {} already stored as {}", update.id, update.range);
                    summary.updated += 1;
                }
                PlanOperation::Update(_) => summary.updated += 1,
                PlanOperation::Create { .. } => summary.created += 1,
            }
        }

        info!("Plan for teacher {} applied: {}", teacher_id, summary);
        Ok(summary)
    }

    async fn apply(
        &self,
        teacher_id: TeacherId,
        operation: &PlanOperation,
    ) -> Result<(), StorageError> {
        match operation {
            PlanOperation::Delete { id } => self.storage.delete_availability(teacher_id, *id).await,
            PlanOperation::Update(update) => {
                let range = update.range;
                self.storage
                    .update_availability(
                        teacher_id,
                        update.id,
                        range.day,
                        range.start_time,
                        range.end_time,
                    )
                    .await
                    .map(|_| ())
            }
            PlanOperation::Create { range } => self
                .storage
                .create_availability(teacher_id, range.day, range.start_time, range.end_time)
                .await
                .map(|_| ()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TimeRange;
    use crate::domain::reconciliation::RangeUpdate;
    use crate::storage::test_utils::{hm, MemoryAvailabilityStorage, ScriptedFailure};
    use shared::DayOfWeek;

    fn sample_plan(storage: &MemoryAvailabilityStorage) -> ReconciliationPlan {
        let keep = storage.seed(1, DayOfWeek::Monday, hm(7, 0), hm(7, 45));
        let drop = storage.seed(1, DayOfWeek::Tuesday, hm(7, 0), hm(7, 45));

        ReconciliationPlan {
            deletes: vec![drop.id],
            updates: vec![RangeUpdate {
                id: keep.id,
                range: TimeRange::new(DayOfWeek::Monday, hm(7, 0), hm(8, 30)),
                unchanged: false,
            }],
            creates: vec![TimeRange::new(DayOfWeek::Friday, hm(10, 45), hm(12, 15))],
        }
    }

    #[tokio::test]
    async fn test_executes_in_phase_order() {
        let storage = Arc::new(MemoryAvailabilityStorage::new());
        let plan = sample_plan(&storage);
        storage.clear_calls();

        let summary = PlanExecutor::new(storage.clone())
            .execute(1, &plan)
            .await
            .expect("plan should apply");

        assert_eq!(
            summary,
            ExecutionSummary {
                deleted: 1,
                updated: 1,
                created: 1
            }
        );
        assert_eq!(storage.calls(), vec!["delete 2", "update 1", "create Friday"]);

        let records = storage.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].end_time, hm(8, 30));
        assert_eq!(records[1].day, DayOfWeek::Friday);
    }

    #[tokio::test]
    async fn test_empty_plan_touches_nothing() {
        let storage = Arc::new(MemoryAvailabilityStorage::new());
        let summary = PlanExecutor::new(storage.clone())
            .execute(1, &ReconciliationPlan::default())
            .await
            .unwrap();

        assert_eq!(summary.total(), 0);
        assert!(storage.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_delete_aborts_later_phases() {
        let storage = Arc::new(MemoryAvailabilityStorage::new());
        let plan = sample_plan(&storage);
        storage.clear_calls();
        storage.fail_with(ScriptedFailure::DependencyOnDelete(plan.deletes[0]));

        let err = PlanExecutor::new(storage.clone())
            .execute(1, &plan)
            .await
            .unwrap_err();

        assert!(matches!(err.source, StorageError::Dependency { .. }));
        assert_eq!(err.failed_operation, PlanOperation::Delete { id: plan.deletes[0] });
        assert_eq!(err.completed, ExecutionSummary::default());
        assert_eq!(storage.calls(), vec!["delete 2"]);
    }

    #[tokio::test]
    async fn test_failed_create_reports_partial_summary() {
        let storage = Arc::new(MemoryAvailabilityStorage::new());
        let plan = sample_plan(&storage);
        storage.clear_calls();
        storage.fail_with(ScriptedFailure::ConflictOnCreate);

        let err = PlanExecutor::new(storage.clone())
            .execute(1, &plan)
            .await
            .unwrap_err();

        assert!(matches!(err.source, StorageError::Conflict { .. }));
        assert_eq!(
            err.completed,
            ExecutionSummary {
                deleted: 1,
                updated: 1,
                created: 0
            }
        );
        // Applied operations stay applied
        assert_eq!(storage.records().len(), 1);
        assert!(err.to_string().contains("1 deleted, 1 updated, 0 created"));
    }

    #[tokio::test]
    async fn test_record_of_another_teacher_is_not_touched() {
        let storage = Arc::new(MemoryAvailabilityStorage::new());
        let other = storage.seed(2, DayOfWeek::Friday, hm(7, 0), hm(7, 45));
        let plan = ReconciliationPlan {
            deletes: vec![other.id],
            ..ReconciliationPlan::default()
        };

        let err = PlanExecutor::new(storage.clone())
            .execute(1, &plan)
            .await
            .unwrap_err();

        assert!(matches!(err.source, StorageError::NotFound(id) if id == other.id));
        assert_eq!(storage.records(), vec![other]);
    }

    #[tokio::test]
    async fn test_unchanged_update_is_counted() {
        let storage = Arc::new(MemoryAvailabilityStorage::new());
        let kept = storage.seed(1, DayOfWeek::Monday, hm(7, 0), hm(7, 45));
        let update = RangeUpdate {
            id: kept.id,
            range: kept.range(),
            unchanged: true,
        };
        let plan = ReconciliationPlan {
            updates: vec![update],
            ..ReconciliationPlan::default()
        };

        let summary = PlanExecutor::new(storage.clone()).execute(1, &plan).await.unwrap();

        assert_eq!(summary.updated, 1);
        assert_eq!(storage.records(), vec![kept]);
        assert!(PlanOperation::Update(update).to_string().ends_with("(unchanged)"));
    }
}
