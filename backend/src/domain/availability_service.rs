//! Availability service domain logic.
//!
//! Entry point of the presentation layer: loads edit sessions, applies
//! gated toggles and saves a selection by compacting it into ranges,
//! planning against the records the session started from and applying the
//! plan.
//!
//! ## Business Rules
//!
//! - A slot may only be added while the selection stays within the weekly load
//! - A selection may only be saved when it is at most one hour short of the load
//! - Nothing is written when the save is refused
//! - Persisted state is read back after every attempted save, successful or not

use std::collections::HashSet;
use std::sync::Arc;

use shared::DayOfWeek;
use tracing::{info, warn};

use crate::domain::commands::availability::{SaveAvailabilityCommand, SaveOutcome};
use crate::domain::edit_session::{self, EditSession};
use crate::domain::errors::AvailabilityError;
use crate::domain::models::{Selection, TeacherId};
use crate::domain::plan_executor::PlanExecutor;
use crate::domain::quota::{QuotaSummary, QuotaTracker};
use crate::domain::range_compactor;
use crate::domain::reconciliation::{MatchPolicy, ReconciliationPlanner};
use crate::domain::time_grid::{InvalidRangeError, TimeGrid};
use crate::storage::traits::{AvailabilityStorage, StorageError, TeacherStorage};

pub struct AvailabilityService<A: AvailabilityStorage, T: TeacherStorage> {
    availability: Arc<A>,
    teachers: Arc<T>,
    grid: TimeGrid,
    planner: ReconciliationPlanner,
}

impl<A: AvailabilityStorage, T: TeacherStorage> Clone for AvailabilityService<A, T> {
    fn clone(&self) -> Self {
        Self {
            availability: self.availability.clone(),
            teachers: self.teachers.clone(),
            grid: self.grid,
            planner: self.planner,
        }
    }
}

impl<A: AvailabilityStorage, T: TeacherStorage> AvailabilityService<A, T> {
    pub fn new(
        availability: Arc<A>,
        teachers: Arc<T>,
        grid: TimeGrid,
        policy: MatchPolicy,
    ) -> Self {
        Self {
            availability,
            teachers,
            grid,
            planner: ReconciliationPlanner::new(policy),
        }
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// Weekly teaching load of a teacher in decimal hours
    pub async fn get_required_weekly_hours(
        &self,
        teacher_id: TeacherId,
    ) -> Result<f64, AvailabilityError> {
        let load = self
            .teachers
            .get_weekly_load(teacher_id)
            .await?
            .ok_or(AvailabilityError::TeacherNotFound(teacher_id))?;
        Ok(load.as_decimal_hours())
    }

    /// Start editing: the stored records and the selection they cover
    pub async fn load_session(
        &self,
        teacher_id: TeacherId,
    ) -> Result<EditSession, AvailabilityError> {
        let required = self.get_required_weekly_hours(teacher_id).await?;
        let records = self.availability.list_availability(teacher_id).await?;
        info!(
            "Loaded {} availability records for teacher {} ({:.2} weekly hours required)",
            records.len(),
            teacher_id,
            required
        );
        EditSession::from_records(teacher_id, required, records, &self.grid)
            .map_err(|e| stored_off_grid(teacher_id, e))
    }

    pub fn toggle_cell(
        &self,
        selection: &Selection,
        required_weekly_hours: f64,
        day: DayOfWeek,
        slot_index: u8,
    ) -> Result<Selection, AvailabilityError> {
        let quota = QuotaTracker::new(required_weekly_hours, &self.grid);
        edit_session::toggle_cell(selection, &quota, &self.grid, day, slot_index)
    }

    pub fn summarize(&self, selection: &Selection, required_weekly_hours: f64) -> QuotaSummary {
        QuotaTracker::new(required_weekly_hours, &self.grid).summarize(selection)
    }

    /// Persist a selection.
    ///
    /// The plan is computed against `prior_records`, the records the edit
    /// session started from, not against a fresh read.
    pub async fn save(
        &self,
        command: SaveAvailabilityCommand,
    ) -> Result<SaveOutcome, AvailabilityError> {
        let teacher_id = command.teacher_id;
        info!(
            "Saving availability for teacher {}: {} slots selected",
            teacher_id,
            command.selection.slot_count()
        );

        let required = self.get_required_weekly_hours(teacher_id).await?;
        let quota = QuotaTracker::new(required, &self.grid);
        if !quota.can_persist(&command.selection) {
            let registered_hours = quota.hours_for(&command.selection);
            warn!(
                "Refusing to save {:.2} hours for teacher {} ({:.2} required)",
                registered_hours, teacher_id, required
            );
            return Err(AvailabilityError::QuotaInsufficient {
                registered_hours,
                required_hours: quota.required_weekly_hours(),
                minimum_hours: quota.minimum_persistable_hours(),
            });
        }

        if let Some(foreign) = command
            .prior_records
            .iter()
            .find(|record| record.teacher_id != teacher_id)
        {
            return Err(AvailabilityError::ForeignRecord {
                record_id: foreign.id,
                owner_id: foreign.teacher_id,
                teacher_id,
            });
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = command
            .prior_records
            .iter()
            .find(|record| !seen.insert(record.id))
        {
            return Err(AvailabilityError::DuplicateRecord(duplicate.id));
        }

        let ranges = range_compactor::compact(&command.selection, &self.grid)?;
        let plan = self.planner.plan(&command.prior_records, &ranges);

        let executor = PlanExecutor::new(self.availability.clone());
        match executor.execute(teacher_id, &plan).await {
            Ok(summary) => {
                let final_records = self.availability.list_availability(teacher_id).await?;
                info!(
                    "Saved availability for teacher {}: {} ({} records stored)",
                    teacher_id,
                    summary,
                    final_records.len()
                );
                Ok(SaveOutcome {
                    created: summary.created,
                    updated: summary.updated,
                    deleted: summary.deleted,
                    registered_hours: quota.hours_for(&command.selection),
                    final_records,
                })
            }
            Err(failure) => {
                let reloaded_records = match self.availability.list_availability(teacher_id).await {
                    Ok(records) => Some(records),
                    Err(e) => {
                        warn!("Reload after failed save for teacher {} failed: {}", teacher_id, e);
                        None
                    }
                };
                Err(AvailabilityError::SaveFailed {
                    failure: Box::new(failure),
                    reloaded_records,
                })
            }
        }
    }

    /// Save a session and return it reseeded from the stored records
    pub async fn save_session(
        &self,
        session: &EditSession,
    ) -> Result<(EditSession, SaveOutcome), AvailabilityError> {
        let outcome = self
            .save(SaveAvailabilityCommand {
                teacher_id: session.teacher_id(),
                selection: session.selection().clone(),
                prior_records: session.prior_records().to_vec(),
            })
            .await?;
        let reseeded = session
            .reseeded(outcome.final_records.clone(), &self.grid)
            .map_err(|e| stored_off_grid(session.teacher_id(), e))?;
        Ok((reseeded, outcome))
    }
}

/// Stored records that do not fit the grid are a data fault, not a bad request
fn stored_off_grid(teacher_id: TeacherId, e: InvalidRangeError) -> AvailabilityError {
    warn!("Stored availability of teacher {} does not fit the grid: {}", teacher_id, e);
    AvailabilityError::Storage(StorageError::Corrupt(format!(
        "availability of teacher {}: {}",
        teacher_id, e
    )))
}
