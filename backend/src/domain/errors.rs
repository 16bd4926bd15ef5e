use shared::DayOfWeek;
use thiserror::Error;

use crate::domain::models::{AvailabilityId, AvailabilityRecord, TeacherId};
use crate::domain::plan_executor::PlanExecutionError;
use crate::domain::time_grid::InvalidRangeError;
use crate::storage::traits::StorageError;

/// Errors of the availability editing workflow
#[derive(Debug, Error)]
pub enum AvailabilityError {
    #[error(transparent)]
    InvalidRange(#[from] InvalidRangeError),

    /// Advisory: the toggle is refused, the session goes on
    #[error(
        "Limit reached: {registered_hours:.2} of {required_hours:.2} weekly hours already registered, \
         {day} slot {slot_index} cannot be added"
    )]
    QuotaExceeded {
        day: DayOfWeek,
        slot_index: u8,
        registered_hours: f64,
        required_hours: f64,
    },

    #[error(
        "Insufficient hours: at least {minimum_hours:.2} of the {required_hours:.2} weekly teaching hours \
         must be registered, {registered_hours:.2} registered"
    )]
    QuotaInsufficient {
        registered_hours: f64,
        required_hours: f64,
        minimum_hours: f64,
    },

    #[error("Teacher not found: {0}")]
    TeacherNotFound(TeacherId),

    #[error("Availability {record_id} belongs to teacher {owner_id}, not teacher {teacher_id}")]
    ForeignRecord {
        record_id: AvailabilityId,
        owner_id: TeacherId,
        teacher_id: TeacherId,
    },

    #[error("Availability {0} is listed more than once")]
    DuplicateRecord(AvailabilityId),

    /// The plan stopped part-way. `reloaded_records` is the persisted state
    /// read back afterwards, `None` when that reload failed too.
    #[error("Saving availability failed: {failure}")]
    SaveFailed {
        failure: Box<PlanExecutionError>,
        reloaded_records: Option<Vec<AvailabilityRecord>>,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}
