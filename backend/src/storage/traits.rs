//! # Storage Traits
//!
//! Interfaces of the persistence collaborators used by the domain layer.
//! The domain only sees these traits; the SQLite repositories and the test
//! doubles implement them.

use async_trait::async_trait;
use chrono::NaiveTime;
use shared::DayOfWeek;
use thiserror::Error;

use crate::domain::models::{AvailabilityId, AvailabilityRecord, TeacherId, WeeklyLoad};

/// Failure reported by a persistence collaborator
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("conflict: {day} {start}-{end} overlaps another active availability of teacher {teacher_id}")]
    Conflict {
        teacher_id: TeacherId,
        day: DayOfWeek,
        start: NaiveTime,
        end: NaiveTime,
    },

    #[error("availability {id} has dependencies: referenced by {assignments} assignment(s)")]
    Dependency { id: AvailabilityId, assignments: i64 },

    #[error("availability {0} not found")]
    NotFound(AvailabilityId),

    #[error("stored data is corrupt: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence of availability records
#[async_trait]
pub trait AvailabilityStorage: Send + Sync {
    /// All records of a teacher in persisted order (oldest first)
    async fn list_availability(
        &self,
        teacher_id: TeacherId,
    ) -> StorageResult<Vec<AvailabilityRecord>>;

    /// Create an active record.
    /// Fails with `Conflict` when the range overlaps another active record of
    /// the same teacher and day.
    async fn create_availability(
        &self,
        teacher_id: TeacherId,
        day: DayOfWeek,
        start: NaiveTime,
        end: NaiveTime,
    ) -> StorageResult<AvailabilityRecord>;

    /// Move an existing record of the teacher to new boundaries and mark it
    /// active. `NotFound` when the teacher has no record with this id.
    async fn update_availability(
        &self,
        teacher_id: TeacherId,
        id: AvailabilityId,
        day: DayOfWeek,
        start: NaiveTime,
        end: NaiveTime,
    ) -> StorageResult<AvailabilityRecord>;

    /// Fails with `Dependency` when an assignment still references the record,
    /// `NotFound` when the teacher has no record with this id
    async fn delete_availability(
        &self,
        teacher_id: TeacherId,
        id: AvailabilityId,
    ) -> StorageResult<()>;
}

/// Read access to teacher data needed by the quota
#[async_trait]
pub trait TeacherStorage: Send + Sync {
    async fn get_weekly_load(&self, teacher_id: TeacherId) -> StorageResult<Option<WeeklyLoad>>;
}
