//! SQLite implementation of [`AvailabilityStorage`].
//!
//! Times are stored as `HH:MM:SS` text, which sorts and compares like the
//! clock values it encodes. Overlap and dependency rules are checked here,
//! before the write, so callers get typed errors instead of raw SQL failures.

use async_trait::async_trait;
use chrono::NaiveTime;
use shared::DayOfWeek;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::{debug, info, warn};

use crate::domain::models::{AvailabilityId, AvailabilityRecord, TeacherId};
use crate::storage::connection::DbConnection;
use crate::storage::traits::{AvailabilityStorage, StorageError, StorageResult};

const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Clone)]
pub struct AvailabilityRepository {
    db: DbConnection,
}

impl AvailabilityRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    async fn get_availability(&self, id: AvailabilityId) -> StorageResult<AvailabilityRecord> {
        let row = sqlx::query(
            "SELECT id, teacher_id, day, start_time, end_time, active FROM availability WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(row) => row_to_record(&row),
            None => Err(StorageError::NotFound(id)),
        }
    }
}

fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

fn parse_time(value: &str, id: AvailabilityId) -> StorageResult<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|e| {
        StorageError::Corrupt(format!("availability {}: invalid time '{}': {}", id, value, e))
    })
}

fn row_to_record(row: &SqliteRow) -> StorageResult<AvailabilityRecord> {
    let id: AvailabilityId = row.try_get("id")?;
    let day_name: String = row.try_get("day")?;
    let day = DayOfWeek::from_name(&day_name).ok_or_else(|| {
        StorageError::Corrupt(format!("availability {}: unknown day '{}'", id, day_name))
    })?;
    let start: String = row.try_get("start_time")?;
    let end: String = row.try_get("end_time")?;

    Ok(AvailabilityRecord {
        id,
        teacher_id: row.try_get("teacher_id")?,
        day,
        start_time: parse_time(&start, id)?,
        end_time: parse_time(&end, id)?,
        active: row.try_get("active")?,
    })
}

#[async_trait]
impl AvailabilityStorage for AvailabilityRepository {
    async fn list_availability(
        &self,
        teacher_id: TeacherId,
    ) -> StorageResult<Vec<AvailabilityRecord>> {
        let rows = sqlx::query(
            "SELECT id, teacher_id, day, start_time, end_time, active FROM availability \
             WHERE teacher_id = ? ORDER BY id",
        )
        .bind(teacher_id)
        .fetch_all(self.db.pool())
        .await?;

        debug!("Found {} availability rows for teacher {}", rows.len(), teacher_id);
        rows.iter().map(row_to_record).collect()
    }

    async fn create_availability(
        &self,
        teacher_id: TeacherId,
        day: DayOfWeek,
        start: NaiveTime,
        end: NaiveTime,
    ) -> StorageResult<AvailabilityRecord> {
        let start_text = format_time(start);
        let end_text = format_time(end);

        let overlapping: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM availability \
             WHERE teacher_id = ? AND day = ? AND active = 1 AND start_time < ? AND end_time > ?",
        )
        .bind(teacher_id)
        .bind(day.name())
        .bind(&end_text)
        .bind(&start_text)
        .fetch_one(self.db.pool())
        .await?;

        if overlapping > 0 {
            warn!(
                "Rejecting availability {} {}-{} for teacher {}: overlaps {} active range(s)",
                day, start_text, end_text, teacher_id, overlapping
            );
            return Err(StorageError::Conflict {
                teacher_id,
                day,
                start,
                end,
            });
        }

        let result = sqlx::query(
            "INSERT INTO availability (teacher_id, day, start_time, end_time, active) VALUES (?, ?, ?, ?, 1)",
        )
        .bind(teacher_id)
        .bind(day.name())
        .bind(&start_text)
        .bind(&end_text)
        .execute(self.db.pool())
        .await?;

        let id = result.last_insert_rowid();
        info!(
            "Created availability {} for teacher {}: {} {}-{}",
            id, teacher_id, day, start_text, end_text
        );

        Ok(AvailabilityRecord {
            id,
            teacher_id,
            day,
            start_time: start,
            end_time: end,
            active: true,
        })
    }

    async fn update_availability(
        &self,
        teacher_id: TeacherId,
        id: AvailabilityId,
        day: DayOfWeek,
        start: NaiveTime,
        end: NaiveTime,
    ) -> StorageResult<AvailabilityRecord> {
        let result = sqlx::query(
            "UPDATE availability SET day = ?, start_time = ?, end_time = ?, active = 1, \
             updated_at = datetime('now') WHERE id = ? AND teacher_id = ?",
        )
        .bind(day.name())
        .bind(format_time(start))
        .bind(format_time(end))
        .bind(id)
        .bind(teacher_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            warn!("Teacher {} has no availability {} to update", teacher_id, id);
            return Err(StorageError::NotFound(id));
        }

        info!("Updated availability {} of teacher {}: {} {}-{}", id, teacher_id, day, start, end);
        self.get_availability(id).await
    }

    async fn delete_availability(
        &self,
        teacher_id: TeacherId,
        id: AvailabilityId,
    ) -> StorageResult<()> {
        let owned: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM availability WHERE id = ? AND teacher_id = ?")
                .bind(id)
                .bind(teacher_id)
                .fetch_one(self.db.pool())
                .await?;

        if owned == 0 {
            warn!("Teacher {} has no availability {} to delete", teacher_id, id);
            return Err(StorageError::NotFound(id));
        }

        let assignments: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM assignments WHERE availability_id = ?")
                .bind(id)
                .fetch_one(self.db.pool())
                .await?;

        if assignments > 0 {
            warn!(
                "Availability {} is referenced by {} assignment(s), not deleting",
                id, assignments
            );
            return Err(StorageError::Dependency { id, assignments });
        }

        let result = sqlx::query("DELETE FROM availability WHERE id = ? AND teacher_id = ?")
            .bind(id)
            .bind(teacher_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(id));
        }

        info!("Deleted availability {} of teacher {}", id, teacher_id);
        Ok(())
    }
}
