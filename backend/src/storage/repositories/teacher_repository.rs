use async_trait::async_trait;
use sqlx::Row;
use tracing::info;

use crate::domain::models::{Teacher, TeacherId, WeeklyLoad};
use crate::storage::connection::DbConnection;
use crate::storage::traits::{StorageError, StorageResult, TeacherStorage};

/// Teachers and their declared weekly load
#[derive(Clone)]
pub struct TeacherRepository {
    db: DbConnection,
}

impl TeacherRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert a teacher, replacing an existing one with the same id
    pub async fn store_teacher(&self, teacher: &Teacher) -> StorageResult<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO teachers (id, name, weekly_hours, weekly_minutes) VALUES (?, ?, ?, ?)",
        )
        .bind(teacher.id)
        .bind(&teacher.name)
        .bind(teacher.weekly_load.hours as i64)
        .bind(teacher.weekly_load.minutes as i64)
        .execute(self.db.pool())
        .await?;

        info!(
            "Stored teacher {} ({}) with weekly load {}h{:02}",
            teacher.id, teacher.name, teacher.weekly_load.hours, teacher.weekly_load.minutes
        );
        Ok(())
    }

    pub async fn get_teacher(&self, teacher_id: TeacherId) -> StorageResult<Option<Teacher>> {
        let row =
            sqlx::query("SELECT id, name, weekly_hours, weekly_minutes FROM teachers WHERE id = ?")
                .bind(teacher_id)
                .fetch_optional(self.db.pool())
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let hours: i64 = row.try_get("weekly_hours")?;
        let minutes: i64 = row.try_get("weekly_minutes")?;
        let hours = u32::try_from(hours).map_err(|_| {
            StorageError::Corrupt(format!("teacher {}: invalid weekly hours {}", teacher_id, hours))
        })?;
        let minutes = u32::try_from(minutes).map_err(|_| {
            StorageError::Corrupt(format!(
                "teacher {}: invalid weekly minutes {}",
                teacher_id, minutes
            ))
        })?;

        Ok(Some(Teacher {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            weekly_load: WeeklyLoad::new(hours, minutes),
        }))
    }
}

#[async_trait]
impl TeacherStorage for TeacherRepository {
    async fn get_weekly_load(&self, teacher_id: TeacherId) -> StorageResult<Option<WeeklyLoad>> {
        Ok(self.get_teacher(teacher_id).await?.map(|teacher| teacher.weekly_load))
    }
}
