//! In-memory storage doubles for domain tests.
//!
//! `MemoryAvailabilityStorage` behaves like the SQLite repository (overlap
//! conflicts, not-found errors) and additionally records every call and can
//! be scripted to fail, which the real database cannot do on demand.

use async_trait::async_trait;
use chrono::NaiveTime;
use shared::DayOfWeek;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::models::{AvailabilityId, AvailabilityRecord, TeacherId, WeeklyLoad};
use crate::storage::traits::{AvailabilityStorage, StorageError, StorageResult, TeacherStorage};

pub fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptedFailure {
    /// Every create fails with a conflict
    ConflictOnCreate,
    /// Deleting this record fails with a dependency error
    DependencyOnDelete(AvailabilityId),
    /// Listing fails, e.g. the reload after a failed plan
    ListFails,
}

#[derive(Default)]
struct MemoryState {
    records: Vec<AvailabilityRecord>,
    next_id: AvailabilityId,
    calls: Vec<String>,
    failure: Option<ScriptedFailure>,
}

#[derive(Default)]
pub struct MemoryAvailabilityStorage {
    state: Mutex<MemoryState>,
}

impl MemoryAvailabilityStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record directly, bypassing checks and the call log
    pub fn seed(
        &self,
        teacher_id: TeacherId,
        day: DayOfWeek,
        start: NaiveTime,
        end: NaiveTime,
    ) -> AvailabilityRecord {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let record = AvailabilityRecord {
            id: state.next_id,
            teacher_id,
            day,
            start_time: start,
            end_time: end,
            active: true,
        };
        state.records.push(record.clone());
        record
    }

    pub fn fail_with(&self, failure: ScriptedFailure) {
        self.state.lock().unwrap().failure = Some(failure);
    }

    pub fn records(&self) -> Vec<AvailabilityRecord> {
        self.state.lock().unwrap().records.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }
}

#[async_trait]
impl AvailabilityStorage for MemoryAvailabilityStorage {
    async fn list_availability(
        &self,
        teacher_id: TeacherId,
    ) -> StorageResult<Vec<AvailabilityRecord>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("list {}", teacher_id));
        if state.failure == Some(ScriptedFailure::ListFails) {
            return Err(StorageError::Corrupt("scripted list failure".to_string()));
        }
        Ok(state
            .records
            .iter()
            .filter(|record| record.teacher_id == teacher_id)
            .cloned()
            .collect())
    }

    async fn create_availability(
        &self,
        teacher_id: TeacherId,
        day: DayOfWeek,
        start: NaiveTime,
        end: NaiveTime,
    ) -> StorageResult<AvailabilityRecord> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("create {}", day));

        let overlaps = state.records.iter().any(|record| {
            record.teacher_id == teacher_id
                && record.day == day
                && record.active
                && record.start_time < end
                && record.end_time > start
        });
        if overlaps || state.failure == Some(ScriptedFailure::ConflictOnCreate) {
            return Err(StorageError::Conflict {
                teacher_id,
                day,
                start,
                end,
            });
        }

        state.next_id += 1;
        let record = AvailabilityRecord {
            id: state.next_id,
            teacher_id,
            day,
            start_time: start,
            end_time: end,
            active: true,
        };
        state.records.push(record.clone());
        Ok(record)
    }

    async fn update_availability(
        &self,
        teacher_id: TeacherId,
        id: AvailabilityId,
        day: DayOfWeek,
        start: NaiveTime,
        end: NaiveTime,
    ) -> StorageResult<AvailabilityRecord> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("update {}", id));

        let record = state
            .records
            .iter_mut()
            .find(|record| record.id == id && record.teacher_id == teacher_id)
            .ok_or(StorageError::NotFound(id))?;
        record.day = day;
        record.start_time = start;
        record.end_time = end;
        record.active = true;
        Ok(record.clone())
    }

    async fn delete_availability(
        &self,
        teacher_id: TeacherId,
        id: AvailabilityId,
    ) -> StorageResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("delete {}", id));

        if state.failure == Some(ScriptedFailure::DependencyOnDelete(id)) {
            return Err(StorageError::Dependency { id, assignments: 1 });
        }
        let before = state.records.len();
        state
            .records
            .retain(|record| record.id != id || record.teacher_id != teacher_id);
        if state.records.len() == before {
            return Err(StorageError::NotFound(id));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTeacherStorage {
    loads: HashMap<TeacherId, WeeklyLoad>,
}

impl MemoryTeacherStorage {
    pub fn with_teacher(mut self, teacher_id: TeacherId, load: WeeklyLoad) -> Self {
        self.loads.insert(teacher_id, load);
        self
    }
}

#[async_trait]
impl TeacherStorage for MemoryTeacherStorage {
    async fn get_weekly_load(&self, teacher_id: TeacherId) -> StorageResult<Option<WeeklyLoad>> {
        Ok(self.loads.get(&teacher_id).copied())
    }
}
