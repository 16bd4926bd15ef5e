//! # Edit Session
//!
//! Everything one teacher's availability editor works with: the quota, the
//! records loaded from storage and the current selection. A session is an
//! immutable value; each transition returns a new session.

use shared::DayOfWeek;

use crate::domain::errors::AvailabilityError;
use crate::domain::models::{AvailabilityRecord, GridCell, Selection, TeacherId};
use crate::domain::quota::{QuotaSummary, QuotaTracker};
use crate::domain::time_grid::{InvalidRangeError, TimeGrid};

/// Toggle one cell of a selection.
///
/// Removal is unconditional. Insertion is refused with `QuotaExceeded` when
/// the slot would push the selection past the weekly load.
pub fn toggle_cell(
    selection: &Selection,
    quota: &QuotaTracker,
    grid: &TimeGrid,
    day: DayOfWeek,
    slot_index: u8,
) -> Result<Selection, AvailabilityError> {
    grid.cell_to_clock(day, slot_index)?;

    if selection.contains(day, slot_index) {
        return Ok(selection.without_slot(day, slot_index));
    }

    if !quota.can_add(selection, day, slot_index) {
        return Err(AvailabilityError::QuotaExceeded {
            day,
            slot_index,
            registered_hours: quota.hours_for(selection),
            required_hours: quota.required_weekly_hours(),
        });
    }

    Ok(selection.with_slot(day, slot_index))
}

/// Selection covered by the active records
pub fn selection_from_records(
    records: &[AvailabilityRecord],
    grid: &TimeGrid,
) -> Result<Selection, InvalidRangeError> {
    let mut cells = Vec::new();
    for record in records.iter().filter(|record| record.active) {
        let slots = grid.cells_for(&record.range())?;
        cells.extend(slots.into_iter().map(|slot| GridCell::new(record.day, slot)));
    }
    Ok(cells.into_iter().collect())
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    teacher_id: TeacherId,
    required_weekly_hours: f64,
    prior_records: Vec<AvailabilityRecord>,
    selection: Selection,
}

impl EditSession {
    pub fn new(
        teacher_id: TeacherId,
        required_weekly_hours: f64,
        prior_records: Vec<AvailabilityRecord>,
        selection: Selection,
    ) -> Self {
        Self {
            teacher_id,
            required_weekly_hours,
            prior_records,
            selection,
        }
    }

    /// Session whose selection is seeded from the persisted records
    pub fn from_records(
        teacher_id: TeacherId,
        required_weekly_hours: f64,
        records: Vec<AvailabilityRecord>,
        grid: &TimeGrid,
    ) -> Result<Self, InvalidRangeError> {
        let selection = selection_from_records(&records, grid)?;
        Ok(Self::new(teacher_id, required_weekly_hours, records, selection))
    }

    pub fn teacher_id(&self) -> TeacherId {
        self.teacher_id
    }

    pub fn required_weekly_hours(&self) -> f64 {
        self.required_weekly_hours
    }

    pub fn prior_records(&self) -> &[AvailabilityRecord] {
        &self.prior_records
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn quota(&self, grid: &TimeGrid) -> QuotaTracker {
        QuotaTracker::new(self.required_weekly_hours, grid)
    }

    pub fn summary(&self, grid: &TimeGrid) -> QuotaSummary {
        self.quota(grid).summarize(&self.selection)
    }

    pub fn toggle(
        &self,
        day: DayOfWeek,
        slot_index: u8,
        grid: &TimeGrid,
    ) -> Result<Self, AvailabilityError> {
        let selection = toggle_cell(&self.selection, &self.quota(grid), grid, day, slot_index)?;
        Ok(Self {
            selection,
            ..self.clone()
        })
    }

    /// After a successful save: the stored records become the new baseline
    /// and the selection is rebuilt from them.
    pub fn reseeded(
        &self,
        records: Vec<AvailabilityRecord>,
        grid: &TimeGrid,
    ) -> Result<Self, InvalidRangeError> {
        Self::from_records(self.teacher_id, self.required_weekly_hours, records, grid)
    }

    /// After a failed save: the stored records become the new baseline while
    /// the user's selection stays on screen.
    pub fn resynchronized(&self, records: Vec<AvailabilityRecord>) -> Self {
        Self {
            prior_records: records,
            ..self.clone()
        }
    }
}
