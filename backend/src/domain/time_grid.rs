//! # Time Grid
//!
//! Single source of truth for the quantization of the teaching week.
//!
//! The week is six working days (Monday to Saturday). Each day is split into
//! `slots_per_day` slots of `slot_minutes` minutes starting at `start`. A slot
//! is addressed by `(day, slot_index)` and its clock times are derived from
//! the index alone.

use chrono::{Duration, NaiveTime, Timelike};
use shared::DayOfWeek;
use thiserror::Error;

use crate::domain::models::TimeRange;

/// First slot of the day starts at 07:00
pub const GRID_START_HOUR: u32 = 7;
/// One academic hour
pub const SLOT_MINUTES: u32 = 45;
pub const SLOTS_PER_DAY: u8 = 18;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Malformed slot or clock input for grid conversions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidRangeError {
    #[error("slot {slot_index} on {day} is outside the grid ({slots_per_day} slots per day)")]
    SlotOutOfBounds {
        day: DayOfWeek,
        slot_index: u8,
        slots_per_day: u8,
    },

    #[error("range {day} {start}-{end} is empty: end must be after start")]
    EmptyRange {
        day: DayOfWeek,
        start: NaiveTime,
        end: NaiveTime,
    },

    #[error("{time} on {day} is not aligned to a {slot_minutes}-minute slot boundary")]
    Misaligned {
        day: DayOfWeek,
        time: NaiveTime,
        slot_minutes: u32,
    },

    #[error("range {day} {start}-{end} lies outside the grid")]
    OutsideGrid {
        day: DayOfWeek,
        start: NaiveTime,
        end: NaiveTime,
    },

    #[error("invalid grid configuration: {0}")]
    InvalidGrid(String),
}

/// Quantized weekly grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeGrid {
    start_minutes: u32,
    slot_minutes: u32,
    slots_per_day: u8,
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self {
            start_minutes: GRID_START_HOUR * 60,
            slot_minutes: SLOT_MINUTES,
            slots_per_day: SLOTS_PER_DAY,
        }
    }
}

impl TimeGrid {
    /// Build a custom grid. The last slot must end before midnight.
    pub fn new(
        start: NaiveTime,
        slot_minutes: u32,
        slots_per_day: u8,
    ) -> Result<Self, InvalidRangeError> {
        if slot_minutes == 0 {
            return Err(InvalidRangeError::InvalidGrid(
                "slot duration must be positive".to_string(),
            ));
        }
        if slots_per_day == 0 {
            return Err(InvalidRangeError::InvalidGrid(
                "a day needs at least one slot".to_string(),
            ));
        }
        if start.second() != 0 || start.nanosecond() != 0 {
            return Err(InvalidRangeError::InvalidGrid(
                "grid start must be a whole minute".to_string(),
            ));
        }

        let start_minutes = start.hour() * 60 + start.minute();
        let end_minutes = slot_minutes
            .checked_mul(slots_per_day as u32)
            .and_then(|day_minutes| day_minutes.checked_add(start_minutes))
            .unwrap_or(u32::MAX);
        if end_minutes >= MINUTES_PER_DAY {
            return Err(InvalidRangeError::InvalidGrid(format!(
                "{} slots of {} minutes from {} run past midnight",
                slots_per_day,
                slot_minutes,
                start.format("%H:%M")
            )));
        }

        Ok(Self {
            start_minutes,
            slot_minutes,
            slots_per_day,
        })
    }

    pub fn start(&self) -> NaiveTime {
        minutes_to_time(self.start_minutes)
    }

    pub fn end(&self) -> NaiveTime {
        minutes_to_time(self.end_minutes())
    }

    pub fn slot_minutes(&self) -> u32 {
        self.slot_minutes
    }

    pub fn slots_per_day(&self) -> u8 {
        self.slots_per_day
    }

    /// Duration of one slot in decimal hours (0.75 for 45 minutes)
    pub fn slot_hours(&self) -> f64 {
        self.slot_minutes as f64 / 60.0
    }

    /// Wall-clock start and end of a slot
    pub fn cell_to_clock(
        &self,
        day: DayOfWeek,
        slot_index: u8,
    ) -> Result<(NaiveTime, NaiveTime), InvalidRangeError> {
        if slot_index >= self.slots_per_day {
            return Err(InvalidRangeError::SlotOutOfBounds {
                day,
                slot_index,
                slots_per_day: self.slots_per_day,
            });
        }
        let start = self.start_minutes + slot_index as u32 * self.slot_minutes;
        Ok((minutes_to_time(start), minutes_to_time(start + self.slot_minutes)))
    }

    /// Slot indices covered by a clock range, ascending
    pub fn clock_to_cells(
        &self,
        day: DayOfWeek,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Vec<u8>, InvalidRangeError> {
        if end <= start {
            return Err(InvalidRangeError::EmptyRange { day, start, end });
        }

        let start_minutes = self.aligned_minutes(day, start)?;
        let end_minutes = self.aligned_minutes(day, end)?;
        if start_minutes < self.start_minutes || end_minutes > self.end_minutes() {
            return Err(InvalidRangeError::OutsideGrid { day, start, end });
        }

        let first = (start_minutes - self.start_minutes) / self.slot_minutes;
        let last = (end_minutes - self.start_minutes) / self.slot_minutes;
        Ok((first..last).map(|slot| slot as u8).collect())
    }

    /// Slot indices covered by a range
    pub fn cells_for(&self, range: &TimeRange) -> Result<Vec<u8>, InvalidRangeError> {
        self.clock_to_cells(range.day, range.start_time, range.end_time)
    }

    /// Clock layout of one day: `(slot_index, start, end)` for every slot
    pub fn slot_labels(&self) -> Vec<(u8, NaiveTime, NaiveTime)> {
        (0..self.slots_per_day)
            .map(|slot| {
                let start = self.start_minutes + slot as u32 * self.slot_minutes;
                (
                    slot,
                    minutes_to_time(start),
                    minutes_to_time(start + self.slot_minutes),
                )
            })
            .collect()
    }

    fn end_minutes(&self) -> u32 {
        self.start_minutes + self.slot_minutes * self.slots_per_day as u32
    }

    fn aligned_minutes(&self, day: DayOfWeek, time: NaiveTime) -> Result<u32, InvalidRangeError> {
        let minutes = time.hour() * 60 + time.minute();
        let whole_minute = time.second() == 0 && time.nanosecond() == 0;
        let on_boundary = minutes >= self.start_minutes
            && (minutes - self.start_minutes) % self.slot_minutes == 0;

        if whole_minute && (on_boundary || minutes < self.start_minutes) {
            Ok(minutes)
        } else {
            Err(InvalidRangeError::Misaligned {
                day,
                time,
                slot_minutes: self.slot_minutes,
            })
        }
    }
}

fn minutes_to_time(minutes: u32) -> NaiveTime {
    NaiveTime::default() + Duration::minutes(minutes as i64)
}
