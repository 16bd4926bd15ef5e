use chrono::NaiveTime;
use shared::DayOfWeek;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub type AvailabilityId = i64;
pub type TeacherId = i64;

/// One quantized slot of the weekly grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridCell {
    pub day: DayOfWeek,
    pub slot_index: u8,
}

impl GridCell {
    pub fn new(day: DayOfWeek, slot_index: u8) -> Self {
        Self { day, slot_index }
    }
}

/// Selected slot indices per day for the teacher being edited.
///
/// Values are never mutated in place: every change produces a new selection.
/// Days without selected slots are not stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    days: BTreeMap<DayOfWeek, BTreeSet<u8>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, day: DayOfWeek, slot_index: u8) -> bool {
        self.days
            .get(&day)
            .map_or(false, |slots| slots.contains(&slot_index))
    }

    /// Copy of this selection with the slot added
    pub fn with_slot(&self, day: DayOfWeek, slot_index: u8) -> Self {
        let mut next = self.clone();
        next.days.entry(day).or_default().insert(slot_index);
        next
    }

    /// Copy of this selection with the slot removed
    pub fn without_slot(&self, day: DayOfWeek, slot_index: u8) -> Self {
        let mut next = self.clone();
        if let Some(slots) = next.days.get_mut(&day) {
            slots.remove(&slot_index);
            if slots.is_empty() {
                next.days.remove(&day);
            }
        }
        next
    }

    /// Selected slots of one day, ascending
    pub fn slots(&self, day: DayOfWeek) -> impl Iterator<Item = u8> + '_ {
        self.days.get(&day).into_iter().flatten().copied()
    }

    /// Days with at least one selected slot, in week order
    pub fn days(&self) -> impl Iterator<Item = (DayOfWeek, &BTreeSet<u8>)> {
        self.days.iter().map(|(day, slots)| (*day, slots))
    }

    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.days()
            .flat_map(|(day, slots)| slots.iter().map(move |slot| GridCell::new(day, *slot)))
    }

    pub fn slot_count(&self) -> usize {
        self.days.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl FromIterator<GridCell> for Selection {
    fn from_iter<I: IntoIterator<Item = GridCell>>(iter: I) -> Self {
        let mut days: BTreeMap<DayOfWeek, BTreeSet<u8>> = BTreeMap::new();
        for cell in iter {
            days.entry(cell.day).or_default().insert(cell.slot_index);
        }
        Self { days }
    }
}

/// Closed range of contiguous slots on one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeRange {
    pub day: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl TimeRange {
    pub fn new(day: DayOfWeek, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            day,
            start_time,
            end_time,
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.day,
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}

/// Persisted availability of a teacher
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityRecord {
    pub id: AvailabilityId,
    pub teacher_id: TeacherId,
    pub day: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub active: bool,
}

impl AvailabilityRecord {
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.day, self.start_time, self.end_time)
    }
}
