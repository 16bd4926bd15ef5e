//! # Range Compactor
//!
//! Merges the selected slots of each day into the minimal ordered list of
//! closed time ranges, and expands ranges back into slots.

use shared::DayOfWeek;

use crate::domain::models::{GridCell, Selection, TimeRange};
use crate::domain::time_grid::{InvalidRangeError, TimeGrid};

/// Compact a selection into ranges ordered by day, then start time.
///
/// Two slots belong to the same range when their indices differ by exactly one.
pub fn compact(
    selection: &Selection,
    grid: &TimeGrid,
) -> Result<Vec<TimeRange>, InvalidRangeError> {
    let mut ranges = Vec::new();

    for (day, slots) in selection.days() {
        let mut sorted: Vec<u8> = slots.iter().copied().collect();
        sorted.sort_unstable();

        let mut slots = sorted.into_iter();
        let Some(first) = slots.next() else {
            continue;
        };

        let (mut start, mut end) = (first, first);
        for slot in slots {
            if slot - end == 1 {
                end = slot;
            } else {
                ranges.push(close_range(grid, day, start, end)?);
                start = slot;
                end = slot;
            }
        }
        ranges.push(close_range(grid, day, start, end)?);
    }

    Ok(ranges)
}

/// Expand ranges back into the slots they cover
pub fn expand(ranges: &[TimeRange], grid: &TimeGrid) -> Result<Selection, InvalidRangeError> {
    let mut cells = Vec::new();
    for range in ranges {
        let slots = grid.cells_for(range)?;
        cells.extend(slots.into_iter().map(|slot| GridCell::new(range.day, slot)));
    }
    Ok(cells.into_iter().collect())
}

fn close_range(
    grid: &TimeGrid,
    day: DayOfWeek,
    start_slot: u8,
    end_slot: u8,
) -> Result<TimeRange, InvalidRangeError> {
    let (start_time, _) = grid.cell_to_clock(day, start_slot)?;
    let (_, end_time) = grid.cell_to_clock(day, end_slot)?;
    Ok(TimeRange::new(day, start_time, end_time))
}
