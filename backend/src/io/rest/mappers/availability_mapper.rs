use chrono::NaiveTime;
use shared::{
    AvailabilityRecord as AvailabilityRecordDto, DayOfWeek, GridLayoutResponse, GridSlot,
    QuotaSummaryDto, SaveAvailabilityResponse, SaveFailureResponse, SelectionDto,
};

use crate::domain::commands::availability::SaveOutcome;
use crate::domain::models::{AvailabilityRecord, GridCell, Selection};
use crate::domain::plan_executor::PlanExecutionError;
use crate::domain::quota::QuotaSummary;
use crate::domain::time_grid::{InvalidRangeError, TimeGrid};

const TIME_FORMAT: &str = "%H:%M:%S";

pub struct AvailabilityMapper;

impl AvailabilityMapper {
    pub fn time_to_dto(time: NaiveTime) -> String {
        time.format(TIME_FORMAT).to_string()
    }

    /// Parse a wire time; `HH:MM` is accepted as well as `HH:MM:SS`
    pub fn time_to_domain(value: &str) -> Result<NaiveTime, String> {
        NaiveTime::parse_from_str(value, TIME_FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
            .map_err(|_| format!("Invalid time '{}', expected HH:MM:SS", value))
    }

    /// Every submitted cell must lie on the grid
    pub fn selection_to_domain(
        dto: &SelectionDto,
        grid: &TimeGrid,
    ) -> Result<Selection, InvalidRangeError> {
        let mut cells = Vec::new();
        for (day, slots) in dto {
            for slot in slots {
                grid.cell_to_clock(*day, *slot)?;
                cells.push(GridCell::new(*day, *slot));
            }
        }
        Ok(cells.into_iter().collect())
    }

    pub fn selection_to_dto(selection: &Selection) -> SelectionDto {
        selection
            .days()
            .map(|(day, slots)| (day, slots.iter().copied().collect()))
            .collect()
    }

    pub fn record_to_dto(record: &AvailabilityRecord) -> AvailabilityRecordDto {
        AvailabilityRecordDto {
            id: record.id,
            teacher_id: record.teacher_id,
            day: record.day,
            start_time: Self::time_to_dto(record.start_time),
            end_time: Self::time_to_dto(record.end_time),
            active: record.active,
        }
    }

    pub fn record_to_domain(dto: &AvailabilityRecordDto) -> Result<AvailabilityRecord, String> {
        Ok(AvailabilityRecord {
            id: dto.id,
            teacher_id: dto.teacher_id,
            day: dto.day,
            start_time: Self::time_to_domain(&dto.start_time)?,
            end_time: Self::time_to_domain(&dto.end_time)?,
            active: dto.active,
        })
    }

    pub fn to_dto_list(records: &[AvailabilityRecord]) -> Vec<AvailabilityRecordDto> {
        records.iter().map(Self::record_to_dto).collect()
    }

    pub fn to_domain_list(
        records: &[AvailabilityRecordDto],
    ) -> Result<Vec<AvailabilityRecord>, String> {
        records.iter().map(Self::record_to_domain).collect()
    }

    pub fn summary_to_dto(summary: &QuotaSummary) -> QuotaSummaryDto {
        QuotaSummaryDto {
            registered_hours: summary.registered_hours,
            missing_hours: summary.missing_hours,
            completion_ratio: summary.completion_ratio,
            progress: summary.progress,
            status_message: summary.status_message(),
            can_save: summary.can_persist,
        }
    }

    pub fn grid_to_dto(grid: &TimeGrid) -> GridLayoutResponse {
        GridLayoutResponse {
            days: DayOfWeek::ALL.to_vec(),
            slots: grid
                .slot_labels()
                .into_iter()
                .map(|(slot_index, start, end)| GridSlot {
                    slot_index,
                    start_time: Self::time_to_dto(start),
                    end_time: Self::time_to_dto(end),
                })
                .collect(),
            slot_minutes: grid.slot_minutes(),
        }
    }

    pub fn to_save_response(outcome: &SaveOutcome) -> SaveAvailabilityResponse {
        let success_message = if outcome.total_operations() == 0 {
            "Availability unchanged".to_string()
        } else {
            format!(
                "Availability saved: {} created, {} updated, {} deleted",
                outcome.created, outcome.updated, outcome.deleted
            )
        };

        SaveAvailabilityResponse {
            created: outcome.created,
            updated: outcome.updated,
            deleted: outcome.deleted,
            registered_hours: outcome.registered_hours,
            records: Self::to_dto_list(&outcome.final_records),
            success_message,
        }
    }

    pub fn to_save_failure_response(
        failure: &PlanExecutionError,
        reloaded_records: Option<&[AvailabilityRecord]>,
        message: String,
    ) -> SaveFailureResponse {
        SaveFailureResponse {
            message,
            created: failure.completed.created,
            updated: failure.completed.updated,
            deleted: failure.completed.deleted,
            records: reloaded_records.map(Self::to_dto_list),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quota::QuotaTracker;

    #[test]
    fn test_selection_mapping() {
        let mut dto = SelectionDto::new();
        dto.insert(DayOfWeek::Monday, vec![2, 0, 1, 1]);
        dto.insert(DayOfWeek::Friday, Vec::new());

        let grid = TimeGrid::default();
        let selection = AvailabilityMapper::selection_to_domain(&dto, &grid).unwrap();
        assert_eq!(selection.slot_count(), 3);

        let back = AvailabilityMapper::selection_to_dto(&selection);
        assert_eq!(back.len(), 1);
        assert_eq!(back[&DayOfWeek::Monday], vec![0, 1, 2]);
    }

    #[test]
    fn test_selection_outside_grid_is_rejected() {
        let mut dto = SelectionDto::new();
        dto.insert(DayOfWeek::Monday, vec![0, 200]);

        let err = AvailabilityMapper::selection_to_domain(&dto, &TimeGrid::default()).unwrap_err();
        assert!(matches!(
            err,
            InvalidRangeError::SlotOutOfBounds { slot_index: 200, .. }
        ));
    }

    #[test]
    fn test_record_times() {
        let dto = AvailabilityRecordDto {
            id: 4,
            teacher_id: 1,
            day: DayOfWeek::Thursday,
            start_time: "07:45".to_string(),
            end_time: "09:15:00".to_string(),
            active: true,
        };

        let record = AvailabilityMapper::record_to_domain(&dto).unwrap();
        assert_eq!(record.start_time, NaiveTime::from_hms_opt(7, 45, 0).unwrap());

        let back = AvailabilityMapper::record_to_dto(&record);
        assert_eq!(back.start_time, "07:45:00");
        assert_eq!(back.end_time, "09:15:00");

        let bad = AvailabilityRecordDto {
            start_time: "quarter past".to_string(),
            ..dto
        };
        assert!(AvailabilityMapper::record_to_domain(&bad).is_err());
    }

    #[test]
    fn test_grid_layout() {
        let layout = AvailabilityMapper::grid_to_dto(&TimeGrid::default());
        assert_eq!(layout.days.len(), 6);
        assert_eq!(layout.slots.len(), 18);
        assert_eq!(layout.slots[0].start_time, "07:00:00");
        assert_eq!(layout.slots[17].end_time, "20:30:00");
        assert_eq!(layout.slot_minutes, 45);
    }

    #[test]
    fn test_summary_mapping() {
        let grid = TimeGrid::default();
        let selection: Selection =
            (0..4).map(|slot| GridCell::new(DayOfWeek::Monday, slot)).collect();
        let summary = QuotaTracker::new(3.0, &grid).summarize(&selection);

        let dto = AvailabilityMapper::summary_to_dto(&summary);
        assert_eq!(dto.registered_hours, 3.0);
        assert_eq!(dto.missing_hours, 0.0);
        assert!(dto.can_save);
        assert_eq!(dto.status_message, summary.status_message());
    }
}
