use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Working day of the weekly teaching grid (Sunday is not part of the week)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    /// All working days in grid order
    pub const ALL: [DayOfWeek; 6] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
        }
    }

    /// Parse a day from its stored name
    pub fn from_name(name: &str) -> Option<DayOfWeek> {
        DayOfWeek::ALL.iter().copied().find(|day| day.name() == name)
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Selected slot indices per day, as exchanged with the grid UI
pub type SelectionDto = BTreeMap<DayOfWeek, Vec<u8>>;

/// A persisted availability range.
/// Times are 24h clock strings formatted as "HH:MM:SS".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    pub id: i64,
    pub teacher_id: i64,
    pub day: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
    pub active: bool,
}

/// Quota progress bucket used to color the progress bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum QuotaProgress {
    Complete,
    NearlyComplete,
    Incomplete,
}

/// Progress of a selection against the teacher's weekly load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaSummaryDto {
    pub registered_hours: f64,
    pub missing_hours: f64,
    /// Between 0.0 and 1.0
    pub completion_ratio: f64,
    pub progress: QuotaProgress,
    pub status_message: String,
    pub can_save: bool,
}

/// Response for loading a teacher's availability into the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadAvailabilityResponse {
    pub teacher_id: i64,
    pub required_weekly_hours: f64,
    pub records: Vec<AvailabilityRecord>,
    pub selection: SelectionDto,
    pub summary: QuotaSummaryDto,
}

/// Request to toggle one grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleCellRequest {
    pub selection: SelectionDto,
    pub day: DayOfWeek,
    pub slot_index: u8,
}

/// Response after toggling a grid cell.
/// `blocked_notice` is set when the quota prevented the insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleCellResponse {
    pub selection: SelectionDto,
    pub summary: QuotaSummaryDto,
    pub blocked_notice: Option<String>,
}

/// Request for a quota summary of an arbitrary selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub selection: SelectionDto,
}

/// Request to persist the current selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveAvailabilityRequest {
    pub selection: SelectionDto,
    /// Records as they were loaded at the start of the edit session
    pub prior_records: Vec<AvailabilityRecord>,
}

/// Response after a successful save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveAvailabilityResponse {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub registered_hours: f64,
    pub records: Vec<AvailabilityRecord>,
    pub success_message: String,
}

/// Response after a save that failed while applying the plan.
/// `records` holds the reloaded persisted state, when the reload succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFailureResponse {
    pub message: String,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub records: Option<Vec<AvailabilityRecord>>,
}

/// Teacher with the declared weekly teaching load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherProfile {
    pub id: i64,
    pub name: String,
    pub weekly_hours: u32,
    pub weekly_minutes: u32,
    /// Weekly load in decimal hours
    pub required_weekly_hours: f64,
}

/// Request to create or replace a teacher profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertTeacherRequest {
    pub name: String,
    pub weekly_hours: u32,
    pub weekly_minutes: u32,
}

/// One row of the grid layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSlot {
    pub slot_index: u8,
    pub start_time: String,
    pub end_time: String,
}

/// Layout of the weekly grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLayoutResponse {
    pub days: Vec<DayOfWeek>,
    pub slots: Vec<GridSlot>,
    pub slot_minutes: u32,
}
