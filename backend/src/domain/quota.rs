//! # Quota Tracker
//!
//! Gates how many slots a teacher may select and reports progress against
//! the required weekly load. Everything here is derived from the selection
//! and the required hours; nothing is stored.
//!
//! Hours are compared after rounding to two decimals so that sums of 0.75
//! never trip over binary floating point.

use shared::{DayOfWeek, QuotaProgress};

use crate::domain::models::Selection;
use crate::domain::time_grid::TimeGrid;

/// A selection may be saved when it is at most this many hours short of the quota
pub const PERSIST_SLACK_HOURS: f64 = 1.0;

const COMPLETE_RATIO: f64 = 0.95;
const NEARLY_COMPLETE_RATIO: f64 = 0.80;

/// Round decimal hours to two places
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuotaStatus {
    /// No slot selected
    Empty,
    /// Selection covers the full weekly load
    Fulfilled,
    /// Short of the load, but within the saving slack
    WithinSlack { missing_hours: f64 },
    Missing { missing_hours: f64 },
}

impl QuotaStatus {
    pub fn message(&self, required_weekly_hours: f64) -> String {
        match self {
            QuotaStatus::Empty => "No hours registered".to_string(),
            QuotaStatus::Fulfilled => "Complete: all weekly teaching hours are covered".to_string(),
            QuotaStatus::WithinSlack { missing_hours } => format!(
                "Almost complete: {:.2} hours left to cover",
                missing_hours
            ),
            QuotaStatus::Missing { missing_hours } => format!(
                "{:.2} of the {:.2} required hours are still missing",
                missing_hours, required_weekly_hours
            ),
        }
    }
}

/// Quota figures for one selection
#[derive(Debug, Clone, PartialEq)]
pub struct QuotaSummary {
    pub required_weekly_hours: f64,
    pub registered_hours: f64,
    pub missing_hours: f64,
    pub completion_ratio: f64,
    pub progress: QuotaProgress,
    pub status: QuotaStatus,
    pub can_persist: bool,
}

impl QuotaSummary {
    pub fn status_message(&self) -> String {
        self.status.message(self.required_weekly_hours)
    }
}

/// Quota rules for one teacher
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotaTracker {
    required_weekly_hours: f64,
    slot_hours: f64,
}

impl QuotaTracker {
    pub fn new(required_weekly_hours: f64, grid: &TimeGrid) -> Self {
        Self {
            required_weekly_hours: round_hours(required_weekly_hours.max(0.0)),
            slot_hours: grid.slot_hours(),
        }
    }

    pub fn required_weekly_hours(&self) -> f64 {
        self.required_weekly_hours
    }

    /// Hours represented by the selected slots
    pub fn hours_for(&self, selection: &Selection) -> f64 {
        round_hours(selection.slot_count() as f64 * self.slot_hours)
    }

    /// Whether one more slot still fits in the weekly load.
    /// Re-selecting an already selected slot changes nothing and is allowed.
    pub fn can_add(&self, selection: &Selection, day: DayOfWeek, slot_index: u8) -> bool {
        if selection.contains(day, slot_index) {
            return true;
        }
        round_hours(self.hours_for(selection) + self.slot_hours) <= self.required_weekly_hours
    }

    /// Whether the selection may be saved: something is selected and it is
    /// at most one hour short of the quota.
    pub fn can_persist(&self, selection: &Selection) -> bool {
        let registered = self.hours_for(selection);
        registered > 0.0
            && round_hours(self.required_weekly_hours - registered) <= PERSIST_SLACK_HOURS
    }

    /// Smallest number of hours accepted by `can_persist`
    pub fn minimum_persistable_hours(&self) -> f64 {
        round_hours((self.required_weekly_hours - PERSIST_SLACK_HOURS).max(0.0))
    }

    pub fn summarize(&self, selection: &Selection) -> QuotaSummary {
        let registered_hours = self.hours_for(selection);
        let missing_hours = round_hours((self.required_weekly_hours - registered_hours).max(0.0));
        let completion_ratio = if self.required_weekly_hours > 0.0 {
            (registered_hours / self.required_weekly_hours).min(1.0)
        } else {
            0.0
        };

        let progress = if completion_ratio >= COMPLETE_RATIO {
            QuotaProgress::Complete
        } else if completion_ratio >= NEARLY_COMPLETE_RATIO {
            QuotaProgress::NearlyComplete
        } else {
            QuotaProgress::Incomplete
        };

        let status = if registered_hours == 0.0 {
            QuotaStatus::Empty
        } else if missing_hours == 0.0 {
            QuotaStatus::Fulfilled
        } else if missing_hours <= PERSIST_SLACK_HOURS {
            QuotaStatus::WithinSlack { missing_hours }
        } else {
            QuotaStatus::Missing { missing_hours }
        };

        QuotaSummary {
            required_weekly_hours: self.required_weekly_hours,
            registered_hours,
            missing_hours,
            completion_ratio,
            progress,
            status,
            can_persist: self.can_persist(selection),
        }
    }
}
