//! # Reconciliation Planner
//!
//! Diffs freshly compacted ranges against the records loaded at the start of
//! the edit session and produces the create/update/delete operations that
//! bring persisted state in line with the selection.
//!
//! Identifiers are preserved whenever a new range can be paired with a prior
//! record of the same day, so downstream references to that record survive.
//! Pairing is first-found in persisted order, never best-fit, and a prior
//! record is paired at most once.

use std::fmt;
use std::str::FromStr;

use crate::domain::models::{AvailabilityId, AvailabilityRecord, TimeRange};

/// How a new range is paired with a prior record of the same day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// `stored.start >= new.start || stored.end <= new.end`.
    /// Looser than interval overlap; keeps the behavior existing data was
    /// written with.
    #[default]
    Compatible,
    /// `stored.start < new.end && stored.end > new.start`
    StrictOverlap,
}

impl MatchPolicy {
    pub fn matches(&self, stored: &AvailabilityRecord, range: &TimeRange) -> bool {
        if stored.day != range.day {
            return false;
        }
        match self {
            MatchPolicy::Compatible => {
                stored.start_time >= range.start_time || stored.end_time <= range.end_time
            }
            MatchPolicy::StrictOverlap => {
                stored.start_time < range.end_time && stored.end_time > range.start_time
            }
        }
    }
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compatible" => Ok(MatchPolicy::Compatible),
            "strict" | "strict_overlap" => Ok(MatchPolicy::StrictOverlap),
            other => Err(format!(
                "unknown match policy '{}', expected 'compatible' or 'strict'",
                other
            )),
        }
    }
}

/// New boundaries for a record that keeps its identifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeUpdate {
    pub id: AvailabilityId,
    pub range: TimeRange,
    /// The stored boundaries already equal `range`
    pub unchanged: bool,
}

/// A single persistence operation of a plan
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlanOperation {
    Delete { id: AvailabilityId },
    Update(RangeUpdate),
    Create { range: TimeRange },
}

impl fmt::Display for PlanOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanOperation::Delete { id } => write!(f, "delete availability {}", id),
            PlanOperation::Update(update) if update.unchanged => {
                write!(f, "update availability {} to {} (unchanged)", update.id, update.range)
            }
            PlanOperation::Update(update) => {
                write!(f, "update availability {} to {}", update.id, update.range)
            }
            PlanOperation::Create { range } => write!(f, "create availability {}", range),
        }
    }
}

/// Operations needed for one save, grouped by kind
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReconciliationPlan {
    pub deletes: Vec<AvailabilityId>,
    pub updates: Vec<RangeUpdate>,
    pub creates: Vec<TimeRange>,
}

impl ReconciliationPlan {
    /// All operations in execution order: deletes, then updates, then creates
    pub fn operations(&self) -> Vec<PlanOperation> {
        self.deletes
            .iter()
            .map(|id| PlanOperation::Delete { id: *id })
            .chain(self.updates.iter().copied().map(PlanOperation::Update))
            .chain(self.creates.iter().map(|range| PlanOperation::Create { range: *range }))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.deletes.len() + self.updates.len() + self.creates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReconciliationPlanner {
    policy: MatchPolicy,
}

impl ReconciliationPlanner {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn plan(
        &self,
        prior_records: &[AvailabilityRecord],
        new_ranges: &[TimeRange],
    ) -> ReconciliationPlan {
        let mut matched = vec![false; prior_records.len()];
        let mut plan = ReconciliationPlan::default();

        for range in new_ranges {
            let candidate = prior_records
                .iter()
                .enumerate()
                .find(|(index, record)| !matched[*index] && self.policy.matches(record, range));

            match candidate {
                Some((index, record)) => {
                    matched[index] = true;
                    plan.updates.push(RangeUpdate {
                        id: record.id,
                        range: *range,
                        unchanged: record.range() == *range && record.active,
                    });
                }
                None => plan.creates.push(*range),
            }
        }

        plan.deletes = prior_records
            .iter()
            .zip(&matched)
            .filter(|(_, matched)| !**matched)
            .map(|(record, _)| record.id)
            .collect();

        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use shared::DayOfWeek;
    use std::collections::HashSet;

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn record(id: i64, day: DayOfWeek, start: NaiveTime, end: NaiveTime) -> AvailabilityRecord {
        AvailabilityRecord {
            id,
            teacher_id: 1,
            day,
            start_time: start,
            end_time: end,
            active: true,
        }
    }

    fn range(day: DayOfWeek, start: NaiveTime, end: NaiveTime) -> TimeRange {
        TimeRange::new(day, start, end)
    }

    #[test]
    fn test_no_new_ranges_deletes_everything() {
        let prior = vec![record(7, DayOfWeek::Tuesday, hm(7, 0), hm(7, 45))];
        let plan = ReconciliationPlanner::default().plan(&prior, &[]);

        assert_eq!(plan.deletes, vec![7]);
        assert!(plan.updates.is_empty());
        assert!(plan.creates.is_empty());
        assert_eq!(plan.operations(), vec![PlanOperation::Delete { id: 7 }]);
    }

    #[test]
    fn test_no_prior_records_creates_everything() {
        let ranges = vec![
            range(DayOfWeek::Monday, hm(7, 0), hm(8, 30)),
            range(DayOfWeek::Monday, hm(10, 45), hm(12, 15)),
        ];
        let plan = ReconciliationPlanner::default().plan(&[], &ranges);

        assert_eq!(plan.creates, ranges);
        assert!(plan.updates.is_empty());
        assert!(plan.deletes.is_empty());
    }

    #[test]
    fn test_extended_range_keeps_identifier() {
        let prior = vec![record(3, DayOfWeek::Monday, hm(7, 0), hm(8, 30))];
        let ranges = vec![range(DayOfWeek::Monday, hm(7, 0), hm(9, 15))];
        let plan = ReconciliationPlanner::default().plan(&prior, &ranges);

        assert_eq!(
            plan.updates,
            vec![RangeUpdate {
                id: 3,
                range: ranges[0],
                unchanged: false,
            }]
        );
        assert!(plan.creates.is_empty());
        assert!(plan.deletes.is_empty());
    }

    #[test]
    fn test_identical_range_is_flagged_unchanged() {
        let prior = vec![record(3, DayOfWeek::Monday, hm(7, 0), hm(8, 30))];
        let ranges = vec![range(DayOfWeek::Monday, hm(7, 0), hm(8, 30))];
        let plan = ReconciliationPlanner::default().plan(&prior, &ranges);

        assert_eq!(plan.updates.len(), 1);
        assert!(plan.updates[0].unchanged);
    }

    #[test]
    fn test_other_day_never_matches() {
        let prior = vec![record(3, DayOfWeek::Monday, hm(7, 0), hm(8, 30))];
        let ranges = vec![range(DayOfWeek::Tuesday, hm(7, 0), hm(8, 30))];
        let plan = ReconciliationPlanner::default().plan(&prior, &ranges);

        assert_eq!(plan.creates, ranges);
        assert_eq!(plan.deletes, vec![3]);
    }

    #[test]
    fn test_compatible_policy_matches_disjoint_ranges() {
        // Stored range ends before the new one: no intersection, still paired
        let prior = vec![record(4, DayOfWeek::Monday, hm(7, 0), hm(7, 45))];
        let ranges = vec![range(DayOfWeek::Monday, hm(13, 0), hm(14, 30))];

        let compatible = ReconciliationPlanner::new(MatchPolicy::Compatible).plan(&prior, &ranges);
        assert_eq!(compatible.updates.len(), 1);
        assert!(compatible.deletes.is_empty());

        let strict = ReconciliationPlanner::new(MatchPolicy::StrictOverlap).plan(&prior, &ranges);
        assert!(strict.updates.is_empty());
        assert_eq!(strict.creates, ranges);
        assert_eq!(strict.deletes, vec![4]);
    }

    #[test]
    fn test_first_found_wins_and_surplus_is_deleted() {
        let prior = vec![
            record(10, DayOfWeek::Wednesday, hm(7, 0), hm(7, 45)),
            record(11, DayOfWeek::Wednesday, hm(8, 30), hm(9, 15)),
        ];
        let ranges = vec![range(DayOfWeek::Wednesday, hm(7, 0), hm(9, 15))];
        let plan = ReconciliationPlanner::default().plan(&prior, &ranges);

        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].id, 10);
        assert_eq!(plan.deletes, vec![11]);
    }

    #[test]
    fn test_prior_record_is_paired_once() {
        let prior = vec![record(20, DayOfWeek::Friday, hm(7, 0), hm(7, 45))];
        let ranges = vec![
            range(DayOfWeek::Friday, hm(7, 0), hm(7, 45)),
            range(DayOfWeek::Friday, hm(10, 45), hm(11, 30)),
        ];
        let plan = ReconciliationPlanner::default().plan(&prior, &ranges);

        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.creates, vec![ranges[1]]);
        assert!(plan.deletes.is_empty());
    }

    #[test]
    fn test_operations_are_ordered_delete_update_create() {
        let prior = vec![
            record(1, DayOfWeek::Monday, hm(7, 0), hm(7, 45)),
            record(2, DayOfWeek::Thursday, hm(7, 0), hm(7, 45)),
        ];
        let ranges = vec![
            range(DayOfWeek::Monday, hm(7, 0), hm(8, 30)),
            range(DayOfWeek::Saturday, hm(7, 0), hm(8, 30)),
        ];
        let operations = ReconciliationPlanner::default().plan(&prior, &ranges).operations();

        assert!(matches!(operations[0], PlanOperation::Delete { id: 2 }));
        assert!(matches!(operations[1], PlanOperation::Update(RangeUpdate { id: 1, .. })));
        assert!(matches!(operations[2], PlanOperation::Create { .. }));
    }

    #[test]
    fn test_every_record_and_range_is_classified_once() {
        let prior = vec![
            record(1, DayOfWeek::Monday, hm(7, 0), hm(8, 30)),
            record(2, DayOfWeek::Monday, hm(10, 45), hm(12, 15)),
            record(3, DayOfWeek::Tuesday, hm(7, 0), hm(7, 45)),
            record(4, DayOfWeek::Saturday, hm(13, 0), hm(14, 30)),
            record(5, DayOfWeek::Saturday, hm(15, 15), hm(16, 0)),
        ];
        let ranges = vec![
            range(DayOfWeek::Monday, hm(7, 0), hm(9, 15)),
            range(DayOfWeek::Wednesday, hm(7, 0), hm(7, 45)),
            range(DayOfWeek::Saturday, hm(16, 0), hm(16, 45)),
            range(DayOfWeek::Saturday, hm(17, 30), hm(18, 15)),
        ];

        for policy in [MatchPolicy::Compatible, MatchPolicy::StrictOverlap] {
            let plan = ReconciliationPlanner::new(policy).plan(&prior, &ranges);

            assert_eq!(plan.updates.len() + plan.creates.len(), ranges.len());

            let updated: HashSet<i64> = plan.updates.iter().map(|update| update.id).collect();
            let deleted: HashSet<i64> = plan.deletes.iter().copied().collect();
            assert_eq!(updated.len(), plan.updates.len());
            assert!(updated.is_disjoint(&deleted));
            assert_eq!(updated.len() + deleted.len(), prior.len());
        }
    }

    #[test]
    fn test_match_policy_from_str() {
        assert_eq!("compatible".parse::<MatchPolicy>(), Ok(MatchPolicy::Compatible));
        assert_eq!("Strict".parse::<MatchPolicy>(), Ok(MatchPolicy::StrictOverlap));
        assert!("best-fit".parse::<MatchPolicy>().is_err());
    }
}
