//! Domain-level command and result types.
//! The REST layer maps the public DTOs of the `shared` crate to these.

pub mod availability {
    use crate::domain::models::{AvailabilityRecord, Selection, TeacherId};

    /// Input for saving a selection
    #[derive(Debug, Clone)]
    pub struct SaveAvailabilityCommand {
        pub teacher_id: TeacherId,
        pub selection: Selection,
        /// Records as loaded when the edit session started
        pub prior_records: Vec<AvailabilityRecord>,
    }

    /// Result of a successful save
    #[derive(Debug, Clone, PartialEq)]
    pub struct SaveOutcome {
        pub created: usize,
        pub updated: usize,
        pub deleted: usize,
        pub registered_hours: f64,
        /// Persisted state read back after the plan was applied
        pub final_records: Vec<AvailabilityRecord>,
    }

    impl SaveOutcome {
        pub fn total_operations(&self) -> usize {
            self.created + self.updated + self.deleted
        }
    }
}
