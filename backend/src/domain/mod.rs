//! # Domain Layer
//!
//! Business logic of the availability editor:
//!
//! - **time_grid**: the weekly grid of fixed-length slots and clock conversion
//! - **quota**: weekly load gating and progress
//! - **range_compactor**: selected cells to maximal contiguous ranges
//! - **reconciliation**: minimal delete/update/create plan against stored records
//! - **plan_executor**: ordered, fail-fast application of a plan
//! - **edit_session**: immutable editing state of one teacher
//! - **availability_service**: the operations exposed to the presentation layer
//!
//! Everything except the executor and the service is synchronous and pure.

pub mod availability_service;
pub mod commands;
pub mod edit_session;
pub mod errors;
pub mod models;
pub mod plan_executor;
pub mod quota;
pub mod range_compactor;
pub mod reconciliation;
pub mod time_grid;

pub use availability_service::AvailabilityService;
pub use edit_session::EditSession;
pub use errors::AvailabilityError;
pub use plan_executor::{ExecutionSummary, PlanExecutionError, PlanExecutor};
pub use quota::{QuotaStatus, QuotaSummary, QuotaTracker};
pub use reconciliation::{MatchPolicy, PlanOperation, ReconciliationPlan, ReconciliationPlanner};
pub use time_grid::{InvalidRangeError, TimeGrid};
