//! # Storage Module
//!
//! Persistence of teachers and their availability records.
//!
//! The domain layer depends only on the traits in [`traits`]. The SQLite
//! implementation lives in [`repositories`] and shares one [`DbConnection`].
//!
//! ## Schema
//!
//! - `teachers`: declared weekly load (hours and minutes)
//! - `availability`: one row per contiguous range, times stored as `HH:MM:SS`
//! - `assignments`: downstream scheduling rows referencing an availability;
//!   an availability that is still referenced cannot be deleted

pub mod connection;
pub mod repositories;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use connection::DbConnection;
pub use repositories::{AvailabilityRepository, TeacherRepository};
pub use traits::{AvailabilityStorage, StorageError, StorageResult, TeacherStorage};
