//! SQLite repositories backed by a shared [`DbConnection`](crate::storage::DbConnection).

pub mod availability_repository;
pub mod teacher_repository;

pub use availability_repository::AvailabilityRepository;
pub use teacher_repository::TeacherRepository;
