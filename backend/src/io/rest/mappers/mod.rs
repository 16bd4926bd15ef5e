//! Conversions between the `shared` DTOs and the domain types.

pub mod availability_mapper;
pub mod teacher_mapper;

pub use availability_mapper::AvailabilityMapper;
pub use teacher_mapper::TeacherMapper;
