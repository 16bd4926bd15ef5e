pub mod availability;
pub mod teacher;

pub use availability::*;
pub use teacher::*;
