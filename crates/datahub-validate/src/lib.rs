//! Identity parsing, the five-check validation pipeline, and the daily
//! arrival check.

pub mod checks;
pub mod identity;
pub mod pipeline;
pub mod schedule;

pub use identity::identify;
pub use pipeline::{validate, validate_object};
pub use schedule::{check_schedule, expected_keys};
