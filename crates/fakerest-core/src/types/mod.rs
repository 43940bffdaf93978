//! Core domain types for records, values and verbs.

pub mod record;
pub mod value;
pub mod verb;
