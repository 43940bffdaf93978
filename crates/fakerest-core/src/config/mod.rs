//! Fixture files: models, seed records and mocks declared in YAML/JSON/JSONC.

pub mod error;
pub mod fixture;
pub mod parser;
