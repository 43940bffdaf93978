//! Record storage and model definitions.
//!
//! - [`Database`](database::Database): ordered tables of records keyed by model name
//! - [`Model`](model::Model): attribute rules and record construction
//! - [`Registry`](registry::Registry): the context object tying both together

pub mod database;
pub mod model;
pub mod registry;
