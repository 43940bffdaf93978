//! In-memory record store and URL mock dispatcher for stubbing REST resources
//! in behavior-driven tests.
//!
//! Test setup defines models on a [`Registry`], fills their tables through
//! [`Registry::create`] or [`Registry::stub`], and registers [`Mock`]s on a
//! [`MocksController`]. Intercepted requests are dispatched to the first
//! matching mock, whose producer looks records up through [`Registry::find`];
//! the result is serialized and every served request lands in the
//! [`RequestLog`].

pub mod config;
pub mod encode;
pub mod error;
pub mod expression;
pub mod inflect;
pub mod mocks;
pub mod store;
pub mod types;

pub use config::fixture::Fixture;
pub use config::parser::{load_fixture, load_fixtures};
pub use encode::{Encoder, JsonEncoder, YamlEncoder};
pub use error::{Result, StoreError};
pub use mocks::controller::{MockedResponse, MocksController, Request};
pub use mocks::log::{LoggedRequest, RequestLog};
pub use mocks::mock::{Mock, Responder};
pub use store::database::Database;
pub use store::model::{Model, ModelBuilder, Rule};
pub use store::registry::{Created, Found, Registry, StubOptions};
pub use types::record::{Attributes, Record};
pub use types::value::{RecordRef, Value};
pub use types::verb::Verb;
