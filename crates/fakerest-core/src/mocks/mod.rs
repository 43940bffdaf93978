//! Mocked endpoints and request dispatch.
//!
//! - [`Mock`](mock::Mock): verb + URL pattern + response-producer
//! - [`MocksController`](controller::MocksController): ordered dispatch, first match wins
//! - [`RequestLog`](log::RequestLog): every request a mock served

pub mod controller;
pub mod log;
pub mod mock;
