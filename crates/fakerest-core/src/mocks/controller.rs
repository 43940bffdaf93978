//! Controller dispatching intercepted requests to registered mocks.
//!
//! This module provides `MocksController`, which keeps mocks in registration
//! order and hands each request to the first mock that matches it.

use crate::error::Result;
use crate::mocks::mock::Mock;
use crate::store::registry::Registry;
use crate::types::verb::Verb;

/// Intercepted request as seen by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP verb
    pub verb: Verb,
    /// Request URL (path + query string)
    pub url: String,
}

impl Request {
    pub fn new(verb: Verb, url: impl Into<String>) -> Self {
        Self {
            verb,
            url: url.into(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Verb::Get, url)
    }
}

/// Response body produced by a mock, with the encoder's content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockedResponse {
    pub content_type: &'static str,
    pub body: String,
}

/// Ordered set of mocks.
///
/// `MocksController` provides:
/// - Mock registration via `register()`, kept in registration order
/// - Lookup via `find_mock()` (first registered match wins)
/// - Dispatch via `dispatch()`, which serves the request through the matching mock
#[derive(Debug, Default)]
pub struct MocksController {
    mocks: Vec<Mock>,
}

impl MocksController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `mock` after every mock already present.
    pub fn register(&mut self, mock: Mock) -> &mut Self {
        tracing::debug!(verb = %mock.verb(), pattern = mock.pattern().as_str(), "registering mock");
        self.mocks.push(mock);
        self
    }

    /// All registered mocks in order.
    pub fn mocks(&self) -> &[Mock] {
        &self.mocks
    }

    pub fn len(&self) -> usize {
        self.mocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mocks.is_empty()
    }

    /// Drop every registered mock.
    pub fn clear(&mut self) {
        self.mocks.clear();
    }

    /// Find the first mock matching the request's verb and URL.
    ///
    /// Returns `None` if no registered mock matches.
    pub fn find_mock(&self, request: &Request) -> Option<&Mock> {
        self.mocks
            .iter()
            .find(|mock| mock.verb() == request.verb && mock.matches(&request.url))
    }

    /// Serve `request` through the first matching mock.
    ///
    /// Returns `Ok(None)` when no mock matches, leaving the request to the
    /// interception layer. Errors from the mock propagate unchanged.
    pub fn dispatch(
        &self,
        registry: &mut Registry,
        request: &Request,
    ) -> Result<Option<MockedResponse>> {
        let Some(mock) = self.find_mock(request) else {
            tracing::debug!(verb = %request.verb, url = %request.url, "no mock for request");
            return Ok(None);
        };
        let body = mock.mocked_response(registry, &request.url)?;
        Ok(Some(MockedResponse {
            content_type: mock.content_type(),
            body,
        }))
    }
}
