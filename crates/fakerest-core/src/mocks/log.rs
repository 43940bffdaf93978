//! Append-only log of served requests.

use crate::types::verb::Verb;
use serde::Serialize;

/// One request dispatched through a mock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggedRequest {
    pub verb: Verb,
    pub url: String,
}

/// Ordered record of every request a mock served, for test assertions.
///
/// Only [`Registry::reset`](crate::store::registry::Registry::reset) clears it.
#[derive(Debug, Clone, Default)]
pub struct RequestLog {
    entries: Vec<LoggedRequest>,
}

impl RequestLog {
    pub(crate) fn push(&mut self, verb: Verb, url: &str) {
        tracing::debug!(%verb, url, "logging request");
        self.entries.push(LoggedRequest {
            verb,
            url: url.to_owned(),
        });
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LoggedRequest] {
        &self.entries
    }

    pub fn last(&self) -> Option<&LoggedRequest> {
        self.entries.last()
    }

    /// How many times `verb` `url` was served.
    pub fn count_matching(&self, verb: Verb, url: &str) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.verb == verb && entry.url == url)
            .count()
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.url.as_str())
    }
}
