//! A single mocked endpoint: verb, URL pattern and response-producer.

use crate::encode::{Encoder, JsonEncoder};
use crate::error::{Result, StoreError};
use crate::inflect::pluralize;
use crate::store::registry::{Found, Registry};
use crate::types::record::Record;
use crate::types::verb::Verb;
use regex::Regex;
use std::fmt;

/// Root label for collections whose model cannot be inferred.
pub const GENERIC_COLLECTION_ROOT: &str = "results";

/// Response-producer: turns URL captures into the record(s) to serve.
pub trait Responder {
    fn respond(&self, registry: &Registry, captures: &[String]) -> Found;
}

impl<F> Responder for F
where
    F: Fn(&Registry, &[String]) -> Found,
{
    fn respond(&self, registry: &Registry, captures: &[String]) -> Found {
        self(registry, captures)
    }
}

/// Mocked endpoint.
///
/// A mock is created wherever test setup needs it; the registry it answers
/// from is passed in on every call.
pub struct Mock {
    verb: Verb,
    pattern: Regex,
    responder: Box<dyn Responder>,
    encoder: Box<dyn Encoder>,
}

impl Mock {
    /// Build a mock from a verb name, a regex pattern and a producer closure.
    ///
    /// Fails with [`StoreError::UnknownVerb`] for verbs other than
    /// get/post/put/delete and with [`StoreError::InvalidArgument`] when
    /// `pattern` is not a valid regex.
    pub fn new<F>(verb: &str, pattern: &str, producer: F) -> Result<Self>
    where
        F: Fn(&Registry, &[String]) -> Found + 'static,
    {
        let verb: Verb = verb.parse()?;
        let pattern = Regex::new(pattern).map_err(|e| {
            StoreError::InvalidArgument(format!("invalid URL pattern '{pattern}': {e}"))
        })?;
        Ok(Self::from_parts(verb, pattern, Box::new(producer)))
    }

    /// Build a mock from already-validated parts.
    pub fn from_parts(verb: Verb, pattern: Regex, responder: Box<dyn Responder>) -> Self {
        Self {
            verb,
            pattern,
            responder,
            encoder: Box::new(JsonEncoder::default()),
        }
    }

    /// Serialize responses with `encoder` instead of JSON.
    pub fn with_encoder(mut self, encoder: impl Encoder + 'static) -> Self {
        self.encoder = Box::new(encoder);
        self
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn content_type(&self) -> &'static str {
        self.encoder.content_type()
    }

    /// Whether the URL pattern matches `url`.
    pub fn matches(&self, url: &str) -> bool {
        self.pattern.is_match(url)
    }

    /// Ordered capture groups of `url`; groups that did not participate are empty.
    pub fn captures(&self, url: &str) -> Option<Vec<String>> {
        let caps = self.pattern.captures(url)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|group| group.map(|m| m.as_str().to_owned()).unwrap_or_default())
                .collect(),
        )
    }

    /// Serve `url`: run the producer on the URL captures and encode the result.
    ///
    /// The request is appended to the registry's log before any outcome is
    /// reported, including [`StoreError::ResourceNotFound`].
    pub fn mocked_response(&self, registry: &mut Registry, url: &str) -> Result<String> {
        let found = self
            .captures(url)
            .map(|captures| self.responder.respond(registry, &captures));
        registry.log_request(self.verb, url);

        let (root, document) = match found {
            None => {
                return Err(StoreError::InvalidArgument(format!(
                    "{url} does not match {}",
                    self.pattern
                )))
            }
            Some(Found::NotFound) => {
                tracing::debug!(verb = %self.verb, url, "no record for mocked request");
                return Err(StoreError::ResourceNotFound {
                    url: url.to_owned(),
                });
            }
            Some(Found::One(record)) => (record.model().to_owned(), registry.render(&record)),
            Some(Found::Many(records)) => (
                collection_root(&records),
                serde_json::Value::Array(records.iter().map(|r| registry.render(r)).collect()),
            ),
        };
        tracing::debug!(verb = %self.verb, url, root = %root, "serving mocked response");
        self.encoder.encode(&document, &root)
    }
}

impl fmt::Debug for Mock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mock")
            .field("verb", &self.verb)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// Root label for a collection: the pluralized model name when every record
/// shares one model, otherwise [`GENERIC_COLLECTION_ROOT`].
pub fn collection_root(records: &[Record]) -> String {
    match records.split_first() {
        Some((first, rest)) if rest.iter().all(|r| r.model() == first.model()) => {
            pluralize(first.model())
        }
        _ => GENERIC_COLLECTION_ROOT.to_owned(),
    }
}
