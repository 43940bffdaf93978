//! Registry owning model definitions, the database and the request log.
//!
//! The registry is the explicit context object tests thread through setup
//! and mock responders. It provides:
//! - [`define`](Registry::define) / [`define_with`](Registry::define_with) for models
//! - [`create`](Registry::create) and [`stub`](Registry::stub) for populating tables
//! - [`find`](Registry::find) with singular/plural lookup semantics
//! - [`reset`](Registry::reset) to return to a pristine state between scenarios

use crate::error::{Result, StoreError};
use crate::inflect::{is_plural, singularize};
use crate::mocks::log::RequestLog;
use crate::store::database::Database;
use crate::store::model::{Model, ModelBuilder};
use crate::types::record::{Attributes, Record};
use crate::types::value::{RecordRef, Value};
use crate::types::verb::Verb;
use std::collections::HashMap;
use std::rc::Rc;

/// Outcome of a lookup or a response-producer.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Found {
    /// No record matched a singular lookup
    #[default]
    NotFound,
    /// Single record
    One(Record),
    /// Ordered collection, possibly empty
    Many(Vec<Record>),
}

impl Found {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Found::NotFound)
    }

    pub fn one(&self) -> Option<&Record> {
        match self {
            Found::One(record) => Some(record),
            _ => None,
        }
    }

    pub fn many(&self) -> Option<&[Record]> {
        match self {
            Found::Many(records) => Some(records),
            _ => None,
        }
    }

    /// Number of records carried.
    pub fn len(&self) -> usize {
        match self {
            Found::NotFound => 0,
            Found::One(_) => 1,
            Found::Many(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_records(self) -> Vec<Record> {
        match self {
            Found::NotFound => Vec::new(),
            Found::One(record) => vec![record],
            Found::Many(records) => records,
        }
    }
}

impl From<Option<Record>> for Found {
    fn from(record: Option<Record>) -> Self {
        record.map(Found::One).unwrap_or(Found::NotFound)
    }
}

impl From<Record> for Found {
    fn from(record: Record) -> Self {
        Found::One(record)
    }
}

impl From<Vec<Record>> for Found {
    fn from(records: Vec<Record>) -> Self {
        Found::Many(records)
    }
}

/// Records produced by [`Registry::create`], shaped like its input.
#[derive(Debug, Clone, PartialEq)]
pub enum Created {
    One(Record),
    Many(Vec<Record>),
}

impl Created {
    pub fn one(self) -> Option<Record> {
        match self {
            Created::One(record) => Some(record),
            Created::Many(_) => None,
        }
    }

    pub fn into_records(self) -> Vec<Record> {
        match self {
            Created::One(record) => vec![record],
            Created::Many(records) => records,
        }
    }
}

/// Value or per-index generator for one stubbed attribute.
#[derive(Clone)]
pub enum Like {
    /// Same value on every generated record
    Value(Value),
    /// Called with the sequence index of each generated record
    Sequence(Rc<dyn Fn(u64) -> Value>),
}

/// Options for [`Registry::stub`].
#[derive(Clone)]
pub struct StubOptions {
    starting_with: u64,
    like: Vec<(String, Like)>,
}

impl Default for StubOptions {
    fn default() -> Self {
        Self {
            starting_with: 1,
            like: Vec::new(),
        }
    }
}

impl StubOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// First sequence index (default 1).
    pub fn starting_with(mut self, index: u64) -> Self {
        self.starting_with = index;
        self
    }

    /// Same `value` for `attribute` on every record.
    pub fn like(mut self, attribute: &str, value: impl Into<Value>) -> Self {
        self.like.push((attribute.to_owned(), Like::Value(value.into())));
        self
    }

    /// `attribute` computed from each record's sequence index.
    pub fn like_with<F>(mut self, attribute: &str, generator: F) -> Self
    where
        F: Fn(u64) -> Value + 'static,
    {
        self.like
            .push((attribute.to_owned(), Like::Sequence(Rc::new(generator))));
        self
    }

    fn attributes_for(&self, index: u64) -> Attributes {
        self.like
            .iter()
            .map(|(attribute, like)| {
                let value = match like {
                    Like::Value(value) => value.clone(),
                    Like::Sequence(generator) => generator(index),
                };
                (attribute.clone(), value)
            })
            .collect()
    }
}

/// Owner of model definitions, the database and the request log.
#[derive(Debug, Default)]
pub struct Registry {
    models: HashMap<String, Model>,
    database: Database,
    request_log: RequestLog,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a model without rules under the singular form of `name`.
    pub fn define(&mut self, name: &str) -> Result<&Model> {
        self.define_with(name, |_| {})
    }

    /// Define a model configured through `configurator`.
    ///
    /// Replaces any prior model of the same name. The id sequence continues
    /// from the replaced model.
    pub fn define_with<F>(&mut self, name: &str, configurator: F) -> Result<&Model>
    where
        F: FnOnce(&mut ModelBuilder),
    {
        let name = singularize(name.trim());
        let mut model = Model::define(&name, configurator)?;
        if let Some(previous) = self.models.get(&name) {
            model.continue_ids_from(previous.next_id());
        }
        tracing::info!(model = %name, "defining model");
        self.database.create_table(&name);
        self.models.insert(name.clone(), model);
        Ok(&self.models[&name])
    }

    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.get(&singularize(name.trim()))
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn request_log(&self) -> &RequestLog {
        &self.request_log
    }

    pub(crate) fn log_request(&mut self, verb: Verb, url: &str) {
        self.request_log.push(verb, url);
    }

    /// Create records from a JSON mapping or a sequence of mappings.
    ///
    /// The result mirrors the input shape. Sequences are validated before any
    /// record is built.
    pub fn create(&mut self, model: &str, payload: serde_json::Value) -> Result<Created> {
        match payload {
            serde_json::Value::Object(map) => {
                let record = self.create_one(model, attributes_from_json(map))?;
                Ok(Created::One(record))
            }
            serde_json::Value::Array(items) => {
                let batch = items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| match item {
                        serde_json::Value::Object(map) => Ok(attributes_from_json(map)),
                        other => Err(StoreError::InvalidArgument(format!(
                            "element {index} for '{model}' is not a mapping: {other}"
                        ))),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Created::Many(self.create_many(model, batch)?))
            }
            other => Err(StoreError::InvalidArgument(format!(
                "records for '{model}' must be a mapping or a sequence of mappings, got: {other}"
            ))),
        }
    }

    /// Create and insert one record.
    pub fn create_one(&mut self, model: &str, attributes: Attributes) -> Result<Record> {
        let mut records = self.create_many(model, vec![attributes])?;
        records
            .pop()
            .ok_or_else(|| StoreError::InvalidArgument(format!("no record created for '{model}'")))
    }

    /// Create and insert records in input order.
    ///
    /// Undefined models are defined bare on the fly.
    pub fn create_many(&mut self, model: &str, batch: Vec<Attributes>) -> Result<Vec<Record>> {
        let name = singularize(model.trim());
        if name.is_empty() {
            return Err(StoreError::InvalidArgument("model name must not be empty".to_owned()));
        }
        self.database.create_table(&name);
        let definition = self
            .models
            .entry(name.clone())
            .or_insert_with(|| Model::bare(&name));

        let mut created = Vec::with_capacity(batch.len());
        for attributes in batch {
            let record = definition.create(attributes);
            self.database.insert(record.clone())?;
            created.push(record);
        }
        Ok(created)
    }

    /// Create `count` records whose attributes come from `options`.
    ///
    /// Fails with [`StoreError::InvalidArgument`] when the sequence indices
    /// would run past `u64::MAX`.
    pub fn stub(&mut self, count: usize, model: &str, options: &StubOptions) -> Result<Vec<Record>> {
        let start = options.starting_with;
        let last = match u64::try_from(count) {
            Ok(0) => Some(start),
            Ok(n) => start.checked_add(n - 1),
            Err(_) => None,
        };
        if last.is_none() {
            return Err(StoreError::InvalidArgument(format!(
                "cannot stub {count} '{model}' records starting at index {start}"
            )));
        }
        let batch = (start..=u64::MAX)
            .take(count)
            .map(|index| options.attributes_for(index))
            .collect();
        self.create_many(model, batch)
    }

    /// Look up records of `token`'s model.
    ///
    /// A plural token yields [`Found::Many`] with every match (possibly empty);
    /// a singular token yields the first match or [`Found::NotFound`].
    /// Unknown models behave like empty tables.
    pub fn find(&self, token: &str, predicate: Option<&dyn Fn(&Record) -> bool>) -> Found {
        let token = token.trim();
        // UnknownTable reads as an empty table so lookups stay valid after reset
        let matches = self
            .database
            .select(&singularize(token), predicate)
            .unwrap_or_default();

        if is_plural(token) {
            Found::Many(matches.into_iter().cloned().collect())
        } else {
            matches.first().map(|r| (*r).clone()).into()
        }
    }

    /// [`find`](Self::find) with a closure predicate.
    pub fn find_where<P>(&self, token: &str, predicate: P) -> Found
    where
        P: Fn(&Record) -> bool,
    {
        self.find(token, Some(&predicate))
    }

    /// Record `id` of `token`'s model.
    pub fn find_by_id(&self, token: &str, id: u64) -> Option<&Record> {
        self.database.get(&singularize(token.trim()), id)
    }

    /// Target of a lazy association.
    pub fn resolve(&self, reference: &RecordRef) -> Option<&Record> {
        self.database.get(&reference.model, reference.id)
    }

    /// JSON form of `record` with references expanded one level.
    ///
    /// Unresolvable references render as their id.
    pub fn render(&self, record: &Record) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        object.insert("id".to_owned(), serde_json::Value::from(record.id()));
        for (name, value) in record.attributes() {
            object.insert(name.clone(), self.render_value(value));
        }
        serde_json::Value::Object(object)
    }

    fn render_value(&self, value: &Value) -> serde_json::Value {
        match value {
            Value::Ref(reference) => match self.resolve(reference) {
                Some(target) => target.to_json(),
                None => {
                    tracing::warn!(reference = %reference, "unresolvable reference");
                    value.to_json()
                }
            },
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(|v| self.render_value(v)).collect())
            }
            Value::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), self.render_value(v)))
                    .collect(),
            ),
            other => other.to_json(),
        }
    }

    /// Drop every model, table and logged request.
    pub fn reset(&mut self) {
        tracing::info!(
            models = self.models.len(),
            requests = self.request_log.len(),
            "resetting registry"
        );
        self.models.clear();
        self.database = Database::new();
        self.request_log.clear();
    }
}

fn attributes_from_json(map: serde_json::Map<String, serde_json::Value>) -> Attributes {
    map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
}
