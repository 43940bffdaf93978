//! Model definitions: attribute rules and record construction.

use crate::error::{Result, StoreError};
use crate::types::record::{Attributes, Record};
use crate::types::value::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// One-argument transformation applied to a caller-supplied attribute value.
pub type Transform = Rc<dyn Fn(Value) -> Value>;

/// Attribute rule: either a static default or a transformation, never both.
#[derive(Clone)]
pub enum Rule {
    /// Used only when the caller omits the attribute
    Default(Value),
    /// Applied only to caller-supplied values
    Transform(Transform),
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Default(value) => f.debug_tuple("Default").field(value).finish(),
            Rule::Transform(_) => f.write_str("Transform(..)"),
        }
    }
}

/// Builder handed to a model configurator.
///
/// Each attribute takes either [`default`](Self::default) or
/// [`transform`](Self::transform). Configuring both for the same attribute
/// fails the definition.
#[derive(Debug)]
pub struct ModelBuilder {
    rules: BTreeMap<String, Rule>,
    conflicts: Vec<String>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self {
            rules: BTreeMap::new(),
            conflicts: Vec::new(),
        }
    }

    /// Static value used when the caller omits `attribute`.
    pub fn default(&mut self, attribute: &str, value: impl Into<Value>) -> &mut Self {
        self.set(attribute, Rule::Default(value.into()))
    }

    /// Transformation applied to the caller's value for `attribute`.
    pub fn transform<F>(&mut self, attribute: &str, transform: F) -> &mut Self
    where
        F: Fn(Value) -> Value + 'static,
    {
        self.set(attribute, Rule::Transform(Rc::new(transform)))
    }

    fn set(&mut self, attribute: &str, rule: Rule) -> &mut Self {
        let conflicting = matches!(
            (self.rules.get(attribute), &rule),
            (Some(Rule::Default(_)), Rule::Transform(_)) | (Some(Rule::Transform(_)), Rule::Default(_))
        );
        if conflicting {
            self.conflicts.push(attribute.to_owned());
        }
        self.rules.insert(attribute.to_owned(), rule);
        self
    }

    /// Finish the definition for model `name`.
    pub fn build(self, name: &str) -> Result<Model> {
        if name.trim().is_empty() {
            return Err(StoreError::InvalidDefinition {
                model: name.to_owned(),
                reason: "model name must not be empty".to_owned(),
            });
        }
        if let Some(attribute) = self.conflicts.first() {
            return Err(StoreError::InvalidDefinition {
                model: name.to_owned(),
                reason: format!("attribute '{attribute}' has both a default and a transformation"),
            });
        }
        Ok(Model {
            name: name.to_owned(),
            rules: self.rules,
            next_id: 1,
        })
    }
}

/// Per-resource schema and record factory.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    rules: BTreeMap<String, Rule>,
    next_id: u64,
}

impl Model {
    /// Model without rules: records keep exactly the attributes given.
    pub fn bare(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            rules: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Model configured through `configurator`.
    pub fn define<F>(name: &str, configurator: F) -> Result<Self>
    where
        F: FnOnce(&mut ModelBuilder),
    {
        let mut builder = ModelBuilder::new();
        configurator(&mut builder);
        builder.build(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rule(&self, attribute: &str) -> Option<&Rule> {
        self.rules.get(attribute)
    }

    /// Id the next created record will get
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub(crate) fn continue_ids_from(&mut self, next_id: u64) {
        self.next_id = self.next_id.max(next_id);
    }

    /// Build a new record from `raw` attributes.
    ///
    /// Supplied attributes with a transformation rule are transformed,
    /// supplied attributes with a default keep the raw value, omitted
    /// attributes fall back to their default. Unruled attributes pass through.
    /// The record is not inserted anywhere.
    pub fn create(&mut self, mut raw: Attributes) -> Record {
        if raw.remove("id").is_some() {
            tracing::warn!(model = %self.name, "discarding caller-supplied id");
        }

        let mut attributes = Attributes::new();
        for (attribute, rule) in &self.rules {
            match (raw.remove(attribute), rule) {
                (Some(value), Rule::Transform(transform)) => {
                    attributes.insert(attribute.clone(), transform(value));
                }
                (Some(value), Rule::Default(_)) => {
                    attributes.insert(attribute.clone(), value);
                }
                (None, Rule::Default(default)) => {
                    attributes.insert(attribute.clone(), default.clone());
                }
                (None, Rule::Transform(_)) => {}
            }
        }
        attributes.extend(raw);

        let id = self.next_id;
        self.next_id += 1;
        Record::new(self.name.clone(), id, attributes)
    }
}
