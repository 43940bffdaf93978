//! Record type.

use crate::types::value::{RecordRef, Value};
use std::collections::BTreeMap;

/// Attribute name to value mapping.
pub type Attributes = BTreeMap<String, Value>;

/// A single entity instance of a model.
///
/// Records are created by [`Model::create`](crate::store::model::Model::create)
/// and owned by the database table of their model. The id never changes once
/// assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    model: String,
    id: u64,
    attributes: Attributes,
}

impl Record {
    pub(crate) fn new(model: impl Into<String>, id: u64, attributes: Attributes) -> Self {
        Self {
            model: model.into(),
            id,
            attributes,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Singular name of the owning model
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Read an attribute. `"id"` answers the record id.
    pub fn get(&self, name: &str) -> Option<Value> {
        if name == "id" {
            return Some(Value::from(self.id));
        }
        self.attributes.get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        name == "id" || self.attributes.contains_key(name)
    }

    /// Lazy association pointing at this record.
    pub fn reference(&self) -> RecordRef {
        RecordRef::new(self.model.clone(), self.id)
    }

    /// Flat JSON object: `id` followed by the attributes, references as ids.
    pub fn to_json(&self) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        object.insert("id".to_owned(), serde_json::Value::from(self.id));
        for (name, value) in &self.attributes {
            object.insert(name.clone(), value.to_json());
        }
        serde_json::Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn record() -> Record {
        let mut attributes = Attributes::new();
        attributes.insert("name".into(), Value::from("Tolkien"));
        attributes.insert("publisher".into(), Value::reference("publisher", 3));
        Record::new("author", 2, attributes)
    }

    #[rstest]
    #[case("id", Some(Value::Int(2)))]
    #[case("name", Some(Value::from("Tolkien")))]
    #[case("missing", None)]
    fn test_record_get(#[case] name: &str, #[case] expected: Option<Value>) {
        assert_eq!(record().get(name), expected);
    }

    #[rstest]
    fn test_record_to_json() {
        assert_eq!(
            record().to_json(),
            json!({"id": 2, "name": "Tolkien", "publisher": 3})
        );
    }

    #[rstest]
    fn test_record_reference() {
        let reference = record().reference();
        assert_eq!(reference, RecordRef::new("author", 2));
    }

    #[rstest]
    fn test_record_equality_is_structural() {
        assert_eq!(record(), record());
        assert_ne!(record(), Record::new("author", 2, Attributes::new()));
    }
}
