//! Attribute values stored on records.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Lazy association to another record.
///
/// Names the target by model and id without owning it; resolved on demand
/// through [`Registry::resolve`](crate::store::registry::Registry::resolve).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordRef {
    /// Singular model name of the target
    pub model: String,
    /// Target record id
    pub id: u64,
}

impl RecordRef {
    pub fn new(model: impl Into<String>, id: u64) -> Self {
        Self {
            model: model.into(),
            id,
        }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.model, self.id)
    }
}

/// Resolved attribute value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Timestamp, rendered as RFC 3339 text
    Date(DateTime<Utc>),
    List(Vec<Value>),
    /// Nested mapping without record identity
    Map(BTreeMap<String, Value>),
    Ref(RecordRef),
}

impl Value {
    /// Reference to record `id` of `model`.
    pub fn reference(model: impl Into<String>, id: u64) -> Self {
        Value::Ref(RecordRef::new(model, id))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_record_ref(&self) -> Option<&RecordRef> {
        match self {
            Value::Ref(r) => Some(r),
            _ => None,
        }
    }

    /// Plain JSON form. References collapse to the target id.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(n) => serde_json::Value::from(*n),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Date(d) => serde_json::Value::String(d.to_rfc3339_opts(SecondsFormat::Secs, true)),
            Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Ref(r) => serde_json::Value::from(r.id),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::Text(s.clone()),
            serde_json::Value::Array(items) => Value::List(items.iter().map(Value::from).collect()),
            serde_json::Value::Object(object) => Value::Map(
                object
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::from(&value)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        i64::try_from(n).map(Value::Int).unwrap_or(Value::Float(n as f64))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<RecordRef> for Value {
    fn from(r: RecordRef) -> Self {
        Value::Ref(r)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(null), Value::Null)]
    #[case(json!(true), Value::Bool(true))]
    #[case(json!(42), Value::Int(42))]
    #[case(json!(1.5), Value::Float(1.5))]
    #[case(json!("Tolkien"), Value::Text("Tolkien".into()))]
    #[case(json!([1, "a"]), Value::List(vec![Value::Int(1), Value::Text("a".into())]))]
    fn test_value_from_json(#[case] input: serde_json::Value, #[case] expected: Value) {
        assert_eq!(Value::from(&input), expected);
    }

    #[rstest]
    #[case(json!({"a": 1}))]
    #[case(json!({"isbn": "123", "tags": ["sf", "classic"]}))]
    #[case(json!({"outer": {"inner": {"depth": 3}}, "empty": {}}))]
    fn test_value_from_json_object_keeps_structure(#[case] input: serde_json::Value) {
        let value = Value::from(&input);
        assert!(value.as_map().is_some());
        assert_eq!(value.to_json(), input);
    }

    #[rstest]
    fn test_date_renders_rfc3339() {
        let date = DateTime::parse_from_rfc3339("2024-03-01T12:30:00+02:00")
            .unwrap()
            .with_timezone(&Utc);
        let value = Value::from(date);
        assert_eq!(value.as_date(), Some(&date));
        assert_eq!(value.to_json(), json!("2024-03-01T10:30:00Z"));
    }

    #[rstest]
    fn test_reference_serializes_as_id() {
        let value = Value::reference("author", 7);
        assert_eq!(value.to_json(), json!(7));
        assert_eq!(serde_json::to_string(&value).unwrap(), "7");
        assert_eq!(value.as_record_ref().map(ToString::to_string), Some("author#7".into()));
    }

    #[rstest]
    #[case(Value::Int(3), Some(3.0))]
    #[case(Value::Float(2.5), Some(2.5))]
    #[case(Value::Text("3".into()), None)]
    fn test_as_f64(#[case] value: Value, #[case] expected: Option<f64>) {
        assert_eq!(value.as_f64(), expected);
    }

    #[rstest]
    fn test_option_into_value() {
        assert_eq!(Value::from(None::<&str>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }
}
