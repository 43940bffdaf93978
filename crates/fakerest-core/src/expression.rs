//! JMESPath record filters with URL capture placeholders.
//!
//! A filter such as ``id == `$1` `` is compiled after `$n` is replaced by the
//! n-th capture group of the request URL, then evaluated against each
//! record's JSON form.

use crate::error::{Result, StoreError};
use crate::types::record::Record;
use jmespath::{Expression, Variable};
use serde_json::Value;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Convert serde_json::Value to jmespath::Variable.
pub fn value_to_variable(value: &Value) -> Rc<Variable> {
    match value {
        Value::Null => Rc::new(Variable::Null),
        Value::Bool(b) => Rc::new(Variable::Bool(*b)),
        Value::Number(n) => Rc::new(Variable::Number(n.clone())),
        Value::String(s) => Rc::new(Variable::String(s.clone())),
        Value::Array(items) => Rc::new(Variable::Array(items.iter().map(value_to_variable).collect())),
        Value::Object(object) => {
            let map: BTreeMap<String, Rc<Variable>> = object
                .iter()
                .map(|(k, v)| (k.clone(), value_to_variable(v)))
                .collect();
            Rc::new(Variable::Object(map))
        }
    }
}

/// Truthiness of a search result. Zero counts as false.
pub fn is_truthy(var: &Variable) -> bool {
    match var {
        Variable::Bool(b) => *b,
        Variable::Null => false,
        Variable::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Variable::String(s) => !s.is_empty(),
        Variable::Array(a) => !a.is_empty(),
        Variable::Object(o) => !o.is_empty(),
        Variable::Expref(_) => false,
    }
}

/// Replace `$1`..`$n` in `template` with the matching capture.
///
/// Higher indices are substituted first so `$12` is not read as `$1`.
pub fn substitute_captures(template: &str, captures: &[String]) -> String {
    captures
        .iter()
        .enumerate()
        .rev()
        .fold(template.to_owned(), |text, (i, capture)| {
            text.replace(&format!("${}", i + 1), capture)
        })
}

/// Compiled record filter.
pub struct RecordFilter {
    source: String,
    expression: Expression<'static>,
}

impl RecordFilter {
    /// Compile `template` with `captures` substituted in.
    pub fn compile(template: &str, captures: &[String]) -> Result<Self> {
        let source = substitute_captures(template, captures);
        let expression = jmespath::compile(&source).map_err(|e| {
            StoreError::InvalidArgument(format!("invalid filter expression '{source}': {e}"))
        })?;
        Ok(Self { source, expression })
    }

    /// Check that `template` compiles for some capture values.
    pub fn validate(template: &str) -> Result<()> {
        let placeholders = vec!["0".to_owned(); 9];
        Self::compile(template, &placeholders).map(|_| ())
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether `record` satisfies the filter. Evaluation errors count as no match.
    pub fn matches(&self, record: &Record) -> bool {
        let data = value_to_variable(&record.to_json());
        match self.expression.search(&data) {
            Ok(result) => is_truthy(&result),
            Err(e) => {
                tracing::debug!(filter = %self.source, error = %e, "filter evaluation failed");
                false
            }
        }
    }
}

impl std::fmt::Debug for RecordFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordFilter")
            .field("source", &self.source)
            .finish()
    }
}
