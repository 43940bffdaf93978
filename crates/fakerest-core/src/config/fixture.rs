//! Declarative fixtures: models, seed records and mocks loaded from files.
//!
//! ```yaml
//! models:
//!   - name: book
//!     defaults:
//!       format: hardcover
//! records:
//!   - model: books
//!     data:
//!       - title: Dune
//!       - title: Emma
//! mocks:
//!   - method: get
//!     url: ^/books/(\d+)\.json$
//!     model: book
//!     filter: id == `$1`
//!   - method: get
//!     url: ^/books\.json$
//!     model: books
//! ```

use crate::encode::{JsonEncoder, YamlEncoder};
use crate::error::{Result, StoreError};
use crate::expression::RecordFilter;
use crate::mocks::controller::MocksController;
use crate::mocks::mock::{Mock, Responder};
use crate::store::registry::{Found, Registry};
use crate::types::value::Value;
use crate::types::verb::Verb;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Fixture document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    /// Model definitions with static defaults
    #[serde(default)]
    pub models: Vec<ModelFixture>,
    /// Seed records, created in order
    #[serde(default)]
    pub records: Vec<RecordsFixture>,
    /// Mocked endpoints, registered in order
    #[serde(default)]
    pub mocks: Vec<MockFixture>,
}

/// Model definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFixture {
    pub name: String,
    /// Static defaults for omitted attributes
    #[serde(default)]
    pub defaults: serde_json::Map<String, serde_json::Value>,
}

/// Records for one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordsFixture {
    /// Model token, singular or plural
    pub model: String,
    /// A mapping or a sequence of mappings
    pub data: serde_json::Value,
}

/// Response serialization format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

/// Mocked endpoint answering from the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockFixture {
    pub method: Verb,
    /// URL regex; capture groups feed `$n` placeholders in `filter`
    pub url: String,
    /// Model token; a plural token serves collections
    pub model: String,
    /// JMESPath expression over each record's JSON form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default)]
    pub format: Format,
}

/// Responder looking records up by model token and optional filter.
#[derive(Debug, Clone)]
pub struct FinderResponder {
    model: String,
    filter: Option<String>,
}

impl FinderResponder {
    pub fn new(model: impl Into<String>, filter: Option<String>) -> Self {
        Self {
            model: model.into(),
            filter,
        }
    }
}

impl Responder for FinderResponder {
    fn respond(&self, registry: &Registry, captures: &[String]) -> Found {
        let Some(template) = &self.filter else {
            return registry.find(&self.model, None);
        };
        match RecordFilter::compile(template, captures) {
            Ok(filter) => registry.find_where(&self.model, |record| filter.matches(record)),
            Err(e) => {
                tracing::warn!(model = %self.model, error = %e, "filter rejected captures");
                registry.find_where(&self.model, |_| false)
            }
        }
    }
}

impl MockFixture {
    /// Build the mock described by this entry.
    pub fn to_mock(&self) -> Result<Mock> {
        let pattern = Regex::new(&self.url).map_err(|e| {
            StoreError::InvalidArgument(format!("invalid URL pattern '{}': {e}", self.url))
        })?;
        if let Some(filter) = &self.filter {
            RecordFilter::validate(filter)?;
        }
        let responder = FinderResponder::new(self.model.clone(), self.filter.clone());
        let mock = Mock::from_parts(self.method, pattern, Box::new(responder));
        Ok(match self.format {
            Format::Json => mock.with_encoder(JsonEncoder::default()),
            Format::Yaml => mock.with_encoder(YamlEncoder),
        })
    }
}

impl Fixture {
    /// Define models, create records, then register mocks.
    pub fn apply(&self, registry: &mut Registry, controller: &mut MocksController) -> Result<()> {
        for model in &self.models {
            registry.define_with(&model.name, |builder| {
                for (attribute, value) in &model.defaults {
                    builder.default(attribute, Value::from(value));
                }
            })?;
        }
        for records in &self.records {
            registry.create(&records.model, records.data.clone())?;
        }
        for mock in &self.mocks {
            controller.register(mock.to_mock()?);
        }
        tracing::info!(
            models = self.models.len(),
            records = self.records.len(),
            mocks = self.mocks.len(),
            "applied fixture"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parser::parse_yaml;
    use crate::mocks::controller::Request;
    use rstest::{fixture, rstest};
    use serde_json::json;

    const LIBRARY: &str = r#"
models:
  - name: book
    defaults:
      format: hardcover
records:
  - model: books
    data:
      - title: Dune
      - title: Emma
        format: paperback
  - model: author
    data:
      name: Austen
mocks:
  - method: get
    url: ^/books/(\d+)\.json$
    model: book
    filter: id == `$1`
  - method: get
    url: ^/books\.json$
    model: books
  - method: get
    url: ^/books/by/(\w+)\.yaml$
    model: books
    filter: format == '$1'
    format: yaml
"#;

    #[fixture]
    fn library() -> (Registry, MocksController) {
        let fixture: Fixture = parse_yaml(LIBRARY).unwrap();
        let mut registry = Registry::new();
        let mut controller = MocksController::new();
        fixture.apply(&mut registry, &mut controller).unwrap();
        (registry, controller)
    }

    fn serve(
        (registry, controller): &mut (Registry, MocksController),
        url: &str,
    ) -> Result<Option<String>> {
        Ok(controller
            .dispatch(registry, &Request::get(url))?
            .map(|response| response.body))
    }

    #[rstest]
    fn test_apply_defines_models_and_records(library: (Registry, MocksController)) {
        let (registry, controller) = library;
        assert!(registry.model("book").is_some());
        assert_eq!(registry.find("books", None).len(), 2);
        assert_eq!(
            registry.find("book", None).one().and_then(|r| r.get("format")),
            Some("hardcover".into())
        );
        assert_eq!(registry.find("authors", None).len(), 1);
        assert_eq!(controller.len(), 3);
    }

    #[rstest]
    fn test_filtered_single_mock(mut library: (Registry, MocksController)) {
        let body = serve(&mut library, "/books/2.json").unwrap().unwrap();
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            body,
            json!({"book": {"id": 2, "title": "Emma", "format": "paperback"}})
        );
    }

    #[rstest]
    fn test_filtered_single_mock_not_found(mut library: (Registry, MocksController)) {
        let result = serve(&mut library, "/books/7.json");
        assert!(matches!(result, Err(StoreError::ResourceNotFound { .. })));
        assert_eq!(library.0.request_log().len(), 1);
    }

    #[rstest]
    fn test_collection_mock(mut library: (Registry, MocksController)) {
        let body = serve(&mut library, "/books.json").unwrap().unwrap();
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["books"].as_array().map(Vec::len), Some(2));
    }

    #[rstest]
    #[case("hardcover", json!({"books": [{"id": 1, "title": "Dune", "format": "hardcover"}]}))]
    #[case("audio", json!({"results": []}))]
    fn test_yaml_collection_mock(
        mut library: (Registry, MocksController),
        #[case] format: &str,
        #[case] expected: serde_json::Value,
    ) {
        let body = serve(&mut library, &format!("/books/by/{format}.yaml"))
            .unwrap()
            .unwrap();
        let body: serde_json::Value = serde_yaml::from_str(&body).unwrap();
        assert_eq!(body, expected);
    }

    #[rstest]
    fn test_finder_responder_bad_capture_yields_not_found(library: (Registry, MocksController)) {
        let (registry, _) = library;
        let responder = FinderResponder::new("book", Some("id == `$1`".into()));
        let found = responder.respond(&registry, &["not json".to_owned()]);
        assert_eq!(found, Found::NotFound);
    }

    #[rstest]
    #[case(r#"{"mocks": [{"method": "get", "url": "(", "model": "book"}]}"#)]
    #[case(r#"{"mocks": [{"method": "get", "url": "/x", "model": "book", "filter": "[bad"}]}"#)]
    #[case(r#"{"records": [{"model": "book", "data": 5}]}"#)]
    fn test_apply_invalid_entries(#[case] content: &str) {
        let fixture: Fixture = serde_json::from_str(content).unwrap();
        let result = fixture.apply(&mut Registry::new(), &mut MocksController::new());
        assert!(matches!(result, Err(StoreError::InvalidArgument(_))));
    }

    #[rstest]
    fn test_unknown_method_is_rejected_at_parse() {
        let content = r#"{"mocks": [{"method": "patch", "url": "/x", "model": "book"}]}"#;
        assert!(serde_json::from_str::<Fixture>(content).is_err());
    }
}
