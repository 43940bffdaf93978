//! Serialization of rendered records.
//!
//! Mocks hand the encoder a JSON document (one rendered record or an array of
//! them) together with a root label; the encoder decides the textual format.

use crate::error::Result;
use serde_json::{Map, Value};

/// Serialization collaborator used by mocks.
pub trait Encoder {
    /// Encode `document` under the `root` label.
    fn encode(&self, document: &Value, root: &str) -> Result<String>;

    /// Content type of the produced text
    fn content_type(&self) -> &'static str;
}

fn rooted(document: &Value, root: &str) -> Value {
    let mut map = Map::new();
    map.insert(root.to_owned(), document.clone());
    Value::Object(map)
}

/// JSON output: `{"<root>": document}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder {
    pub pretty: bool,
}

impl JsonEncoder {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Encoder for JsonEncoder {
    fn encode(&self, document: &Value, root: &str) -> Result<String> {
        let value = rooted(document, root);
        let text = if self.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(text)
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}

/// YAML output with the same layout as [`JsonEncoder`].
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlEncoder;

impl Encoder for YamlEncoder {
    fn encode(&self, document: &Value, root: &str) -> Result<String> {
        Ok(serde_yaml::to_string(&rooted(document, root))?)
    }

    fn content_type(&self) -> &'static str {
        "application/yaml"
    }
}
