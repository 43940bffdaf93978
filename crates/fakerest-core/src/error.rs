//! Error types for the record store and mock dispatcher.

use crate::config::error::ConfigError;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by store, model, registry and mock operations.
///
/// All of them are programmer errors in test setup and are surfaced to the
/// caller immediately.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Mock constructed with a verb outside get/post/put/delete
    #[error("unknown HTTP verb: {0}")]
    UnknownVerb(String),

    /// Malformed call arguments (bad URL pattern, non-mapping payload)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Malformed model definition
    #[error("invalid definition for model '{model}': {reason}")]
    InvalidDefinition { model: String, reason: String },

    /// Database operation against a model that has no table
    #[error("unknown table: {0}")]
    UnknownTable(String),

    /// Response-producer yielded nothing for a matched URL
    #[error("resource not found for {url}")]
    ResourceNotFound { url: String },

    /// Serialization collaborator failed
    #[error("encoding error: {0}")]
    Encode(String),

    /// Fixture loading failed
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Encode(err.to_string())
    }
}

impl From<serde_yaml::Error> for StoreError {
    fn from(err: serde_yaml::Error) -> Self {
        StoreError::Encode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::error::Error;

    #[rstest]
    #[case(StoreError::UnknownVerb("patch".into()), "unknown HTTP verb: patch")]
    #[case(StoreError::UnknownTable("book".into()), "unknown table: book")]
    #[case(
        StoreError::ResourceNotFound { url: "/books/2.xml".into() },
        "resource not found for /books/2.xml"
    )]
    #[case(
        StoreError::InvalidDefinition { model: "author".into(), reason: "empty name".into() },
        "invalid definition for model 'author': empty name"
    )]
    fn test_store_error_display(#[case] error: StoreError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn test_store_error_from_config_keeps_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let error = StoreError::from(ConfigError::from(json_err));
        assert!(matches!(error, StoreError::Config(ConfigError::Json(_))));
        assert!(error.source().is_some());
    }

    #[rstest]
    fn test_store_error_from_serde_json_is_encode() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(StoreError::from(json_err), StoreError::Encode(_)));
    }
}
