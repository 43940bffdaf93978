//! Error types for fixture loading.

/// Fixture file loading or parsing error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Unknown file type
    #[error("Unknown file type: {0}")]
    UnknownFileType(String),
    /// Invalid glob pattern
    #[error("invalid fixture pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    /// Unreadable path while expanding a glob
    #[error("fixture path error: {0}")]
    Glob(#[from] glob::GlobError),
}
