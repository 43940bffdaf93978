//! Fixture file parsing (YAML/JSON/JSONC).

use crate::config::error::ConfigError;
use crate::config::fixture::Fixture;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Fixture file type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFileType {
    Yaml,
    Json,
    Jsonc,
    Unknown,
}

/// Get fixture file type from path extension
pub fn get_file_type(path: &Path) -> ConfigFileType {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "yaml" | "yml" => ConfigFileType::Yaml,
        "json" => ConfigFileType::Json,
        "jsonc" => ConfigFileType::Jsonc,
        _ => ConfigFileType::Unknown,
    }
}

/// Strip `//` and `/* */` comments from JSONC content, leaving string literals intact
pub fn strip_json_comments(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        result.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                result.push(c);
            }
            ('/', Some('/')) => {
                // Line comment: drop up to the newline, keep the newline
                for skipped in chars.by_ref() {
                    if skipped == '\n' || skipped == '\r' {
                        result.push(skipped);
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut previous = '\0';
                for skipped in chars.by_ref() {
                    if previous == '*' && skipped == '/' {
                        break;
                    }
                    previous = skipped;
                }
            }
            _ => result.push(c),
        }
    }

    result
}

/// Parse JSON content
pub fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    serde_json::from_str(content).map_err(ConfigError::from)
}

/// Parse JSONC content (JSON with comments)
pub fn parse_jsonc<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    parse_json(&strip_json_comments(content))
}

/// Parse YAML content
pub fn parse_yaml<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    serde_yaml::from_str(content).map_err(ConfigError::from)
}

/// Parse content based on the file type of `path`
pub fn parse_config<T: DeserializeOwned>(content: &str, path: &Path) -> Result<T, ConfigError> {
    match get_file_type(path) {
        ConfigFileType::Yaml => parse_yaml(content),
        ConfigFileType::Json => parse_json(content),
        ConfigFileType::Jsonc => parse_jsonc(content),
        ConfigFileType::Unknown => Err(ConfigError::UnknownFileType(path.display().to_string())),
    }
}

/// Read and parse one fixture file
pub fn load_fixture(path: &Path) -> Result<Fixture, ConfigError> {
    if get_file_type(path) == ConfigFileType::Unknown {
        return Err(ConfigError::UnknownFileType(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let fixture = parse_config(&content, path)?;
    tracing::info!(path = %path.display(), "loaded fixture");
    Ok(fixture)
}

/// Load every fixture file matching the glob `pattern`, in sorted path order
pub fn load_fixtures(pattern: &str) -> Result<Vec<Fixture>, ConfigError> {
    let mut paths = glob::glob(pattern)?.collect::<Result<Vec<PathBuf>, _>>()?;
    paths.sort();
    paths.iter().map(|path| load_fixture(path)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    #[rstest]
    #[case("test.yaml", ConfigFileType::Yaml)]
    #[case("test.YML", ConfigFileType::Yaml)]
    #[case("test.json", ConfigFileType::Json)]
    #[case("test.JSONC", ConfigFileType::Jsonc)]
    #[case("test.txt", ConfigFileType::Unknown)]
    #[case("test", ConfigFileType::Unknown)]
    #[case("", ConfigFileType::Unknown)]
    fn test_get_file_type(#[case] path: &str, #[case] expected: ConfigFileType) {
        assert_eq!(get_file_type(Path::new(path)), expected);
    }

    #[rstest]
    #[case("{\"key\": \"value\"}", "{\"key\":\"value\"}")]
    #[case("{\"key\": \"value\"} // comment", "{\"key\":\"value\"}")]
    #[case("{\"key\": \"value\"} /* block */", "{\"key\":\"value\"}")]
    #[case("{\"a\": 1, // one\n\"b\": 2}", "{\"a\":1,\"b\":2}")]
    #[case("{/* a ** b */\"a\": 1}", "{\"a\":1}")]
    fn test_strip_json_comments(#[case] input: &str, #[case] expected: &str) {
        let normalized = strip_json_comments(input).replace([' ', '\n'], "");
        assert_eq!(normalized, expected);
    }

    #[rstest]
    fn test_strip_json_comments_preserves_strings() {
        let input = r#"{"url": "http://example.com/*x*/", "note": "say \"//hi\""}"#;
        assert_eq!(strip_json_comments(input), input);
    }

    #[rstest]
    fn test_parse_jsonc() {
        let value: serde_json::Value = parse_jsonc("{\"id\": 1} // trailing").unwrap();
        assert_eq!(value["id"], 1);
    }

    #[rstest]
    fn test_parse_json_invalid() {
        let result: Result<serde_json::Value, _> = parse_json("invalid json");
        assert!(matches!(result.unwrap_err(), ConfigError::Json(_)));
    }

    #[rstest]
    fn test_parse_yaml_invalid() {
        let result: Result<serde_json::Value, _> = parse_yaml("invalid: yaml: [");
        assert!(matches!(result.unwrap_err(), ConfigError::Yaml(_)));
    }

    #[rstest]
    #[case("fixture.yaml", "models:\n  - name: author\n")]
    #[case("fixture.json", r#"{"models": [{"name": "author"}]}"#)]
    #[case("fixture.jsonc", r#"{"models": [{"name": "author"}]} // authors"#)]
    fn test_parse_config_formats(#[case] path: &str, #[case] content: &str) {
        let fixture: Fixture = parse_config(content, Path::new(path)).unwrap();
        assert_eq!(fixture.models.len(), 1);
        assert_eq!(fixture.models[0].name, "author");
    }

    #[rstest]
    fn test_parse_config_unknown_file_type() {
        let result: Result<Fixture, _> = parse_config("{}", Path::new("fixture.toml"));
        assert!(matches!(result.unwrap_err(), ConfigError::UnknownFileType(_)));
    }

    #[rstest]
    fn test_load_fixture_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_fixture(&dir.path().join("missing.yaml"));
        assert!(matches!(result.unwrap_err(), ConfigError::Io { .. }));
    }

    #[rstest]
    fn test_load_fixtures_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.yaml"), "models:\n  - name: book\n").unwrap();
        fs::write(dir.path().join("a.json"), r#"{"models": [{"name": "author"}]}"#).unwrap();

        let pattern = format!("{}/*.*", dir.path().display());
        let fixtures = load_fixtures(&pattern).unwrap();
        let names: Vec<&str> = fixtures
            .iter()
            .flat_map(|f| f.models.iter().map(|m| m.name.as_str()))
            .collect();
        assert_eq!(names, vec!["author", "book"]);
    }

    #[rstest]
    fn test_load_fixtures_invalid_pattern() {
        assert!(matches!(
            load_fixtures("[").unwrap_err(),
            ConfigError::Pattern(_)
        ));
    }
}
