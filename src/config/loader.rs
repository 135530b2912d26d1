//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServerConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Yaml,
    Json,
}

impl Format {
    /// Pick a format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match ext.as_str() {
            "toml" => Ok(Format::Toml),
            "yaml" | "yml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            _ => Err(LoadError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Load configuration from a TOML, YAML or JSON file.
///
/// Only syntax is checked here; the rule set is validated when it is
/// compiled.
pub fn load_config(path: &Path) -> Result<ServerConfig, LoadError> {
    let format = Format::from_path(path)?;
    let content = fs::read_to_string(path)?;
    parse_config(&content, format)
}

/// Decode configuration text in the given format.
pub fn parse_config(content: &str, format: Format) -> Result<ServerConfig, LoadError> {
    match format {
        Format::Toml => toml::from_str(content).map_err(|e| LoadError::Parse(e.to_string())),
        Format::Yaml => serde_yaml::from_str(content).map_err(|e| LoadError::Parse(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| LoadError::Parse(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a/rules.toml")).unwrap(), Format::Toml);
        assert_eq!(Format::from_path(Path::new("rules.YML")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("rules.json")).unwrap(), Format::Json);
        assert!(matches!(
            Format::from_path(Path::new("rules.ini")),
            Err(LoadError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_parse_json_config() {
        let config = parse_config(
            r#"{"listener": {"bind_address": "127.0.0.1:9000"},
                "rules": {"matchers": [{"path": {"prefix": "/api"}, "statusCode": 503}]}}"#,
            Format::Json,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.rules.matchers[0].status_code, Some(503));
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[rules\nmatchers = 1", Format::Toml).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/inline-response.toml")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
