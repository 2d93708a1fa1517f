use super::ConfigTree;
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Unsupported options format: {0}")]
    UnsupportedFormat(String),
    #[error("Options document must be a table at the top level")]
    NotATable,
}

/// Serialization formats accepted for option documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsFormat {
    Json,
    Toml,
}

impl OptionsFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| LoadError::UnsupportedFormat(path.display().to_string()))?;
        extension.parse()
    }
}

impl FromStr for OptionsFormat {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OptionsFormat::Json),
            "toml" => Ok(OptionsFormat::Toml),
            other => Err(LoadError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Read an option document from disk
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<ConfigTree, LoadError> {
    let path = path.as_ref();
    let format = OptionsFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;

    debug!(path = %path.display(), ?format, "Loading options file");
    parse_str(&content, format)
}

/// Parse an option document held in memory
pub fn parse_str(content: &str, format: OptionsFormat) -> Result<ConfigTree, LoadError> {
    let value = match format {
        OptionsFormat::Json => serde_json::from_str::<Value>(content)?,
        OptionsFormat::Toml => toml_to_json(toml::from_str::<toml::Value>(content)?),
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(LoadError::NotATable),
    }
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, val)| (key, toml_to_json(val)))
                .collect(),
        ),
    }
}
