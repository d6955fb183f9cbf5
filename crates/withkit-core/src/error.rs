//! Error types for WithKit

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for WithKit operations
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Source root not readable: {path}: {reason}")]
    SourceRootError { path: PathBuf, reason: String },

    #[error("Entry collision: '{key}' is produced by both {first} and {second}")]
    EntryCollision {
        key: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Compile error in {entry}: {reason}")]
    CompileError { entry: String, reason: String },
}

/// Result type alias for WithKit operations
pub type Result<T> = std::result::Result<T, ThemeError>;

impl From<toml::de::Error> for ThemeError {
    fn from(err: toml::de::Error) -> Self {
        ThemeError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for ThemeError {
    fn from(err: toml::ser::Error) -> Self {
        ThemeError::TomlSerError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_message_names_both_sources() {
        let err = ThemeError::EntryCollision {
            key: "css/blocks/a".to_string(),
            first: PathBuf::from("src/a.scss"),
            second: PathBuf::from("src/a/index.scss"),
        };
        let msg = err.to_string();
        assert!(msg.contains("css/blocks/a"));
        assert!(msg.contains("src/a.scss"));
        assert!(msg.contains("src/a/index.scss"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let parse: std::result::Result<toml::Value, _> = toml::from_str("= broken");
        let err: ThemeError = parse.unwrap_err().into();
        assert!(matches!(err, ThemeError::TomlParseError(_)));
    }
}
