//! # Strata Storage System Errors
//!
//! Defines [`StorageSystemError`], covering file I/O, config format
//! (de)serialization, load-strategy selection and the config cache.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageSystemError {
    #[error("I/O error during operation '{operation}' on path '{path}': {source}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization to '{format}' failed: {source}")]
    SerializationError {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Deserialization from '{format}' failed: {source}")]
    DeserializationError {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Unsupported configuration format: {0}")]
    UnsupportedConfigFormat(String),

    #[error("Unknown config load strategy '{tag}'")]
    UnknownLoadStrategy { tag: String },

    #[error("Cached config at '{key}' is not a '{expected}'")]
    ConfigTypeMismatch { key: String, expected: &'static str },

    #[error("'{operation}' is only available in design-time mode")]
    DesignTimeOnly { operation: &'static str },

    #[error("Storage operation '{operation}' failed for path '{}': {message}", path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "<unknown>".into()))]
    OperationFailed {
        operation: String,
        path: Option<PathBuf>,
        message: String,
    },

    #[error("Invalid path provided: '{path}': {reason}")]
    InvalidPath { path: PathBuf, reason: String },
}

// Helper for creating Io errors, ensuring path is always included.
impl StorageSystemError {
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        StorageSystemError::Io {
            source,
            operation: operation.into(),
            path,
        }
    }
}
