use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::kernel::error::Result;
use crate::storage::error::StorageSystemError;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Every format compiled in, in probing order
    pub fn all() -> &'static [ConfigFormat] {
        &[
            ConfigFormat::Json,
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml,
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml,
        ]
    }

    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from an extension string (without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(ConfigFormat::Json),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            #[cfg(feature = "toml-config")]
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Parse `data` into `T`.
    pub fn decode<T: DeserializeOwned>(&self, data: &str) -> Result<T> {
        let decoded = match self {
            ConfigFormat::Json => serde_json::from_str(data).map_err(|e| self.deserialization_error(e))?,
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|e| self.deserialization_error(e))?,
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| self.deserialization_error(e))?,
        };
        Ok(decoded)
    }

    /// Render `value` as text in this format.
    pub fn encode<T: Serialize>(&self, value: &T) -> Result<String> {
        let encoded = match self {
            ConfigFormat::Json => serde_json::to_string_pretty(value).map_err(|e| self.serialization_error(e))?,
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(value).map_err(|e| self.serialization_error(e))?,
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(value).map_err(|e| self.serialization_error(e))?,
        };
        Ok(encoded)
    }

    fn deserialization_error(&self, e: impl std::error::Error + Send + Sync + 'static) -> StorageSystemError {
        StorageSystemError::DeserializationError {
            format: self.extension().to_string(),
            source: Box::new(e),
        }
    }

    fn serialization_error(&self, e: impl std::error::Error + Send + Sync + 'static) -> StorageSystemError {
        StorageSystemError::SerializationError {
            format: self.extension().to_string(),
            source: Box::new(e),
        }
    }
}

/// Untyped configuration: a flat map of JSON values.
///
/// This is the config type to reach for when no dedicated struct exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigData {
    /// Raw configuration values
    #[serde(flatten)]
    values: HashMap<String, serde_json::Value>,
}

impl ConfigData {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a configuration value
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values.get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Get a configuration value with default
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Set a configuration value
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value).map_err(|e| StorageSystemError::SerializationError {
            format: "json".to_string(),
            source: Box::new(e),
        })?;
        self.values.insert(key.to_string(), json_value);
        Ok(())
    }

    /// Remove a configuration value
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.values.remove(key)
    }

    /// Check if key exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Get all keys
    pub fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merge with another config, overriding existing values
    pub fn merge(&mut self, other: &ConfigData) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }
}
