use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::kernel::error::{Error, Result};
use crate::storage::config::{ConfigData, ConfigFormat};
use crate::storage::error::StorageSystemError;

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct Display {
    width: u32,
    height: u32,
    fullscreen: bool,
}

#[test]
fn test_config_data_basic() -> Result<()> {
    let mut config = ConfigData::new();

    config.set("string_value", "hello")?;
    config.set("int_value", 42)?;
    config.set("bool_value", true)?;
    config.set("array", vec![1, 2, 3])?;

    assert_eq!(config.get::<String>("string_value").unwrap(), "hello");
    assert_eq!(config.get::<i32>("int_value").unwrap(), 42);
    assert!(config.get::<bool>("bool_value").unwrap());
    assert_eq!(config.get::<Vec<i32>>("array").unwrap(), vec![1, 2, 3]);

    // Wrong type or missing key fall back to the default
    assert_eq!(config.get_or("missing_key", "default".to_string()), "default");
    assert_eq!(config.get_or("string_value", 0u8), 0);

    let removed = config.remove("int_value");
    assert!(removed.is_some());
    assert!(!config.contains_key("int_value"));

    let keys = config.keys();
    assert!(keys.contains(&"string_value".to_string()));
    assert!(!keys.contains(&"int_value".to_string()));
    Ok(())
}

#[test]
fn test_config_data_merge_overrides() -> Result<()> {
    let mut base = ConfigData::new();
    base.set("volume", 3)?;
    base.set("language", "en")?;

    let mut overrides = ConfigData::new();
    overrides.set("volume", 7)?;

    base.merge(&overrides);
    assert_eq!(base.get::<i32>("volume"), Some(7));
    assert_eq!(base.get::<String>("language").as_deref(), Some("en"));
    Ok(())
}

#[test]
fn test_format_from_path() {
    assert_eq!(ConfigFormat::from_path(Path::new("a/b.json")), Some(ConfigFormat::Json));
    assert_eq!(ConfigFormat::from_path(Path::new("a/b.JSON")), Some(ConfigFormat::Json));
    assert_eq!(ConfigFormat::from_path(Path::new("a/b.asset")), None);
    assert_eq!(ConfigFormat::from_path(Path::new("a/b")), None);
    #[cfg(feature = "yaml-config")]
    assert_eq!(ConfigFormat::from_path(Path::new("b.yml")), Some(ConfigFormat::Yaml));
    #[cfg(feature = "toml-config")]
    assert_eq!(ConfigFormat::from_path(Path::new("b.toml")), Some(ConfigFormat::Toml));
}

#[test]
fn test_encode_decode_typed_config() -> Result<()> {
    let display = Display { width: 1920, height: 1080, fullscreen: true };

    for format in ConfigFormat::all() {
        let text = format.encode(&display)?;
        let decoded: Display = format.decode(&text)?;
        assert_eq!(decoded, display, "format {:?}", format);
    }
    Ok(())
}

#[test]
fn test_decode_malformed_reports_format() {
    let err = ConfigFormat::Json.decode::<Display>("{ not json").unwrap_err();
    match err {
        Error::StorageSystem(StorageSystemError::DeserializationError { format, .. }) => {
            assert_eq!(format, "json");
        }
        other => panic!("Expected a deserialization error, got {:?}", other),
    }
}

#[test]
#[cfg(feature = "toml-config")]
fn test_config_data_from_toml() -> Result<()> {
    let config: ConfigData = ConfigFormat::Toml.decode("app_name = \"Test App TOML\"\nmax_connections = 15\n")?;

    assert_eq!(config.get::<String>("app_name").unwrap(), "Test App TOML");
    assert_eq!(config.get::<i32>("max_connections").unwrap(), 15);
    Ok(())
}
