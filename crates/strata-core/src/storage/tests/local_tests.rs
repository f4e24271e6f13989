use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

use crate::kernel::error::Result;
use crate::storage::provider::StorageProvider;
use crate::storage::local::LocalStorageProvider;

// Helper function to create PathBuf from str for tests
fn p(s: &str) -> PathBuf {
    PathBuf::from(s)
}

#[test]
fn test_write_and_read_string() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(temp_dir.path().to_path_buf());

    provider.write_string(&p("settings.json"), "{\"volume\": 3}")?;

    assert_eq!(provider.read_to_string(&p("settings.json"))?, "{\"volume\": 3}");
    Ok(())
}

#[test]
fn test_write_creates_missing_parents() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(temp_dir.path().to_path_buf());

    let nested = p("audio/mixer/levels.toml");
    provider.write_string(&nested, "master = 1")?;

    assert!(provider.is_file(&nested), "Nested file should exist after write");
    assert!(temp_dir.path().join("audio/mixer").is_dir());
    Ok(())
}

#[test]
fn test_write_replaces_existing_content() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(temp_dir.path().to_path_buf());

    provider.write_string(&p("a.json"), "first")?;
    provider.write_string(&p("a.json"), "second")?;

    assert_eq!(provider.read_to_string(&p("a.json"))?, "second");
    // Only the target remains; the temp file was renamed over it
    let entries: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    Ok(())
}

#[test]
fn test_is_file_on_directories_and_missing_paths() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(temp_dir.path().to_path_buf());

    fs::create_dir_all(temp_dir.path().join("my_dir/inner")).unwrap();

    assert!(!provider.is_file(&p("my_dir")));
    assert!(!provider.is_file(&p("my_dir/inner")));
    assert!(!provider.is_file(&p("not_real")));
    Ok(())
}

#[test]
fn test_read_missing_file_reports_path() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(temp_dir.path().to_path_buf());

    let err = provider.read_to_string(&p("absent.json")).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("read_to_string"), "unexpected error: {}", message);
    assert!(message.contains("absent.json"), "unexpected error: {}", message);
}
