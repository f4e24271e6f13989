use std::fs;
use std::sync::Arc;

use serde::Deserialize;
use strata_core::kernel::{Application, KernelSettings};
use strata_core::storage::{AssetLoader, LoadStrategy};
use strata_core::Container;
use strata_core::ServiceProvider;
use tempfile::tempdir;

use core_vfs::{DirectoryAssetLoader, VfsProvider};

#[derive(Debug, Deserialize, PartialEq)]
struct Rules {
    lives: u32,
}

#[test]
fn test_loader_reads_existing_file() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("game")).unwrap();
    fs::write(dir.path().join("game/rules.json"), r#"{"lives": 3}"#).unwrap();

    let loader = DirectoryAssetLoader::new(dir.path());
    assert_eq!(loader.load_text("game/rules.json").unwrap().as_deref(), Some(r#"{"lives": 3}"#));
}

#[test]
fn test_loader_missing_file_is_none() {
    let dir = tempdir().unwrap();
    let loader = DirectoryAssetLoader::new(dir.path());

    assert_eq!(loader.load_text("game/absent.json").unwrap(), None);
    assert_eq!(loader.load_text("game").unwrap(), None);
}

#[test]
fn test_loader_rejects_escaping_paths() {
    let dir = tempdir().unwrap();
    let loader = DirectoryAssetLoader::new(dir.path().join("inner"));

    assert!(loader.load_text("../outside.json").is_err());
}

#[test]
fn test_register_binds_capability() {
    let dir = tempdir().unwrap();
    let container = Container::new();

    VfsProvider::new(dir.path()).register(&container).unwrap();

    let loader = container
        .try_resolve_by_capability::<dyn AssetLoader>()
        .expect("capability should be bound");
    assert_eq!(loader.name(), "directory");
    assert!(container.resolve::<DirectoryAssetLoader>().is_ok());
}

#[tokio::test]
async fn test_virtual_configs_served_once_running() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("game")).unwrap();
    fs::write(dir.path().join("game/rules.json"), r#"{"lives": 5}"#).unwrap();

    let mut app = Application::builder()
        .settings(KernelSettings { project_root: dir.path().to_path_buf(), ..KernelSettings::default() })
        .provider(Arc::new(VfsProvider::new(dir.path())))
        .build();
    app.start().await.unwrap();

    let rules = app
        .configs()
        .get_config::<Rules>("game/rules.json", LoadStrategy::VirtualFileSystem, true)
        .unwrap();
    assert_eq!(rules.as_deref(), Some(&Rules { lives: 5 }));

    assert!(app.shutdown().await.is_clean());
}
