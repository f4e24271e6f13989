//! Directory-backed virtual filesystem for Strata.
//!
//! [`VfsProvider`] binds a [`DirectoryAssetLoader`] as the `dyn AssetLoader`
//! capability, which the config cache uses for the virtual-filesystem load
//! strategy once the application is running.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use strata_core::container::Container;
use strata_core::kernel::error::Result as KernelResult;
use strata_core::kernel::provider::{HookContext, ServiceProvider};
use strata_core::storage::path::validate_relative;
use strata_core::storage::{AssetLoader, LocalStorageProvider, StorageProvider};

/// Serves assets from files under a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryAssetLoader {
    storage: LocalStorageProvider,
}

impl DirectoryAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { storage: LocalStorageProvider::new(root.into()) }
    }

    pub fn root(&self) -> &Path {
        self.storage.base_path()
    }
}

impl AssetLoader for DirectoryAssetLoader {
    fn name(&self) -> &str {
        "directory"
    }

    fn load_text(&self, path: &str) -> KernelResult<Option<String>> {
        validate_relative(path)?;
        let relative = Path::new(path);
        if !self.storage.is_file(relative) {
            return Ok(None);
        }
        self.storage.read_to_string(relative).map(Some)
    }
}

/// Provider that makes a [`DirectoryAssetLoader`] the asset-loading capability.
#[derive(Debug)]
pub struct VfsProvider {
    root: PathBuf,
}

impl VfsProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ServiceProvider for VfsProvider {
    fn name(&self) -> &str {
        "core-vfs"
    }

    async fn init(&self, _ctx: &HookContext) -> KernelResult<()> {
        if !self.root.is_dir() {
            log::warn!("VFS root {} does not exist yet", self.root.display());
        }
        Ok(())
    }

    fn register(&self, container: &Container) -> KernelResult<()> {
        let root = self.root.clone();
        container.bind_with_capability::<DirectoryAssetLoader, dyn AssetLoader, _>(
            move |_, _| Ok(Arc::new(DirectoryAssetLoader::new(root.clone()))),
            |loader| loader,
        );
        info!("Bound directory asset loader at {}", self.root.display());
        Ok(())
    }
}
