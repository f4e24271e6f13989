//! # Config Cache
//!
//! Loads typed configs through a [`LoadStrategy`] and memoizes them under
//! `"<tag>:<path>"`, so one path loaded by two strategies is two entries.
//!
//! Cache reads only happen in live mode with `cache_prior` set; every load,
//! including one that found nothing, is written back. Entries never expire on
//! their own; use [`ConfigCache::invalidate`] or [`ConfigCache::clear`].
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::container::Container;
use crate::kernel::error::Result;
use crate::kernel::phase::PhaseTracker;
use crate::kernel::settings::{ExecutionMode, KernelSettings};
use crate::storage::asset::AssetLoader;
use crate::storage::config::ConfigFormat;
use crate::storage::error::StorageSystemError;
use crate::storage::local::LocalStorageProvider;
use crate::storage::path;
use crate::storage::provider::StorageProvider;
use crate::storage::strategy::LoadStrategy;

type CachedConfig = Option<Arc<dyn Any + Send + Sync>>;

/// Strategy-aware config loader with a process-lifetime cache.
pub struct ConfigCache {
    mode: ExecutionMode,
    default_format: ConfigFormat,
    resources: Arc<dyn StorageProvider>,
    project: Arc<dyn StorageProvider>,
    container: Arc<Container>,
    phase: PhaseTracker,
    entries: RwLock<HashMap<String, CachedConfig>>,
}

impl ConfigCache {
    /// Cache reading bundled configs from `settings.resource_root` and
    /// design-time files from `settings.project_root`.
    pub fn new(settings: &KernelSettings, container: Arc<Container>, phase: PhaseTracker) -> Self {
        Self::with_storage(
            settings,
            Arc::new(LocalStorageProvider::new(settings.resource_root.clone())),
            Arc::new(LocalStorageProvider::new(settings.project_root.clone())),
            container,
            phase,
        )
    }

    pub fn with_storage(
        settings: &KernelSettings,
        resources: Arc<dyn StorageProvider>,
        project: Arc<dyn StorageProvider>,
        container: Arc<Container>,
        phase: PhaseTracker,
    ) -> Self {
        Self {
            mode: settings.execution_mode,
            default_format: settings.default_format,
            resources,
            project,
            container,
            phase,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Load the config at `path` with `strategy`.
    ///
    /// `Ok(None)` means nothing exists at the path. A cached entry of another
    /// type yields [`StorageSystemError::ConfigTypeMismatch`].
    pub fn get_config<T>(&self, path: &str, strategy: LoadStrategy, cache_prior: bool) -> Result<Option<Arc<T>>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        let key = strategy.cache_key(path);

        if cache_prior && self.mode.is_live() {
            let hit = self.entries.read().get(&key).cloned();
            if let Some(cached) = hit {
                log::debug!("Config cache hit for {}", key);
                return downcast_cached::<T>(&key, cached);
            }
        }

        log::debug!("Loading config {} (cache_prior={})", key, cache_prior);
        let loaded = self.load::<T>(path, strategy)?;
        let erased: CachedConfig = loaded.clone().map(|config| config as Arc<dyn Any + Send + Sync>);
        self.entries.write().insert(key, erased);
        Ok(loaded)
    }

    /// [`get_config`](Self::get_config) with the strategy given as a tag.
    pub fn get_config_by_tag<T>(&self, path: &str, tag: &str, cache_prior: bool) -> Result<Option<Arc<T>>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        let strategy = LoadStrategy::from_tag(tag)?;
        self.get_config::<T>(path, strategy, cache_prior)
    }

    /// Load the config, creating and persisting `T::default()` when missing.
    ///
    /// Design-time only.
    pub fn create_if_not_exists<T>(&self, path: &str, strategy: LoadStrategy) -> Result<Arc<T>>
    where
        T: DeserializeOwned + Serialize + Default + Send + Sync + 'static,
    {
        if self.mode.is_live() {
            return Err(StorageSystemError::DesignTimeOnly { operation: "create_if_not_exists" }.into());
        }
        if let Some(existing) = self.get_config::<T>(path, strategy, false)? {
            return Ok(existing);
        }

        let target = path::design_time_path(path, self.default_format);
        let storage = match strategy {
            LoadStrategy::BundledResource => &self.resources,
            LoadStrategy::VirtualFileSystem => &self.project,
        };
        // The write target is authoritative, whatever the loader reported.
        if let Some(existing) = self.read_file::<T>(storage.as_ref(), &target)? {
            self.entries
                .write()
                .insert(strategy.cache_key(path), Some(existing.clone() as Arc<dyn Any + Send + Sync>));
            return Ok(existing);
        }

        let format = ConfigFormat::from_path(&target).unwrap_or(self.default_format);
        let config = Arc::new(T::default());
        let content = format.encode(config.as_ref())?;
        storage.write_string(&target, &content)?;
        log::info!("Created {} config at {}", strategy, target.display());

        self.entries
            .write()
            .insert(strategy.cache_key(path), Some(config.clone() as Arc<dyn Any + Send + Sync>));
        Ok(config)
    }

    /// Drop one entry; returns whether it was cached.
    pub fn invalidate(&self, path: &str, strategy: LoadStrategy) -> bool {
        self.entries.write().remove(&strategy.cache_key(path)).is_some()
    }

    pub fn contains(&self, path: &str, strategy: LoadStrategy) -> bool {
        self.entries.read().contains_key(&strategy.cache_key(path))
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn load<T>(&self, path: &str, strategy: LoadStrategy) -> Result<Option<Arc<T>>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        path::validate_relative(path)?;
        match strategy {
            LoadStrategy::BundledResource => self.load_bundled(path),
            LoadStrategy::VirtualFileSystem => self.load_virtual(path),
        }
    }

    fn load_bundled<T>(&self, path: &str) -> Result<Option<Arc<T>>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        if self.mode.is_design_time() {
            let target = path::design_time_path(path, self.default_format);
            return self.read_file(self.resources.as_ref(), &target);
        }
        for (candidate, format) in path::bundled_candidates(path) {
            if self.resources.is_file(&candidate) {
                let content = self.resources.read_to_string(&candidate)?;
                return Ok(Some(Arc::new(format.decode(&content)?)));
            }
        }
        Ok(None)
    }

    fn load_virtual<T>(&self, path: &str) -> Result<Option<Arc<T>>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        if !self.phase.is_running() {
            // Nothing is bound yet; read straight from the project tree.
            let target = path::design_time_path(path, self.default_format);
            return self.read_file(self.project.as_ref(), &target);
        }

        let Some(loader) = self.container.try_resolve_by_capability::<dyn AssetLoader>() else {
            log::warn!("No asset loader bound; treating {} as missing", path);
            return Ok(None);
        };
        let target = path::design_time_path(path, self.default_format);
        let request = target.to_string_lossy();
        let text = match loader.load_text(&request) {
            Ok(Some(text)) => text,
            Ok(None) => return Ok(None),
            Err(e) => {
                log::warn!("Asset loader '{}' failed for {}: {}", loader.name(), path, e);
                return Ok(None);
            }
        };
        let format = ConfigFormat::from_path(&target).unwrap_or(self.default_format);
        Ok(Some(Arc::new(format.decode(&text)?)))
    }

    fn read_file<T>(&self, storage: &dyn StorageProvider, target: &Path) -> Result<Option<Arc<T>>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        if !storage.is_file(target) {
            return Ok(None);
        }
        let format = ConfigFormat::from_path(target).unwrap_or(self.default_format);
        let content = storage.read_to_string(target)?;
        Ok(Some(Arc::new(format.decode(&content)?)))
    }
}

fn downcast_cached<T>(key: &str, cached: CachedConfig) -> Result<Option<Arc<T>>>
where
    T: Send + Sync + 'static,
{
    match cached {
        None => Ok(None),
        Some(config) => config.downcast::<T>().map(Some).map_err(|_| {
            StorageSystemError::ConfigTypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
            }
            .into()
        }),
    }
}

impl fmt::Debug for ConfigCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigCache")
            .field("mode", &self.mode)
            .field("default_format", &self.default_format)
            .field("resources", &self.resources)
            .field("project", &self.project)
            .field("entries", &self.entries.read().len())
            .finish()
    }
}
