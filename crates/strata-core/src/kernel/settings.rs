//! Host settings for the kernel and the config cache.
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::kernel::constants;
use crate::kernel::error::Result;
use crate::storage::config::ConfigFormat;
use crate::storage::error::StorageSystemError;

/// Whether the process is the live application or design-time tooling.
///
/// Only live mode reads the config cache before loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Running application
    #[default]
    Live,
    /// Editors, generators and other tooling working on the project tree
    DesignTime,
}

impl ExecutionMode {
    pub fn is_live(&self) -> bool {
        matches!(self, ExecutionMode::Live)
    }

    pub fn is_design_time(&self) -> bool {
        matches!(self, ExecutionMode::DesignTime)
    }
}

/// Settings consumed by [`Application`](crate::kernel::Application).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelSettings {
    /// Root of the bundled config resources
    pub resource_root: PathBuf,
    /// Root for design-time direct loads and config creation
    pub project_root: PathBuf,
    /// Local storage root
    pub data_dir: PathBuf,
    pub execution_mode: ExecutionMode,
    /// Suffix for bare logical paths at design time and format for created configs
    pub default_format: ConfigFormat,
    /// Per-phase deadline; `0` disables it
    pub phase_timeout_ms: u64,
}

impl Default for KernelSettings {
    fn default() -> Self {
        Self {
            resource_root: PathBuf::from(constants::DEFAULT_RESOURCE_ROOT),
            project_root: PathBuf::from("."),
            data_dir: PathBuf::from(constants::DEFAULT_DATA_DIR),
            execution_mode: ExecutionMode::Live,
            default_format: ConfigFormat::Json,
            phase_timeout_ms: constants::DEFAULT_PHASE_TIMEOUT_MS,
        }
    }
}

impl KernelSettings {
    /// Load settings from a file; the format follows the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            StorageSystemError::UnsupportedConfigFormat(path.display().to_string())
        })?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| StorageSystemError::io(e, "read_settings", path.to_path_buf()))?;
        Ok(format.decode(&content)?)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("No settings file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn phase_timeout(&self) -> Option<Duration> {
        match self.phase_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// Storage reserved for the framework itself
    pub fn framework_storage_path(&self) -> PathBuf {
        self.data_dir.join(constants::FRAMEWORK_STORAGE_DIR)
    }

    /// Storage handed to application code
    pub fn app_storage_path(&self) -> PathBuf {
        self.data_dir.join(constants::APP_STORAGE_DIR)
    }
}
