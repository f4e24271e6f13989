use std::fmt;
use std::str::FromStr;

use crate::kernel::constants::{BUNDLED_RESOURCE_TAG, VIRTUAL_FILESYSTEM_TAG};
use crate::storage::error::StorageSystemError;

/// How a config is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadStrategy {
    /// Read from the packaged resource root
    BundledResource,
    /// Delegate to the asset-loading capability
    VirtualFileSystem,
}

impl LoadStrategy {
    /// Short tag used in cache keys
    pub fn tag(&self) -> &'static str {
        match self {
            LoadStrategy::BundledResource => BUNDLED_RESOURCE_TAG,
            LoadStrategy::VirtualFileSystem => VIRTUAL_FILESYSTEM_TAG,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LoadStrategy::BundledResource => "bundled-resource",
            LoadStrategy::VirtualFileSystem => "virtual-filesystem",
        }
    }

    /// Accepts both the long name and the short tag.
    pub fn from_tag(tag: &str) -> Result<Self, StorageSystemError> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "bundled-resource" | BUNDLED_RESOURCE_TAG => Ok(LoadStrategy::BundledResource),
            "virtual-filesystem" | VIRTUAL_FILESYSTEM_TAG => Ok(LoadStrategy::VirtualFileSystem),
            _ => Err(StorageSystemError::UnknownLoadStrategy { tag: tag.to_string() }),
        }
    }

    /// Cache key for `path` under this strategy.
    pub fn cache_key(&self, path: &str) -> String {
        format!("{}:{}", self.tag(), path)
    }
}

impl FromStr for LoadStrategy {
    type Err = StorageSystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s)
    }
}

impl fmt::Display for LoadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
