//! # Strata Storage System
//!
//! Config formats, filesystem access and the strategy-keyed [`ConfigCache`].
//!
//! - [`LoadStrategy`] picks where a config comes from: the bundled resource
//!   root or the [`AssetLoader`] capability bound in the container.
//! - [`ConfigCache`] memoizes loaded configs per strategy and path.
//! - [`LocalStorageProvider`] is the filesystem backend; writes go through a
//!   temp file that is renamed over the target.
pub mod asset;
pub mod cache;
pub mod config;
pub mod error;
pub mod local;
pub mod path;
pub mod provider;
pub mod strategy;

pub use asset::AssetLoader;
pub use cache::ConfigCache;
pub use config::{ConfigData, ConfigFormat};
pub use error::StorageSystemError;
pub use local::LocalStorageProvider;
pub use provider::StorageProvider;
pub use strategy::LoadStrategy;

#[cfg(test)]
mod tests;
