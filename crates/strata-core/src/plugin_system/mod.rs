//! # Strata Bootstrap Discovery
//!
//! Bootstraps are the simple lifecycle participants: three synchronous hooks
//! and no container access. Every bootstrap type is listed up front in a
//! [`BootstrapRegistry`]; the application discovers them once, at the start
//! of `Initializing`, and owns the instances from then on.
pub mod error;
pub mod registry;
pub mod traits;

pub use error::BootstrapError;
pub use registry::{BootstrapFactory, BootstrapRegistry, DiscoveryReport};
pub use traits::Bootstrap;

#[cfg(test)]
mod tests;
