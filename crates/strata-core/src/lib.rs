//! # Strata Core
//!
//! Application-framework core: a lifecycle orchestrator ([`kernel`]), the
//! binding [`container`] it wires providers through, explicit bootstrap
//! discovery ([`plugin_system`]) and a strategy-keyed config cache
//! ([`storage`]).
pub mod container;
pub mod kernel;
pub mod plugin_system;
pub mod storage;

pub use container::{Container, ContainerError, Lifetime, ResolveArgs};
pub use kernel::error::Error as KernelError;
pub use kernel::{
    Application, ApplicationBuilder, CancelSignal, ExecutionMode, HookContext, KernelSettings, Phase,
    ServiceProvider, ShutdownReport,
};
pub use plugin_system::{Bootstrap, BootstrapRegistry};
pub use storage::{AssetLoader, ConfigCache, ConfigData, ConfigFormat, LoadStrategy};
