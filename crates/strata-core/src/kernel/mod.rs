//! # Strata Kernel
//!
//! The lifecycle orchestrator. An [`Application`] owns the binding
//! [`Container`](crate::container::Container), the
//! [`ConfigCache`](crate::storage::ConfigCache), the registered
//! [`ServiceProvider`]s and the discovered
//! [`Bootstrap`](crate::plugin_system::Bootstrap)s, and walks them through
//! the [`Phase`]s in order:
//!
//! 1. `Initializing`: bootstraps are discovered and initialized, then each
//!    provider's `init` runs to completion before the next.
//! 2. `Registering`: each provider binds its services.
//! 3. `Starting`: each provider's `start`, then each bootstrap's `start`.
//! 4. `Running`: services and configs are available.
//! 5. `Closing`: bootstraps quit, then every provider closes even if an
//!    earlier one failed; the container is cleared.
//! 6. `Terminated`.
//!
//! Provider hooks are bounded by the per-phase timeout from
//! [`KernelSettings`] and startup hooks can be interrupted through the
//! application's [`CancelSignal`].
pub mod bootstrap;
pub mod constants;
pub mod error;
pub mod phase;
pub mod provider;
pub mod settings;

pub use bootstrap::{Application, ApplicationBuilder, ShutdownReport};
pub use error::{Error, Result};
pub use phase::{CancelSignal, Phase, PhaseTracker};
pub use provider::{HookContext, ServiceProvider};
pub use settings::{ExecutionMode, KernelSettings};
