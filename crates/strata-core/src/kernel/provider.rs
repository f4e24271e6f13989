use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::container::Container;
use crate::kernel::error::Result;
use crate::kernel::phase::{CancelSignal, Phase};
use crate::kernel::settings::KernelSettings;
use crate::storage::cache::ConfigCache;

/// Named component driven through the four provider hooks.
///
/// Hooks run one provider at a time, in registration order. An `Err` from
/// `init`, `register` or `start` aborts startup at that provider; an `Err`
/// from `close` is logged and the remaining providers still close.
#[async_trait]
pub trait ServiceProvider: Send + Sync + Debug {
    /// Name used in log lines and errors
    fn name(&self) -> &str;

    async fn init(&self, _ctx: &HookContext) -> Result<()> {
        Ok(())
    }

    /// Bind this provider's services. Runs once every provider has initialized.
    fn register(&self, container: &Container) -> Result<()>;

    async fn start(&self, _ctx: &HookContext) -> Result<()> {
        Ok(())
    }

    /// Release whatever the provider constructed.
    async fn close(&self, _ctx: &HookContext) -> Result<()> {
        Ok(())
    }
}

/// What a provider hook gets to see.
#[derive(Debug, Clone)]
pub struct HookContext {
    phase: Phase,
    container: Arc<Container>,
    configs: Arc<ConfigCache>,
    settings: Arc<KernelSettings>,
    cancel: CancelSignal,
    deadline: Option<Instant>,
}

impl HookContext {
    pub(crate) fn new(
        phase: Phase,
        container: Arc<Container>,
        configs: Arc<ConfigCache>,
        settings: Arc<KernelSettings>,
        cancel: CancelSignal,
        deadline: Option<Instant>,
    ) -> Self {
        Self { phase, container, configs, settings, cancel, deadline }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    pub fn configs(&self) -> &Arc<ConfigCache> {
        &self.configs
    }

    pub fn settings(&self) -> &KernelSettings {
        &self.settings
    }

    /// Startup cancellation. Close hooks see it too but are never interrupted by it.
    pub fn cancel_signal(&self) -> &CancelSignal {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Instant at which the hook is abandoned, if a phase timeout is set.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; zero once it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline.map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}
