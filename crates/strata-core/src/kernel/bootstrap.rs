use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

use tokio::time::Instant;

use crate::container::{Container, ContainerError};
use crate::kernel::constants;
use crate::kernel::error::{Error, Result};
use crate::kernel::phase::{CancelSignal, Phase, PhaseTracker};
use crate::kernel::provider::{HookContext, ServiceProvider};
use crate::kernel::settings::KernelSettings;
use crate::plugin_system::error::{panic_message, BootstrapError};
use crate::plugin_system::{Bootstrap, BootstrapRegistry, DiscoveryReport};
use crate::storage::cache::ConfigCache;

/// Outcome of [`Application::shutdown`]. Shutdown never fails; hook failures
/// are collected here after being logged.
#[derive(Debug, Default)]
pub struct ShutdownReport {
    /// Whether the close sequence ran at all (only from `Running`)
    pub ran: bool,
    /// Providers whose close hook completed, in close order
    pub closed: Vec<String>,
    /// One [`Error::ShutdownHook`] per provider whose close hook failed
    pub failures: Vec<Error>,
}

impl ShutdownReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The host application: owns the container, the config cache, the
/// providers and the bootstraps, and drives them through the phases.
pub struct Application {
    settings: Arc<KernelSettings>,
    phase: PhaseTracker,
    cancel: CancelSignal,
    container: Arc<Container>,
    configs: Arc<ConfigCache>,
    providers: Vec<Arc<dyn ServiceProvider>>,
    bootstrap_registry: BootstrapRegistry,
    bootstraps: Vec<Box<dyn Bootstrap>>,
    discovery: Option<DiscoveryReport>,
    started: bool,
}

impl Application {
    /// Application with no providers and no bootstraps.
    pub fn new(settings: KernelSettings) -> Self {
        let phase = PhaseTracker::new();
        let container = Arc::new(Container::new());
        let configs = Arc::new(ConfigCache::new(&settings, container.clone(), phase.clone()));
        Self {
            settings: Arc::new(settings),
            phase,
            cancel: CancelSignal::new(),
            container,
            configs,
            providers: Vec::new(),
            bootstrap_registry: BootstrapRegistry::new(),
            bootstraps: Vec::new(),
            discovery: None,
            started: false,
        }
    }

    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::default()
    }

    pub fn settings(&self) -> &KernelSettings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        self.phase.current()
    }

    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }

    /// Read-only handle on the phase, e.g. to wait for `Running` elsewhere.
    pub fn phase_tracker(&self) -> PhaseTracker {
        self.phase.clone()
    }

    /// Signal that aborts an in-flight [`start`](Self::start).
    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }

    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    pub fn configs(&self) -> &Arc<ConfigCache> {
        &self.configs
    }

    pub fn resolve<T>(&self) -> std::result::Result<Arc<T>, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.container.resolve::<T>()
    }

    pub fn try_resolve_by_capability<C>(&self) -> Option<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.container.try_resolve_by_capability::<C>()
    }

    pub fn is_capability_bound<C>(&self) -> bool
    where
        C: ?Sized + 'static,
    {
        self.container.is_capability_bound::<C>()
    }

    /// Bootstrap registry; entries added after `start` are never discovered.
    pub fn bootstrap_registry_mut(&mut self) -> &mut BootstrapRegistry {
        &mut self.bootstrap_registry
    }

    /// Add a provider at the end of the order.
    ///
    /// Returns `false` if this exact provider is already registered. A provider
    /// added after startup began only receives hooks of phases not yet run.
    pub fn register_service_provider(&mut self, provider: Arc<dyn ServiceProvider>) -> bool {
        if self.providers.iter().any(|existing| Arc::ptr_eq(existing, &provider)) {
            log::debug!("Provider '{}' is already registered", provider.name());
            return false;
        }
        if self.started {
            log::warn!(
                "Provider '{}' registered during {}; earlier phases will not run for it",
                provider.name(),
                self.phase()
            );
        }
        self.providers.push(provider);
        true
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Discovered bootstraps once started, registered ones before that.
    pub fn bootstrap_names(&self) -> Vec<String> {
        if self.discovery.is_some() {
            self.bootstraps.iter().map(|b| b.name().to_string()).collect()
        } else {
            self.bootstrap_registry.names().into_iter().map(String::from).collect()
        }
    }

    /// Bootstraps that failed to instantiate, once discovery has run.
    pub fn discovery_report(&self) -> Option<&DiscoveryReport> {
        self.discovery.as_ref()
    }

    pub fn framework_storage_path(&self) -> PathBuf {
        self.settings.framework_storage_path()
    }

    pub fn app_storage_path(&self) -> PathBuf {
        self.settings.app_storage_path()
    }

    /// Run every startup phase, ending in `Running`.
    ///
    /// Only the first call runs any hooks. A failing, timed-out or cancelled
    /// provider hook stops startup at that provider and the error is
    /// returned; phases already run are not rolled back.
    ///
    /// Later calls return `Ok(())` if startup reached `Running`, and
    /// [`Error::StartupIncomplete`] if the first start stopped short.
    pub async fn start(&mut self) -> Result<()> {
        if self.started {
            let phase = self.phase();
            log::info!("Application already started (phase {}); ignoring start", phase);
            if phase < Phase::Running {
                return Err(Error::StartupIncomplete { phase });
            }
            return Ok(());
        }
        self.started = true;
        log::info!("Starting {} v{}", constants::APP_NAME, constants::APP_VERSION);

        let result = self.run_startup().await;
        if let Err(e) = &result {
            log::error!("Startup did not complete: {}", e);
        }
        result
    }

    async fn run_startup(&mut self) -> Result<()> {
        self.phase.advance(Phase::Initializing)?;
        let (bootstraps, report) = self.bootstrap_registry.discover();
        log::info!(
            "Discovered {} bootstrap(s), {} failed",
            report.discovered.len(),
            report.failures.len()
        );
        self.bootstraps = bootstraps;
        self.discovery = Some(report);

        self.call_bootstraps("init", |b| b.init());
        let deadline = self.phase_deadline();
        for provider in self.providers.clone() {
            log::info!("[provider init] {}", provider.name());
            self.run_hook(Phase::Initializing, &provider, deadline, true, |p, ctx| async move {
                p.init(&ctx).await
            })
            .await?;
        }

        self.phase.advance(Phase::Registering)?;
        for provider in self.providers.clone() {
            log::info!("[provider register] {}", provider.name());
            self.register_provider(&provider)?;
        }

        self.phase.advance(Phase::Starting)?;
        let deadline = self.phase_deadline();
        for provider in self.providers.clone() {
            log::info!("[provider start] {}", provider.name());
            self.run_hook(Phase::Starting, &provider, deadline, true, |p, ctx| async move {
                p.start(&ctx).await
            })
            .await?;
        }
        log::info!("Framework startup finished");

        self.call_bootstraps("start", |b| b.start());
        self.phase.advance(Phase::Running)?;
        log::info!("Application startup finished");
        Ok(())
    }

    /// Close everything and move to `Terminated`.
    ///
    /// Does nothing unless the application is `Running`. Bootstraps quit
    /// first, then every provider closes in registration order, each with its
    /// own timeout. Failures are logged and collected, never propagated.
    pub async fn shutdown(&mut self) -> ShutdownReport {
        let mut report = ShutdownReport::default();
        let current = self.phase();
        if current != Phase::Running {
            log::info!("Shutdown requested in phase {}; nothing to close", current);
            return report;
        }
        report.ran = true;
        self.advance_for_shutdown(Phase::Closing);

        self.call_bootstraps("quit", |b| b.quit());

        for provider in self.providers.clone() {
            log::info!("[provider close] {}", provider.name());
            let deadline = self.phase_deadline();
            let outcome = self
                .run_hook(Phase::Closing, &provider, deadline, false, |p, ctx| async move {
                    p.close(&ctx).await
                })
                .await;
            match outcome {
                Ok(()) => report.closed.push(provider.name().to_string()),
                Err(e) => {
                    let source = match e {
                        Error::LifecyclePhaseFailure { source, .. } => source,
                        other => Box::new(other),
                    };
                    let failure = Error::ShutdownHook { provider: provider.name().to_string(), source };
                    log::error!("{}", failure);
                    report.failures.push(failure);
                }
            }
        }

        self.configs.clear();
        self.container.clear();
        self.advance_for_shutdown(Phase::Terminated);
        log::info!(
            "Shutdown finished: {} provider(s) closed, {} failure(s)",
            report.closed.len(),
            report.failures.len()
        );
        report
    }

    fn advance_for_shutdown(&self, next: Phase) {
        if let Err(e) = self.phase.advance(next) {
            log::error!("{}", e);
        }
    }

    fn phase_deadline(&self) -> Option<Instant> {
        self.settings.phase_timeout().map(|timeout| Instant::now() + timeout)
    }

    fn hook_context(&self, phase: Phase, deadline: Option<Instant>) -> HookContext {
        HookContext::new(
            phase,
            self.container.clone(),
            self.configs.clone(),
            self.settings.clone(),
            self.cancel.clone(),
            deadline,
        )
    }

    fn register_provider(&self, provider: &Arc<dyn ServiceProvider>) -> Result<()> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| provider.register(&self.container)))
            .unwrap_or_else(|payload| {
                Err(Error::Other(format!("register panicked: {}", panic_message(payload.as_ref()))))
            });
        outcome.map_err(|source| {
            let e = Error::LifecyclePhaseFailure {
                phase: Phase::Registering,
                provider: provider.name().to_string(),
                source: Box::new(source),
            };
            log::error!("{}", e);
            e
        })
    }

    /// Run one provider hook on its own task, racing it against the deadline
    /// and, when `cancellable`, the cancel signal.
    async fn run_hook<F, Fut>(
        &self,
        phase: Phase,
        provider: &Arc<dyn ServiceProvider>,
        deadline: Option<Instant>,
        cancellable: bool,
        hook: F,
    ) -> Result<()>
    where
        F: FnOnce(Arc<dyn ServiceProvider>, HookContext) -> Fut,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let name = provider.name().to_string();
        if cancellable && self.cancel.is_cancelled() {
            let e = Error::PhaseCancelled { phase, provider: name };
            log::error!("{}", e);
            return Err(e);
        }

        let ctx = self.hook_context(phase, deadline);
        let mut task = tokio::spawn(hook(provider.clone(), ctx));
        let expired = async {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled(), if cancellable => {
                task.abort();
                Err(Error::PhaseCancelled { phase, provider: name })
            }
            joined = &mut task => match joined {
                Ok(Ok(())) => Ok(()),
                Ok(Err(source)) => Err(Error::LifecyclePhaseFailure {
                    phase,
                    provider: name,
                    source: Box::new(source),
                }),
                Err(join_error) => {
                    let message = if join_error.is_panic() {
                        format!("hook panicked: {}", panic_message(join_error.into_panic().as_ref()))
                    } else {
                        "hook task was cancelled".to_string()
                    };
                    Err(Error::LifecyclePhaseFailure {
                        phase,
                        provider: name,
                        source: Box::new(Error::Other(message)),
                    })
                }
            },
            _ = expired => {
                task.abort();
                Err(Error::PhaseTimeout {
                    phase,
                    provider: name,
                    timeout: self.settings.phase_timeout().unwrap_or_default(),
                })
            }
        };

        if let Err(e) = &outcome {
            if phase != Phase::Closing {
                log::error!("{}", e);
            }
        }
        outcome
    }

    fn call_bootstraps(&mut self, hook: &str, call: impl Fn(&mut dyn Bootstrap)) {
        for bootstrap in self.bootstraps.iter_mut() {
            let name = bootstrap.name();
            log::debug!("[bootstrap {}] {}", hook, name);
            let result = panic::catch_unwind(AssertUnwindSafe(|| call(bootstrap.as_mut())));
            if let Err(payload) = result {
                let e = BootstrapError::Panicked {
                    name: name.to_string(),
                    message: format!("{} hook: {}", hook, panic_message(payload.as_ref())),
                };
                log::error!("{}", e);
            }
        }
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("phase", &self.phase())
            .field("providers", &self.provider_names())
            .field("bootstraps", &self.bootstrap_names())
            .field("started", &self.started)
            .finish()
    }
}

/// Builder for [`Application`].
#[derive(Default)]
pub struct ApplicationBuilder {
    settings: KernelSettings,
    bootstraps: BootstrapRegistry,
    providers: Vec<Arc<dyn ServiceProvider>>,
}

impl ApplicationBuilder {
    pub fn settings(mut self, settings: KernelSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn bootstrap<B>(mut self) -> Self
    where
        B: Bootstrap + Default + 'static,
    {
        self.bootstraps.register::<B>();
        self
    }

    pub fn bootstrap_factory<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> std::result::Result<Box<dyn Bootstrap>, BootstrapError> + Send + Sync + 'static,
    {
        self.bootstraps.register_factory(name, factory);
        self
    }

    pub fn provider(mut self, provider: Arc<dyn ServiceProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn build(self) -> Application {
        let mut app = Application::new(self.settings);
        app.bootstrap_registry = self.bootstraps;
        for provider in self.providers {
            app.register_service_provider(provider);
        }
        app
    }
}
