use std::any::type_name;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::plugin_system::error::{panic_message, BootstrapError};
use crate::plugin_system::traits::Bootstrap;

/// Constructor registered for one bootstrap type.
pub type BootstrapFactory =
    Box<dyn Fn() -> std::result::Result<Box<dyn Bootstrap>, BootstrapError> + Send + Sync>;

/// Outcome of [`BootstrapRegistry::discover`].
#[derive(Debug, Default, Clone)]
pub struct DiscoveryReport {
    /// Names of the bootstraps instantiated, in discovery order
    pub discovered: Vec<String>,
    /// Bootstraps that failed to instantiate and were skipped
    pub failures: Vec<BootstrapError>,
}

impl DiscoveryReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Explicit extension point listing every bootstrap the application knows.
///
/// Registration order is discovery order.
#[derive(Default)]
pub struct BootstrapRegistry {
    factories: Vec<(String, BootstrapFactory)>,
}

impl BootstrapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bootstrap built with `B::default()`.
    pub fn register<B>(&mut self) -> &mut Self
    where
        B: Bootstrap + Default + 'static,
    {
        self.register_factory(type_name::<B>(), || Ok(Box::new(B::default()) as Box<dyn Bootstrap>))
    }

    /// Register a named factory. A name registered twice keeps the first factory.
    pub fn register_factory<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> std::result::Result<Box<dyn Bootstrap>, BootstrapError> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.contains(&name) {
            log::warn!("Bootstrap '{}' is already registered; ignoring duplicate", name);
            return self;
        }
        self.factories.push((name, Box::new(factory)));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.iter().any(|(existing, _)| existing == name)
    }

    /// Registered names, in discovery order
    pub fn names(&self) -> Vec<&str> {
        self.factories.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Instantiate one of each registered bootstrap.
    ///
    /// A factory that errors or panics is logged, recorded in the report and
    /// skipped; the remaining factories still run.
    pub fn discover(&self) -> (Vec<Box<dyn Bootstrap>>, DiscoveryReport) {
        let mut instances = Vec::with_capacity(self.factories.len());
        let mut report = DiscoveryReport::default();

        for (name, factory) in &self.factories {
            let outcome = match panic::catch_unwind(AssertUnwindSafe(|| factory())) {
                Ok(result) => result,
                Err(panic_obj) => Err(BootstrapError::Panicked {
                    name: name.clone(),
                    message: panic_message(panic_obj.as_ref()),
                }),
            };

            match outcome {
                Ok(bootstrap) => {
                    log::debug!("Discovered bootstrap {}", name);
                    report.discovered.push(name.clone());
                    instances.push(bootstrap);
                }
                Err(e) => {
                    log::warn!("Skipping bootstrap '{}': {}", name, e);
                    report.failures.push(e);
                }
            }
        }

        (instances, report)
    }
}

impl fmt::Debug for BootstrapRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapRegistry")
            .field("factories", &self.names())
            .finish()
    }
}
