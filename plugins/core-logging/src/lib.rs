//! Logging backend for Strata applications.
//!
//! [`LoggingBootstrap`] installs `env_logger` behind the `log` facade during
//! the bootstrap `init` hook, before any provider runs. Filtering follows
//! `RUST_LOG` and defaults to `info`.
use env_logger::Env;
use log::{debug, info};
use strata_core::plugin_system::Bootstrap;

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info";

/// Install the `env_logger` backend.
///
/// Returns `false` if a logger was already installed, which is not an error:
/// the host may have set one up before the application started.
pub fn init_logging() -> bool {
    match env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER)).try_init() {
        Ok(()) => true,
        Err(e) => {
            debug!("Logger already installed: {}", e);
            false
        }
    }
}

#[derive(Debug, Default)]
pub struct LoggingBootstrap;

impl Bootstrap for LoggingBootstrap {
    fn name(&self) -> &'static str {
        "core-logging"
    }

    fn init(&mut self) {
        init_logging();
        info!("Core logging initialized");
    }

    fn quit(&mut self) {
        info!("Core logging shutting down");
        log::logger().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_install_is_tolerated() {
        init_logging();
        assert!(!init_logging(), "A second install should report the existing logger");
    }

    #[test]
    fn test_bootstrap_hooks_do_not_panic() {
        let mut bootstrap = LoggingBootstrap;
        bootstrap.init();
        bootstrap.start();
        bootstrap.quit();
        assert_eq!(bootstrap.name(), "core-logging");
    }
}
