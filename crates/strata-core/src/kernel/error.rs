//! # Strata Kernel Errors
//!
//! Defines the kernel [`Error`] type and the crate-wide [`Result`] alias.
//!
//! Subsystem errors ([`ContainerError`], [`StorageSystemError`]) fold into
//! [`Error`] through `#[from]`, so `?` works across module boundaries. The
//! lifecycle variants always carry the phase and the offending provider name,
//! which is what the orchestrator logs.
use std::result::Result as StdResult;
use std::time::Duration;

use thiserror::Error as ThisError;

use crate::container::error::ContainerError;
use crate::kernel::phase::Phase;
use crate::storage::error::StorageSystemError;

/// Custom error type for the Strata framework
#[derive(Debug, ThisError)]
pub enum Error {
    /// A provider hook signalled failure; startup stops at this provider.
    #[error("Provider '{provider}' failed during {phase}: {source}")]
    LifecyclePhaseFailure {
        phase: Phase,
        provider: String,
        #[source]
        source: Box<Error>,
    },

    /// A provider hook did not complete before the phase deadline.
    #[error("Provider '{provider}' did not finish {phase} within {timeout:?}")]
    PhaseTimeout {
        phase: Phase,
        provider: String,
        timeout: Duration,
    },

    /// The cancellation signal fired while a provider hook was pending.
    #[error("Startup cancelled during {phase} while waiting on provider '{provider}'")]
    PhaseCancelled { phase: Phase, provider: String },

    /// `start` was called again after an earlier start stopped short of `Running`.
    #[error("Startup already attempted and stopped in {phase}")]
    StartupIncomplete { phase: Phase },

    /// Attempted to move the phase machine backwards or sideways.
    #[error("Invalid phase transition from {from} to {to}")]
    InvalidPhaseTransition { from: Phase, to: Phase },

    /// A provider's close hook failed. Logged and collected, never propagated.
    #[error("Provider '{provider}' failed to close: {source}")]
    ShutdownHook {
        provider: String,
        #[source]
        source: Box<Error>,
    },

    /// Container lookups and producer failures
    #[error("Resolution error: {0}")]
    Resolution(#[from] ContainerError),

    /// Storage, config format and config cache errors
    #[error("Storage system error: {0}")]
    StorageSystem(#[from] StorageSystemError),

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl Error {
    /// Name of the provider this error is attributed to, if any.
    pub fn provider(&self) -> Option<&str> {
        match self {
            Error::LifecyclePhaseFailure { provider, .. }
            | Error::PhaseTimeout { provider, .. }
            | Error::PhaseCancelled { provider, .. }
            | Error::ShutdownHook { provider, .. } => Some(provider),
            _ => None,
        }
    }

    /// Phase this error was raised in, if it is a lifecycle error.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Error::LifecyclePhaseFailure { phase, .. }
            | Error::PhaseTimeout { phase, .. }
            | Error::PhaseCancelled { phase, .. }
            | Error::StartupIncomplete { phase } => Some(*phase),
            Error::ShutdownHook { .. } => Some(Phase::Closing),
            _ => None,
        }
    }
}
