//! Lifecycle phases, the shared phase tracker and the startup cancellation signal.
use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::kernel::error::{Error, Result};

/// Phases of the application lifecycle, in the only order they may occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Uninitialized,
    Initializing,
    Registering,
    Starting,
    Running,
    Closing,
    Terminated,
}

impl Phase {
    /// Phases only ever move forward.
    pub fn can_advance_to(self, next: Phase) -> bool {
        next > self
    }

    pub fn is_running(self) -> bool {
        self == Phase::Running
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Uninitialized => "Uninitialized",
            Phase::Initializing => "Initializing",
            Phase::Registering => "Registering",
            Phase::Starting => "Starting",
            Phase::Running => "Running",
            Phase::Closing => "Closing",
            Phase::Terminated => "Terminated",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared view of the current phase.
///
/// The application owns the only tracker that advances; clones handed to the
/// config cache and to providers read it. Observers can `subscribe` and wait
/// for a given phase.
#[derive(Debug, Clone)]
pub struct PhaseTracker {
    tx: Arc<watch::Sender<Phase>>,
}

impl PhaseTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Phase::Uninitialized);
        Self { tx: Arc::new(tx) }
    }

    /// Current phase.
    pub fn current(&self) -> Phase {
        *self.tx.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.current().is_running()
    }

    /// Move to `next`, rejecting anything that is not strictly forward.
    pub fn advance(&self, next: Phase) -> Result<()> {
        let from = self.current();
        if !from.can_advance_to(next) {
            return Err(Error::InvalidPhaseTransition { from, to: next });
        }
        self.tx.send_replace(next);
        log::debug!("Phase {} -> {}", from, next);
        Ok(())
    }

    /// Receiver that observes every subsequent phase change.
    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.tx.subscribe()
    }

    /// Wait until the tracker reaches `phase` or any later phase.
    pub async fn wait_for(&self, phase: Phase) -> Phase {
        let mut rx = self.subscribe();
        match rx.wait_for(|current| *current >= phase).await {
            Ok(reached) => *reached,
            // The sender lives as long as `self`, so this only happens while tearing down.
            Err(_) => self.current(),
        }
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Cooperative cancellation for in-flight startup hooks.
///
/// Cloning is cheap; every clone observes the same flag. Once cancelled it
/// stays cancelled.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once `cancel` has been called on any clone.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            // Unreachable while `self` holds the sender; park instead of reporting a false cancel.
            std::future::pending::<()>().await;
        }
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}
