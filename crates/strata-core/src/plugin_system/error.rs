//! # Strata Bootstrap Discovery Errors
//!
//! [`BootstrapError`] describes a bootstrap type that could not be
//! instantiated. Discovery collects these in a
//! [`DiscoveryReport`](super::registry::DiscoveryReport) instead of failing,
//! so one broken bootstrap never hides the others.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootstrapError {
    #[error("Bootstrap '{name}' failed to instantiate: {message}")]
    Instantiation { name: String, message: String },

    #[error("Bootstrap '{name}' panicked while instantiating: {message}")]
    Panicked { name: String, message: String },
}

impl BootstrapError {
    pub fn instantiation(name: impl Into<String>, message: impl Into<String>) -> Self {
        BootstrapError::Instantiation { name: name.into(), message: message.into() }
    }

    /// Name of the bootstrap type that failed
    pub fn name(&self) -> &str {
        match self {
            BootstrapError::Instantiation { name, .. } | BootstrapError::Panicked { name, .. } => name,
        }
    }
}

/// Best-effort text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic reason".to_string()
    }
}
