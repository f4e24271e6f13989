//! # Strata Container Errors
//!
//! Errors raised while resolving contracts from the
//! [`Container`](crate::container::Container). None of them are retried by
//! the container; they surface directly to the caller of `resolve`.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("No binding registered for contract '{contract}'")]
    NotBound { contract: &'static str },

    #[error("Producer for contract '{contract}' failed: {message}")]
    ProducerFailed {
        contract: &'static str,
        message: String,
    },

    #[error("Stored instance for contract '{contract}' has an unexpected type")]
    TypeMismatch { contract: &'static str },
}

impl ContainerError {
    /// Wrap any displayable failure raised inside a producer.
    pub fn producer_failed(contract: &'static str, err: impl std::fmt::Display) -> Self {
        ContainerError::ProducerFailed {
            contract,
            message: err.to_string(),
        }
    }
}
