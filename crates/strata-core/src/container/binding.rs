use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::container::error::ContainerError;
use crate::container::Container;

/// Type-erased instance. Always holds an `Arc<T>` for the bound contract `T`,
/// which keeps unsized contracts such as `dyn Trait` storable.
pub(crate) type ErasedInstance = Arc<dyn Any + Send + Sync>;

pub(crate) type ErasedProducer =
    Box<dyn Fn(&Container, &ResolveArgs) -> Result<ErasedInstance, ContainerError> + Send + Sync>;

pub(crate) type ErasedUpcast =
    Arc<dyn Fn(&Container) -> Result<ErasedInstance, ContainerError> + Send + Sync>;

/// How long a resolved instance lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// A new instance per resolution
    Transient,
    /// Constructed on first resolution, then shared until rebound
    Singleton,
}

/// Positional constructor arguments handed to a producer.
///
/// Arguments are only seen by the producer call that actually constructs an
/// instance; a cached singleton ignores them.
#[derive(Default)]
pub struct ResolveArgs {
    values: Vec<Box<dyn Any + Send + Sync>>,
}

impl ResolveArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style push
    pub fn with<V: Any + Send + Sync>(mut self, value: V) -> Self {
        self.values.push(Box::new(value));
        self
    }

    pub fn push<V: Any + Send + Sync>(&mut self, value: V) {
        self.values.push(Box::new(value));
    }

    /// Argument at `index` if it exists and has type `V`.
    pub fn get<V: Any>(&self, index: usize) -> Option<&V> {
        self.values.get(index).and_then(|v| v.downcast_ref::<V>())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for ResolveArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveArgs")
            .field("len", &self.values.len())
            .finish()
    }
}

/// A registered producer plus its cached singleton, if any.
pub(crate) struct Binding {
    pub(crate) contract: &'static str,
    pub(crate) lifetime: Lifetime,
    producer: ErasedProducer,
    instance: OnceLock<ErasedInstance>,
}

impl Binding {
    pub(crate) fn new(contract: &'static str, lifetime: Lifetime, producer: ErasedProducer) -> Self {
        Self {
            contract,
            lifetime,
            producer,
            instance: OnceLock::new(),
        }
    }

    /// Singleton binding whose instance already exists.
    pub(crate) fn prebuilt(contract: &'static str, instance: ErasedInstance) -> Self {
        let binding = Self::new(
            contract,
            Lifetime::Singleton,
            Box::new(move |_: &Container, _: &ResolveArgs| {
                Err(ContainerError::ProducerFailed {
                    contract,
                    message: "prebuilt instance has no producer".to_string(),
                })
            }),
        );
        // A fresh OnceLock accepts its first value.
        let _ = binding.instance.set(instance);
        binding
    }

    /// Produce an instance according to the lifetime rule.
    ///
    /// No container lock is held here, so producers may resolve other contracts.
    pub(crate) fn produce(&self, container: &Container, args: &ResolveArgs) -> Result<ErasedInstance, ContainerError> {
        match self.lifetime {
            Lifetime::Transient => (self.producer)(container, args),
            Lifetime::Singleton => {
                if let Some(existing) = self.instance.get() {
                    return Ok(existing.clone());
                }
                let built = (self.producer)(container, args)?;
                // If another thread won the race its instance is kept and ours is dropped.
                let _ = self.instance.set(built);
                self.instance
                    .get()
                    .cloned()
                    .ok_or(ContainerError::TypeMismatch { contract: self.contract })
            }
        }
    }

    pub(crate) fn is_constructed(&self) -> bool {
        self.instance.get().is_some()
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("contract", &self.contract)
            .field("lifetime", &self.lifetime)
            .field("constructed", &self.is_constructed())
            .finish()
    }
}

/// Capability alias: which contract currently implements a capability and how
/// to view that contract's instance as the capability type.
#[derive(Clone)]
pub(crate) struct CapabilityAlias {
    pub(crate) contract: &'static str,
    pub(crate) upcast: ErasedUpcast,
}

impl fmt::Debug for CapabilityAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityAlias")
            .field("contract", &self.contract)
            .finish()
    }
}
