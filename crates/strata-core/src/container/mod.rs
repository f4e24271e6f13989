//! # Strata Binding Container
//!
//! Maps a contract type to a producer. Contracts are usually trait objects
//! (`dyn AssetLoader`) and are identified by their [`TypeId`]; every resolved
//! instance is handed out as an `Arc<T>`.
//!
//! - [`Lifetime::Transient`] bindings run the producer on every resolution.
//! - [`Lifetime::Singleton`] bindings run it once and share the result until
//!   the contract is rebound or the container is cleared.
//! - A *capability alias* records that one contract currently implements a
//!   well-known capability. Looking a capability up never fails: it either
//!   yields the instance or `None`.
//!
//! Rebinding a contract silently replaces the previous binding. The container
//! does no conflict detection; avoiding conflicting binds is up to providers.
pub mod binding;
pub mod error;

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::container::binding::{Binding, CapabilityAlias, ErasedInstance, ErasedProducer};

pub use binding::{Lifetime, ResolveArgs};
pub use error::ContainerError;

/// Contract registry shared by the application and its providers.
#[derive(Default)]
pub struct Container {
    bindings: RwLock<HashMap<TypeId, Arc<Binding>>>,
    capabilities: RwLock<HashMap<TypeId, CapabilityAlias>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a producer for contract `T` with the given lifetime.
    pub fn bind<T, F>(&self, lifetime: Lifetime, producer: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Container, &ResolveArgs) -> Result<Arc<T>, ContainerError> + Send + Sync + 'static,
    {
        let contract = type_name::<T>();
        let erased: ErasedProducer = Box::new(
            move |container: &Container, args: &ResolveArgs| -> Result<ErasedInstance, ContainerError> {
                let instance = producer(container, args)?;
                Ok(Arc::new(instance) as ErasedInstance)
            },
        );
        let replaced = self
            .bindings
            .write()
            .insert(TypeId::of::<T>(), Arc::new(Binding::new(contract, lifetime, erased)));
        if replaced.is_some() {
            log::debug!("Rebound contract {} as {:?}", contract, lifetime);
        } else {
            log::debug!("Bound contract {} as {:?}", contract, lifetime);
        }
    }

    /// Shorthand for a transient [`bind`](Self::bind)
    pub fn bind_transient<T, F>(&self, producer: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Container, &ResolveArgs) -> Result<Arc<T>, ContainerError> + Send + Sync + 'static,
    {
        self.bind::<T, F>(Lifetime::Transient, producer);
    }

    /// Shorthand for a singleton [`bind`](Self::bind)
    pub fn bind_singleton<T, F>(&self, producer: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Container, &ResolveArgs) -> Result<Arc<T>, ContainerError> + Send + Sync + 'static,
    {
        self.bind::<T, F>(Lifetime::Singleton, producer);
    }

    /// Bind an instance that already exists as the singleton for `T`.
    pub fn bind_instance<T>(&self, instance: Arc<T>)
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let contract = type_name::<T>();
        let binding = Binding::prebuilt(contract, Arc::new(instance) as ErasedInstance);
        self.bindings.write().insert(TypeId::of::<T>(), Arc::new(binding));
        log::debug!("Bound instance for contract {}", contract);
    }

    /// Singleton-bind `T` and make it the implementation of capability `C`.
    ///
    /// `upcast` views the contract as the capability; for a concrete contract
    /// and a trait-object capability it is the coercing closure `|svc| svc`.
    /// A capability has at most one implementation: binding a second one
    /// replaces the alias.
    pub fn bind_with_capability<T, C, F>(&self, producer: F, upcast: fn(Arc<T>) -> Arc<C>)
    where
        T: ?Sized + Send + Sync + 'static,
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&Container, &ResolveArgs) -> Result<Arc<T>, ContainerError> + Send + Sync + 'static,
    {
        self.bind::<T, F>(Lifetime::Singleton, producer);

        let contract = type_name::<T>();
        let alias = CapabilityAlias {
            contract,
            upcast: Arc::new(move |container: &Container| -> Result<ErasedInstance, ContainerError> {
                let instance = container.resolve::<T>()?;
                Ok(Arc::new(upcast(instance)) as ErasedInstance)
            }),
        };
        if let Some(previous) = self.capabilities.write().insert(TypeId::of::<C>(), alias) {
            log::info!(
                "Capability {} moved from {} to {}",
                type_name::<C>(),
                previous.contract,
                contract
            );
        }
    }

    /// Resolve `T` with no constructor arguments.
    pub fn resolve<T>(&self) -> Result<Arc<T>, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolve_with::<T>(&ResolveArgs::default())
    }

    /// Resolve `T`, passing `args` to the producer if it runs.
    pub fn resolve_with<T>(&self, args: &ResolveArgs) -> Result<Arc<T>, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let contract = type_name::<T>();
        // Clone the binding out so the map lock is released before the producer runs.
        let binding = self
            .bindings
            .read()
            .get(&TypeId::of::<T>())
            .cloned()
            .ok_or(ContainerError::NotBound { contract })?;
        let erased = binding.produce(self, args)?;
        downcast::<T>(&erased, contract)
    }

    /// Implementation currently aliased to capability `C`, if any. Never fails.
    pub fn try_resolve_by_capability<C>(&self) -> Option<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let alias = self.capabilities.read().get(&TypeId::of::<C>()).cloned()?;
        match (alias.upcast)(self) {
            Ok(erased) => erased.downcast_ref::<Arc<C>>().cloned(),
            Err(e) => {
                log::warn!(
                    "Capability {} is aliased to {} but could not be resolved: {}",
                    type_name::<C>(),
                    alias.contract,
                    e
                );
                None
            }
        }
    }

    pub fn is_capability_bound<C>(&self) -> bool
    where
        C: ?Sized + 'static,
    {
        self.capabilities.read().contains_key(&TypeId::of::<C>())
    }

    pub fn is_bound<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        self.bindings.read().contains_key(&TypeId::of::<T>())
    }

    /// Lifetime of the current binding for `T`.
    pub fn lifetime_of<T>(&self) -> Option<Lifetime>
    where
        T: ?Sized + 'static,
    {
        self.bindings.read().get(&TypeId::of::<T>()).map(|b| b.lifetime)
    }

    /// Names of all bound contracts, sorted.
    pub fn contracts(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.bindings.read().values().map(|b| b.contract).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }

    /// Drop every binding, alias and cached singleton.
    pub fn clear(&self) {
        self.capabilities.write().clear();
        self.bindings.write().clear();
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("bindings", &self.bindings.read().len())
            .field("capabilities", &self.capabilities.read().len())
            .finish()
    }
}

fn downcast<T>(erased: &ErasedInstance, contract: &'static str) -> Result<Arc<T>, ContainerError>
where
    T: ?Sized + Send + Sync + 'static,
{
    erased
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or(ContainerError::TypeMismatch { contract })
}

#[cfg(test)]
mod tests;
