use crate::container::Container;
use std::sync::Arc;

// Well-known capability
trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

struct RealClock;
impl Clock for RealClock {
    fn now(&self) -> u64 {
        1_000
    }
}

struct StoppedClock(u64);
impl Clock for StoppedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

#[test]
fn test_capability_lookup_without_binding_returns_none() {
    let container = Container::new();
    assert!(container.try_resolve_by_capability::<dyn Clock>().is_none());
    assert!(!container.is_capability_bound::<dyn Clock>());
}

#[test]
fn test_capability_resolves_bound_implementation() {
    let container = Container::new();
    container.bind_with_capability::<RealClock, dyn Clock, _>(|_, _| Ok(Arc::new(RealClock)), |clock| clock);

    let clock = container
        .try_resolve_by_capability::<dyn Clock>()
        .expect("capability should be bound");
    assert_eq!(clock.now(), 1_000);
    assert!(container.is_capability_bound::<dyn Clock>());
}

#[test]
fn test_capability_instance_is_the_singleton() {
    let container = Container::new();
    container.bind_with_capability::<RealClock, dyn Clock, _>(|_, _| Ok(Arc::new(RealClock)), |clock| clock);

    let via_contract = container.resolve::<RealClock>().unwrap();
    let via_capability = container.try_resolve_by_capability::<dyn Clock>().unwrap();
    let again = container.try_resolve_by_capability::<dyn Clock>().unwrap();

    assert!(Arc::ptr_eq(&via_capability, &again));
    assert_eq!(
        Arc::as_ptr(&via_contract) as *const u8,
        Arc::as_ptr(&via_capability) as *const u8,
        "Capability lookups should yield the contract's singleton"
    );
}

#[test]
fn test_second_capability_binding_replaces_alias() {
    let container = Container::new();
    container.bind_with_capability::<RealClock, dyn Clock, _>(|_, _| Ok(Arc::new(RealClock)), |clock| clock);
    assert_eq!(container.try_resolve_by_capability::<dyn Clock>().unwrap().now(), 1_000);

    container.bind_with_capability::<StoppedClock, dyn Clock, _>(|_, _| Ok(Arc::new(StoppedClock(7))), |clock| clock);

    assert_eq!(container.try_resolve_by_capability::<dyn Clock>().unwrap().now(), 7);
    // The first contract stays resolvable on its own
    assert_eq!(container.resolve::<RealClock>().unwrap().now(), 1_000);
}

#[test]
fn test_capability_after_clear_returns_none() {
    let container = Container::new();
    container.bind_with_capability::<RealClock, dyn Clock, _>(|_, _| Ok(Arc::new(RealClock)), |clock| clock);
    container.clear();

    assert!(container.try_resolve_by_capability::<dyn Clock>().is_none());
}

#[test]
fn test_failing_capability_producer_yields_none() {
    let container = Container::new();
    container.bind_with_capability::<RealClock, dyn Clock, _>(
        |_, _| Err(crate::container::ContainerError::producer_failed("RealClock", "no hardware clock")),
        |clock| clock,
    );

    assert!(container.is_capability_bound::<dyn Clock>());
    assert!(container.try_resolve_by_capability::<dyn Clock>().is_none());
}
