use crate::container::{Container, ContainerError, Lifetime, ResolveArgs};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

#[derive(Debug)]
struct EnglishGreeter {
    id: usize,
}

impl Greeter for EnglishGreeter {
    fn greet(&self) -> String {
        format!("hello #{}", self.id)
    }
}

// Producer that numbers each instance it builds
fn counting_greeter(counter: Arc<AtomicUsize>) -> impl Fn(&Container, &ResolveArgs) -> Result<Arc<dyn Greeter>, ContainerError> + Send + Sync + 'static {
    move |_, _| {
        let id = counter.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(EnglishGreeter { id }) as Arc<dyn Greeter>)
    }
}

#[test]
fn test_singleton_resolutions_share_instance() {
    let container = Container::new();
    let counter = Arc::new(AtomicUsize::new(0));
    container.bind_singleton::<dyn Greeter, _>(counting_greeter(counter.clone()));

    let first = container.resolve::<dyn Greeter>().expect("first resolve");
    let second = container.resolve::<dyn Greeter>().expect("second resolve");

    assert!(Arc::ptr_eq(&first, &second), "Singleton resolutions should be identity-equal");
    assert_eq!(counter.load(Ordering::SeqCst), 1, "Producer should run once");
}

#[test]
fn test_transient_resolutions_are_distinct() {
    let container = Container::new();
    let counter = Arc::new(AtomicUsize::new(0));
    container.bind_transient::<dyn Greeter, _>(counting_greeter(counter.clone()));

    let first = container.resolve::<dyn Greeter>().unwrap();
    let second = container.resolve::<dyn Greeter>().unwrap();

    assert!(!Arc::ptr_eq(&first, &second), "Transient resolutions should be distinct");
    assert_eq!(first.greet(), "hello #0");
    assert_eq!(second.greet(), "hello #1");
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn test_resolve_unbound_contract_fails() {
    let container = Container::new();
    let result = container.resolve::<dyn Greeter>();

    match result {
        Err(ContainerError::NotBound { contract }) => {
            assert!(contract.contains("Greeter"), "Error should name the contract, got {}", contract);
        }
        other => panic!("Expected NotBound, got {:?}", other.map(|g| g.greet())),
    }
}

#[test]
fn test_rebinding_replaces_singleton() {
    let container = Container::new();
    container.bind_singleton::<dyn Greeter, _>(|_, _| Ok(Arc::new(EnglishGreeter { id: 1 }) as Arc<dyn Greeter>));
    let before = container.resolve::<dyn Greeter>().unwrap();

    container.bind_singleton::<dyn Greeter, _>(|_, _| Ok(Arc::new(EnglishGreeter { id: 2 }) as Arc<dyn Greeter>));
    let after = container.resolve::<dyn Greeter>().unwrap();

    assert_eq!(before.greet(), "hello #1");
    assert_eq!(after.greet(), "hello #2");
    assert_eq!(container.len(), 1);
}

#[test]
fn test_resolve_args_reach_producer() {
    let container = Container::new();
    container.bind_transient::<String, _>(|_, args| {
        let name = args.get::<&'static str>(0).copied().unwrap_or("anonymous");
        let count = args.get::<u32>(1).copied().unwrap_or(0);
        Ok(Arc::new(format!("{}:{}", name, count)))
    });

    let args = ResolveArgs::new().with("worker").with(3u32);
    let built = container.resolve_with::<String>(&args).unwrap();
    assert_eq!(built.as_str(), "worker:3");

    // Wrong type at an index is reported as missing
    let mismatched = ResolveArgs::new().with(7i64);
    let fallback = container.resolve_with::<String>(&mismatched).unwrap();
    assert_eq!(fallback.as_str(), "anonymous:0");
}

#[test]
fn test_producer_can_resolve_other_contracts() {
    let container = Container::new();
    container.bind_instance::<u64>(Arc::new(41));
    container.bind_singleton::<String, _>(|c, _| {
        let base = c.resolve::<u64>()?;
        Ok(Arc::new(format!("answer={}", *base + 1)))
    });

    let answer = container.resolve::<String>().unwrap();
    assert_eq!(answer.as_str(), "answer=42");
}

#[test]
fn test_producer_failure_surfaces() {
    let container = Container::new();
    container.bind_singleton::<String, _>(|_, _| Err(ContainerError::producer_failed("alloc::string::String", "disk on fire")));

    let err = container.resolve::<String>().unwrap_err();
    assert!(matches!(err, ContainerError::ProducerFailed { .. }));
    assert!(err.to_string().contains("disk on fire"));
}

#[test]
fn test_bind_instance_and_introspection() {
    let container = Container::new();
    assert!(container.is_empty());

    let shared: Arc<dyn Greeter> = Arc::new(EnglishGreeter { id: 9 });
    container.bind_instance::<dyn Greeter>(shared.clone());

    assert!(container.is_bound::<dyn Greeter>());
    assert!(!container.is_bound::<String>());
    assert_eq!(container.lifetime_of::<dyn Greeter>(), Some(Lifetime::Singleton));
    assert!(Arc::ptr_eq(&shared, &container.resolve::<dyn Greeter>().unwrap()));
    assert_eq!(container.contracts().len(), 1);
}

#[test]
fn test_clear_tears_down_bindings() {
    let container = Container::new();
    container.bind_instance::<u64>(Arc::new(1));
    container.bind_transient::<String, _>(|_, _| Ok(Arc::new(String::from("x"))));
    assert_eq!(container.len(), 2);

    container.clear();

    assert!(container.is_empty());
    assert!(matches!(container.resolve::<u64>(), Err(ContainerError::NotBound { .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_singleton_resolution_is_consistent() {
    let container = Arc::new(Container::new());
    let counter = Arc::new(AtomicUsize::new(0));
    container.bind_singleton::<dyn Greeter, _>(counting_greeter(counter.clone()));

    let mut handles = Vec::new();
    for _ in 0..32 {
        let container = container.clone();
        handles.push(tokio::spawn(async move { container.resolve::<dyn Greeter>().unwrap() }));
    }
    let results = futures::future::join_all(handles).await;

    let first = results[0].as_ref().unwrap().clone();
    for result in results {
        assert!(Arc::ptr_eq(&first, &result.unwrap()), "All resolvers should see one instance");
    }
}
