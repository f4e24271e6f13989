use crate::plugin_system::traits::Bootstrap;

#[derive(Default)]
struct Recorder {
    calls: Vec<&'static str>,
}

impl Bootstrap for Recorder {
    fn init(&mut self) {
        self.calls.push("init");
    }

    fn start(&mut self) {
        self.calls.push("start");
    }

    fn quit(&mut self) {
        self.calls.push("quit");
    }
}

#[derive(Default)]
struct Silent;
impl Bootstrap for Silent {}

#[test]
fn test_default_name_is_type_path() {
    let boxed: Box<dyn Bootstrap> = Box::new(Silent);
    assert!(boxed.name().ends_with("traits_tests::Silent"), "got {}", boxed.name());
}

#[test]
fn test_default_hooks_are_noops() {
    let mut silent = Silent;
    silent.init();
    silent.start();
    silent.quit();
}

#[test]
fn test_hooks_dispatch_through_trait_object() {
    let mut recorder = Recorder::default();
    {
        let boxed: &mut dyn Bootstrap = &mut recorder;
        boxed.init();
        boxed.start();
        boxed.quit();
    }
    assert_eq!(recorder.calls, vec!["init", "start", "quit"]);
}
