use std::any::type_name;

/// Lightweight lifecycle participant.
///
/// Bootstraps are discovered once per application through a
/// [`BootstrapRegistry`](super::BootstrapRegistry). Their hooks are
/// synchronous, cannot fail and cannot veto startup. `init` runs before any
/// provider is initialized, `start` after every provider has started, and
/// `quit` before providers are closed.
pub trait Bootstrap: Send + Sync {
    /// Name used in log lines; the implementing type's path by default.
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }

    fn init(&mut self) {}

    fn start(&mut self) {}

    fn quit(&mut self) {}
}
