use crate::kernel::error::Result;

/// Asset-loading capability consulted by the virtual-filesystem strategy.
///
/// Providers bind an implementation with
/// [`Container::bind_with_capability`](crate::container::Container::bind_with_capability)
/// using `dyn AssetLoader` as the capability.
pub trait AssetLoader: Send + Sync {
    fn name(&self) -> &str;

    /// Raw text of the asset at `path`, or `None` when nothing is there.
    fn load_text(&self, path: &str) -> Result<Option<String>>;
}
