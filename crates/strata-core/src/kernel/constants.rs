/// Framework name
pub const APP_NAME: &str = "Strata";

/// Framework version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default settings file looked up by the host
pub const DEFAULT_SETTINGS_FILE: &str = "strata.toml";

/// Default bundled-resource root for configs, relative to the working directory
pub const DEFAULT_RESOURCE_ROOT: &str = "resources/config";

/// Default local data directory
pub const DEFAULT_DATA_DIR: &str = ".strata";

/// Framework-owned sub-directory of the data directory
pub const FRAMEWORK_STORAGE_DIR: &str = "framework";

/// Application-owned sub-directory of the data directory
pub const APP_STORAGE_DIR: &str = "app";

/// Default per-phase deadline in milliseconds
pub const DEFAULT_PHASE_TIMEOUT_MS: u64 = 30_000;

/// Cache key tag for the bundled-resource load strategy
pub const BUNDLED_RESOURCE_TAG: &str = "res";

/// Cache key tag for the virtual-filesystem load strategy
pub const VIRTUAL_FILESYSTEM_TAG: &str = "vfs";
