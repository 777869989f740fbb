//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`HUESHELL_PURCHASE_URL`, `HUESHELL_USER_ID`,
//!    `HUESHELL_PURCHASE_TIMEOUT_SECS`, `HUESHELL_STORE_PATH`).
//! 2. TOML file specified via --config CLI flag
//! 3. ./hueshell.toml in the current directory
//! 4. $XDG_CONFIG_HOME/hueshell/hueshell.toml (or ~/.config/hueshell/hueshell.toml)
//! 5. Built-in defaults

mod defaults;
mod env;
mod init;
mod loader;
mod sources;
mod types;

pub use init::{
    config_root_dir, default_global_config_path, default_store_path,
    initialize_config_at_path, initialize_default_global_config,
};
pub use loader::{load_config, load_config_with_source, LoadedConfig};
pub use sources::ConfigSource;
pub use types::{
    BackgroundConfig, Config, GlobalConfigInitResult, PurchaseConfig, StorageConfig,
    ThemeConfig,
};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
