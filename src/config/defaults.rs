//! Default configuration constants.
//!
//! Keeping defaults in one module lets the data model, the loader and the
//! template share the same literals.

/// Embedded default `hueshell.toml` template written by `hueshell init`.
pub(super) const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../templates/hueshell.toml");
/// Config file name, both locally and under the config root.
pub(super) const CONFIG_FILE_NAME: &str = "hueshell.toml";
/// Directory under the config root holding hueshell files.
pub(super) const CONFIG_DIR_NAME: &str = "hueshell";
/// Default persistence file name under the config directory.
pub(super) const STORE_FILE_NAME: &str = "storage.json";
/// Default purchase endpoint.
pub(super) const DEFAULT_PURCHASE_ENDPOINT: &str = "http://localhost:3000/api/purchase-theme";
/// Default purchase request timeout.
pub(super) const DEFAULT_PURCHASE_TIMEOUT_SECS: u64 = 30;
