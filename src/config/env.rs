//! Environment overrides.
//!
//! `HUESHELL_*` variables win over every file source.

use crate::error::ConfigError;

use super::Config;

pub(super) const ENV_PURCHASE_URL: &str = "HUESHELL_PURCHASE_URL";
pub(super) const ENV_USER_ID: &str = "HUESHELL_USER_ID";
pub(super) const ENV_PURCHASE_TIMEOUT_SECS: &str = "HUESHELL_PURCHASE_TIMEOUT_SECS";
pub(super) const ENV_STORE_PATH: &str = "HUESHELL_STORE_PATH";

pub(super) fn apply_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(url) = non_empty(env_lookup, ENV_PURCHASE_URL) {
        config.purchase.endpoint = url;
    }
    // An empty HUESHELL_USER_ID explicitly drops the identifier from payloads.
    if let Some(user_id) = env_lookup(ENV_USER_ID) {
        let trimmed = user_id.trim();
        config.purchase.user_id = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }
    if let Some(timeout) = non_empty(env_lookup, ENV_PURCHASE_TIMEOUT_SECS) {
        let parsed = timeout.parse::<u64>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid {ENV_PURCHASE_TIMEOUT_SECS} value `{timeout}`: expected positive integer seconds"
            ))
        })?;
        // Clamp to at least 1 second to avoid "no-timeout" accidental behavior.
        config.purchase.timeout_secs = parsed.max(1);
    }
    if let Some(path) = non_empty(env_lookup, ENV_STORE_PATH) {
        config.storage.path = Some(path);
    }
    Ok(())
}

fn non_empty<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
