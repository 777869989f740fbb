//! Per-client palette ownership flags.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::DEFAULT_THEME_NAME;
use crate::store::PersistenceStore;

/// Literal stored for an owned palette.
const OWNED_VALUE: &str = "true";

/// Ownership view over a [`PersistenceStore`].
///
/// Each palette gets one key, `<prefix><theme name>`, whose value is `"true"`
/// once the client owns it. The default palette is owned regardless of what
/// the store holds.
#[derive(Clone)]
pub struct OwnershipStore {
    store: Arc<dyn PersistenceStore>,
    key_prefix: String,
}

impl OwnershipStore {
    pub fn new(store: Arc<dyn PersistenceStore>, key_prefix: impl Into<String>) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
        }
    }

    /// Storage key holding the flag for `theme_name`.
    pub fn key_for(&self, theme_name: &str) -> String {
        format!("{}{}", self.key_prefix, theme_name)
    }

    /// True when the client owns `theme_name`.
    ///
    /// Storage failures degrade to "not owned".
    pub fn is_owned(&self, theme_name: &str) -> bool {
        if theme_name == DEFAULT_THEME_NAME {
            return true;
        }
        match self.store.get(&self.key_for(theme_name)) {
            Ok(value) => value.as_deref() == Some(OWNED_VALUE),
            Err(err) => {
                warn!(theme = %theme_name, error = %err, "ownership lookup failed; treating as not owned");
                false
            }
        }
    }

    /// Record ownership of `theme_name`. Returns `false` when the write failed.
    ///
    /// Granting an already owned palette does not touch the store.
    pub fn grant(&self, theme_name: &str) -> bool {
        if self.is_owned(theme_name) {
            return true;
        }
        match self.store.set(&self.key_for(theme_name), OWNED_VALUE) {
            Ok(()) => {
                debug!(theme = %theme_name, "ownership granted");
                true
            }
            Err(err) => {
                warn!(theme = %theme_name, error = %err, "failed to persist ownership");
                false
            }
        }
    }
}

impl std::fmt::Debug for OwnershipStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnershipStore")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::testsupport::FailingStore;

    fn ownership(store: Arc<MemoryStore>) -> OwnershipStore {
        OwnershipStore::new(store, "owned_")
    }

    #[test]
    fn default_theme_is_owned_with_empty_store() {
        let store = Arc::new(MemoryStore::new());
        let owned = ownership(store.clone());
        assert!(owned.is_owned(DEFAULT_THEME_NAME));
        assert!(!owned.is_owned("Luxe Silver"));
        assert!(store.entries().is_empty());
    }

    #[test]
    fn grant_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let owned = ownership(store.clone());
        assert!(owned.grant("Luxe Silver"));
        let once = store.entries();
        assert!(owned.grant("Luxe Silver"));
        assert_eq!(store.entries(), once);
        assert_eq!(
            once.get("owned_Luxe Silver").map(String::as_str),
            Some("true")
        );
        assert!(owned.is_owned("Luxe Silver"));
    }

    #[test]
    fn granting_default_theme_writes_nothing() {
        let store = Arc::new(MemoryStore::new());
        assert!(ownership(store.clone()).grant(DEFAULT_THEME_NAME));
        assert!(store.entries().is_empty());
    }

    #[test]
    fn only_literal_true_counts_as_owned() {
        let store = Arc::new(MemoryStore::new());
        store.set("owned_Muted Ocean", "TRUE").unwrap();
        store.set("owned_Misty Purple", "1").unwrap();
        let owned = ownership(store);
        assert!(!owned.is_owned("Muted Ocean"));
        assert!(!owned.is_owned("Misty Purple"));
    }

    #[test]
    fn storage_failures_degrade_safely() {
        let owned = OwnershipStore::new(Arc::new(FailingStore::default()), "owned_");
        assert!(!owned.is_owned("Luxe Silver"));
        assert!(owned.is_owned(DEFAULT_THEME_NAME));
        assert!(!owned.grant("Luxe Silver"));
    }
}
