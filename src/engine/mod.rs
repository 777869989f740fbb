//! Theme selection engine.
//!
//! `ThemeEngine` owns the active palette. A selection walks
//! `Selecting -> [AwaitingPurchase] -> Applying -> Idle`; only the most recent
//! request may commit. Each call is tagged with a sequence number and any
//! result that arrives after a newer call started is dropped.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::catalog::{PaletteCatalog, Theme};
use crate::error::SelectionError;
use crate::ownership::OwnershipStore;
use crate::purchase::PurchaseGateway;
use crate::render::{apply_palette, RenderSurface};
use crate::store::PersistenceStore;

mod state;

pub use state::{EngineSettings, EngineState, Selection};

#[derive(Debug)]
struct Inner {
    state: EngineState,
    active: Theme,
    latest_seq: u64,
    restored: bool,
}

/// Orchestrates catalog lookup, ownership, purchase and palette application.
pub struct ThemeEngine {
    catalog: Arc<PaletteCatalog>,
    store: Arc<dyn PersistenceStore>,
    ownership: OwnershipStore,
    gateway: Arc<dyn PurchaseGateway>,
    surface: Arc<dyn RenderSurface>,
    settings: EngineSettings,
    inner: Mutex<Inner>,
    active_tx: watch::Sender<Theme>,
}

impl ThemeEngine {
    /// Build an engine sitting in `Idle(default)`. Nothing is read or applied
    /// until [`ThemeEngine::restore`] runs.
    pub fn new(
        catalog: Arc<PaletteCatalog>,
        store: Arc<dyn PersistenceStore>,
        gateway: Arc<dyn PurchaseGateway>,
        surface: Arc<dyn RenderSurface>,
        settings: EngineSettings,
    ) -> Self {
        let default = catalog.default_theme().clone();
        let ownership = OwnershipStore::new(store.clone(), settings.owned_key_prefix.clone());
        let (active_tx, _) = watch::channel(default.clone());
        Self {
            catalog,
            store,
            ownership,
            gateway,
            surface,
            settings,
            inner: Mutex::new(Inner {
                state: EngineState::Idle(default.name.clone()),
                active: default,
                latest_seq: 0,
                restored: false,
            }),
            active_tx,
        }
    }

    /// Build an engine and immediately restore the persisted selection.
    pub fn start(
        catalog: Arc<PaletteCatalog>,
        store: Arc<dyn PersistenceStore>,
        gateway: Arc<dyn PurchaseGateway>,
        surface: Arc<dyn RenderSurface>,
        settings: EngineSettings,
    ) -> Self {
        let engine = Self::new(catalog, store, gateway, surface, settings);
        engine.restore();
        engine
    }

    /// Load the persisted active palette and apply it.
    ///
    /// Runs once; later calls return the current palette untouched. Unknown
    /// or unreadable names fall back to the default palette.
    pub fn restore(&self) -> Theme {
        let mut inner = self.lock();
        if inner.restored {
            return inner.active.clone();
        }
        inner.restored = true;

        let saved = match self.store.get(&self.settings.active_key) {
            Ok(saved) => saved,
            Err(err) => {
                warn!(error = %err, "failed to read saved theme; using default");
                None
            }
        };
        let restored = match saved.as_deref().and_then(|name| self.catalog.find_by_name(name)) {
            Some(theme) => theme.clone(),
            None => {
                if let Some(name) = saved.as_deref() {
                    warn!(theme = %name, "saved theme is not in the catalog; using default");
                }
                self.catalog.default_theme().clone()
            }
        };

        apply_palette(self.surface.as_ref(), &restored);
        inner.active = restored.clone();
        inner.state = EngineState::Idle(restored.name.clone());
        drop(inner);
        info!(theme = %restored.name, "theme restored");
        self.active_tx.send_replace(restored.clone());
        restored
    }

    /// Select `name` as the active palette, purchasing it first if needed.
    ///
    /// Unknown names are ignored. A call that is overtaken by a newer call
    /// while waiting on the purchase gateway resolves to
    /// [`Selection::Superseded`] and changes nothing but ownership.
    pub async fn select_theme(&self, name: &str) -> Result<Selection, SelectionError> {
        let Some(target) = self.catalog.find_by_name(name).cloned() else {
            debug!(theme = %name, "ignoring selection of unknown theme");
            return Ok(Selection::Ignored);
        };

        let seq = {
            let mut inner = self.lock();
            inner.latest_seq += 1;
            inner.state = EngineState::Selecting(target.name.clone());
            inner.latest_seq
        };
        debug!(theme = %target.name, seq, "selection started");

        if self.ownership.is_owned(&target.name) {
            return self.commit(seq, target, false);
        }

        {
            let mut inner = self.lock();
            if inner.latest_seq == seq {
                inner.state = EngineState::AwaitingPurchase(target.name.clone());
            }
        }
        debug!(theme = %target.name, seq, "awaiting purchase");

        let mut wait = PurchaseWait {
            engine: self,
            seq,
            armed: true,
        };
        let charged = self
            .gateway
            .charge(&target.name, self.settings.user_id.as_deref())
            .await;
        wait.armed = false;

        match charged {
            Ok(()) => self.commit(seq, target, true),
            Err(source) => {
                let mut inner = self.lock();
                if inner.latest_seq != seq {
                    debug!(theme = %target.name, seq, "discarding stale purchase failure");
                    return Ok(Selection::Superseded);
                }
                inner.state = EngineState::Idle(inner.active.name.clone());
                warn!(theme = %target.name, error = %source, "purchase failed; selection not applied");
                Err(SelectionError::Purchase {
                    theme: target.name,
                    source,
                })
            }
        }
    }

    fn commit(&self, seq: u64, target: Theme, purchased: bool) -> Result<Selection, SelectionError> {
        let mut inner = self.lock();

        // A completed charge is recorded even when a newer call has taken
        // over; only activation is subject to supersession.
        if purchased && !self.ownership.grant(&target.name) {
            // The charge is not rolled back; ownership and payment may disagree.
            warn!(theme = %target.name, seq, "charge succeeded but ownership was not recorded");
            if inner.latest_seq != seq {
                return Ok(Selection::Superseded);
            }
            inner.state = EngineState::Idle(inner.active.name.clone());
            return Err(SelectionError::OwnershipPersistence { theme: target.name });
        }

        if inner.latest_seq != seq {
            debug!(theme = %target.name, seq, latest = inner.latest_seq, "discarding superseded selection");
            return Ok(Selection::Superseded);
        }

        if let Err(err) = self.store.set(&self.settings.active_key, &target.name) {
            warn!(theme = %target.name, error = %err, "failed to persist active theme");
        }
        inner.state = EngineState::Applying(target.name.clone());
        apply_palette(self.surface.as_ref(), &target);
        inner.active = target.clone();
        inner.state = EngineState::Idle(target.name.clone());
        inner.restored = true;
        drop(inner);

        info!(theme = %target.name, seq, purchased, "theme applied");
        self.active_tx.send_replace(target.clone());
        Ok(Selection::Applied(target))
    }

    /// Currently applied palette.
    pub fn active(&self) -> Theme {
        self.lock().active.clone()
    }

    /// Current state-machine phase.
    pub fn state(&self) -> EngineState {
        self.lock().state.clone()
    }

    /// Palettes offered for selection, in display order.
    pub fn themes(&self) -> &[Theme] {
        self.catalog.list()
    }

    pub fn catalog(&self) -> &PaletteCatalog {
        &self.catalog
    }

    /// True when the client may select `name` without paying.
    pub fn is_owned(&self, name: &str) -> bool {
        self.ownership.is_owned(name)
    }

    /// True once any selection has been persisted for this client.
    pub fn has_saved_selection(&self) -> bool {
        matches!(self.store.get(&self.settings.active_key), Ok(Some(_)))
    }

    /// Watch the active palette. The receiver starts at the current value.
    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.active_tx.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // State is always left consistent between statements; recover from poison.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Returns the engine to `Idle` if a selection future is dropped while its
/// charge is still outstanding.
struct PurchaseWait<'a> {
    engine: &'a ThemeEngine,
    seq: u64,
    armed: bool,
}

impl Drop for PurchaseWait<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.engine.lock();
        if inner.latest_seq != self.seq
            || !matches!(inner.state, EngineState::AwaitingPurchase(_))
        {
            return;
        }
        debug!(seq = self.seq, "selection dropped while awaiting purchase");
        inner.state = EngineState::Idle(inner.active.name.clone());
    }
}

impl std::fmt::Debug for ThemeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeEngine")
            .field("settings", &self.settings)
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}
