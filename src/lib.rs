//! hueshell: palette selection, ownership and background crossfade for an
//! application shell.
//!
//! The crate centres on [`engine::ThemeEngine`], which restores the persisted
//! palette, gates premium palettes behind a purchase call, and pushes colors
//! to a render surface. [`background::BackgroundTransition`] follows the
//! active palette and the current location to crossfade the shell backdrop.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use hueshell::catalog::PaletteCatalog;
//! use hueshell::engine::{EngineSettings, ThemeEngine};
//! use hueshell::purchase::HttpPurchaseGateway;
//! use hueshell::render::StyleVariables;
//! use hueshell::store::MemoryStore;
//!
//! # async fn example() {
//! let engine = ThemeEngine::start(
//!     Arc::new(PaletteCatalog::builtin()),
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(HttpPurchaseGateway::new(
//!         "http://localhost:3000/api/purchase-theme",
//!         Duration::from_secs(30),
//!     )),
//!     Arc::new(StyleVariables::new()),
//!     EngineSettings::default(),
//! );
//! let outcome = engine.select_theme("Vintage Rose").await;
//! println!("{outcome:?}");
//! # }
//! ```

pub mod background;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod ownership;
pub mod purchase;
pub mod render;
pub mod store;
#[cfg(test)]
pub mod testsupport;
