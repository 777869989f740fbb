//! Configuration data model.
//!
//! This module holds struct definitions plus their defaults and the
//! conversions into runtime settings. Loading and precedence live in
//! `config::loader`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::background::{
    BackgroundMap, BackgroundSettings, OverlayStyle, DEFAULT_FADE_DELAY,
    DEFAULT_GRADIENT_ANGLE_DEG, DEFAULT_IMAGE, DEFAULT_OVERLAY_ALPHA,
};
use crate::catalog::{HexColor, PaletteCatalog, Theme};
use crate::engine::EngineSettings;
use crate::error::{CatalogError, ConfigError};

use super::defaults::{DEFAULT_PURCHASE_ENDPOINT, DEFAULT_PURCHASE_TIMEOUT_SECS};

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub purchase: PurchaseConfig,
    pub storage: StorageConfig,
    pub background: BackgroundConfig,
    /// Extra palettes appended after the bundled ones.
    pub themes: Vec<ThemeConfig>,
}

impl Config {
    /// Persistence keys and purchase payload shape for the engine.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            active_key: self.storage.active_key.clone(),
            owned_key_prefix: self.storage.owned_key_prefix.clone(),
            user_id: self
                .purchase
                .user_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
        }
    }

    /// Image map, overlay style and fade delay for the background.
    pub fn background_settings(&self) -> BackgroundSettings {
        let images = self
            .background
            .images
            .iter()
            .fold(
                BackgroundMap::new(self.background.default_image.clone()),
                |map, (location, image)| map.with(location.clone(), image.clone()),
            );
        BackgroundSettings {
            images,
            overlay: OverlayStyle {
                alpha: self.background.overlay_alpha,
                angle_deg: self.background.gradient_angle_deg,
            },
            fade_delay: Duration::from_millis(self.background.fade_delay_ms),
        }
    }

    /// Bundled palettes plus configured extras, validated.
    pub fn build_catalog(&self) -> Result<PaletteCatalog, ConfigError> {
        let extra = self
            .themes
            .iter()
            .map(ThemeConfig::to_theme)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PaletteCatalog::with_extra(extra)?)
    }

    /// Timeout applied to each purchase request.
    pub fn purchase_timeout(&self) -> Duration {
        Duration::from_secs(self.purchase.timeout_secs.max(1))
    }

    /// Persistence file: the configured path or the per-user default.
    pub fn store_path(&self) -> Option<PathBuf> {
        match self.storage.path.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
            _ => super::init::default_store_path(),
        }
    }

    /// Reject values no component can honour.
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.purchase.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "purchase.endpoint cannot be empty".to_string(),
            ));
        }
        if self.storage.active_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.active_key cannot be empty".to_string(),
            ));
        }
        if self.storage.owned_key_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "storage.owned_key_prefix cannot be empty".to_string(),
            ));
        }
        let alpha = self.background.overlay_alpha;
        if !(0.0..=1.0).contains(&alpha) {
            return Err(ConfigError::Invalid(format!(
                "background.overlay_alpha must be between 0 and 1, got {alpha}"
            )));
        }
        Ok(())
    }
}

/// `[purchase]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PurchaseConfig {
    pub endpoint: String,
    /// Sent as `user_id` when set; omitted from the payload otherwise.
    pub user_id: Option<String>,
    pub timeout_secs: u64,
}

impl Default for PurchaseConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_PURCHASE_ENDPOINT.to_string(),
            user_id: None,
            timeout_secs: DEFAULT_PURCHASE_TIMEOUT_SECS,
        }
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: Option<String>,
    pub active_key: String,
    pub owned_key_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let settings = EngineSettings::default();
        Self {
            path: None,
            active_key: settings.active_key,
            owned_key_prefix: settings.owned_key_prefix,
        }
    }
}

/// `[background]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub fade_delay_ms: u64,
    pub overlay_alpha: f32,
    pub gradient_angle_deg: u16,
    pub default_image: String,
    /// Location → image asset. Replaces the bundled map when present.
    pub images: BTreeMap<String, String>,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        let mut images = BTreeMap::new();
        images.insert("/".to_string(), "/assets/black_rose_home.png".to_string());
        images.insert("/404".to_string(), "/assets/black_rose_404.png".to_string());
        Self {
            fade_delay_ms: DEFAULT_FADE_DELAY.as_millis() as u64,
            overlay_alpha: DEFAULT_OVERLAY_ALPHA,
            gradient_angle_deg: DEFAULT_GRADIENT_ANGLE_DEG,
            default_image: DEFAULT_IMAGE.to_string(),
            images,
        }
    }
}

/// One `[[themes]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
    pub colors: Vec<String>,
}

impl ThemeConfig {
    fn to_theme(&self) -> Result<Theme, CatalogError> {
        let name = self.name.trim().to_string();
        let colors = self
            .colors
            .iter()
            .map(|value| {
                HexColor::parse(value).ok_or_else(|| CatalogError::InvalidColor {
                    theme: name.clone(),
                    value: value.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Theme { name, colors })
    }
}

/// Result of `hueshell init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalConfigInitResult {
    Created { path: PathBuf },
    AlreadyInitialized { path: PathBuf },
    Overwritten { path: PathBuf, backup_path: PathBuf },
}
