//! Engine data model: phases, outcomes and settings.

use crate::catalog::Theme;

/// Default storage key for the active palette name.
pub const DEFAULT_ACTIVE_KEY: &str = "hueshell_palette";
/// Default storage key prefix for per-palette ownership flags.
pub const DEFAULT_OWNED_KEY_PREFIX: &str = "hueshell_theme_owned_";

/// Phase of the selection state machine. Each variant carries a theme name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineState {
    /// Nothing in flight; the payload is the applied palette.
    Idle(String),
    /// A request was accepted and ownership is being checked.
    Selecting(String),
    /// Waiting on the purchase gateway.
    AwaitingPurchase(String),
    /// Colors are being pushed to the render surface.
    Applying(String),
}

impl EngineState {
    /// Theme name carried by the current phase.
    pub fn theme_name(&self) -> &str {
        match self {
            Self::Idle(name)
            | Self::Selecting(name)
            | Self::AwaitingPurchase(name)
            | Self::Applying(name) => name,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle(_))
    }
}

/// Non-error result of `ThemeEngine::select_theme`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The palette is now active.
    Applied(Theme),
    /// The name is not in the catalog; nothing changed.
    Ignored,
    /// A newer selection started before this one could commit.
    Superseded,
}

impl Selection {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Persistence keys and purchase payload shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Key holding the active palette name.
    pub active_key: String,
    /// Prefix of the per-palette ownership keys.
    pub owned_key_prefix: String,
    /// Identifier sent as `user_id` with purchases; omitted when `None`.
    pub user_id: Option<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            active_key: DEFAULT_ACTIVE_KEY.to_string(),
            owned_key_prefix: DEFAULT_OWNED_KEY_PREFIX.to_string(),
            user_id: None,
        }
    }
}
