//! Unified error types for the palette engine.

use std::fmt;

// ---------------------------------------------------------------------------
// CatalogError
// ---------------------------------------------------------------------------

/// Errors raised while building a palette catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Two palettes share one name.
    DuplicateName(String),
    /// The catalog does not contain the free default palette.
    MissingDefault(String),
    /// A palette was registered without any colors.
    EmptyPalette(String),
    /// A color value is not a `#RRGGBB` literal.
    InvalidColor { theme: String, value: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName(name) => write!(f, "duplicate theme name `{name}`"),
            Self::MissingDefault(name) => write!(f, "default theme `{name}` is not registered"),
            Self::EmptyPalette(name) => write!(f, "theme `{name}` has no colors"),
            Self::InvalidColor { theme, value } => {
                write!(f, "theme `{theme}` has invalid color `{value}`")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Catalog(CatalogError),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Catalog(e) => write!(f, "catalog: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

impl From<CatalogError> for ConfigError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Errors from the client-scoped key/value persistence surface.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// The backing store cannot be reached at all.
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Json(e) => write!(f, "json: {e}"),
            Self::Unavailable(msg) => write!(f, "store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

// ---------------------------------------------------------------------------
// GatewayError
// ---------------------------------------------------------------------------

/// Errors from the remote purchase endpoint.
#[derive(Debug)]
pub enum GatewayError {
    /// Network / reqwest-level error.
    Http(reqwest::Error),
    /// Non-2xx status from the purchase endpoint.
    Status(u16, String),
    /// The caller gave up waiting for the charge to complete.
    Timeout,
}

impl GatewayError {
    /// True when the remote side answered and refused the charge.
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Status(..))
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status(code, body) => write!(f, "status {code}: {body}"),
            Self::Timeout => write!(f, "purchase timed out"),
        }
    }
}

impl std::error::Error for GatewayError {}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return Self::Timeout;
        }
        Self::Http(e)
    }
}

// ---------------------------------------------------------------------------
// SelectionError
// ---------------------------------------------------------------------------

/// Failure of one `select_theme` call. The engine stays usable afterwards.
#[derive(Debug)]
pub enum SelectionError {
    /// The purchase call was refused or never completed.
    Purchase { theme: String, source: GatewayError },
    /// Ownership could not be recorded, so the selection was not finalized.
    OwnershipPersistence { theme: String },
}

impl SelectionError {
    /// Theme the failed selection asked for.
    pub fn theme(&self) -> &str {
        match self {
            Self::Purchase { theme, .. } | Self::OwnershipPersistence { theme } => theme,
        }
    }
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Purchase { theme, source } if source.is_denied() => {
                write!(f, "purchase of `{theme}` was denied ({source})")
            }
            Self::Purchase { theme, source } => {
                write!(f, "purchase of `{theme}` failed: {source}")
            }
            Self::OwnershipPersistence { theme } => {
                write!(f, "could not record ownership of `{theme}`")
            }
        }
    }
}

impl std::error::Error for SelectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Purchase { source, .. } => Some(source),
            Self::OwnershipPersistence { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_error_display() {
        assert_eq!(
            CatalogError::DuplicateName("Luxe Silver".into()).to_string(),
            "duplicate theme name `Luxe Silver`"
        );
        assert_eq!(
            CatalogError::InvalidColor {
                theme: "x".into(),
                value: "#zz".into()
            }
            .to_string(),
            "theme `x` has invalid color `#zz`"
        );
    }

    #[test]
    fn config_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let e = ConfigError::from(io_err);
        let s = e.to_string();
        assert!(s.starts_with("io:"), "got: {s}");
        assert!(s.contains("file not found"));
    }

    #[test]
    fn config_error_from_toml() {
        let toml_err: toml::de::Error = toml::from_str::<toml::Value>("x = [unclosed").unwrap_err();
        let e = ConfigError::from(toml_err);
        assert!(e.to_string().starts_with("toml:"));
    }

    #[test]
    fn store_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(StoreError::from(json_err).to_string().starts_with("json:"));
    }

    #[test]
    fn gateway_status_counts_as_denied() {
        assert!(GatewayError::Status(402, "payment required".into()).is_denied());
        assert!(!GatewayError::Timeout.is_denied());
    }

    #[test]
    fn selection_error_reports_theme_and_cause() {
        let err = SelectionError::Purchase {
            theme: "Misty Purple".into(),
            source: GatewayError::Status(500, "boom".into()),
        };
        assert_eq!(err.theme(), "Misty Purple");
        assert!(err.to_string().contains("denied"), "got: {err}");

        let err = SelectionError::OwnershipPersistence {
            theme: "Misty Purple".into(),
        };
        assert_eq!(err.to_string(), "could not record ownership of `Misty Purple`");
    }
}
