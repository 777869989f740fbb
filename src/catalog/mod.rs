//! Palette catalog.
//!
//! Every palette the shell can apply is registered here once, at catalog-build
//! time, and never mutated afterwards. Insertion order is display order.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CatalogError;

mod builtin;

pub use builtin::builtin_themes;

/// Name of the palette every client owns without purchase.
pub const DEFAULT_THEME_NAME: &str = "Moody Floral";

/// One `#RRGGBB` color value.
///
/// The original spelling is kept so render variables echo exactly what the
/// palette author wrote.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    raw: String,
    rgb: (u8, u8, u8),
}

impl HexColor {
    /// Parse a `#RRGGBB` literal. Surrounding whitespace is ignored.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        let digits = trimmed.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self {
            raw: trimmed.to_string(),
            rgb: (channel(0..2)?, channel(2..4)?, channel(4..6)?),
        })
    }

    /// Red, green and blue channels.
    pub fn rgb(&self) -> (u8, u8, u8) {
        self.rgb
    }

    /// Color as authored, e.g. `#3C3C44`.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// CSS `rgba(r, g, b, alpha)` form used by translucent overlays.
    pub fn to_rgba(&self, alpha: f32) -> String {
        let (r, g, b) = self.rgb;
        format!("rgba({r}, {g}, {b}, {alpha})")
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid color `{value}`: expected #RRGGBB"))
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.raw
    }
}

/// A named palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    /// Unique, human-readable identifier.
    pub name: String,
    /// Ordered colors; index `i` feeds render slot `color-i`.
    pub colors: Vec<HexColor>,
}

impl Theme {
    /// Build a palette from raw color literals.
    pub fn from_literals(name: &str, colors: &[&str]) -> Result<Self, CatalogError> {
        let colors = colors
            .iter()
            .map(|value| {
                HexColor::parse(value).ok_or_else(|| CatalogError::InvalidColor {
                    theme: name.to_string(),
                    value: value.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: name.to_string(),
            colors,
        })
    }

    /// True for the implicitly owned default palette.
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_THEME_NAME
    }
}

/// Immutable ordered registry of palettes.
#[derive(Debug, Clone)]
pub struct PaletteCatalog {
    themes: Vec<Theme>,
}

impl PaletteCatalog {
    /// Validate and freeze a palette list.
    ///
    /// Names must be unique, every palette needs at least one color, and the
    /// default palette must be present.
    pub fn new(themes: Vec<Theme>) -> Result<Self, CatalogError> {
        for (idx, theme) in themes.iter().enumerate() {
            if theme.colors.is_empty() {
                return Err(CatalogError::EmptyPalette(theme.name.clone()));
            }
            if themes[..idx].iter().any(|other| other.name == theme.name) {
                return Err(CatalogError::DuplicateName(theme.name.clone()));
            }
        }
        if !themes.iter().any(Theme::is_default) {
            return Err(CatalogError::MissingDefault(DEFAULT_THEME_NAME.to_string()));
        }
        Ok(Self { themes })
    }

    /// Catalog with the bundled palettes only.
    ///
    /// # Panics
    ///
    /// If the bundled palette table is malformed. Config-driven callers go
    /// through [`PaletteCatalog::with_extra`], which reports it instead.
    pub fn builtin() -> Self {
        match builtin_themes().and_then(Self::new) {
            Ok(catalog) => catalog,
            Err(err) => panic!("bundled palettes are invalid: {err}"),
        }
    }

    /// Catalog with the bundled palettes followed by `extra`.
    pub fn with_extra(extra: Vec<Theme>) -> Result<Self, CatalogError> {
        let mut themes = builtin_themes()?;
        themes.extend(extra);
        Self::new(themes)
    }

    /// Palettes in display order.
    pub fn list(&self) -> &[Theme] {
        &self.themes
    }

    /// Exact-name lookup. Absence is a value, never an error.
    pub fn find_by_name(&self, name: &str) -> Option<&Theme> {
        self.themes.iter().find(|theme| theme.name == name)
    }

    /// The implicitly owned palette.
    pub fn default_theme(&self) -> &Theme {
        // `new` guarantees presence; the builtin list always carries it.
        self.find_by_name(DEFAULT_THEME_NAME)
            .unwrap_or(&self.themes[0])
    }

    /// Resolve a user-typed selector as a 1-based index or a case-insensitive name.
    pub fn resolve_selector(&self, selector: &str) -> Result<&Theme, String> {
        let trimmed = selector.trim();
        if trimmed.is_empty() {
            return Err("Usage: hueshell select <name|index>".to_string());
        }

        if let Ok(index) = trimmed.parse::<usize>() {
            if index == 0 || index > self.themes.len() {
                return Err(format!(
                    "Theme index out of range: {index}. Choose 1-{}.",
                    self.themes.len()
                ));
            }
            return Ok(&self.themes[index - 1]);
        }

        let normalized = trimmed.to_ascii_lowercase();
        self.themes
            .iter()
            .find(|theme| theme.name.to_ascii_lowercase() == normalized)
            .ok_or_else(|| format!("Unknown theme `{trimmed}`. Use `hueshell list` to see themes."))
    }
}

impl Default for PaletteCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_parses_and_keeps_spelling() {
        let color = HexColor::parse(" #3c3C44 ").expect("valid");
        assert_eq!(color.as_str(), "#3c3C44");
        assert_eq!(color.rgb(), (0x3c, 0x3c, 0x44));
        assert_eq!(color.to_rgba(0.85), "rgba(60, 60, 68, 0.85)");
    }

    #[test]
    fn hex_color_rejects_malformed_values() {
        for bad in ["", "#", "3C3C44", "#3C3C4", "#3C3C445", "#GGGGGG", "#3C 3C4"] {
            assert!(HexColor::parse(bad).is_none(), "accepted {bad:?}");
        }
    }

    #[test]
    fn builtin_catalog_lists_in_display_order() {
        let catalog = PaletteCatalog::builtin();
        let names: Vec<&str> = catalog.list().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Moody Floral",
                "Stormy Mountain",
                "Muted Ocean",
                "Vintage Rose",
                "Misty Purple",
                "Luxe Silver",
                "Forest Whisper",
            ]
        );
        assert!(catalog.list().iter().all(|t| t.colors.len() == 6));
        assert_eq!(catalog.default_theme().name, DEFAULT_THEME_NAME);
    }

    #[test]
    fn find_by_name_is_exact() {
        let catalog = PaletteCatalog::builtin();
        assert!(catalog.find_by_name("Vintage Rose").is_some());
        assert!(catalog.find_by_name("vintage rose").is_none());
        assert!(catalog.find_by_name("Neon Nights").is_none());
    }

    #[test]
    fn catalog_rejects_duplicates_and_missing_default() {
        let rose = Theme::from_literals("Vintage Rose", &["#4D2E33"]).unwrap();
        let err = PaletteCatalog::with_extra(vec![rose]).expect_err("duplicate");
        assert_eq!(err, CatalogError::DuplicateName("Vintage Rose".into()));

        let lone = Theme::from_literals("Lone", &["#000000"]).unwrap();
        let err = PaletteCatalog::new(vec![lone]).expect_err("no default");
        assert_eq!(err, CatalogError::MissingDefault(DEFAULT_THEME_NAME.into()));
    }

    #[test]
    fn catalog_rejects_empty_palettes() {
        let empty = Theme {
            name: "Blank".into(),
            colors: Vec::new(),
        };
        let err = PaletteCatalog::with_extra(vec![empty]).expect_err("empty");
        assert_eq!(err, CatalogError::EmptyPalette("Blank".into()));
    }

    #[test]
    fn resolve_selector_accepts_index_and_name() {
        let catalog = PaletteCatalog::builtin();
        assert_eq!(catalog.resolve_selector("4").unwrap().name, "Vintage Rose");
        assert_eq!(
            catalog.resolve_selector("luxe silver").unwrap().name,
            "Luxe Silver"
        );
    }

    #[test]
    fn resolve_selector_rejects_unknown_values() {
        let catalog = PaletteCatalog::builtin();
        let err = catalog.resolve_selector("nope").expect_err("must reject");
        assert!(err.contains("Unknown theme"));
        let err = catalog.resolve_selector("0").expect_err("must reject");
        assert!(err.contains("out of range"));
    }

    #[test]
    fn listing_serializes_name_and_colors() {
        let catalog = PaletteCatalog::builtin();
        let json = serde_json::to_value(&catalog.list()[0]).unwrap();
        assert_eq!(json["name"], "Moody Floral");
        assert_eq!(json["colors"][0], "#3C3C44");
    }

    #[cfg(feature = "fuzz-tests")]
    mod fuzz {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_six_hex_digits_round_trip(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
                let literal = format!("#{r:02x}{g:02X}{b:02x}");
                let color = HexColor::parse(&literal).expect("valid literal");
                prop_assert_eq!(color.rgb(), (r, g, b));
                prop_assert_eq!(color.as_str(), literal.as_str());
            }

            #[test]
            fn parse_never_panics(input in "\\PC{0,12}") {
                let _ = HexColor::parse(&input);
            }
        }
    }
}
