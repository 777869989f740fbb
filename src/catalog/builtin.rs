//! Bundled palettes.

use super::Theme;
use crate::error::CatalogError;

const BUILTIN: &[(&str, [&str; 6])] = &[
    (
        "Moody Floral",
        ["#3C3C44", "#49475B", "#6F7275", "#ADA284", "#F2AE72", "#BE4450"],
    ),
    // Blue-grey tones of a mountain range under a stormy sky.
    (
        "Stormy Mountain",
        ["#2E3A46", "#4C6A88", "#5B7F95", "#8DA3B9", "#B9C5D8", "#EAF0F8"],
    ),
    (
        "Muted Ocean",
        ["#1B2E35", "#3A6B7C", "#4E8598", "#7CA8B5", "#AECFD6", "#E0EEF2"],
    ),
    (
        "Vintage Rose",
        ["#4D2E33", "#7E2A40", "#A53B5C", "#CA6C7D", "#EAB0A1", "#F5D6C6"],
    ),
    (
        "Misty Purple",
        ["#3E284B", "#5E3E66", "#7C4D7A", "#A76E9C", "#D0A5CF", "#E8D6E9"],
    ),
    // Monochrome charcoal to silver.
    (
        "Luxe Silver",
        ["#1F1F1F", "#313131", "#4D4D4D", "#7A7A7A", "#B0B0B0", "#E5E5E5"],
    ),
    (
        "Forest Whisper",
        ["#233D4D", "#426A5A", "#688E5A", "#9DBF4E", "#C7D59F", "#E4EBD7"],
    ),
];

/// Bundled palettes in display order; the first is the free default.
///
/// Fails on a malformed bundled color instead of dropping it.
pub fn builtin_themes() -> Result<Vec<Theme>, CatalogError> {
    BUILTIN
        .iter()
        .map(|(name, colors)| Theme::from_literals(name, colors))
        .collect()
}
