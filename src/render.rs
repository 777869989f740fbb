//! Render surface that receives palette colors.
//!
//! The shell reads named style variables (`color-0` .. `color-N`); the engine
//! writes them through [`RenderSurface`].

use std::sync::Mutex;

use crate::catalog::Theme;

/// Sink for named style variables.
pub trait RenderSurface: Send + Sync {
    /// Set one variable, replacing any previous value.
    fn set_variable(&self, name: &str, value: &str);
}

/// Variable name for palette slot `index` (0-based).
pub fn color_variable(index: usize) -> String {
    format!("color-{index}")
}

/// Push every color of `theme` into its slot on `surface`.
pub fn apply_palette(surface: &dyn RenderSurface, theme: &Theme) {
    for (idx, color) in theme.colors.iter().enumerate() {
        surface.set_variable(&color_variable(idx), color.as_str());
    }
}

/// In-memory variable sheet. Keeps first-write order for stable output.
#[derive(Debug, Default)]
pub struct StyleVariables {
    vars: Mutex<Vec<(String, String)>>,
}

impl StyleVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of one variable.
    pub fn get(&self, name: &str) -> Option<String> {
        self.vars.lock().ok().and_then(|vars| {
            vars.iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
        })
    }

    /// All variables in first-write order.
    pub fn snapshot(&self) -> Vec<(String, String)> {
        self.vars.lock().map(|vars| vars.clone()).unwrap_or_default()
    }

    /// Render the sheet as a `:root` CSS block of custom properties.
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in self.snapshot() {
            css.push_str(&format!("  --{name}: {value};\n"));
        }
        css.push('}');
        css
    }
}

impl RenderSurface for StyleVariables {
    fn set_variable(&self, name: &str, value: &str) {
        let Ok(mut vars) = self.vars.lock() else {
            return;
        };
        match vars.iter_mut().find(|(key, _)| key == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => vars.push((name.to_string(), value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PaletteCatalog;

    #[test]
    fn apply_palette_fills_slots_in_order() {
        let catalog = PaletteCatalog::builtin();
        let rose = catalog.find_by_name("Vintage Rose").unwrap();
        let surface = StyleVariables::new();
        apply_palette(&surface, rose);

        let snapshot = surface.snapshot();
        assert_eq!(snapshot.len(), 6);
        assert_eq!(snapshot[0], ("color-0".to_string(), "#4D2E33".to_string()));
        assert_eq!(surface.get("color-5").as_deref(), Some("#F5D6C6"));
    }

    #[test]
    fn reapplying_overwrites_in_place() {
        let catalog = PaletteCatalog::builtin();
        let surface = StyleVariables::new();
        apply_palette(&surface, catalog.find_by_name("Vintage Rose").unwrap());
        apply_palette(&surface, catalog.find_by_name("Luxe Silver").unwrap());
        assert_eq!(surface.snapshot().len(), 6);
        assert_eq!(surface.get("color-0").as_deref(), Some("#1F1F1F"));
    }

    #[test]
    fn css_export_lists_custom_properties() {
        let surface = StyleVariables::new();
        surface.set_variable("color-0", "#112233");
        surface.set_variable("color-1", "#445566");
        assert_eq!(
            surface.to_css(),
            ":root {\n  --color-0: #112233;\n  --color-1: #445566;\n}"
        );
    }
}
