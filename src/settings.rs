//! Highlight appearance settings
//!
//! The settings panel produces three values — highlight color, thickness,
//! opacity — persisted as individual records in the host's key-value store.
//! Missing or unparseable records fall back to defaults (with a warning for
//! the unparseable case); stored values outside the allowed ranges clamp.

use crate::store::KeyValueStore;

/// Store key for the highlight color
pub const COLOR_KEY: &str = "hlColor";
/// Store key for the highlight thickness
pub const THICKNESS_KEY: &str = "hlThickness";
/// Store key for the highlight opacity
pub const OPACITY_KEY: &str = "hlOpacity";

/// Appearance of the line overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighlightSettings {
    /// CSS color of the current-line highlight
    pub color: String,
    /// Vertical hitbox padding in logical pixels
    pub thickness: u16,
    /// Highlight opacity percentage
    pub opacity: u8,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            color: Self::DEFAULT_COLOR.to_string(),
            thickness: Self::DEFAULT_THICKNESS,
            opacity: Self::DEFAULT_OPACITY,
        }
    }
}

impl HighlightSettings {
    pub const DEFAULT_COLOR: &'static str = "#ffeb3b";
    pub const DEFAULT_THICKNESS: u16 = 6;
    pub const DEFAULT_OPACITY: u8 = 40;
    pub const MIN_THICKNESS: u16 = 2;
    pub const MAX_THICKNESS: u16 = 20;
    pub const MAX_OPACITY: u8 = 100;

    pub fn clamp_thickness(value: u16) -> u16 {
        value.clamp(Self::MIN_THICKNESS, Self::MAX_THICKNESS)
    }

    pub fn clamp_opacity(value: u8) -> u8 {
        value.min(Self::MAX_OPACITY)
    }

    /// Loads settings from the store, one key at a time, falling back to
    /// the default for each key that is absent or unparseable.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let defaults = Self::default();

        let color = store.get(COLOR_KEY).unwrap_or(defaults.color);

        let thickness = match store.get(THICKNESS_KEY) {
            Some(raw) => match raw.parse::<u16>() {
                Ok(value) => Self::clamp_thickness(value),
                Err(e) => {
                    log::warn!("Ignoring malformed highlight thickness {raw:?}: {e}");
                    defaults.thickness
                }
            },
            None => defaults.thickness,
        };

        let opacity = match store.get(OPACITY_KEY) {
            Some(raw) => match raw.parse::<u8>() {
                Ok(value) => Self::clamp_opacity(value),
                Err(e) => {
                    log::warn!("Ignoring malformed highlight opacity {raw:?}: {e}");
                    defaults.opacity
                }
            },
            None => defaults.opacity,
        };

        Self {
            color,
            thickness,
            opacity,
        }
    }

    /// Updates the color and persists it. Save failures are logged and
    /// swallowed.
    pub fn set_color(&mut self, store: &mut dyn KeyValueStore, color: String) {
        if let Err(e) = store.set(COLOR_KEY, &color) {
            log::error!("Failed to save highlight color: {e:#}");
        }
        self.color = color;
    }

    /// Clamps, updates, and persists the thickness. Returns the applied
    /// value.
    pub fn set_thickness(&mut self, store: &mut dyn KeyValueStore, value: u16) -> u16 {
        let value = Self::clamp_thickness(value);
        if let Err(e) = store.set(THICKNESS_KEY, &value.to_string()) {
            log::error!("Failed to save highlight thickness: {e:#}");
        }
        self.thickness = value;
        value
    }

    /// Clamps, updates, and persists the opacity. Returns the applied value.
    pub fn set_opacity(&mut self, store: &mut dyn KeyValueStore, value: u8) -> u8 {
        let value = Self::clamp_opacity(value);
        if let Err(e) = store.set(OPACITY_KEY, &value.to_string()) {
            log::error!("Failed to save highlight opacity: {e:#}");
        }
        self.opacity = value;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn empty_store_yields_defaults() {
        let store = MemoryStore::new();
        assert_eq!(
            HighlightSettings::load(&store),
            HighlightSettings::default()
        );
    }

    #[test]
    fn stored_values_load_with_clamping() {
        let mut store = MemoryStore::new();
        store.set(COLOR_KEY, "#336699").unwrap();
        store.set(THICKNESS_KEY, "99").unwrap();
        store.set(OPACITY_KEY, "100").unwrap();

        let settings = HighlightSettings::load(&store);
        assert_eq!(settings.color, "#336699");
        assert_eq!(settings.thickness, HighlightSettings::MAX_THICKNESS);
        assert_eq!(settings.opacity, 100);
    }

    #[test]
    fn malformed_values_fall_back_per_key() {
        let mut store = MemoryStore::new();
        store.set(THICKNESS_KEY, "thick").unwrap();
        store.set(OPACITY_KEY, "300").unwrap();

        let settings = HighlightSettings::load(&store);
        assert_eq!(settings.thickness, HighlightSettings::DEFAULT_THICKNESS);
        // 300 overflows u8 and parses as malformed, not as a clampable value.
        assert_eq!(settings.opacity, HighlightSettings::DEFAULT_OPACITY);
    }

    #[test]
    fn setters_clamp_and_persist() {
        let mut store = MemoryStore::new();
        let mut settings = HighlightSettings::default();

        assert_eq!(settings.set_thickness(&mut store, 1), 2);
        assert_eq!(settings.set_opacity(&mut store, 250), 100);
        settings.set_color(&mut store, "#000000".to_string());

        let reloaded = HighlightSettings::load(&store);
        assert_eq!(reloaded.thickness, 2);
        assert_eq!(reloaded.opacity, 100);
        assert_eq!(reloaded.color, "#000000");
    }
}
