//! Configuration types for map queries and source editing.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources; every field falls back to its default when missing.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining map and edit settings.
//! - [`MapConfig`] - Surface size, evolution offsets and link display options.
//! - [`EditConfig`] - How coordinates are written back into a source.
//!
//! # Example
//!
//! ```
//! # use wardley::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.map().dimensions().width(), 500.0);
//! assert_eq!(config.edit().precision(), 2);
//! ```

use serde::Deserialize;

use wardley_core::{
    evolution::EvolutionOffsets,
    geometry::{DEFAULT_PRECISION, MapDimensions},
};

/// Largest precision accepted for written coordinates.
pub const MAX_PRECISION: usize = 6;

/// Top-level configuration combining map and edit settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Map configuration section.
    #[serde(default)]
    map: MapConfig,

    /// Edit configuration section.
    #[serde(default)]
    edit: EditConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    ///
    /// # Arguments
    ///
    /// * `map` - Surface and query settings.
    /// * `edit` - Source editing settings.
    pub fn new(map: MapConfig, edit: EditConfig) -> Self {
        Self { map, edit }
    }

    /// Returns the map configuration.
    pub fn map(&self) -> &MapConfig {
        &self.map
    }

    /// Returns the edit configuration.
    pub fn edit(&self) -> &EditConfig {
        &self.edit
    }
}

/// Settings that shape the derived views of a map.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Surface width in pixels.
    width: f64,

    /// Surface height in pixels.
    height: f64,

    /// Resolve link ends to the evolved variant of a component.
    show_linked_evolved: bool,

    /// Boundaries between the evolution stages.
    evolution: EvolutionOffsets,
}

impl Default for MapConfig {
    fn default() -> Self {
        let dimensions = MapDimensions::default();
        Self {
            width: dimensions.width(),
            height: dimensions.height(),
            show_linked_evolved: false,
            evolution: EvolutionOffsets::default(),
        }
    }
}

impl MapConfig {
    /// Creates a new [`MapConfig`].
    pub fn new(dimensions: MapDimensions, show_linked_evolved: bool, evolution: EvolutionOffsets) -> Self {
        Self {
            width: dimensions.width(),
            height: dimensions.height(),
            show_linked_evolved,
            evolution,
        }
    }

    /// Returns the configured surface size.
    ///
    /// A `size` statement in the map source takes precedence over this.
    pub fn dimensions(&self) -> MapDimensions {
        MapDimensions::new(self.width, self.height)
    }

    pub fn show_linked_evolved(&self) -> bool {
        self.show_linked_evolved
    }

    pub fn evolution(&self) -> EvolutionOffsets {
        self.evolution
    }

    /// Returns a copy with `show_linked_evolved` replaced.
    pub fn with_show_linked_evolved(mut self, show_linked_evolved: bool) -> Self {
        self.show_linked_evolved = show_linked_evolved;
        self
    }
}

/// Settings for writing coordinates back into a source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditConfig {
    /// Decimal places written for normalized coordinates.
    precision: usize,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

impl EditConfig {
    /// Creates a new [`EditConfig`] with the given precision.
    pub fn new(precision: usize) -> Self {
        Self { precision }
    }

    /// Returns the number of decimal places written for coordinates.
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Checks the settings for values the editor cannot honour.
    ///
    /// # Errors
    ///
    /// Returns a message when the precision exceeds [`MAX_PRECISION`].
    pub fn validate(&self) -> Result<(), String> {
        if self.precision > MAX_PRECISION {
            return Err(format!(
                "edit.precision must be at most {MAX_PRECISION}, got {}",
                self.precision
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.map().dimensions(), MapDimensions::new(500.0, 600.0));
        assert!(!config.map().show_linked_evolved());
        assert_eq!(config.map().evolution(), EvolutionOffsets::default());
        assert_eq!(config.edit().precision(), DEFAULT_PRECISION);
    }

    #[test]
    fn test_precision_validation() {
        assert!(EditConfig::new(3).validate().is_ok());
        let err = EditConfig::new(9).validate().unwrap_err();
        assert!(err.contains("at most 6"));
    }
}
