//! Board configuration.

use kurbo::Size;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default cap on collision correction passes.
pub const DEFAULT_MAX_CORRECTION_PASSES: usize = 10_000;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// How a glyph is tested against the selection rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitMode {
    /// The glyph's bounding box overlaps the rectangle (edges included).
    #[default]
    Overlap,
    /// The glyph's top-left corner lies within the rectangle.
    Anchor,
}

/// What happens to glyphs that end up left of the canvas (x < 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrunePolicy {
    /// Keep them alive off-canvas.
    Retain,
    /// Remove them from the registry and the selection.
    #[default]
    RemoveOutOfBounds,
}

/// Selection engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub hit_mode: HitMode,
    pub prune: PrunePolicy,
    /// Upper bound on correction passes after a single drag.
    pub max_correction_passes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hit_mode: HitMode::default(),
            prune: PrunePolicy::default(),
            max_correction_passes: DEFAULT_MAX_CORRECTION_PASSES,
        }
    }
}

/// Text layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Advance width used by monospace metrics.
    pub glyph_width: f64,
    /// Line height used by monospace metrics.
    pub glyph_height: f64,
    /// Vertical position of freshly submitted glyphs.
    pub top: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            glyph_width: 16.0,
            glyph_height: 28.0,
            top: 120.0,
        }
    }
}

impl LayoutConfig {
    /// Monospace glyph size.
    pub fn glyph_size(&self) -> Size {
        Size::new(self.glyph_width, self.glyph_height)
    }
}

/// Top-level configuration for a [`crate::Board`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub engine: EngineConfig,
    pub layout: LayoutConfig,
}

impl BoardConfig {
    /// Parse and validate a configuration from JSON.
    /// Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.max_correction_passes == 0 {
            return Err(ConfigError::Invalid(
                "max_correction_passes must be greater than zero".to_string(),
            ));
        }
        let layout = &self.layout;
        if !(layout.glyph_width.is_finite() && layout.glyph_width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "glyph_width must be positive, got {}",
                layout.glyph_width
            )));
        }
        if !(layout.glyph_height.is_finite() && layout.glyph_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "glyph_height must be positive, got {}",
                layout.glyph_height
            )));
        }
        if !layout.top.is_finite() {
            return Err(ConfigError::Invalid("top must be finite".to_string()));
        }
        Ok(())
    }
}
