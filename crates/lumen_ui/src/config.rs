//! Runtime configuration, loadable from TOML.
//!
//! ```toml
//! screen_width = 1280.0
//! screen_height = 720.0
//! frame_slots = 3
//!
//! [theme]
//! button_normal = 0xFF2D5A88
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{UiError, UiResult};
use crate::style::Theme;

/// Upper bound on texture bindings per batch.
pub const MAX_TEXTURE_SLOTS_LIMIT: usize = 32;

/// Configuration for a [`crate::UiContext`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Screen width in pixels.
    pub screen_width: f32,
    /// Screen height in pixels.
    pub screen_height: f32,
    /// Number of ring-buffer frame slots.
    pub frame_slots: usize,
    /// Quads that fit in one frame slot.
    pub slot_quad_capacity: usize,
    /// Texture bindings a single batch may reference.
    pub max_texture_slots: usize,
    /// Discard primitives that fall entirely outside the viewport or scissor.
    pub culling: bool,
    /// Font size used by labels and buttons unless overridden.
    pub default_font_size: f32,
    /// Default widget colors.
    pub theme: Theme,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            screen_width: 1280.0,
            screen_height: 720.0,
            frame_slots: 3,
            slot_quad_capacity: 16_384,
            max_texture_slots: 16,
            culling: true,
            default_font_size: 14.0,
            theme: Theme::default(),
        }
    }
}

impl UiConfig {
    /// Creates a config with the given screen size and defaults elsewhere.
    #[must_use]
    pub fn with_screen_size(width: f32, height: f32) -> Self {
        Self {
            screen_width: width,
            screen_height: height,
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::ConfigParse`] on malformed TOML and
    /// [`UiError::InvalidConfig`] on out-of-range values.
    pub fn from_toml_str(text: &str) -> UiResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| UiError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::ConfigIo`] if the file cannot be read, otherwise
    /// the errors of [`UiConfig::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> UiResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| UiError::ConfigIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks that every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> UiResult<()> {
        let finite_non_negative = |v: f32| v.is_finite() && v >= 0.0;
        if !finite_non_negative(self.screen_width) || !finite_non_negative(self.screen_height) {
            return Err(UiError::InvalidConfig(format!(
                "screen size must be finite and non-negative, got {}x{}",
                self.screen_width, self.screen_height
            )));
        }
        if self.frame_slots == 0 {
            return Err(UiError::InvalidConfig("frame_slots must be at least 1".into()));
        }
        if self.slot_quad_capacity == 0 {
            return Err(UiError::InvalidConfig("slot_quad_capacity must be at least 1".into()));
        }
        if self.max_texture_slots == 0 || self.max_texture_slots > MAX_TEXTURE_SLOTS_LIMIT {
            return Err(UiError::InvalidConfig(format!(
                "max_texture_slots must be within 1..={MAX_TEXTURE_SLOTS_LIMIT}, got {}",
                self.max_texture_slots
            )));
        }
        if !(self.default_font_size.is_finite() && self.default_font_size > 0.0) {
            return Err(UiError::InvalidConfig("default_font_size must be positive".into()));
        }
        Ok(())
    }
}
