//! Persisted plugin settings.
//!
//! Stored by the host as JSON with camelCase keys. Missing keys fall back to
//! defaults so older data files keep loading.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use serde::{Deserialize, Serialize};

use crate::consts::PROGRESS_HEIGHT_PROPERTY;
use crate::error::{Error, Result};
use crate::input::InputFlags;

/// Deck theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Follow the host's own theme.
    #[default]
    Default,
    Black,
    White,
    League,
    Beige,
    Night,
    Serif,
    Simple,
    Solarized,
    Moon,
    Dracula,
    Sky,
    Blood,
}

/// Animation between slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideTransition {
    None,
    Fade,
    #[default]
    SlideHorizontal,
    SlideVertical,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub hide_navigate_left: bool,
    pub hide_navigate_right: bool,
    pub hide_navigate_up: bool,
    pub hide_navigate_down: bool,
    pub hide_close_btn: bool,
    /// Progress bar height in pixels.
    pub progress_height: u32,
    pub left_align_bullets: bool,
    /// Use the host's font settings inside slides.
    pub respect_obsidian_settings: bool,
    pub enable_pan: bool,
    pub enable_zoom: bool,
    #[serde(rename = "enableWASD")]
    pub enable_wasd: bool,
    pub theme: Theme,
    pub transition: SlideTransition,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hide_navigate_left: true,
            hide_navigate_right: true,
            hide_navigate_up: true,
            hide_navigate_down: true,
            hide_close_btn: true,
            progress_height: 10,
            left_align_bullets: false,
            respect_obsidian_settings: true,
            enable_pan: true,
            enable_zoom: true,
            enable_wasd: false,
            theme: Theme::default(),
            transition: SlideTransition::default(),
        }
    }
}

impl Settings {
    /// Parse stored plugin data. `null` (nothing saved yet) yields defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Settings` if the JSON is malformed or a value has the wrong type.
    pub fn from_json(raw: &str) -> Result<Self> {
        let stored: Option<Settings> = serde_json::from_str(raw)?;
        Ok(stored.unwrap_or_default())
    }

    /// Serialize for storage.
    ///
    /// # Errors
    ///
    /// Returns `Error::Settings` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Set the progress bar height from user text input.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSetting` unless `raw` is a non-negative integer.
    pub fn set_progress_height(&mut self, raw: &str) -> Result<()> {
        let height = raw.trim().parse::<u32>().map_err(|_| Error::InvalidSetting {
            key: "progressHeight",
            value: raw.to_string(),
        })?;
        self.progress_height = height;
        Ok(())
    }

    /// Flags the viewport controller reads on every event.
    #[must_use]
    pub fn input_flags(&self) -> InputFlags {
        InputFlags {
            pan_enabled: self.enable_pan,
            zoom_enabled: self.enable_zoom,
            key_remap_enabled: self.enable_wasd,
        }
    }

    /// Static cosmetic classes toggled on the document body.
    #[must_use]
    pub fn body_classes(&self) -> [(&'static str, bool); 6] {
        [
            ("hide-navigate-left", self.hide_navigate_left),
            ("hide-navigate-right", self.hide_navigate_right),
            ("hide-navigate-up", self.hide_navigate_up),
            ("hide-navigate-down", self.hide_navigate_down),
            ("hide-close-btn", self.hide_close_btn),
            ("left-align-bullets", self.left_align_bullets),
        ]
    }

    /// Custom property carrying the progress bar height.
    #[must_use]
    pub fn progress_height_property(&self) -> (&'static str, String) {
        (PROGRESS_HEIGHT_PROPERTY, format!("{}px", self.progress_height))
    }
}
