//! User settings for Marksync
//!
//! This module defines the `Settings` struct that holds the user-configurable
//! options, with serde support for reading them from JSON.

use crate::sync::{EditingMode, PreviewMode};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Available color themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Initial window dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
    /// Start maximized
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// Application settings.
///
/// All fields have defaults via the `Default` trait and `#[serde(default)]`,
/// so a partial `config.json` only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Color theme
    pub theme: Theme,

    /// Editor font size in points
    pub font_size: f32,

    /// Quiet period before the preview refreshes, in milliseconds
    pub preview_debounce_ms: u64,

    /// Editing surface shown at startup
    pub default_editing_mode: EditingMode,

    /// Preview presentation shown at startup
    pub default_preview_mode: PreviewMode,

    /// Initial window size
    pub window_size: WindowSize,

    /// Open the exported file with the system handler
    pub open_after_export: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            font_size: 14.0,
            preview_debounce_ms: Self::DEFAULT_PREVIEW_DEBOUNCE_MS,
            default_editing_mode: EditingMode::Wysiwyg,
            default_preview_mode: PreviewMode::Rendered,
            window_size: WindowSize::default(),
            open_after_export: false,
        }
    }
}

impl Settings {
    /// Minimum allowed font size.
    pub const MIN_FONT_SIZE: f32 = 8.0;
    /// Maximum allowed font size.
    pub const MAX_FONT_SIZE: f32 = 72.0;
    /// Minimum window dimension.
    pub const MIN_WINDOW_SIZE: f32 = 400.0;
    /// Maximum window dimension.
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;
    /// Default preview quiet period.
    pub const DEFAULT_PREVIEW_DEBOUNCE_MS: u64 = 300;
    /// Longest accepted preview quiet period.
    pub const MAX_PREVIEW_DEBOUNCE_MS: u64 = 5000;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// Configuration files are edited by hand, so anything out of range is
    /// pulled back in rather than rejected.
    pub fn sanitize(&mut self) {
        if !self.font_size.is_finite() {
            self.font_size = Self::default().font_size;
        }
        self.font_size = self
            .font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);

        self.preview_debounce_ms = self.preview_debounce_ms.min(Self::MAX_PREVIEW_DEBOUNCE_MS);

        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
    }

    /// Deserialize and then sanitize.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Preview quiet period as a `Duration`.
    pub fn preview_debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.preview_debounce_ms)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.font_size, 14.0);
        assert_eq!(settings.preview_debounce_ms, 300);
        assert_eq!(settings.default_editing_mode, EditingMode::Wysiwyg);
        assert_eq!(settings.default_preview_mode, PreviewMode::Rendered);
        assert_eq!(settings.window_size.width, 1200.0);
        assert!(!settings.open_after_export);
    }

    #[test]
    fn test_theme_serialization() {
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), "\"light\"");
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        assert_eq!(
            serde_json::from_str::<Theme>("\"system\"").unwrap(),
            Theme::System
        );
    }

    #[test]
    fn test_mode_deserialization() {
        let settings: Settings = serde_json::from_str(
            r#"{"default_editing_mode": "source", "default_preview_mode": "html_source"}"#,
        )
        .unwrap();
        assert_eq!(settings.default_editing_mode, EditingMode::Source);
        assert_eq!(settings.default_preview_mode, PreviewMode::HtmlSource);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"theme": "dark"}"#).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.preview_debounce_ms, 300);
        assert_eq!(settings.window_size, WindowSize::default());
    }

    #[test]
    fn test_sanitize_clamps_values() {
        let mut settings = Settings {
            font_size: 200.0,
            preview_debounce_ms: 60_000,
            window_size: WindowSize {
                width: 10.0,
                height: 50_000.0,
                maximized: false,
            },
            ..Settings::default()
        };
        settings.sanitize();

        assert_eq!(settings.font_size, Settings::MAX_FONT_SIZE);
        assert_eq!(settings.preview_debounce_ms, Settings::MAX_PREVIEW_DEBOUNCE_MS);
        assert_eq!(settings.window_size.width, Settings::MIN_WINDOW_SIZE);
        assert_eq!(settings.window_size.height, Settings::MAX_WINDOW_SIZE);
    }

    #[test]
    fn test_zero_debounce_is_allowed() {
        let settings = Settings::from_json_sanitized(r#"{"preview_debounce_ms": 0}"#).unwrap();
        assert_eq!(settings.preview_debounce(), std::time::Duration::ZERO);
    }

    #[test]
    fn test_from_json_sanitized_rejects_invalid_json() {
        assert!(Settings::from_json_sanitized("{ not json").is_err());
    }
}
