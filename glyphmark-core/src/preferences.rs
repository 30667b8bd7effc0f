//! Reader preferences
//!
//! Preferences are a plain value owned by whoever persists them. The
//! engine reads them and never mutates them; clamping returns a copy.

use crate::config::{FontBounds, Range};
use serde::{Deserialize, Serialize};

/// Display mode flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeFlag {
    /// Bold the leading half of each word
    #[serde(alias = "boldStarts")]
    BoldStarts,
    /// Color vowels not claimed by a letter group
    #[serde(alias = "vowelColoring")]
    VowelColoring,
    /// Any flag this version does not know; ignored
    #[serde(other)]
    Unknown,
}

/// A complete preference snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Font family name
    pub font: String,
    /// Font size in pixels
    #[serde(alias = "fontSize")]
    pub font_size: f64,
    /// Line height multiplier
    #[serde(alias = "lineSpacing")]
    pub line_spacing: f64,
    /// Letter spacing in pixels
    #[serde(alias = "letterSpacing")]
    pub letter_spacing: f64,
    /// Word spacing in pixels
    #[serde(alias = "wordSpacing")]
    pub word_spacing: f64,
    /// Palette key of the background color
    #[serde(alias = "backgroundColor")]
    pub background_color: String,
    /// Palette key of the text color
    #[serde(alias = "textColor")]
    pub text_color: String,
    /// Active mode flags, in the order they were enabled
    #[serde(alias = "activeModes")]
    pub active_modes: Vec<ModeFlag>,
    /// Active letter-group keys, highest priority first
    #[serde(alias = "activeLetterGroups")]
    pub active_letter_groups: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            font: "Arial".to_string(),
            font_size: 16.0,
            line_spacing: 1.5,
            letter_spacing: 0.0,
            word_spacing: 0.0,
            background_color: "white".to_string(),
            text_color: "black".to_string(),
            active_modes: Vec::new(),
            active_letter_groups: Vec::new(),
        }
    }
}

impl Preferences {
    /// Whether a mode flag is active
    pub fn has_mode(&self, mode: ModeFlag) -> bool {
        self.active_modes.contains(&mode)
    }

    /// Whether bold starts are active
    pub fn bold_starts(&self) -> bool {
        self.has_mode(ModeFlag::BoldStarts)
    }

    /// Whether vowel coloring is active
    pub fn vowel_coloring(&self) -> bool {
        self.has_mode(ModeFlag::VowelColoring)
    }

    /// Activation order for letter groups
    pub fn activation_order(&self) -> &[String] {
        &self.active_letter_groups
    }

    /// Return a copy with a mode flag enabled (no duplicates)
    pub fn with_mode(mut self, mode: ModeFlag) -> Self {
        if mode != ModeFlag::Unknown && !self.has_mode(mode) {
            self.active_modes.push(mode);
        }
        self
    }

    /// Return a copy with a letter group appended at lowest priority
    pub fn with_group(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !self.active_letter_groups.contains(&key) {
            self.active_letter_groups.push(key);
        }
        self
    }

    /// Return a copy with numeric values clamped into `bounds`.
    ///
    /// Quantities without a bound are left as they are, except NaN,
    /// which becomes the default value for that quantity.
    pub fn clamped(&self, bounds: &FontBounds) -> Self {
        let defaults = Preferences::default();
        let fix = |value: f64, range: Option<Range>, default: f64| match range {
            Some(range) => {
                let clamped = range.clamp(value);
                if clamped != value && !value.is_nan() {
                    tracing::debug!(value, clamped, "preference value out of range, clamped");
                }
                clamped
            }
            None if value.is_nan() => default,
            None => value,
        };

        Self {
            font_size: fix(self.font_size, bounds.font_size, defaults.font_size),
            line_spacing: fix(self.line_spacing, bounds.line_spacing, defaults.line_spacing),
            letter_spacing: fix(
                self.letter_spacing,
                bounds.letter_spacing,
                defaults.letter_spacing,
            ),
            word_spacing: fix(self.word_spacing, bounds.word_spacing, defaults.word_spacing),
            ..self.clone()
        }
    }
}
