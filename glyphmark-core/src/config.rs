//! Rule configuration model
//!
//! [`RawRuleConfig`] is the serde shape of a rule file (JSON or TOML).
//! [`RuleConfig`] is the validated value the engine trusts: it is built
//! once from the raw shape, never fails, and records anything it had to
//! discard as [`ConfigIssue`]s.

use crate::color::{ColorContext, ColorResolver};
use crate::error::ConfigIssue;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::sync::Arc;

// ========= Raw (file) shape =========

/// Rule file contents as written by a configuration author
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRuleConfig {
    /// Group key to member characters; `null` marks a missing list
    #[serde(default, alias = "letterGroups")]
    pub letter_groups: BTreeMap<String, Option<Vec<String>>>,
    /// Group key to palette color key
    #[serde(default, alias = "highlightColors")]
    pub highlight_colors: BTreeMap<String, String>,
    /// Palette color key used for vowel coloring
    #[serde(default, alias = "vowelColor")]
    pub vowel_color: Option<String>,
    /// Color key to display value
    #[serde(default, alias = "colors")]
    pub palette: BTreeMap<String, String>,
    /// Numeric preference bounds
    #[serde(default)]
    pub bounds: RawBounds,
    /// Font names offered to the preference editor
    #[serde(default)]
    pub fonts: Vec<String>,
}

/// Raw numeric bounds, every end optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBounds {
    /// Font size in pixels
    #[serde(default, alias = "fontSize")]
    pub font_size: Option<RawRange>,
    /// Line height multiplier
    #[serde(default, alias = "lineSpacing")]
    pub line_spacing: Option<RawRange>,
    /// Letter spacing in pixels
    #[serde(default, alias = "letterSpacing")]
    pub letter_spacing: Option<RawRange>,
    /// Word spacing in pixels
    #[serde(default, alias = "wordSpacing")]
    pub word_spacing: Option<RawRange>,
}

/// A `{min, max}` pair as written in the rule file
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRange {
    /// Lower bound
    #[serde(default)]
    pub min: Option<f64>,
    /// Upper bound
    #[serde(default)]
    pub max: Option<f64>,
}

// ========= Validated model =========

/// Inclusive numeric range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Lower bound
    pub min: f64,
    /// Upper bound
    pub max: f64,
}

impl Range {
    /// Create a range; callers guarantee `min <= max`
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp a value into the range. NaN clamps to `min`.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.min
        } else {
            value.max(self.min).min(self.max)
        }
    }

    /// Whether the value lies inside the range
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Validated bounds; `None` leaves that quantity unclamped
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FontBounds {
    /// Font size in pixels
    pub font_size: Option<Range>,
    /// Line height multiplier
    pub line_spacing: Option<Range>,
    /// Letter spacing in pixels
    pub letter_spacing: Option<Range>,
    /// Word spacing in pixels
    pub word_spacing: Option<Range>,
}

impl FontBounds {
    fn from_raw(raw: &RawBounds, issues: &mut Vec<ConfigIssue>) -> Self {
        Self {
            font_size: validate_range("font_size", raw.font_size, issues),
            line_spacing: validate_range("line_spacing", raw.line_spacing, issues),
            letter_spacing: validate_range("letter_spacing", raw.letter_spacing, issues),
            word_spacing: validate_range("word_spacing", raw.word_spacing, issues),
        }
    }
}

fn validate_range(
    name: &'static str,
    raw: Option<RawRange>,
    issues: &mut Vec<ConfigIssue>,
) -> Option<Range> {
    let raw = raw?;
    match (raw.min, raw.max) {
        (Some(min), Some(max)) if min <= max => Some(Range::new(min, max)),
        (Some(min), Some(max)) => {
            issues.push(ConfigIssue::InvertedBound {
                name,
                min: min.to_string(),
                max: max.to_string(),
            });
            None
        }
        (None, _) => {
            issues.push(ConfigIssue::MissingBound { name, end: "min" });
            None
        }
        (_, None) => {
            issues.push(ConfigIssue::MissingBound { name, end: "max" });
            None
        }
    }
}

/// A named set of visually confusable characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterGroup {
    key: Arc<str>,
    members: SmallVec<[char; 4]>,
    color_key: Option<String>,
}

impl LetterGroup {
    /// Create a group. Members are ASCII-lower-cased and deduplicated,
    /// keeping first-seen order.
    pub fn new(
        key: impl Into<Arc<str>>,
        members: impl IntoIterator<Item = char>,
        color_key: Option<String>,
    ) -> Self {
        let mut set: SmallVec<[char; 4]> = SmallVec::new();
        for ch in members {
            let ch = ch.to_ascii_lowercase();
            if !set.contains(&ch) {
                set.push(ch);
            }
        }
        Self {
            key: key.into(),
            members: set,
            color_key,
        }
    }

    /// Group identifier
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Shared handle to the identifier
    pub fn key_arc(&self) -> &Arc<str> {
        &self.key
    }

    /// Member characters, lower-cased, in configuration order
    pub fn members(&self) -> &[char] {
        &self.members
    }

    /// Palette key of the highlight color, if one was assigned
    pub fn color_key(&self) -> Option<&str> {
        self.color_key.as_deref()
    }

    /// Case-insensitive membership test
    pub fn contains(&self, ch: char) -> bool {
        self.members.contains(&ch.to_ascii_lowercase())
    }
}

/// Symbolic color key to display value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorPalette(BTreeMap<String, String>);

impl ColorPalette {
    /// Empty palette
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a color
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a display value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterate colors in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of colors
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the palette is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ColorPalette {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Validated, immutable rule configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleConfig {
    groups: BTreeMap<String, LetterGroup>,
    vowel_color: Option<String>,
    palette: ColorPalette,
    bounds: FontBounds,
    fonts: Vec<String>,
    issues: Vec<ConfigIssue>,
}

impl RuleConfig {
    /// Start building a configuration in code
    pub fn builder() -> RuleConfigBuilder {
        RuleConfigBuilder::default()
    }

    /// Validate a raw rule file. Never fails; malformed pieces are dropped
    /// and reported through [`RuleConfig::issues`].
    pub fn from_raw(raw: RawRuleConfig) -> Self {
        let mut issues = Vec::new();
        let mut groups = BTreeMap::new();

        for key in raw.highlight_colors.keys() {
            if !raw.letter_groups.contains_key(key) {
                issues.push(ConfigIssue::UnknownHighlightGroup { group: key.clone() });
            }
        }

        for (key, members) in raw.letter_groups {
            let Some(members) = members else {
                issues.push(ConfigIssue::MissingMembers { group: key });
                continue;
            };

            let mut chars = Vec::with_capacity(members.len());
            for member in members {
                let mut it = member.chars();
                match (it.next(), it.next()) {
                    (Some(ch), None) => chars.push(ch),
                    _ => issues.push(ConfigIssue::InvalidMember {
                        group: key.clone(),
                        member,
                    }),
                }
            }

            if chars.is_empty() {
                issues.push(ConfigIssue::EmptyGroup { group: key });
                continue;
            }

            let color_key = raw.highlight_colors.get(&key).cloned();
            let group = LetterGroup::new(key.as_str(), chars, color_key);
            groups.insert(key, group);
        }

        let bounds = FontBounds::from_raw(&raw.bounds, &mut issues);

        for issue in &issues {
            tracing::warn!(%issue, "rule configuration issue");
        }

        Self {
            groups,
            vowel_color: raw.vowel_color,
            palette: raw.palette.into_iter().collect(),
            bounds,
            fonts: raw.fonts,
            issues,
        }
    }

    /// Convert back to the file shape
    pub fn to_raw(&self) -> RawRuleConfig {
        let to_raw_range = |r: Option<Range>| {
            r.map(|r| RawRange {
                min: Some(r.min),
                max: Some(r.max),
            })
        };
        RawRuleConfig {
            letter_groups: self
                .groups
                .iter()
                .map(|(k, g)| {
                    let members = g.members().iter().map(|c| c.to_string()).collect();
                    (k.clone(), Some(members))
                })
                .collect(),
            highlight_colors: self
                .groups
                .iter()
                .filter_map(|(k, g)| g.color_key().map(|c| (k.clone(), c.to_string())))
                .collect(),
            vowel_color: self.vowel_color.clone(),
            palette: self
                .palette
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            bounds: RawBounds {
                font_size: to_raw_range(self.bounds.font_size),
                line_spacing: to_raw_range(self.bounds.line_spacing),
                letter_spacing: to_raw_range(self.bounds.letter_spacing),
                word_spacing: to_raw_range(self.bounds.word_spacing),
            },
            fonts: self.fonts.clone(),
        }
    }

    /// Look up a usable group
    pub fn group(&self, key: &str) -> Option<&LetterGroup> {
        self.groups.get(key)
    }

    /// Usable groups in key order
    pub fn groups(&self) -> impl Iterator<Item = &LetterGroup> {
        self.groups.values()
    }

    /// Number of usable groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Palette key for vowel coloring
    pub fn vowel_color(&self) -> Option<&str> {
        self.vowel_color.as_deref()
    }

    /// Color palette
    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    /// Numeric preference bounds
    pub fn bounds(&self) -> &FontBounds {
        &self.bounds
    }

    /// Offered font names
    pub fn fonts(&self) -> &[String] {
        &self.fonts
    }

    /// Diagnostics recorded during validation
    pub fn issues(&self) -> &[ConfigIssue] {
        &self.issues
    }

    /// Color resolver over this configuration's palette
    pub fn resolver(&self) -> ColorResolver<'_> {
        ColorResolver::new(&self.palette)
    }

    /// Display color of a group's highlight, or the highlight fallback
    pub fn group_display_color(&self, key: &str) -> &str {
        let color_key = self.group(key).and_then(LetterGroup::color_key);
        self.resolver().resolve_opt(color_key, ColorContext::Highlight)
    }

    /// Display color for vowels, or the vowel fallback
    pub fn vowel_display_color(&self) -> &str {
        self.resolver()
            .resolve_opt(self.vowel_color(), ColorContext::Vowel)
    }
}

/// Programmatic construction of a [`RuleConfig`]
#[derive(Debug, Default)]
pub struct RuleConfigBuilder {
    raw: RawRuleConfig,
}

impl RuleConfigBuilder {
    /// Add a letter group with an optional highlight color key
    pub fn group<I>(mut self, key: &str, members: I, color_key: Option<&str>) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        let members = members.into_iter().map(String::from).collect();
        self.raw.letter_groups.insert(key.to_string(), Some(members));
        if let Some(color) = color_key {
            self.raw
                .highlight_colors
                .insert(key.to_string(), color.to_string());
        }
        self
    }

    /// Add a palette color
    pub fn color(mut self, key: &str, value: &str) -> Self {
        self.raw.palette.insert(key.to_string(), value.to_string());
        self
    }

    /// Set the vowel color key
    pub fn vowel_color(mut self, key: &str) -> Self {
        self.raw.vowel_color = Some(key.to_string());
        self
    }

    /// Set the font size bounds
    pub fn font_size(mut self, min: f64, max: f64) -> Self {
        self.raw.bounds.font_size = Some(RawRange {
            min: Some(min),
            max: Some(max),
        });
        self
    }

    /// Set the line spacing bounds
    pub fn line_spacing(mut self, min: f64, max: f64) -> Self {
        self.raw.bounds.line_spacing = Some(RawRange {
            min: Some(min),
            max: Some(max),
        });
        self
    }

    /// Set the letter spacing bounds
    pub fn letter_spacing(mut self, min: f64, max: f64) -> Self {
        self.raw.bounds.letter_spacing = Some(RawRange {
            min: Some(min),
            max: Some(max),
        });
        self
    }

    /// Set the word spacing bounds
    pub fn word_spacing(mut self, min: f64, max: f64) -> Self {
        self.raw.bounds.word_spacing = Some(RawRange {
            min: Some(min),
            max: Some(max),
        });
        self
    }

    /// Add an offered font
    pub fn font(mut self, name: &str) -> Self {
        self.raw.fonts.push(name.to_string());
        self
    }

    /// Validate and build
    pub fn build(self) -> RuleConfig {
        RuleConfig::from_raw(self.raw)
    }
}
