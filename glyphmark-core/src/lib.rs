//! Rule-driven character annotation for reading aids
//!
//! This crate is the pure core of Glyphmark. It splits text into
//! whitespace and word units without losing a single character,
//! classifies every character against the reader's active letter groups
//! and vowel coloring, and applies the bold-start rule to each word.
//!
//! # Architecture
//!
//! Components, leaves first:
//! - [`config`]: validated rule configuration (letter groups, palette, bounds)
//! - [`color`]: color key resolution with fixed fallbacks
//! - [`segmenter`]: lossless whitespace/word segmentation
//! - [`classifier`]: per-character classification with explicit priority
//! - [`annotator`]: word-level runs and the anchor-bold split
//!
//! Everything here is a pure function of (configuration, preferences,
//! text); rendering lives in `glyphmark-engine`.
//!
//! # Example
//!
//! ```rust
//! use glyphmark_core::{annotate, Classification, ModeFlag, Preferences, RuleConfig};
//!
//! let config = RuleConfig::builder()
//!     .group("mirror_letters1", ['b', 'd'], Some("soft-blue"))
//!     .color("soft-blue", "#4a90e2")
//!     .build();
//!
//! let prefs = Preferences::default()
//!     .with_group("mirror_letters1")
//!     .with_mode(ModeFlag::BoldStarts);
//!
//! let units = annotate("bed", &config, &prefs);
//! let word = units[0].as_word().unwrap();
//!
//! assert_eq!(word.anchor_split, Some(2));
//! assert_eq!(word.runs[0].text, "b");
//! assert!(matches!(word.runs[0].classification, Classification::Group(_)));
//! ```

#![warn(missing_docs)]

pub mod annotator;
pub mod classifier;
pub mod color;
pub mod config;
pub mod error;
pub mod preferences;
pub mod segmenter;

pub use annotator::{annotate, concat_text, AnnotatedRun, Word, WordAnnotator, WordUnit};
pub use classifier::{classify, CharacterClassifier, Classification, RuleClassifier};
pub use color::{ColorContext, ColorResolver};
pub use config::{
    ColorPalette, FontBounds, LetterGroup, Range, RawRuleConfig, RuleConfig, RuleConfigBuilder,
};
pub use error::ConfigIssue;
pub use preferences::{ModeFlag, Preferences};
pub use segmenter::{segment, Segment, SegmentKind, Segmenter};
