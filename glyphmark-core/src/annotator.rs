//! Word annotation: classification plus the bold-start rule
//!
//! Every character of a word is classified; when bold starts are on and
//! the word has more than one character, the first `ceil(n / 2)`
//! characters are marked anchor-bold. Bold and color compose. Adjacent
//! characters with identical annotation are merged into one run.

use crate::classifier::{CharacterClassifier, Classification, RuleClassifier};
use crate::config::RuleConfig;
use crate::preferences::Preferences;
use crate::segmenter::{SegmentKind, Segmenter};
use serde::Serialize;
use smallvec::SmallVec;

/// Contiguous characters sharing one annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedRun {
    /// Literal source characters
    pub text: String,
    /// Classification shared by every character in the run
    pub classification: Classification,
    /// Whether the run is inside the anchor-bold half of its word
    pub bold: bool,
}

impl AnnotatedRun {
    /// Whether the run needs any styling
    pub fn is_styled(&self) -> bool {
        self.bold || self.classification.is_colored()
    }

    /// Display color of the run, or `None` for uncolored runs
    pub fn color<'a>(&self, config: &'a RuleConfig) -> Option<&'a str> {
        match &self.classification {
            Classification::None => None,
            Classification::Vowel => Some(config.vowel_display_color()),
            Classification::Group(key) => Some(config.group_display_color(key)),
        }
    }
}

/// Runs of one word
pub type Runs = SmallVec<[AnnotatedRun; 4]>;

/// An annotated word
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Word {
    /// Runs in source order
    pub runs: Runs,
    /// Number of leading characters marked anchor-bold, if bolding applied
    pub anchor_split: Option<usize>,
}

impl Word {
    /// The word's literal text
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Whether bold starts split this word
    pub fn is_anchored(&self) -> bool {
        self.anchor_split.is_some()
    }
}

/// One unit of segmented, annotated text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WordUnit {
    /// Whitespace passed through unchanged
    Whitespace {
        /// The exact whitespace
        text: String,
    },
    /// An annotated word
    Word(Word),
}

impl WordUnit {
    /// Literal text of the unit
    pub fn text(&self) -> String {
        match self {
            WordUnit::Whitespace { text } => text.clone(),
            WordUnit::Word(word) => word.text(),
        }
    }

    /// Whether this unit is whitespace
    pub fn is_whitespace(&self) -> bool {
        matches!(self, WordUnit::Whitespace { .. })
    }

    /// The word, if this unit is one
    pub fn as_word(&self) -> Option<&Word> {
        match self {
            WordUnit::Word(word) => Some(word),
            WordUnit::Whitespace { .. } => None,
        }
    }
}

/// Reassemble the source text from annotated units
pub fn concat_text(units: &[WordUnit]) -> String {
    let mut out = String::new();
    for unit in units {
        match unit {
            WordUnit::Whitespace { text } => out.push_str(text),
            WordUnit::Word(word) => {
                for run in &word.runs {
                    out.push_str(&run.text);
                }
            }
        }
    }
    out
}

/// Length of the anchor-bold prefix for a word of `char_len` characters
pub fn anchor_len(char_len: usize) -> Option<usize> {
    (char_len > 1).then(|| char_len.div_ceil(2))
}

/// Annotates words using a character classifier
#[derive(Debug, Clone)]
pub struct WordAnnotator<C> {
    classifier: C,
    bold_starts: bool,
}

impl WordAnnotator<RuleClassifier> {
    /// Build an annotator for a configuration and preference snapshot
    pub fn from_preferences(config: &RuleConfig, preferences: &Preferences) -> Self {
        Self::new(
            RuleClassifier::from_preferences(config, preferences),
            preferences.bold_starts(),
        )
    }
}

impl<C: CharacterClassifier> WordAnnotator<C> {
    /// Create an annotator
    pub fn new(classifier: C, bold_starts: bool) -> Self {
        Self {
            classifier,
            bold_starts,
        }
    }

    /// The underlying classifier
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Annotate one word (a non-whitespace segment)
    pub fn annotate_word(&self, word: &str) -> Word {
        let anchor_split = if self.bold_starts {
            anchor_len(word.chars().count())
        } else {
            None
        };
        let anchor = anchor_split.unwrap_or(0);

        let mut runs = Runs::new();
        for (index, ch) in word.chars().enumerate() {
            let classification = self.classifier.classify(ch);
            let bold = index < anchor;

            match runs.last_mut() {
                Some(last) if last.bold == bold && last.classification == classification => {
                    last.text.push(ch);
                }
                _ => runs.push(AnnotatedRun {
                    text: ch.to_string(),
                    classification,
                    bold,
                }),
            }
        }

        Word { runs, anchor_split }
    }

    /// Segment and annotate a whole text
    pub fn annotate(&self, text: &str) -> Vec<WordUnit> {
        Segmenter::new(text)
            .map(|segment| match segment.kind {
                SegmentKind::Whitespace => WordUnit::Whitespace {
                    text: segment.text.to_string(),
                },
                SegmentKind::Word => WordUnit::Word(self.annotate_word(segment.text)),
            })
            .collect()
    }
}

/// Annotate `text` under a configuration and preference snapshot
pub fn annotate(text: &str, config: &RuleConfig, preferences: &Preferences) -> Vec<WordUnit> {
    WordAnnotator::from_preferences(config, preferences).annotate(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::ModeFlag;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn config() -> RuleConfig {
        RuleConfig::builder()
            .group("mirror_letters1", ['b', 'd'], Some("soft-blue"))
            .group("round", ['o', 'e'], Some("nowhere"))
            .color("soft-blue", "#4a90e2")
            .color("soft-red", "#e57373")
            .vowel_color("soft-red")
            .build()
    }

    fn mirror() -> Classification {
        Classification::Group(Arc::from("mirror_letters1"))
    }

    /// Flatten runs to per-character (char, classification, bold)
    fn per_char(word: &Word) -> Vec<(char, Classification, bool)> {
        word.runs
            .iter()
            .flat_map(|run| {
                run.text
                    .chars()
                    .map(move |ch| (ch, run.classification.clone(), run.bold))
            })
            .collect()
    }

    #[test]
    fn test_bed_with_mirror_group() {
        let prefs = Preferences::default().with_group("mirror_letters1");
        let annotator = WordAnnotator::from_preferences(&config(), &prefs);
        let word = annotator.annotate_word("bed");

        assert_eq!(
            per_char(&word),
            vec![
                ('b', mirror(), false),
                ('e', Classification::None, false),
                ('d', mirror(), false),
            ]
        );
        assert_eq!(word.anchor_split, None);
    }

    #[test]
    fn test_bed_with_vowels_only() {
        let prefs = Preferences::default().with_mode(ModeFlag::VowelColoring);
        let annotator = WordAnnotator::from_preferences(&config(), &prefs);
        let word = annotator.annotate_word("bed");

        assert_eq!(
            per_char(&word),
            vec![
                ('b', Classification::None, false),
                ('e', Classification::Vowel, false),
                ('d', Classification::None, false),
            ]
        );
    }

    #[test]
    fn test_reading_bold_starts() {
        let prefs = Preferences::default().with_mode(ModeFlag::BoldStarts);
        let annotator = WordAnnotator::from_preferences(&config(), &prefs);
        let word = annotator.annotate_word("reading");

        assert_eq!(word.anchor_split, Some(4));
        assert_eq!(word.runs.len(), 2);
        assert_eq!(word.runs[0].text, "read");
        assert!(word.runs[0].bold);
        assert_eq!(word.runs[1].text, "ing");
        assert!(!word.runs[1].bold);
    }

    #[test]
    fn test_single_character_word_is_not_split() {
        let prefs = Preferences::default().with_mode(ModeFlag::BoldStarts);
        let annotator = WordAnnotator::from_preferences(&config(), &prefs);
        let word = annotator.annotate_word("a");

        assert_eq!(word.anchor_split, None);
        assert!(!word.runs[0].bold);
    }

    #[test]
    fn test_bold_and_color_compose() {
        let prefs = Preferences::default()
            .with_mode(ModeFlag::BoldStarts)
            .with_mode(ModeFlag::VowelColoring)
            .with_group("mirror_letters1");
        let annotator = WordAnnotator::from_preferences(&config(), &prefs);
        let word = annotator.annotate_word("bead");

        assert_eq!(
            per_char(&word),
            vec![
                ('b', mirror(), true),
                ('e', Classification::Vowel, true),
                ('a', Classification::Vowel, false),
                ('d', mirror(), false),
            ]
        );
        // e and a share a color but differ in bold, so they stay apart
        assert_eq!(word.runs.len(), 4);
    }

    #[test]
    fn test_runs_merge_identical_neighbours() {
        let prefs = Preferences::default().with_group("mirror_letters1");
        let annotator = WordAnnotator::from_preferences(&config(), &prefs);
        let word = annotator.annotate_word("bdbxyz");

        assert_eq!(word.runs.len(), 2);
        assert_eq!(word.runs[0].text, "bdb");
        assert_eq!(word.runs[1].text, "xyz");
    }

    #[test]
    fn test_whitespace_passes_through() {
        let units = annotate("  ", &config(), &Preferences::default());
        assert_eq!(
            units,
            vec![WordUnit::Whitespace {
                text: "  ".to_string()
            }]
        );
    }

    #[test]
    fn test_anchor_counts_characters_not_bytes() {
        let prefs = Preferences::default().with_mode(ModeFlag::BoldStarts);
        let annotator = WordAnnotator::from_preferences(&config(), &prefs);
        let word = annotator.annotate_word("éèà");

        assert_eq!(word.anchor_split, Some(2));
        assert_eq!(word.runs[0].text, "éè");
    }

    #[test]
    fn test_run_colors() {
        let config = config();
        let prefs = Preferences::default()
            .with_mode(ModeFlag::VowelColoring)
            .with_group("round")
            .with_group("mirror_letters1");
        let units = annotate("bead", &config, &prefs);
        let word = units[0].as_word().unwrap();

        let colors: Vec<Option<&str>> = word.runs.iter().map(|r| r.color(&config)).collect();
        // b: mirror, e: round (unknown color key), a: vowel, d: mirror
        assert_eq!(
            colors,
            vec![
                Some("#4a90e2"),
                Some(crate::color::HIGHLIGHT_FALLBACK),
                Some("#e57373"),
                Some("#4a90e2"),
            ]
        );
    }

    #[test]
    fn test_word_unit_serializes_with_kind_tag() {
        let prefs = Preferences::default().with_group("mirror_letters1");
        let units = annotate("b ", &config(), &prefs);
        let json = serde_json::to_value(&units).unwrap();

        assert_eq!(json[0]["kind"], "word");
        assert_eq!(json[0]["runs"][0]["classification"], "group:mirror_letters1");
        assert_eq!(json[1]["kind"], "whitespace");
        assert_eq!(json[1]["text"], " ");
    }

    #[test]
    fn test_anchor_len() {
        assert_eq!(anchor_len(0), None);
        assert_eq!(anchor_len(1), None);
        assert_eq!(anchor_len(2), Some(1));
        assert_eq!(anchor_len(3), Some(2));
        assert_eq!(anchor_len(7), Some(4));
    }

    proptest! {
        #[test]
        fn prop_annotation_is_lossless(text in any::<String>(), bold in any::<bool>(), vowels in any::<bool>()) {
            let mut prefs = Preferences::default().with_group("mirror_letters1").with_group("round");
            if bold {
                prefs = prefs.with_mode(ModeFlag::BoldStarts);
            }
            if vowels {
                prefs = prefs.with_mode(ModeFlag::VowelColoring);
            }
            let units = annotate(&text, &config(), &prefs);
            prop_assert_eq!(concat_text(&units), text);
        }

        #[test]
        fn prop_anchor_split_is_half_rounded_up(word in "[a-zA-Z]{1,40}") {
            let prefs = Preferences::default().with_mode(ModeFlag::BoldStarts);
            let annotator = WordAnnotator::from_preferences(&config(), &prefs);
            let annotated = annotator.annotate_word(&word);
            let n = word.chars().count();
            let bold_chars: usize = annotated
                .runs
                .iter()
                .filter(|r| r.bold)
                .map(|r| r.text.chars().count())
                .sum();

            let expected = if n <= 1 { 0 } else { (n + 1) / 2 };
            prop_assert_eq!(bold_chars, expected);
            // Bold characters are all leading
            let leading_bold = per_char(&annotated).iter().take_while(|c| c.2).count();
            prop_assert_eq!(leading_bold, expected);
        }
    }
}
