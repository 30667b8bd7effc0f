//! Character classification against active letter groups and vowels
//!
//! The caller's activation order is the only tie-breaker: when a
//! character belongs to several active groups, the group listed first
//! wins. Vowel coloring applies only when no active group matched.

use crate::config::{LetterGroup, RuleConfig};
use crate::preferences::Preferences;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Lower-case ASCII vowels
pub const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

/// Result of classifying one character
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Classification {
    /// No rule applies
    #[default]
    None,
    /// Vowel coloring applies
    Vowel,
    /// Member of the named letter group
    Group(Arc<str>),
}

impl Classification {
    /// Whether any coloring applies
    pub fn is_colored(&self) -> bool {
        !matches!(self, Classification::None)
    }

    /// Group key, if this is a group match
    pub fn group_key(&self) -> Option<&str> {
        match self {
            Classification::Group(key) => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::None => f.write_str("none"),
            Classification::Vowel => f.write_str("vowel"),
            Classification::Group(key) => write!(f, "group:{key}"),
        }
    }
}

impl Serialize for Classification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Pure character classification logic
pub trait CharacterClassifier: Send + Sync {
    /// Classify a character
    fn classify(&self, ch: char) -> Classification;

    /// Check if the character receives any coloring
    fn is_colored(&self, ch: char) -> bool {
        self.classify(ch).is_colored()
    }
}

/// Sentinel for "no group" in the ASCII table
const NO_GROUP: u16 = u16::MAX;

/// Classifier built from a configuration and an activation order
///
/// Group priority is resolved once at construction into a lookup table,
/// so `classify` is a table read for ASCII and a hash lookup otherwise.
#[derive(Debug, Clone)]
pub struct RuleClassifier {
    /// Active group keys in priority order
    active: Vec<Arc<str>>,
    /// Index into `active` for ASCII chars 0-127
    ascii_table: [u16; 128],
    /// Index into `active` for non-ASCII members
    non_ascii: HashMap<char, u16>,
    vowel_coloring: bool,
}

impl RuleClassifier {
    /// Build a classifier. Keys naming unknown or disabled groups are
    /// skipped; repeated keys keep their first position.
    pub fn new<S: AsRef<str>>(
        config: &RuleConfig,
        activation_order: &[S],
        vowel_coloring: bool,
    ) -> Self {
        let mut active: Vec<Arc<str>> = Vec::with_capacity(activation_order.len());
        let mut ascii_table = [NO_GROUP; 128];
        let mut non_ascii = HashMap::new();

        for key in activation_order {
            let key = key.as_ref();
            let Some(group) = config.group(key) else {
                tracing::debug!(group = key, "activation key names no usable group, skipped");
                continue;
            };
            if active.iter().any(|k| k.as_ref() == key) {
                continue;
            }
            // u16 index; NO_GROUP is reserved
            if active.len() >= usize::from(NO_GROUP) {
                tracing::warn!(group = key, "too many active groups, remainder ignored");
                break;
            }

            let index = active.len() as u16;
            Self::register(group, index, &mut ascii_table, &mut non_ascii);
            active.push(group.key_arc().clone());
        }

        Self {
            active,
            ascii_table,
            non_ascii,
            vowel_coloring,
        }
    }

    /// Build from the activation order and mode flags of a preference value
    pub fn from_preferences(config: &RuleConfig, preferences: &Preferences) -> Self {
        Self::new(
            config,
            preferences.active_letter_groups.as_slice(),
            preferences.vowel_coloring(),
        )
    }

    fn register(
        group: &LetterGroup,
        index: u16,
        ascii_table: &mut [u16; 128],
        non_ascii: &mut HashMap<char, u16>,
    ) {
        for &ch in group.members() {
            if ch.is_ascii() {
                let slot = &mut ascii_table[ch as usize];
                if *slot == NO_GROUP {
                    *slot = index;
                }
            } else {
                non_ascii.entry(ch).or_insert(index);
            }
        }
    }

    /// Active group keys in effective priority order
    pub fn active_groups(&self) -> &[Arc<str>] {
        &self.active
    }

    /// Whether vowel coloring is enabled
    pub fn vowel_coloring(&self) -> bool {
        self.vowel_coloring
    }

    #[inline]
    fn group_index(&self, ch: char) -> Option<u16> {
        let index = if ch.is_ascii() {
            self.ascii_table[ch as usize]
        } else {
            *self.non_ascii.get(&ch)?
        };
        (index != NO_GROUP).then_some(index)
    }
}

impl CharacterClassifier for RuleClassifier {
    #[inline]
    fn classify(&self, ch: char) -> Classification {
        let lowered = ch.to_ascii_lowercase();

        if let Some(index) = self.group_index(lowered) {
            return Classification::Group(self.active[usize::from(index)].clone());
        }

        if self.vowel_coloring && VOWELS.contains(&lowered) {
            return Classification::Vowel;
        }

        Classification::None
    }
}

/// Classify one character without building a reusable classifier
pub fn classify<S: AsRef<str>>(
    ch: char,
    config: &RuleConfig,
    activation_order: &[S],
    vowel_coloring: bool,
) -> Classification {
    let lowered = ch.to_ascii_lowercase();
    for key in activation_order {
        if let Some(group) = config.group(key.as_ref()) {
            if group.contains(lowered) {
                return Classification::Group(group.key_arc().clone());
            }
        }
    }
    if vowel_coloring && VOWELS.contains(&lowered) {
        Classification::Vowel
    } else {
        Classification::None
    }
}
