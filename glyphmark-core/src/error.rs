//! Configuration diagnostics (never fatal)

use thiserror::Error;

/// A problem found while validating a rule configuration.
///
/// Issues are collected, not thrown: the offending group or bound is
/// disabled and the rest of the configuration stays usable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    /// A letter group has no member list at all
    #[error("letter group '{group}' has no member list; group disabled")]
    MissingMembers {
        /// Group identifier
        group: String,
    },

    /// A letter group member list contained no usable characters
    #[error("letter group '{group}' has no single-character members; group disabled")]
    EmptyGroup {
        /// Group identifier
        group: String,
    },

    /// A member entry was not exactly one code point
    #[error("letter group '{group}' member {member:?} is not a single character; ignored")]
    InvalidMember {
        /// Group identifier
        group: String,
        /// The rejected entry
        member: String,
    },

    /// A highlight color was assigned to a group that does not exist
    #[error("highlight color assigned to unknown letter group '{group}'")]
    UnknownHighlightGroup {
        /// Group identifier
        group: String,
    },

    /// A numeric bound is missing one of its ends
    #[error("bound '{name}' is missing its {end} value; '{name}' left unclamped")]
    MissingBound {
        /// Bound name (e.g. `font_size`)
        name: &'static str,
        /// `min` or `max`
        end: &'static str,
    },

    /// A numeric bound has min greater than max
    #[error("bound '{name}' has min {min} greater than max {max}; '{name}' left unclamped")]
    InvertedBound {
        /// Bound name
        name: &'static str,
        /// Configured minimum
        min: String,
        /// Configured maximum
        max: String,
    },
}
