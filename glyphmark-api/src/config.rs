//! High-level configuration API

use crate::error::{ApiError, Result};
use crate::loader;
use glyphmark_core::{ModeFlag, Preferences, RuleConfig};
use std::path::PathBuf;
use std::sync::Arc;

/// Rules and preferences for an [`Annotator`](crate::Annotator)
#[derive(Debug, Clone)]
pub struct Config {
    /// Validated rule configuration
    pub rules: Arc<RuleConfig>,
    /// Reader preferences
    pub preferences: Preferences,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules: Arc::new(loader::default_rules().clone()),
            preferences: Preferences::default(),
        }
    }
}

impl Config {
    /// Create a builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Configuration builder
///
/// Files are read at [`build`](ConfigBuilder::build). Groups and modes
/// added here are appended to whatever the preference file activates.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    rules: Option<RuleConfig>,
    rules_file: Option<PathBuf>,
    preferences: Option<Preferences>,
    preferences_file: Option<PathBuf>,
    groups: Vec<String>,
    modes: Vec<ModeFlag>,
}

impl ConfigBuilder {
    /// Use an in-memory rule configuration
    pub fn rules(mut self, rules: RuleConfig) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Load rules from a JSON or TOML file
    pub fn rules_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.rules_file = Some(path.into());
        self
    }

    /// Use an in-memory preference snapshot
    pub fn preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = Some(preferences);
        self
    }

    /// Load preferences from a JSON or TOML file
    pub fn preferences_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.preferences_file = Some(path.into());
        self
    }

    /// Activate a letter group at lowest priority
    pub fn group(mut self, key: impl Into<String>) -> Self {
        self.groups.push(key.into());
        self
    }

    /// Enable a mode flag
    pub fn mode(mut self, mode: ModeFlag) -> Self {
        self.modes.push(mode);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<Config> {
        if self.rules.is_some() && self.rules_file.is_some() {
            return Err(ApiError::Config(
                "rules and rules_file are mutually exclusive".to_string(),
            ));
        }
        if self.preferences.is_some() && self.preferences_file.is_some() {
            return Err(ApiError::Config(
                "preferences and preferences_file are mutually exclusive".to_string(),
            ));
        }

        let rules = match (self.rules, self.rules_file) {
            (Some(rules), _) => rules,
            (None, Some(path)) => loader::load_rules(path)?,
            (None, None) => loader::default_rules().clone(),
        };

        let mut preferences = match (self.preferences, self.preferences_file) {
            (Some(prefs), _) => prefs,
            (None, Some(path)) => loader::load_preferences(path)?,
            (None, None) => Preferences::default(),
        };

        for key in self.groups {
            preferences = preferences.with_group(key);
        }
        for mode in self.modes {
            preferences = preferences.with_mode(mode);
        }

        for key in preferences.activation_order() {
            if rules.group(key).is_none() {
                tracing::warn!(group = %key, "active letter group is not defined; ignoring");
            }
        }

        Ok(Config {
            rules: Arc::new(rules),
            preferences,
        })
    }
}
