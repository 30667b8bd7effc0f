//! Public API for Glyphmark reading-aid annotation
//!
//! This crate bundles rule loading, preference handling and the engine
//! behind one [`Annotator`] type.

#![warn(missing_docs)]

pub mod config;
pub mod dto;
pub mod error;
pub mod loader;

use error::Result;
use glyphmark_engine::{ApplyReport, PreviewTree, Renderer, TextTree};

// Re-export key types
pub use config::{Config, ConfigBuilder};
pub use dto::{Input, Metadata, Output};
pub use error::ApiError;
pub use loader::{
    default_rules, default_rules_source, load_preferences, load_rules, ConfigFormat,
};

// Re-export from lower layers for convenience
pub use glyphmark_core::{
    AnnotatedRun, Classification, ModeFlag, Preferences, RuleConfig, Word, WordUnit,
};
pub use glyphmark_engine::{Document, DocumentBuilder};

/// Main entry point for annotation
#[derive(Debug, Clone)]
pub struct Annotator {
    renderer: Renderer,
    preferences: Preferences,
}

impl Default for Annotator {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl Annotator {
    /// Annotator with the embedded rules and default preferences
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotator with a custom configuration
    pub fn with_config(config: Config) -> Self {
        Self {
            renderer: Renderer::new(config.rules),
            preferences: config.preferences,
        }
    }

    /// The rule configuration
    pub fn rules(&self) -> &RuleConfig {
        self.renderer.config()
    }

    /// The active preferences
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Replace the active preferences
    pub fn set_preferences(&mut self, preferences: Preferences) {
        self.preferences = preferences;
    }

    /// Annotate input
    pub fn process(&self, input: Input) -> Result<Output> {
        let text = input.read_text()?;
        let total_chars = text.chars().count();
        let output = self.renderer.render_with_metadata(&text, &self.preferences);
        Ok(Output::from_render(output, total_chars))
    }

    /// Annotate text directly
    pub fn process_text(&self, text: &str) -> Output {
        let output = self.renderer.render_with_metadata(text, &self.preferences);
        Output::from_render(output, text.chars().count())
    }

    /// Render an isolated preview of input
    pub fn preview(&self, input: Input) -> Result<PreviewTree> {
        let text = input.read_text()?;
        Ok(self.renderer.preview(&text, &self.preferences))
    }

    /// Annotate a document subtree in place
    pub fn apply_to_document<T: TextTree>(&self, tree: &mut T, root: T::Id) -> ApplyReport {
        self.renderer
            .apply_to_document(tree, root, &self.preferences)
    }

    /// Remove annotations from a document subtree
    pub fn revert_document<T: TextTree>(
        &self,
        tree: &mut T,
        root: T::Id,
    ) -> glyphmark_engine::RevertReport {
        self.renderer.revert_document(tree, root)
    }

    /// Group, vowel and anchor stylesheet
    pub fn stylesheet(&self) -> String {
        self.renderer.stylesheet()
    }

    /// Typography stylesheet for `selector`
    pub fn typography_stylesheet(&self, selector: &str) -> String {
        self.renderer
            .typography_stylesheet(&self.preferences, selector)
    }
}

// Convenience functions

/// Annotate text with the embedded rules and given preferences
pub fn annotate_text(text: &str, preferences: Preferences) -> Output {
    let config = Config {
        preferences,
        ..Config::default()
    };
    Annotator::with_config(config).process_text(text)
}

/// Annotate a file with the embedded rules and given preferences
pub fn annotate_file<P: AsRef<std::path::Path>>(path: P, preferences: Preferences) -> Result<Output> {
    let config = Config {
        preferences,
        ..Config::default()
    };
    Annotator::with_config(config).process(Input::from_file(path.as_ref().to_path_buf()))
}
