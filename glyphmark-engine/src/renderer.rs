//! Renderer and builder
//!
//! A [`Renderer`] owns a validated rule configuration and drives every
//! back end from one annotation pass per call.

use crate::{
    document::TextTree,
    error::{EngineError, Result},
    in_place::{self, ApplyReport, RevertReport},
    preview::PreviewTree,
    stylesheet,
};
use glyphmark_core::{annotate, Preferences, RuleConfig, WordUnit};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Annotated units with metadata
#[derive(Debug, Clone, Serialize)]
pub struct RenderOutput {
    /// Annotated units in source order
    pub units: Vec<WordUnit>,
    /// Render statistics
    pub metadata: RenderMetadata,
}

/// Render statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderMetadata {
    /// Processing time in milliseconds
    pub processing_time_ms: f64,
    /// Input size in bytes
    pub bytes_processed: usize,
    /// Number of word units
    pub words: usize,
    /// Number of runs carrying color or bold
    pub styled_runs: usize,
}

impl RenderMetadata {
    fn collect(units: &[WordUnit], bytes: usize, started: Instant) -> Self {
        let words = units.iter().filter_map(WordUnit::as_word);
        let (word_count, styled_runs) = words.fold((0, 0), |(w, s), word| {
            (w + 1, s + word.runs.iter().filter(|r| r.is_styled()).count())
        });

        Self {
            processing_time_ms: started.elapsed().as_secs_f64() * 1000.0,
            bytes_processed: bytes,
            words: word_count,
            styled_runs,
        }
    }
}

/// Annotation renderer bound to one rule configuration
#[derive(Debug, Clone)]
pub struct Renderer {
    config: Arc<RuleConfig>,
}

impl Renderer {
    /// Create a renderer
    pub fn new(config: impl Into<Arc<RuleConfig>>) -> Self {
        Self {
            config: config.into(),
        }
    }

    /// Start a builder
    pub fn builder() -> RendererBuilder {
        RendererBuilder::new()
    }

    /// The rule configuration
    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Annotate text
    pub fn render(&self, text: &str, preferences: &Preferences) -> Vec<WordUnit> {
        annotate(text, &self.config, preferences)
    }

    /// Annotate text and report statistics
    pub fn render_with_metadata(&self, text: &str, preferences: &Preferences) -> RenderOutput {
        let started = Instant::now();
        let units = self.render(text, preferences);
        let metadata = RenderMetadata::collect(&units, text.len(), started);
        tracing::debug!(
            bytes = metadata.bytes_processed,
            words = metadata.words,
            styled_runs = metadata.styled_runs,
            "rendered text"
        );
        RenderOutput { units, metadata }
    }

    /// Render an isolated preview
    pub fn preview(&self, text: &str, preferences: &Preferences) -> PreviewTree {
        PreviewTree::build(&self.render(text, preferences), &self.config, preferences)
    }

    /// Annotate text nodes under `root` in place
    pub fn apply_to_document<T: TextTree>(
        &self,
        tree: &mut T,
        root: T::Id,
        preferences: &Preferences,
    ) -> ApplyReport {
        in_place::apply_to_document(tree, root, &self.config, preferences)
    }

    /// Remove annotations under `root`
    pub fn revert_document<T: TextTree>(&self, tree: &mut T, root: T::Id) -> RevertReport {
        in_place::revert_document(tree, root)
    }

    /// Group, vowel and anchor stylesheet
    pub fn stylesheet(&self) -> String {
        stylesheet::group_stylesheet(&self.config)
    }

    /// Typography stylesheet for `selector`
    pub fn typography_stylesheet(&self, preferences: &Preferences, selector: &str) -> String {
        stylesheet::typography_stylesheet(&self.config, preferences, selector)
    }
}

/// Builder for [`Renderer`]
#[derive(Debug, Default)]
pub struct RendererBuilder {
    config: Option<Arc<RuleConfig>>,
}

impl RendererBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rule configuration
    pub fn config(mut self, config: impl Into<Arc<RuleConfig>>) -> Self {
        self.config = Some(config.into());
        self
    }

    /// Build the renderer
    pub fn build(self) -> Result<Renderer> {
        let config = self.config.ok_or_else(|| {
            EngineError::ConfigError("rule configuration required".to_string())
        })?;
        Ok(Renderer::new(config))
    }
}
