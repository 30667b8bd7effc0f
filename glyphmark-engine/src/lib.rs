//! Rendering back ends for Glyphmark annotations
//!
//! This crate turns the annotated units produced by `glyphmark-core`
//! into output: an isolated preview, in-place wrappers inside a document
//! tree, and the stylesheet both rely on.

#![warn(missing_docs)]

pub mod document;
pub mod error;
pub mod in_place;
pub mod preview;
pub mod renderer;
pub mod sink;
pub mod stylesheet;

// Re-export key types
pub use document::{Document, DocumentBuilder, NodeId, NodeKind, TextTree};
pub use error::{DocumentError, EngineError, Result};
pub use in_place::{apply_to_document, revert_document, ApplyReport, NodeFailure, RevertReport};
pub use preview::{PreviewNode, PreviewStyle, PreviewTree};
pub use renderer::{RenderMetadata, RenderOutput, Renderer, RendererBuilder};
pub use sink::{emit, RunSink};
pub use stylesheet::{group_stylesheet, typography_stylesheet};

// Re-export from core for convenience
pub use glyphmark_core::{
    AnnotatedRun, Classification, ModeFlag, Preferences, RuleConfig, Word, WordUnit,
};
