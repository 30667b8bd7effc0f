//! Output formatting module

use crate::config::OutputConfig;
use crate::input::SourceFile;
use anyhow::Result;
use glyphmark_api::{Annotator, Output};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format and output one rendered document
    fn format_document(&mut self, source: &SourceFile, output: &Output) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod ansi;
pub mod html;
pub mod json;
pub mod markdown;

pub use ansi::AnsiFormatter;
pub use html::HtmlFormatter;
pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Standalone HTML page with inline-styled previews
    Html,
    /// JSON array of annotated units per document
    Json,
    /// Terminal output with ANSI colors and bold
    Ansi,
    /// Markdown with bold anchors and inline color spans
    Markdown,
}

impl OutputFormat {
    /// Every format with a one-line description
    pub fn describe_all() -> [(&'static str, &'static str); 4] {
        [
            ("html", "Standalone HTML page with inline-styled previews"),
            ("json", "JSON array of annotated units per document"),
            ("ansi", "Terminal output with ANSI colors and bold"),
            ("markdown", "Markdown with bold anchors and inline color spans"),
        ]
    }
}

/// Build the formatter for `format`
pub fn create_formatter<'a, W>(
    format: OutputFormat,
    writer: W,
    annotator: &'a Annotator,
    options: &OutputConfig,
    show_headers: bool,
) -> Box<dyn OutputFormatter + 'a>
where
    W: Write + Send + Sync + 'a,
{
    match format {
        OutputFormat::Html => Box::new(HtmlFormatter::new(writer, annotator)),
        OutputFormat::Json => Box::new(JsonFormatter::new(
            writer,
            options.pretty_json,
            options.include_metadata,
        )),
        OutputFormat::Ansi => Box::new(AnsiFormatter::new(writer, annotator, show_headers)),
        OutputFormat::Markdown => {
            Box::new(MarkdownFormatter::new(writer, annotator, show_headers))
        }
    }
}
