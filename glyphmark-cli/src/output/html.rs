//! HTML output formatter

use super::OutputFormatter;
use crate::input::SourceFile;
use anyhow::Result;
use glyphmark_api::{Annotator, Output};
use glyphmark_engine::PreviewTree;
use std::io::Write;

/// HTML formatter - one page, one `<article>` per document
pub struct HtmlFormatter<'a, W: Write> {
    writer: W,
    annotator: &'a Annotator,
    started: bool,
}

impl<'a, W: Write> HtmlFormatter<'a, W> {
    /// Create a new HTML formatter
    pub fn new(writer: W, annotator: &'a Annotator) -> Self {
        Self {
            writer,
            annotator,
            started: false,
        }
    }

    fn write_head(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }
        self.started = true;
        writeln!(self.writer, "<!DOCTYPE html>")?;
        writeln!(self.writer, "<html>")?;
        writeln!(self.writer, "<head>")?;
        writeln!(self.writer, "<meta charset=\"utf-8\">")?;
        writeln!(self.writer, "<title>Glyphmark</title>")?;
        write!(self.writer, "<style>\n{}</style>\n", self.annotator.stylesheet())?;
        writeln!(self.writer, "</head>")?;
        writeln!(self.writer, "<body>")?;
        Ok(())
    }
}

impl<W: Write + Send + Sync> OutputFormatter for HtmlFormatter<'_, W> {
    fn format_document(&mut self, source: &SourceFile, output: &Output) -> Result<()> {
        self.write_head()?;
        let preview = PreviewTree::build(
            &output.units,
            self.annotator.rules(),
            self.annotator.preferences(),
        );
        writeln!(
            self.writer,
            "<article data-source=\"{}\">\n{}\n</article>",
            html_escape::encode_double_quoted_attribute(&source.display_name()),
            preview.to_html()
        )?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.write_head()?;
        writeln!(self.writer, "</body>")?;
        writeln!(self.writer, "</html>")?;
        self.writer.flush()?;
        Ok(())
    }
}
