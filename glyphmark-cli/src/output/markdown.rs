//! Markdown output formatter

use super::OutputFormatter;
use crate::input::SourceFile;
use anyhow::Result;
use glyphmark_api::{AnnotatedRun, Annotator, Output};
use glyphmark_engine::{emit, RunSink};
use std::io::Write;

/// Markdown formatter - bold anchors as `**`, colors as inline spans
pub struct MarkdownFormatter<'a, W: Write> {
    writer: W,
    annotator: &'a Annotator,
    show_headers: bool,
    word_count: usize,
}

impl<'a, W: Write> MarkdownFormatter<'a, W> {
    /// Create a new markdown formatter
    pub fn new(writer: W, annotator: &'a Annotator, show_headers: bool) -> Self {
        Self {
            writer,
            annotator,
            show_headers,
            word_count: 0,
        }
    }
}

/// Escape characters with inline meaning in markdown
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '<' | '>' | '#') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Consecutive bold runs share one `**` pair
#[derive(Default)]
struct MarkdownSink {
    out: String,
    bold_open: bool,
}

impl MarkdownSink {
    fn set_bold(&mut self, bold: bool) {
        if bold != self.bold_open {
            self.out.push_str("**");
            self.bold_open = bold;
        }
    }

    fn finish(mut self) -> String {
        self.set_bold(false);
        self.out
    }
}

impl RunSink for MarkdownSink {
    fn push_text(&mut self, text: &str) {
        self.set_bold(false);
        self.out.push_str(&escape_markdown(text));
    }

    fn push_run(&mut self, run: &AnnotatedRun, color: Option<&str>) {
        self.set_bold(run.bold);
        let text = escape_markdown(&run.text);
        match color {
            Some(color) => self.out.push_str(&format!(
                "<span style=\"color: {}\">{text}</span>",
                html_escape::encode_double_quoted_attribute(color)
            )),
            None => self.out.push_str(&text),
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for MarkdownFormatter<'_, W> {
    fn format_document(&mut self, source: &SourceFile, output: &Output) -> Result<()> {
        if self.show_headers {
            writeln!(self.writer, "## {}", escape_markdown(&source.display_name()))?;
            writeln!(self.writer)?;
        }
        let mut sink = MarkdownSink::default();
        emit(&output.units, self.annotator.rules(), &mut sink);
        writeln!(self.writer, "{}", sink.finish().trim_end())?;
        writeln!(self.writer)?;
        self.word_count += output.metadata.words;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total words: {}*", self.word_count)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphmark_api::{Config, ModeFlag, Preferences, RuleConfig};
    use std::path::PathBuf;
    use std::sync::Arc;

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("a*b_c"), "a\\*b\\_c");
        assert_eq!(escape_markdown("plain"), "plain");
    }

    #[test]
    fn test_bold_and_colored_runs() {
        let config = Config::builder()
            .preferences(
                Preferences::default()
                    .with_group("mirror_letters1")
                    .with_mode(ModeFlag::BoldStarts),
            )
            .build()
            .unwrap();
        let annotator = Annotator::with_config(config);
        let source = SourceFile {
            path: PathBuf::from("notes.txt"),
            text: "bed sit".to_string(),
        };
        let output = annotator.process_text(&source.text);

        let mut buffer = Vec::new();
        {
            let mut formatter = MarkdownFormatter::new(&mut buffer, &annotator, true);
            formatter.format_document(&source, &output).unwrap();
            formatter.finish().unwrap();
        }
        let md = String::from_utf8(buffer).unwrap();

        assert!(md.starts_with("## notes.txt\n\n"));
        assert!(md.contains(
            "**<span style=\"color: #4A90E2\">b</span>e**<span style=\"color: #4A90E2\">d</span> **si**t"
        ));
        assert!(md.ends_with("---\n*Total words: 2*\n"));
    }

    #[test]
    fn test_palette_value_cannot_break_out_of_style_attribute() {
        let rules = RuleConfig::builder()
            .group("g", ['b'], Some("odd"))
            .color("odd", "red\" onmouseover=\"x")
            .build();
        let annotator = Annotator::with_config(Config {
            rules: Arc::new(rules),
            preferences: Preferences::default().with_group("g"),
        });
        let output = annotator.process_text("bed");

        let mut sink = MarkdownSink::default();
        emit(&output.units, annotator.rules(), &mut sink);
        assert_eq!(
            sink.finish(),
            "<span style=\"color: red&quot; onmouseover=&quot;x\">b</span>ed"
        );
    }
}
