//! ANSI terminal output formatter

use super::OutputFormatter;
use crate::input::SourceFile;
use anyhow::Result;
use crossterm::style::{Attribute, Color, SetAttribute, SetForegroundColor};
use glyphmark_api::{AnnotatedRun, Annotator, Output};
use glyphmark_engine::{emit, RunSink};
use std::fmt::Write as _;
use std::io::Write;

const RESET: SetAttribute = SetAttribute(Attribute::Reset);
const BOLD: SetAttribute = SetAttribute(Attribute::Bold);

/// ANSI formatter - colored, bolded text for terminals
pub struct AnsiFormatter<'a, W: Write> {
    writer: W,
    annotator: &'a Annotator,
    show_headers: bool,
}

impl<'a, W: Write> AnsiFormatter<'a, W> {
    /// Create a new ANSI formatter
    pub fn new(writer: W, annotator: &'a Annotator, show_headers: bool) -> Self {
        Self {
            writer,
            annotator,
            show_headers,
        }
    }
}

/// Terminal color for `#rrggbb` or `#rgb`; `None` otherwise
pub fn parse_hex_color(color: &str) -> Option<Color> {
    let hex = color.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    let (r, g, b) = match hex.len() {
        6 => (channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?),
        3 => {
            let expand = |i: usize| channel(&hex[i..=i].repeat(2));
            (expand(0)?, expand(1)?, expand(2)?)
        }
        _ => return None,
    };
    Some(Color::Rgb { r, g, b })
}

#[derive(Default)]
struct AnsiSink(String);

impl RunSink for AnsiSink {
    fn push_text(&mut self, text: &str) {
        self.0.push_str(text);
    }

    fn push_run(&mut self, run: &AnnotatedRun, color: Option<&str>) {
        if run.bold {
            let _ = write!(self.0, "{BOLD}");
        }
        if let Some(color) = color.and_then(parse_hex_color) {
            let _ = write!(self.0, "{}", SetForegroundColor(color));
        }
        let _ = write!(self.0, "{}{RESET}", run.text);
    }
}

impl<W: Write + Send + Sync> OutputFormatter for AnsiFormatter<'_, W> {
    fn format_document(&mut self, source: &SourceFile, output: &Output) -> Result<()> {
        if self.show_headers {
            writeln!(self.writer, "{BOLD}==> {} <=={RESET}", source.path.display())?;
        }
        let mut sink = AnsiSink::default();
        emit(&output.units, self.annotator.rules(), &mut sink);
        self.writer.write_all(sink.0.as_bytes())?;
        if !sink.0.ends_with('\n') {
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
