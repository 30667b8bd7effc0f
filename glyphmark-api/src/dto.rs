//! Data Transfer Objects for API

use crate::error::{ApiError, Result};
use glyphmark_core::{concat_text, WordUnit};
use glyphmark_engine::RenderOutput;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::PathBuf;

/// Input source for annotation
#[derive(Serialize, Deserialize)]
pub enum Input {
    /// Raw text string
    Text(String),
    /// File path
    File(PathBuf),
    /// Raw bytes (UTF-8)
    Bytes(Vec<u8>),
    /// Reader (not serializable)
    #[serde(skip)]
    Reader(Box<dyn Read>),
}

impl std::fmt::Debug for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Input::File(path) => f.debug_tuple("File").field(path).finish(),
            Input::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Input::Reader(_) => f.debug_tuple("Reader").field(&"<dyn Read>").finish(),
        }
    }
}

impl Input {
    /// Create input from text
    pub fn from_text(text: impl Into<String>) -> Self {
        Input::Text(text.into())
    }

    /// Create input from file path
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Input::File(path.into())
    }

    /// Create input from bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }

    /// Create input from a reader
    pub fn from_reader<R: Read + 'static>(reader: R) -> Self {
        Input::Reader(Box::new(reader))
    }

    /// Read the text content from the input
    pub fn read_text(self) -> Result<String> {
        match self {
            Input::Text(text) => Ok(text),
            Input::File(path) => fs::read_to_string(&path).map_err(ApiError::Io),
            Input::Bytes(bytes) => String::from_utf8(bytes).map_err(ApiError::Utf8),
            Input::Reader(mut reader) => {
                let mut buffer = String::new();
                reader.read_to_string(&mut buffer).map_err(ApiError::Io)?;
                Ok(buffer)
            }
        }
    }
}

/// Annotation statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Total bytes processed
    pub total_bytes: usize,
    /// Total characters processed
    pub total_chars: usize,
    /// Number of words
    pub words: usize,
    /// Number of runs carrying color or bold
    pub styled_runs: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: f64,
}

/// Annotated text with statistics
#[derive(Debug, Clone, Serialize)]
pub struct Output {
    /// Annotated units in source order
    pub units: Vec<WordUnit>,
    /// Statistics
    pub metadata: Metadata,
}

impl Output {
    pub(crate) fn from_render(output: RenderOutput, total_chars: usize) -> Self {
        Self {
            metadata: Metadata {
                total_bytes: output.metadata.bytes_processed,
                total_chars,
                words: output.metadata.words,
                styled_runs: output.metadata.styled_runs,
                processing_time_ms: output.metadata.processing_time_ms,
            },
            units: output.units,
        }
    }

    /// The source text, reassembled from the units
    pub fn text(&self) -> String {
        concat_text(&self.units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_text_variants() {
        assert_eq!(Input::from_text("hi").read_text().unwrap(), "hi");
        assert_eq!(
            Input::from_bytes(b"bytes".to_vec()).read_text().unwrap(),
            "bytes"
        );
        assert_eq!(
            Input::from_reader(std::io::Cursor::new("reader"))
                .read_text()
                .unwrap(),
            "reader"
        );
    }

    #[test]
    fn test_invalid_utf8_bytes() {
        let err = Input::from_bytes(vec![0xff, 0xfe]).read_text().unwrap_err();
        assert!(matches!(err, ApiError::Utf8(_)));
    }

    #[test]
    fn test_input_debug_hides_bytes() {
        let debug = format!("{:?}", Input::from_bytes(vec![1, 2, 3]));
        assert_eq!(debug, "Bytes(3)");
    }
}
