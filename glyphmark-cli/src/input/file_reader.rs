//! File reading utilities

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A loaded input document
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Where the text came from
    pub path: PathBuf,
    /// Full UTF-8 content
    pub text: String,
}

impl SourceFile {
    /// Short name for progress and headings
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// File reader with UTF-8 validation
pub struct FileReader;

impl FileReader {
    /// Read a file as UTF-8 text
    pub fn read_text(path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
    }

    /// Read a file into a [`SourceFile`]
    pub fn load(path: &Path) -> Result<SourceFile> {
        Ok(SourceFile {
            path: path.to_path_buf(),
            text: Self::read_text(path)?,
        })
    }
}
