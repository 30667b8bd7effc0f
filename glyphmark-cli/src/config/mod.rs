//! Configuration module
//!
//! An optional `glyphmark.toml` supplies defaults for `render`. Explicit
//! command-line flags always win.

use crate::error::CliError;
use crate::output::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "glyphmark.toml";

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct CliConfig {
    /// Render defaults
    #[serde(default)]
    pub render: RenderConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Render defaults
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Rule file used when `--rules` is absent
    pub rules: Option<PathBuf>,

    /// Preference file used when `--preferences` is absent
    pub preferences: Option<PathBuf>,

    /// Letter groups activated before any `--group` flags
    pub groups: Vec<String>,

    /// Enable bold starts
    pub bold_starts: bool,

    /// Enable vowel coloring
    pub vowels: bool,

    /// Worker threads (absent = number of CPUs)
    pub threads: Option<usize>,
}

/// Output-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,

    /// Include render statistics in JSON output
    pub include_metadata: bool,

    /// Pretty print JSON output
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Html,
            include_metadata: false,
            pretty_json: true,
        }
    }
}

impl CliConfig {
    /// Parse a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .map_err(|e| {
                CliError::InvalidCliConfig {
                    path: path.to_path_buf(),
                    message: e.message().to_string(),
                }
                .into()
            })
    }

    /// Load an explicit file, or `glyphmark.toml` in `dir` when present
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            log::debug!("Using config file {}", candidate.display());
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}
