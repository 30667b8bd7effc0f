//! Stylesheet command implementation

use crate::commands::rules_or_default;
use anyhow::{Context, Result};
use clap::Args;
use glyphmark_api::{load_preferences, Preferences};
use glyphmark_engine::{group_stylesheet, typography_stylesheet};
use std::path::PathBuf;

/// Arguments for the stylesheet command
#[derive(Debug, Args)]
pub struct StylesheetArgs {
    /// Rule file, JSON or TOML (default: embedded rules)
    #[arg(short, long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Preference file used for typography rules
    #[arg(short, long, value_name = "FILE")]
    pub preferences: Option<PathBuf>,

    /// Append a typography rule built from the preferences
    #[arg(long)]
    pub typography: bool,

    /// Selector for the typography rule
    #[arg(long, default_value = "body")]
    pub selector: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl StylesheetArgs {
    /// Execute the stylesheet command
    pub fn execute(&self) -> Result<()> {
        let css = self.build()?;
        match &self.output {
            Some(path) => std::fs::write(path, css)
                .with_context(|| format!("Failed to write to {}", path.display()))?,
            None => print!("{css}"),
        }
        Ok(())
    }

    fn build(&self) -> Result<String> {
        let rules = rules_or_default(self.rules.as_deref())?;
        let mut css = group_stylesheet(&rules);

        if self.typography {
            let preferences = match &self.preferences {
                Some(path) => load_preferences(path)?,
                None => Preferences::default(),
            };
            css.push_str(&typography_stylesheet(&rules, &preferences, &self.selector));
        }

        Ok(css)
    }
}
