//! Validate command implementation

use crate::commands::group_lines;
use crate::error::CliError;
use anyhow::Result;
use clap::Args;
use glyphmark_api::{load_rules, RuleConfig};
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Rule file to validate (JSON or TOML)
    #[arg(short, long, value_name = "FILE", required = true)]
    pub rules: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating rule configuration: {}", self.rules.display());

        let rules = match load_rules(&self.rules) {
            Ok(rules) => rules,
            Err(e) => {
                println!("✗ Configuration could not be read!");
                println!("  Error: {e}");
                return Err(e.into());
            }
        };

        report(&rules)
    }
}

/// Print a summary and fail when the configuration carried issues
fn report(rules: &RuleConfig) -> Result<()> {
    if rules.issues().is_empty() {
        println!("✓ Configuration is valid!");
    } else {
        println!("✗ Configuration has issues:");
        for issue in rules.issues() {
            println!("  - {issue}");
        }
    }

    println!("  Letter groups: {}", rules.group_count());
    for line in group_lines(rules) {
        println!("    {line}");
    }
    println!("  Palette colors: {}", rules.palette().len());

    match rules.issues().len() {
        0 => Ok(()),
        count => Err(CliError::ValidationFailed(count).into()),
    }
}
