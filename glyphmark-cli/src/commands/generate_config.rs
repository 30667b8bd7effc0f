//! Generate config command implementation

use anyhow::{Context, Result};
use clap::Args;
use glyphmark_api::{default_rules, default_rules_source, ConfigFormat};
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path; `.toml` or `.json`
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        let format = ConfigFormat::from_path(&self.output)?;

        println!("Generating rule configuration...");
        println!("  Output file: {}", self.output.display());

        let content = render_default_rules(format)?;
        std::fs::write(&self.output, content)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Rule configuration generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit letter groups, colors and bounds");
        println!("2. Validate your configuration:");
        println!("   glyphmark validate -r {}", self.output.display());
        println!("3. Use it for rendering:");
        println!(
            "   glyphmark render -i input.txt -r {}",
            self.output.display()
        );

        Ok(())
    }
}

/// The embedded rule set in the requested format
fn render_default_rules(format: ConfigFormat) -> Result<String> {
    Ok(match format {
        ConfigFormat::Toml => default_rules_source().to_string(),
        ConfigFormat::Json => {
            let mut json = serde_json::to_string_pretty(&default_rules().to_raw())?;
            json.push('\n');
            json
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphmark_api::load_rules;
    use tempfile::TempDir;

    #[test]
    fn test_generate_toml_round_trips() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("rules.toml");
        let args = GenerateConfigArgs {
            output: output.clone(),
        };
        args.execute().unwrap();

        let rules = load_rules(&output).unwrap();
        assert!(rules.issues().is_empty());
        assert_eq!(rules.group_count(), default_rules().group_count());
    }

    #[test]
    fn test_generate_json_matches_embedded_rules() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("rules.json");
        let args = GenerateConfigArgs {
            output: output.clone(),
        };
        args.execute().unwrap();

        let rules = load_rules(&output).unwrap();
        assert!(rules.issues().is_empty());
        assert_eq!(rules.to_raw(), default_rules().to_raw());
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let args = GenerateConfigArgs {
            output: dir.path().join("rules.yaml"),
        };
        assert!(args.execute().is_err());
        assert!(!dir.path().join("rules.yaml").exists());
    }
}
