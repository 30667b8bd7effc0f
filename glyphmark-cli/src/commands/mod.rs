//! CLI command implementations

use anyhow::Result;
use clap::Subcommand;
use glyphmark_api::{default_rules, load_rules, RuleConfig};
use std::path::PathBuf;

pub mod generate_config;
pub mod render;
pub mod stylesheet;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Annotate text files
    Render(render::RenderArgs),

    /// Print the CSS stylesheet for a rule set
    Stylesheet(stylesheet::StylesheetArgs),

    /// Check a rule file and report its issues
    Validate(validate::ValidateArgs),

    /// Write the default rule set to a file for editing
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List letter groups of a rule set
    Groups {
        /// Rule file (default: embedded rules)
        #[arg(short, long, value_name = "FILE")]
        rules: Option<PathBuf>,
    },

    /// List available output formats
    Formats,
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Render(args) => args.execute(),
            Commands::Stylesheet(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
            Commands::List { subcommand } => subcommand.execute(),
        }
    }
}

impl ListCommands {
    /// Execute the list command
    pub fn execute(&self) -> Result<()> {
        match self {
            ListCommands::Groups { rules } => {
                let rules = rules_or_default(rules.as_deref())?;
                for line in group_lines(&rules) {
                    println!("{line}");
                }
            }
            ListCommands::Formats => {
                for (name, description) in crate::output::OutputFormat::describe_all() {
                    println!("{name:<10} {description}");
                }
            }
        }
        Ok(())
    }
}

/// One line per group: key, members and resolved color
pub fn group_lines(rules: &RuleConfig) -> Vec<String> {
    rules
        .groups()
        .map(|group| {
            let members: String = group.members().iter().collect();
            format!(
                "{:<18} {:<8} {}",
                group.key(),
                members,
                rules.group_display_color(group.key())
            )
        })
        .collect()
}

/// Load a rule file, or clone the embedded rules
pub(crate) fn rules_or_default(path: Option<&std::path::Path>) -> Result<RuleConfig> {
    Ok(match path {
        Some(path) => load_rules(path)?,
        None => default_rules().clone(),
    })
}

/// Initialize logging based on verbosity level
pub(crate) fn init_logging(verbose: u8, quiet: bool) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    if !quiet {
        // A second initialization (tests) is harmless
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
            .try_init();
    }
}
