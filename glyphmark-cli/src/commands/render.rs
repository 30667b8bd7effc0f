//! Render command implementation

use crate::commands::init_logging;
use crate::config::CliConfig;
use crate::input::{resolve_patterns, FileReader, SourceFile};
use crate::output::{create_formatter, OutputFormat};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use clap::Args;
use glyphmark_api::{Annotator, Config, ModeFlag, Output};
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Arguments for the render command
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Input files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (default: from glyphmark.toml, else html)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Rule file, JSON or TOML (default: embedded rules)
    #[arg(short, long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Preference file, JSON or TOML
    #[arg(short, long, value_name = "FILE")]
    pub preferences: Option<PathBuf>,

    /// Activate a letter group; repeat for more, highest priority first
    #[arg(short, long = "group", value_name = "KEY")]
    pub groups: Vec<String>,

    /// Bold the leading half of each word
    #[arg(long)]
    pub bold_starts: bool,

    /// Color vowels not claimed by a letter group
    #[arg(long)]
    pub vowels: bool,

    /// Worker threads for multi-file rendering
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,

    /// CLI configuration file (default: ./glyphmark.toml if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl RenderArgs {
    /// Execute the render command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, self.quiet);

        log::info!("Starting render");
        log::debug!("Arguments: {:?}", self);

        let cwd = std::env::current_dir().context("Failed to read working directory")?;
        let cli_config = CliConfig::discover(self.config.as_deref(), &cwd)?;
        let annotator = Annotator::with_config(self.build_config(&cli_config)?);

        let files = resolve_patterns(&self.input)?;
        log::info!("Rendering {} file(s)", files.len());

        let results = self.render_files(&annotator, &files, cli_config.render.threads)?;

        let writer: Box<dyn Write + Send + Sync> = match &self.output {
            Some(path) => Box::new(BufWriter::new(
                File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?,
            )),
            None => Box::new(io::stdout()),
        };
        let format = self.format.unwrap_or(cli_config.output.format);
        let mut formatter = create_formatter(
            format,
            writer,
            &annotator,
            &cli_config.output,
            results.len() > 1,
        );

        for (source, output) in &results {
            formatter.format_document(source, output)?;
        }
        formatter.finish()?;

        log::info!("Render complete");
        Ok(())
    }

    /// Merge explicit flags over the CLI config file
    pub fn build_config(&self, cli_config: &CliConfig) -> Result<Config> {
        let mut builder = Config::builder();

        if let Some(rules) = self.rules.as_ref().or(cli_config.render.rules.as_ref()) {
            builder = builder.rules_file(rules);
        }
        if let Some(prefs) = self
            .preferences
            .as_ref()
            .or(cli_config.render.preferences.as_ref())
        {
            builder = builder.preferences_file(prefs);
        }
        for group in cli_config.render.groups.iter().chain(&self.groups) {
            builder = builder.group(group);
        }
        if self.bold_starts || cli_config.render.bold_starts {
            builder = builder.mode(ModeFlag::BoldStarts);
        }
        if self.vowels || cli_config.render.vowels {
            builder = builder.mode(ModeFlag::VowelColoring);
        }

        Ok(builder.build()?)
    }

    /// Render every file on a worker pool; results keep input order
    fn render_files(
        &self,
        annotator: &Annotator,
        files: &[PathBuf],
        config_threads: Option<usize>,
    ) -> Result<Vec<(SourceFile, Output)>> {
        let threads = self
            .threads
            .or(config_threads)
            .unwrap_or_else(num_cpus::get)
            .max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("Failed to create worker pool")?;

        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_files(files.len() as u64);

        let results = pool.install(|| {
            files
                .par_iter()
                .map(|path| -> Result<(SourceFile, Output)> {
                    let source = FileReader::load(path)?;
                    let output = annotator.process_text(&source.text);
                    progress.file_completed(&source.display_name(), output.metadata.words);
                    Ok((source, output))
                })
                .collect::<Result<Vec<_>>>()
        });

        progress.finish();
        results
    }
}
