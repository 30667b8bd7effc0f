//! Progress reporting for multi-file renders

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const TEMPLATE: &str = "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files {msg}";

/// Tracks rendered files and words; draws a bar for two or more files
#[derive(Default)]
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
    quiet: bool,
    words: AtomicUsize,
}

impl ProgressReporter {
    /// Create a reporter; `quiet` suppresses the bar
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            ..Self::default()
        }
    }

    /// Prepare for `total_files` renders
    pub fn init_files(&mut self, total_files: u64) {
        if self.quiet || total_files < 2 {
            return;
        }

        let bar = ProgressBar::new(total_files);
        if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
            bar.set_style(style.progress_chars("##-"));
        }
        bar.enable_steady_tick(Duration::from_millis(100));
        self.bar = Some(bar);
    }

    /// Whether a bar is displayed
    pub fn is_active(&self) -> bool {
        self.bar.is_some()
    }

    /// Record one rendered file. Safe to call from worker threads.
    pub fn file_completed(&self, filename: &str, words: usize) {
        let total = self.words.fetch_add(words, Ordering::Relaxed) + words;
        if let Some(bar) = &self.bar {
            bar.set_message(format!("{filename} ({total} words)"));
            bar.inc(1);
        }
    }

    /// Words rendered so far
    pub fn words(&self) -> usize {
        self.words.load(Ordering::Relaxed)
    }

    /// Clear the bar and log the totals
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
        log::info!("Rendered {} words", self.words());
    }
}
