//! Shared traversal of annotated units
//!
//! Preview and in-place rendering differ only in where output goes.
//! Both walk the same [`WordUnit`] sequence through [`emit`].

use glyphmark_core::{AnnotatedRun, RuleConfig, WordUnit};

/// Receiver of rendered pieces
pub trait RunSink {
    /// Literal text with no styling (whitespace or unstyled runs)
    fn push_text(&mut self, text: &str);

    /// A styled run with its resolved color, if it has one
    fn push_run(&mut self, run: &AnnotatedRun, color: Option<&str>);
}

/// Feed units to a sink in order. Adjacent unstyled pieces are
/// coalesced into one `push_text` call.
pub fn emit<S: RunSink + ?Sized>(units: &[WordUnit], config: &RuleConfig, sink: &mut S) {
    let mut pending = String::new();

    for unit in units {
        match unit {
            WordUnit::Whitespace { text } => pending.push_str(text),
            WordUnit::Word(word) => {
                for run in &word.runs {
                    if run.is_styled() {
                        if !pending.is_empty() {
                            sink.push_text(&pending);
                            pending.clear();
                        }
                        sink.push_run(run, run.color(config));
                    } else {
                        pending.push_str(&run.text);
                    }
                }
            }
        }
    }

    if !pending.is_empty() {
        sink.push_text(&pending);
    }
}

/// Whether any unit carries a styled run
pub fn has_styled_run(units: &[WordUnit]) -> bool {
    units
        .iter()
        .filter_map(WordUnit::as_word)
        .any(|word| word.runs.iter().any(AnnotatedRun::is_styled))
}
