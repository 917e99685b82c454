//! Telegraph - delivery of lint results to one or more outputs.
//!
//! ## Name Origin
//!
//! A **telegraph** carries one message down several lines at once.
//! `Telegraph` hands the same batch of results to every registered
//! [`Emitter`], so a run can print to the terminal and write a JSON report
//! from a single pass.

use crate::diagnostic::LintSummary;
use crate::linter::LintResult;
use crate::output::{format_results, format_summary, OutputFormat};

/// Renders a batch of results for one destination.
pub trait Emitter: Send + Sync {
    /// Render every file result
    fn emit(&self, results: &[LintResult], sources: &[(String, String)]) -> String;

    /// Render the totals, or nothing
    fn emit_summary(&self, summary: &LintSummary) -> String;

    fn name(&self) -> &'static str;
}

/// Text emitter: graphical reports followed by a summary line
pub struct TextEmitter;

impl Emitter for TextEmitter {
    fn emit(&self, results: &[LintResult], sources: &[(String, String)]) -> String {
        format_results(results, sources, OutputFormat::Text)
    }

    fn emit_summary(&self, summary: &LintSummary) -> String {
        format!(
            "{}\n",
            format_summary(summary.error_count, summary.warning_count, summary.file_count)
        )
    }

    fn name(&self) -> &'static str {
        "text"
    }
}

/// JSON emitter: one array holding every file
pub struct JsonEmitter;

impl Emitter for JsonEmitter {
    fn emit(&self, results: &[LintResult], sources: &[(String, String)]) -> String {
        format_results(results, sources, OutputFormat::Json)
    }

    fn emit_summary(&self, _summary: &LintSummary) -> String {
        // counts already live in each file entry
        String::new()
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

/// Dispatches results to every registered emitter
#[derive(Default)]
pub struct Telegraph {
    emitters: Vec<Box<dyn Emitter>>,
}

impl Telegraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Telegraph with the single emitter matching `format`
    pub fn for_format(format: OutputFormat) -> Self {
        let mut telegraph = Self::new();
        match format {
            OutputFormat::Text => telegraph.add_emitter(Box::new(TextEmitter)),
            OutputFormat::Json => telegraph.add_emitter(Box::new(JsonEmitter)),
        }
        telegraph
    }

    pub fn add_emitter(&mut self, emitter: Box<dyn Emitter>) {
        self.emitters.push(emitter);
    }

    pub fn emitter_names(&self) -> Vec<&'static str> {
        self.emitters.iter().map(|e| e.name()).collect()
    }

    /// One rendered document per emitter, in registration order
    pub fn transmit(
        &self,
        results: &[LintResult],
        sources: &[(String, String)],
        summary: &LintSummary,
    ) -> Vec<String> {
        self.emitters
            .iter()
            .map(|emitter| {
                let mut output = emitter.emit(results, sources);
                output.push_str(&emitter.emit_summary(summary));
                output
            })
            .collect()
    }
}
