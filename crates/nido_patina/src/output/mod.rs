//! Output formatters for lint diagnostics.

mod text;

pub use text::*;

use crate::diagnostic::Severity;
use crate::linter::LintResult;
use serde::Serialize;

/// Output format for lint results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Rich terminal output with colors and code snippets
    #[default]
    Text,
    /// JSON output for tooling integration
    Json,
}

/// Format lint results according to the specified format
pub fn format_results(
    results: &[LintResult],
    sources: &[(String, String)],
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => format_text(results, sources),
        OutputFormat::Json => format_json(results, sources),
    }
}

/// Convert a byte offset into a 0-based `(line, column)` pair.
///
/// Columns count UTF-16 code units so they can be handed to editors as is.
/// Offsets past the end clamp to the end of `source`.
pub fn offset_to_line_col(source: &str, offset: u32) -> (u32, u32) {
    let offset = (offset as usize).min(source.len());
    let mut line = 0u32;
    let mut line_start = 0usize;
    for (index, byte) in source.bytes().enumerate().take(offset) {
        if byte == b'\n' {
            line += 1;
            line_start = index + 1;
        }
    }
    let column = source
        .get(line_start..offset)
        .map(|text| text.encode_utf16().count() as u32)
        .unwrap_or((offset - line_start) as u32);
    (line, column)
}

/// JSON output structure for a single file
#[derive(Debug, Serialize)]
pub struct JsonFileResult {
    pub file: String,
    pub messages: Vec<JsonMessage>,
    #[serde(rename = "errorCount")]
    pub error_count: usize,
    #[serde(rename = "warningCount")]
    pub warning_count: usize,
}

/// JSON output structure for a single message
#[derive(Debug, Serialize)]
pub struct JsonMessage {
    #[serde(rename = "ruleId")]
    pub rule_id: &'static str,
    pub severity: u8,
    pub message: String,
    pub line: u32,
    pub column: u32,
    #[serde(rename = "endLine")]
    pub end_line: u32,
    #[serde(rename = "endColumn")]
    pub end_column: u32,
}

impl JsonMessage {
    /// Build a message with 1-based positions resolved against `source`
    pub fn new(diagnostic: &crate::diagnostic::LintDiagnostic, source: &str) -> Self {
        let (line, column) = offset_to_line_col(source, diagnostic.start);
        let (end_line, end_column) = offset_to_line_col(source, diagnostic.end);
        Self {
            rule_id: diagnostic.rule_name,
            severity: match diagnostic.severity {
                Severity::Error => 2,
                Severity::Warning => 1,
            },
            message: diagnostic.message.to_string(),
            line: line + 1,
            column: column + 1,
            end_line: end_line + 1,
            end_column: end_column + 1,
        }
    }
}

impl JsonFileResult {
    pub fn new(result: &LintResult, source: &str) -> Self {
        Self {
            file: result.filename.clone(),
            messages: result
                .diagnostics
                .iter()
                .map(|d| JsonMessage::new(d, source))
                .collect(),
            error_count: result.error_count,
            warning_count: result.warning_count,
        }
    }
}

/// Format results as JSON
fn format_json(results: &[LintResult], sources: &[(String, String)]) -> String {
    let json_results: Vec<JsonFileResult> = results
        .iter()
        .map(|r| JsonFileResult::new(r, source_for(sources, &r.filename)))
        .collect();

    serde_json::to_string_pretty(&json_results).unwrap_or_else(|_| "[]".to_string())
}

/// Source registered for `filename`, or an empty string
pub(crate) fn source_for<'s>(sources: &'s [(String, String)], filename: &str) -> &'s str {
    sources
        .iter()
        .find(|(name, _)| name == filename)
        .map(|(_, source)| source.as_str())
        .unwrap_or("")
}
