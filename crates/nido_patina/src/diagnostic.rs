//! Diagnostic types for nido_patina linter.
//!
//! Uses `CompactString` for efficient small string storage.

use compact_str::CompactString;
use nido_relief::NodeId;
use oxc_diagnostics::OxcDiagnostic;
use oxc_span::Span;
use serde::{Deserialize, Serialize};

/// Lint diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    #[serde(alias = "warn")]
    Warning,
}

/// A lint diagnostic with rich information for display.
///
/// Uses `CompactString` for message storage - strings up to 24 bytes
/// are stored inline without heap allocation.
#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    /// Rule that triggered this diagnostic
    pub rule_name: &'static str,
    /// Severity level
    pub severity: Severity,
    /// Primary message
    pub message: CompactString,
    /// Start byte offset in source
    pub start: u32,
    /// End byte offset in source
    pub end: u32,
    /// Node the diagnostic is attached to, if any
    pub node: Option<NodeId>,
    /// Help message for fixing (optional)
    pub help: Option<CompactString>,
}

impl LintDiagnostic {
    /// Create a diagnostic with an explicit severity
    #[inline]
    pub fn new(
        rule_name: &'static str,
        severity: Severity,
        message: impl Into<CompactString>,
        start: u32,
        end: u32,
    ) -> Self {
        Self {
            rule_name,
            severity,
            message: message.into(),
            start,
            end,
            node: None,
            help: None,
        }
    }

    /// Create a new error diagnostic
    #[inline]
    pub fn error(
        rule_name: &'static str,
        message: impl Into<CompactString>,
        start: u32,
        end: u32,
    ) -> Self {
        Self::new(rule_name, Severity::Error, message, start, end)
    }

    /// Create a new warning diagnostic
    #[inline]
    pub fn warn(
        rule_name: &'static str,
        message: impl Into<CompactString>,
        start: u32,
        end: u32,
    ) -> Self {
        Self::new(rule_name, Severity::Warning, message, start, end)
    }

    /// Attach the diagnostic to a stylesheet node
    #[inline]
    pub fn with_node(mut self, node: NodeId) -> Self {
        self.node = Some(node);
        self
    }

    /// Add a help message
    #[inline]
    pub fn with_help(mut self, help: impl Into<CompactString>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Convert to OxcDiagnostic for rich rendering
    #[inline]
    pub fn into_oxc_diagnostic(self) -> OxcDiagnostic {
        let mut diag = match self.severity {
            Severity::Error => OxcDiagnostic::error(self.message.to_string()),
            Severity::Warning => OxcDiagnostic::warn(self.message.to_string()),
        };

        diag = diag.with_label(Span::new(self.start, self.end));

        if let Some(help) = self.help {
            diag = diag.with_help(help.to_string());
        }

        diag
    }
}

/// Summary of lint results
#[derive(Debug, Clone, Default, Serialize)]
pub struct LintSummary {
    pub error_count: usize,
    pub warning_count: usize,
    pub file_count: usize,
}

impl LintSummary {
    #[inline]
    pub fn add(&mut self, diagnostic: &LintDiagnostic) {
        match diagnostic.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
        }
    }

    #[inline]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let mut sheet = nido_relief::Stylesheet::new();
        let rule = sheet.create_rule(".a");
        let diag = LintDiagnostic::warn("csstools/use-nesting", "Expected", 3, 9)
            .with_help("Nest it")
            .with_node(rule);
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.help.as_deref(), Some("Nest it"));
        assert_eq!(diag.node, Some(rule));
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = LintSummary::default();
        summary.add(&LintDiagnostic::error("a", "x", 0, 0));
        summary.add(&LintDiagnostic::warn("a", "y", 0, 0));
        summary.add(&LintDiagnostic::warn("a", "z", 0, 0));
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.warning_count, 2);
        assert!(summary.has_errors());
    }

    #[test]
    fn test_severity_deserialize() {
        let severity: Severity = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(severity, Severity::Warning);
        let severity: Severity = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(severity, Severity::Error);
    }
}
