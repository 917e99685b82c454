//! Lint context for rule execution.

use crate::diagnostic::{LintDiagnostic, Severity};
use compact_str::CompactString;
use nido_relief::{NodeId, Stylesheet};
use rustc_hash::FxHashSet;

/// Lint context provides utilities for rules during execution.
pub struct LintContext<'a> {
    /// Source code being linted
    pub source: &'a str,
    /// Filename for diagnostics
    pub filename: &'a str,
    /// Whether rules should rewrite the tree instead of reporting
    fix: bool,
    /// Collected diagnostics (pre-allocated capacity)
    diagnostics: Vec<LintDiagnostic>,
    /// Current rule name (set by the linter before running a rule)
    pub current_rule: &'static str,
    /// Severity configured for the current rule
    current_severity: Severity,
    /// Optional set of enabled rule names (if None, all rules are enabled)
    enabled_rules: Option<FxHashSet<String>>,
    /// Cached error count for fast access
    error_count: usize,
    /// Cached warning count for fast access
    warning_count: usize,
}

impl<'a> LintContext<'a> {
    /// Initial capacity for diagnostics vector
    const INITIAL_DIAGNOSTICS_CAPACITY: usize = 16;

    /// Create a new lint context in report mode
    #[inline]
    pub fn new(source: &'a str, filename: &'a str) -> Self {
        Self {
            source,
            filename,
            fix: false,
            diagnostics: Vec::with_capacity(Self::INITIAL_DIAGNOSTICS_CAPACITY),
            current_rule: "",
            current_severity: Severity::Error,
            enabled_rules: None,
            error_count: 0,
            warning_count: 0,
        }
    }

    /// Switch between fix mode and report mode
    #[inline]
    pub fn with_fix(mut self, fix: bool) -> Self {
        self.fix = fix;
        self
    }

    /// Whether rules should rewrite the tree
    #[inline]
    pub fn fix(&self) -> bool {
        self.fix
    }

    /// Set enabled rules (if None, all rules are enabled)
    #[inline]
    pub fn set_enabled_rules(&mut self, enabled_rules: Option<FxHashSet<String>>) {
        self.enabled_rules = enabled_rules;
    }

    /// Check if a rule is enabled
    #[inline]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        match &self.enabled_rules {
            Some(set) => set.contains(rule_name),
            None => true,
        }
    }

    /// Prepare the context for running `rule_name`
    #[inline]
    pub fn enter_rule(&mut self, rule_name: &'static str, severity: Severity) {
        self.current_rule = rule_name;
        self.current_severity = severity;
    }

    /// Severity configured for the current rule
    #[inline]
    pub fn severity(&self) -> Severity {
        self.current_severity
    }

    /// Report a lint diagnostic
    #[inline]
    pub fn report(&mut self, diagnostic: LintDiagnostic) {
        match diagnostic.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
        }
        self.diagnostics.push(diagnostic);
    }

    /// Report a diagnostic for the current rule attached to `node`.
    ///
    /// The diagnostic spans the node's source range, or is empty at offset 0
    /// for nodes that were synthesized.
    pub fn report_node(
        &mut self,
        sheet: &Stylesheet,
        node: NodeId,
        message: impl Into<CompactString>,
        help: Option<&str>,
    ) {
        let (start, end) = sheet
            .source(node)
            .map(|span| (span.start.offset, span.end.offset))
            .unwrap_or((0, 0));
        let mut diagnostic =
            LintDiagnostic::new(self.current_rule, self.current_severity, message, start, end)
                .with_node(node);
        if let Some(help) = help {
            diagnostic = diagnostic.with_help(help);
        }
        self.report(diagnostic);
    }

    /// Get collected diagnostics
    #[inline]
    pub fn into_diagnostics(self) -> Vec<LintDiagnostic> {
        self.diagnostics
    }

    /// Get reference to collected diagnostics
    #[inline]
    pub fn diagnostics(&self) -> &[LintDiagnostic] {
        &self.diagnostics
    }

    /// Get the error count (cached, O(1))
    #[inline]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Get the warning count (cached, O(1))
    #[inline]
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }
}
