//! Main linter entry point.
//!
//! Parses a stylesheet once, runs every enabled rule over it, and either
//! reports diagnostics or returns the rewritten stylesheet.

use crate::config::{ConfigError, LintConfig, RuleAction};
use crate::context::LintContext;
use crate::diagnostic::{LintDiagnostic, LintSummary, Severity};
use crate::filter::Filter;
use crate::rules::css::{CssRuleRegistry, UseNesting};
use nido_relief::Stylesheet;
use rustc_hash::FxHashSet;

/// Rule name used for diagnostics about a stylesheet that does not parse
pub const SYNTAX_ERROR: &str = "CssSyntaxError";

/// Rule name used for diagnostics about invalid rule options
pub const INVALID_OPTION: &str = "invalid-option";

/// Lint result for a single file
#[derive(Debug, Clone)]
pub struct LintResult {
    /// Filename that was linted
    pub filename: String,
    /// Collected diagnostics
    pub diagnostics: Vec<LintDiagnostic>,
    /// Number of errors
    pub error_count: usize,
    /// Number of warnings
    pub warning_count: usize,
}

impl LintResult {
    /// Check if there are any errors
    #[inline]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Check if there are any diagnostics
    #[inline]
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Result of running the linter in fix mode
#[derive(Debug, Clone)]
pub struct FixResult {
    /// The rewritten stylesheet, or the input when it does not parse
    pub output: String,
    /// Diagnostics that remained after fixing
    pub result: LintResult,
}

impl FixResult {
    /// Whether the output differs from `source`
    #[inline]
    pub fn changed(&self, source: &str) -> bool {
        self.output != source
    }
}

/// Main linter struct.
pub struct Linter {
    registry: CssRuleRegistry,
    /// Problems found while building rules from a configuration
    invalid_options: Vec<String>,
    /// Optional set of enabled rule names (if None, all rules are enabled)
    enabled_rules: Option<FxHashSet<String>>,
}

impl Default for Linter {
    fn default() -> Self {
        Self::new()
    }
}

impl Linter {
    /// Create a linter running `csstools/use-nesting` with default options
    #[inline]
    pub fn new() -> Self {
        Self::with_use_nesting(RuleAction::Always, Filter::new())
    }

    /// Create a linter with a custom rule registry
    #[inline]
    pub fn with_registry(registry: CssRuleRegistry) -> Self {
        Self {
            registry,
            invalid_options: Vec::new(),
            enabled_rules: None,
        }
    }

    /// Create a linter running only `csstools/use-nesting`
    pub fn with_use_nesting(action: RuleAction, filter: Filter) -> Self {
        let mut registry = CssRuleRegistry::new();
        registry.register(Box::new(UseNesting::new(action, filter)));
        Self::with_registry(registry)
    }

    /// Create a linter from a configuration.
    ///
    /// Rules whose settings fail validation are not registered; every
    /// problem is reported as an `invalid-option` diagnostic on each file.
    pub fn from_config(config: &LintConfig) -> Self {
        let mut registry = CssRuleRegistry::new();
        let mut invalid_options = Vec::new();

        for (name, setting) in &config.rules {
            match CssRuleRegistry::build(name, setting) {
                Ok(Some(registered)) => {
                    registry.register_with_severity(registered.rule, registered.severity)
                }
                Ok(None) => tracing::debug!("config: {} is disabled", name),
                Err(err) => {
                    tracing::debug!("config: skipping {}: {}", name, err);
                    invalid_options.push(err.to_string());
                }
            }
        }

        Self {
            registry,
            invalid_options,
            enabled_rules: None,
        }
    }

    /// Parse a JSON configuration and build a linter from it
    pub fn from_json_config(source: &str) -> Result<Self, ConfigError> {
        LintConfig::from_json(source).map(|config| Self::from_config(&config))
    }

    /// Set enabled rules (if None, all rules are enabled)
    ///
    /// Pass a list of rule names to enable only those rules.
    /// Rules not in the list will be skipped during linting.
    #[inline]
    pub fn with_enabled_rules(mut self, rules: Option<Vec<String>>) -> Self {
        self.enabled_rules = rules.map(|r| r.into_iter().collect());
        self
    }

    /// Check if a rule is enabled
    #[inline]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        match &self.enabled_rules {
            Some(set) => set.contains(rule_name),
            None => true,
        }
    }

    /// Lint a stylesheet without changing it
    #[inline]
    pub fn lint(&self, source: &str, filename: &str) -> LintResult {
        self.run(source, filename, false).1
    }

    /// Apply every fix and return the rewritten stylesheet
    pub fn fix(&self, source: &str, filename: &str) -> FixResult {
        let (sheet, result) = self.run(source, filename, true);
        let output = match sheet {
            Some(sheet) => sheet.to_css(),
            None => source.to_string(),
        };
        FixResult { output, result }
    }

    /// Lint multiple files and aggregate results
    pub fn lint_files(&self, files: &[(String, String)]) -> (Vec<LintResult>, LintSummary) {
        let mut results = Vec::with_capacity(files.len());
        let mut summary = LintSummary::default();

        for (filename, source) in files {
            let result = self.lint(source, filename);
            summary.error_count += result.error_count;
            summary.warning_count += result.warning_count;
            results.push(result);
        }

        summary.file_count = files.len();
        (results, summary)
    }

    /// Get the rule registry
    #[inline]
    pub fn registry(&self) -> &CssRuleRegistry {
        &self.registry
    }

    fn run(&self, source: &str, filename: &str, fix: bool) -> (Option<Stylesheet>, LintResult) {
        tracing::debug!(
            "lint: {} ({} rules, fix: {})",
            filename,
            self.registry.rules().len(),
            fix
        );

        let mut ctx = LintContext::new(source, filename).with_fix(fix);
        ctx.set_enabled_rules(self.enabled_rules.clone());

        for message in &self.invalid_options {
            ctx.report(LintDiagnostic::error(INVALID_OPTION, message.as_str(), 0, 0));
        }

        let sheet = match nido_armature::parse(source) {
            Ok(mut sheet) => {
                for registered in self.registry.rules() {
                    let name = registered.rule.meta().name;
                    if !ctx.is_rule_enabled(name) {
                        continue;
                    }
                    ctx.enter_rule(name, registered.severity);
                    registered.rule.check(&mut ctx, &mut sheet);
                }
                Some(sheet)
            }
            Err(err) => {
                tracing::warn!("lint: failed to parse {}: {}", filename, err);
                let offset = err.position().offset;
                ctx.report(LintDiagnostic::new(
                    SYNTAX_ERROR,
                    Severity::Error,
                    err.to_string(),
                    offset,
                    offset,
                ));
                None
            }
        };

        let error_count = ctx.error_count();
        let warning_count = ctx.warning_count();
        let diagnostics = ctx.into_diagnostics();
        tracing::debug!(
            "lint: {} done ({} errors, {} warnings)",
            filename,
            error_count,
            warning_count
        );

        let result = LintResult {
            filename: filename.to_string(),
            diagnostics,
            error_count,
            warning_count,
        };
        (sheet, result)
    }
}
