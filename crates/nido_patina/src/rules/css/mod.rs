//! CSS lint rules.
//!
//! Rules inspect (and in fix mode rewrite) a parsed [`Stylesheet`].
//!
//! ## Enabling CSS Rules
//!
//! CSS rules are enabled in the configuration:
//!
//! ```toml
//! [rules]
//! "csstools/use-nesting" = "always"
//! ```

mod use_nesting;

use nido_relief::Stylesheet;

use crate::config::{ConfigError, RuleAction, RuleSetting};
use crate::context::LintContext;
use crate::diagnostic::Severity;
use crate::filter::Filter;

pub use use_nesting::{
    expected_message, fix_at_rule_descendant, fix_descendant_prefix, fix_media_collapse,
    is_at_rule_candidate, is_descendant_candidate, is_media_candidate, Relation, UseNesting,
};

/// Metadata for a CSS rule
pub struct CssRuleMeta {
    /// Rule name (e.g., "csstools/use-nesting")
    pub name: &'static str,
    /// Rule description
    pub description: &'static str,
    /// Whether the rule can rewrite the stylesheet in fix mode
    pub fixable: bool,
    /// Default severity
    pub default_severity: Severity,
}

/// Trait for CSS lint rules
pub trait CssRule: Send + Sync {
    /// Get rule metadata
    fn meta(&self) -> &'static CssRuleMeta;

    /// Check the stylesheet.
    ///
    /// In fix mode (`ctx.fix()`) the rule may rewrite `sheet` in place; in
    /// report mode it must leave it untouched.
    fn check(&self, ctx: &mut LintContext<'_>, sheet: &mut Stylesheet);
}

/// A registered rule with its effective severity
pub struct RegisteredRule {
    pub rule: Box<dyn CssRule>,
    pub severity: Severity,
}

/// Registry holding the rules a linter runs, in registration order
#[derive(Default)]
pub struct CssRuleRegistry {
    rules: Vec<RegisteredRule>,
}

impl CssRuleRegistry {
    /// Names of every built-in rule
    pub const KNOWN_RULES: &'static [&'static str] = &[UseNesting::NAME];

    /// Create a new empty registry
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Whether `name` is a built-in rule
    #[inline]
    pub fn is_known(name: &str) -> bool {
        Self::KNOWN_RULES.contains(&name)
    }

    /// Register a rule with its default severity
    pub fn register(&mut self, rule: Box<dyn CssRule>) {
        let severity = rule.meta().default_severity;
        self.register_with_severity(rule, severity);
    }

    /// Register a rule with an explicit severity
    pub fn register_with_severity(&mut self, rule: Box<dyn CssRule>, severity: Severity) {
        self.rules.push(RegisteredRule { rule, severity });
    }

    /// Get all registered rules
    #[inline]
    pub fn rules(&self) -> &[RegisteredRule] {
        &self.rules
    }

    /// Build the rule configured under `name`.
    ///
    /// Returns `Ok(None)` when the action disables the rule.
    pub fn build(
        name: &str,
        setting: &RuleSetting,
    ) -> Result<Option<RegisteredRule>, ConfigError> {
        if name != UseNesting::NAME {
            return Err(ConfigError::UnknownRule(name.to_string()));
        }

        let action = RuleAction::from_value(name, &setting.action)?;
        if !action.is_enabled() {
            return Ok(None);
        }
        let filter = Filter::from_options(name, &setting.options)?;

        let rule = UseNesting::new(action, filter);
        let severity = setting
            .severity
            .unwrap_or(rule.meta().default_severity);
        Ok(Some(RegisteredRule {
            rule: Box::new(rule),
            severity,
        }))
    }
}
