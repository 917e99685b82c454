//! Lint configuration.
//!
//! A configuration maps rule names to settings, stylelint style:
//!
//! ```json
//! {
//!   "rules": {
//!     "csstools/use-nesting": ["always", { "except": ["/^:/"] }, { "severity": "warning" }]
//!   }
//! }
//! ```
//!
//! A setting is either the rule action alone or `[action, options]`,
//! optionally followed by `{ "severity": ... }`. The same shape can be
//! written in TOML.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::diagnostic::Severity;
use crate::rules::css::CssRuleRegistry;

/// Errors raised while loading or decoding a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed JSON
    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed TOML
    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// The rule action is not one of the accepted values
    #[error("Invalid option value \"{actual}\" for rule \"{rule}\"")]
    InvalidAction { rule: String, actual: String },

    /// The secondary options have the wrong shape
    #[error("Invalid option value \"{actual}\" for rule \"{rule}\"")]
    InvalidOptions { rule: String, actual: String },

    /// A `/body/flags` entry that does not compile
    #[error("Invalid option value \"{pattern}\" for rule \"{rule}\"")]
    InvalidPattern {
        rule: String,
        pattern: String,
        source: regex::Error,
    },

    /// The rule name is not registered
    #[error("Unknown rule \"{0}\"")]
    UnknownRule(String),

    /// The severity is neither `error` nor `warning`
    #[error("Invalid severity \"{actual}\" for rule \"{rule}\"")]
    InvalidSeverity { rule: String, actual: String },
}

/// Render a config value the way it appears in messages
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Primary option of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    /// `"always"`
    Always,
    /// `"ignore"`
    Ignore,
    /// `true` or `false`
    Enabled(bool),
    /// `null`
    Null,
}

impl RuleAction {
    /// Decode a primary option
    pub fn from_value(rule: &str, value: &Value) -> Result<Self, ConfigError> {
        match value {
            Value::String(text) if text == "always" => Ok(Self::Always),
            Value::String(text) if text == "ignore" => Ok(Self::Ignore),
            Value::Bool(enabled) => Ok(Self::Enabled(*enabled)),
            Value::Null => Ok(Self::Null),
            other => Err(ConfigError::InvalidAction {
                rule: rule.to_string(),
                actual: display_value(other),
            }),
        }
    }

    /// Only `"always"` and `true` run the rule
    #[inline]
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Always | Self::Enabled(true))
    }
}

/// Settings of one configured rule, as written
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSetting {
    /// Primary option, validated when the rule is built
    pub action: Value,
    /// Secondary options
    pub options: Value,
    /// Severity override
    pub severity: Option<Severity>,
}

#[derive(Deserialize)]
struct SecondaryOptions {
    severity: Option<Value>,
}

impl RuleSetting {
    fn from_value(rule: &str, value: Value) -> Result<Self, ConfigError> {
        let Value::Array(items) = value else {
            return Ok(Self {
                action: value,
                options: Value::Null,
                severity: None,
            });
        };

        let mut items = items.into_iter();
        let action = items.next().unwrap_or(Value::Array(Vec::new()));
        let options = items.next().unwrap_or(Value::Null);
        let severity = match items.next() {
            Some(extra) => parse_severity(rule, extra)?,
            None => None,
        };

        Ok(Self {
            action,
            options,
            severity,
        })
    }
}

fn parse_severity(rule: &str, extra: Value) -> Result<Option<Severity>, ConfigError> {
    let invalid = |actual: String| ConfigError::InvalidSeverity {
        rule: rule.to_string(),
        actual,
    };
    let secondary: SecondaryOptions =
        serde_json::from_value(extra.clone()).map_err(|_| invalid(display_value(&extra)))?;
    match secondary.severity {
        None => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|_| invalid(display_value(&value))),
    }
}

#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    rules: BTreeMap<String, Value>,
}

/// Linter configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LintConfig {
    /// Configured rules by name
    pub rules: BTreeMap<String, RuleSetting>,
}

impl LintConfig {
    /// Parse a JSON configuration
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(source)?;
        Self::from_raw(raw)
    }

    /// Parse a TOML configuration
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(source)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let mut rules = BTreeMap::new();
        for (name, value) in raw.rules {
            if !CssRuleRegistry::is_known(&name) {
                return Err(ConfigError::UnknownRule(name));
            }
            let setting = RuleSetting::from_value(&name, value)?;
            rules.insert(name, setting);
        }
        Ok(Self { rules })
    }

    /// Setting of a rule, if configured
    #[inline]
    pub fn rule(&self, name: &str) -> Option<&RuleSetting> {
        self.rules.get(name)
    }
}
