//! `except` / `only` filters for rule options.
//!
//! Entries written as `/body/flags` are regular expressions; every other
//! string is compared literally.

use regex::{Regex, RegexBuilder};
use serde_json::Value;

use crate::config::{display_value, ConfigError};

/// One filter entry
#[derive(Debug, Clone)]
pub enum FilterEntry {
    /// Matches by string equality
    Literal(String),
    /// Matches when the regex finds a match anywhere in the candidate
    Pattern(Regex),
}

impl FilterEntry {
    /// Decode an entry, compiling `/body/flags` strings as regexes.
    ///
    /// Supported flags are `i`, `m`, `s` and `x`; `g`, `u` and `y` are
    /// accepted and have no effect.
    pub fn parse(entry: &str) -> Result<Self, regex::Error> {
        match split_pattern(entry) {
            Some((body, flags)) => {
                let mut builder = RegexBuilder::new(body);
                for flag in flags.chars() {
                    match flag {
                        'i' => builder.case_insensitive(true),
                        'm' => builder.multi_line(true),
                        's' => builder.dot_matches_new_line(true),
                        'x' => builder.ignore_whitespace(true),
                        _ => &mut builder,
                    };
                }
                builder.build().map(Self::Pattern)
            }
            None => Ok(Self::Literal(entry.to_string())),
        }
    }

    /// Whether `candidate` matches this entry
    #[inline]
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Literal(literal) => literal == candidate,
            Self::Pattern(regex) => regex.is_match(candidate),
        }
    }
}

impl From<Regex> for FilterEntry {
    fn from(regex: Regex) -> Self {
        Self::Pattern(regex)
    }
}

impl From<&str> for FilterEntry {
    fn from(literal: &str) -> Self {
        Self::Literal(literal.to_string())
    }
}

/// Split `/body/flags` into its parts
fn split_pattern(entry: &str) -> Option<(&str, &str)> {
    let rest = entry.strip_prefix('/')?;
    let close = rest.rfind('/')?;
    let (body, flags) = (&rest[..close], &rest[close + 1..]);
    let valid_flags = flags
        .chars()
        .all(|flag| matches!(flag, 'g' | 'i' | 'm' | 's' | 'u' | 'x' | 'y'));
    (!body.is_empty() && valid_flags).then_some((body, flags))
}

/// Allow/deny list applied to selector fragments
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub except: Vec<FilterEntry>,
    pub only: Vec<FilterEntry>,
}

impl Filter {
    /// Create a filter that accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an `except` entry
    pub fn with_except(mut self, entry: impl Into<FilterEntry>) -> Self {
        self.except.push(entry.into());
        self
    }

    /// Add an `only` entry
    pub fn with_only(mut self, entry: impl Into<FilterEntry>) -> Self {
        self.only.push(entry.into());
        self
    }

    /// A candidate is rejected when it matches any `except` entry, or when
    /// `only` is non-empty and none of its entries match.
    pub fn accepts(&self, candidate: &str) -> bool {
        if self.except.iter().any(|entry| entry.matches(candidate)) {
            return false;
        }
        self.only.is_empty() || self.only.iter().any(|entry| entry.matches(candidate))
    }

    /// Decode the secondary options of `rule`: `null` or an object with
    /// optional `except` and `only` keys, each a string or a list of strings.
    pub fn from_options(rule: &str, options: &Value) -> Result<Self, ConfigError> {
        let object = match options {
            Value::Null => return Ok(Self::default()),
            Value::Object(object) => object,
            other => {
                return Err(ConfigError::InvalidOptions {
                    rule: rule.to_string(),
                    actual: display_value(other),
                })
            }
        };

        let mut filter = Self::default();
        for (key, value) in object {
            let entries = match key.as_str() {
                "except" => &mut filter.except,
                "only" => &mut filter.only,
                _ => {
                    return Err(ConfigError::InvalidOptions {
                        rule: rule.to_string(),
                        actual: key.clone(),
                    })
                }
            };
            decode_entries(rule, value, entries)?;
        }
        Ok(filter)
    }
}

fn decode_entries(
    rule: &str,
    value: &Value,
    entries: &mut Vec<FilterEntry>,
) -> Result<(), ConfigError> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        single => std::slice::from_ref(single),
    };
    for item in items {
        let Value::String(entry) = item else {
            return Err(ConfigError::InvalidOptions {
                rule: rule.to_string(),
                actual: display_value(item),
            });
        };
        let parsed = FilterEntry::parse(entry).map_err(|source| ConfigError::InvalidPattern {
            rule: rule.to_string(),
            pattern: entry.clone(),
            source,
        })?;
        entries.push(parsed);
    }
    Ok(())
}
