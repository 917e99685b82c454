//! # nido_patina
//!
//! Patina - The quality checker for Nido.
//! Linter for stylesheets.
//!
//! ## Name Origin
//!
//! **Patina** (/ˈpætɪnə/) refers to the greenish layer that forms on copper,
//! bronze, and similar metals through oxidation over time. In art and antiques,
//! patina is highly valued as it indicates authenticity, age, and quality.
//! `nido_patina` examines stylesheets and, in fix mode, gives flat rule lists
//! the layered shape of nested CSS.
//!
//! ## Features
//!
//! - Rich diagnostic output with code snippets (like oxlint)
//! - stylelint compatible rule configuration
//! - Fix mode that rewrites the stylesheet tree and prints it back
//!
//! ## Usage
//!
//! ```
//! use nido_patina::{format_results, Linter, OutputFormat};
//!
//! let source = ".a { color: red; } .a .b { color: blue; }";
//! let linter = Linter::new();
//!
//! let result = linter.lint(source, "style.css");
//! assert!(result.has_errors());
//! let output = format_results(
//!     &[result],
//!     &[("style.css".to_string(), source.to_string())],
//!     OutputFormat::Text,
//! );
//! assert!(output.contains("Expected \".a .b\" inside \".a\"."));
//!
//! let fixed = linter.fix(source, "style.css");
//! assert_eq!(fixed.output, ".a { color: red; & .b { color: blue; } }");
//! ```
//!
//! ## Rules
//!
//! - `csstools/use-nesting` - Require nesting for adjacent rules that share a
//!   selector

pub mod config;
mod context;
mod diagnostic;
pub mod filter;
mod linter;
pub mod output;
pub mod rules;
pub mod telegraph;

pub use config::{ConfigError, LintConfig, RuleAction, RuleSetting};
pub use context::LintContext;
pub use diagnostic::{LintDiagnostic, LintSummary, Severity};
pub use filter::{Filter, FilterEntry};
pub use linter::{FixResult, LintResult, Linter, INVALID_OPTION, SYNTAX_ERROR};
pub use output::{format_results, format_summary, OutputFormat};
pub use rules::css::{CssRule, CssRuleMeta, CssRuleRegistry, RegisteredRule, UseNesting};
pub use telegraph::{Emitter, JsonEmitter, Telegraph, TextEmitter};

/// Lint a stylesheet with default rules
///
/// This is a convenience function for simple use cases.
/// For more control, use `Linter::new()` directly.
pub fn lint(source: &str, filename: &str) -> LintResult {
    Linter::new().lint(source, filename)
}

/// Rewrite a stylesheet with default rules
pub fn fix(source: &str, filename: &str) -> String {
    Linter::new().fix(source, filename).output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lint_function() {
        let result = lint(".a { color: red; }\n.a:hover { color: blue; }\n", "test.css");
        assert!(result.has_errors());
    }

    #[test]
    fn test_lint_clean_stylesheet() {
        let result = lint(".a { color: red; }\n.b { color: blue; }\n", "test.css");
        assert!(!result.has_errors());
    }

    #[test]
    fn test_fix_function() {
        assert_eq!(
            fix(".a { color: red; } .x .a { color: blue; }", "test.css"),
            ".a { color: red; @nest .x & { color: blue; } }"
        );
    }
}
