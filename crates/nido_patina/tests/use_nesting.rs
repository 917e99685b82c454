//! End to end tests for `csstools/use-nesting`.
//!
//! Fixed output is compared with inline snapshots, diagnostics with plain
//! assertions.

use nido_patina::{Linter, LintConfig, INVALID_OPTION, SYNTAX_ERROR};

/// Run the default linter in fix mode and return the rewritten stylesheet
fn fixed(source: &str) -> String {
    Linter::new().fix(source, "test.css").output
}

/// Run the default linter in report mode and return the messages
fn messages(linter: &Linter, source: &str) -> Vec<String> {
    linter
        .lint(source, "test.css")
        .diagnostics
        .iter()
        .map(|d| d.message.to_string())
        .collect()
}

fn configured(config: &str) -> Linter {
    Linter::from_config(&LintConfig::from_json(config).unwrap())
}

// =============================================================================
// Descendant Prefix Tests
// =============================================================================

mod descendant_prefix {
    use super::*;

    #[test]
    fn nests_descendant() {
        insta::assert_snapshot!(
            fixed(".a { color: red; } .a .b { color: blue; }"),
            @".a { color: red; & .b { color: blue; } }"
        );
    }

    #[test]
    fn nests_pseudo_class() {
        insta::assert_snapshot!(
            fixed(".a { color: red; } .a:hover { color: blue; }"),
            @".a { color: red; &:hover { color: blue; } }"
        );
    }

    #[test]
    fn nests_child_combinator() {
        insta::assert_snapshot!(
            fixed(".a { color: red; } .a > .b { color: blue; }"),
            @".a { color: red; & > .b { color: blue; } }"
        );
    }

    #[test]
    fn respects_token_boundary() {
        let source = ".a { color: red; } .ab { color: blue; } .ab-c { top: 0; }";
        assert_eq!(fixed(source), source);
        assert!(messages(&Linter::new(), source).is_empty());
    }

    #[test]
    fn rewrites_every_selector_in_a_list() {
        insta::assert_snapshot!(
            fixed(".a { color: red; } .a .b, .a .c { color: blue; }"),
            @".a { color: red; & .b, & .c { color: blue; } }"
        );
    }

    #[test]
    fn requires_every_pair_to_match() {
        let source = ".a, .b { color: red; } .a .c, .b .c { color: blue; }";
        assert_eq!(fixed(source), source);
    }

    #[test]
    fn keeps_multiline_whitespace() {
        let source = ".a {\n  color: red;\n}\n.a .b {\n  color: blue;\n}\n";
        assert_eq!(
            fixed(source),
            ".a {\n  color: red;\n& .b {\n  color: blue;\n}\n}\n"
        );
    }

    #[test]
    fn report_names_both_selectors() {
        assert_eq!(
            messages(&Linter::new(), ".a { color: red; } .a .b { color: blue; }"),
            vec!["Expected \".a .b\" inside \".a\"."]
        );
    }

    #[test]
    fn nests_first_rule_into_following_rule() {
        insta::assert_snapshot!(
            fixed(".a .b { color: blue; } .a { color: red; }"),
            @".a { color: red;& .b { color: blue; } }"
        );
        assert_eq!(
            fixed(".a .b {\n  color: blue;\n}\n.a {\n  color: red;\n}\n"),
            ".a {\n  color: red;& .b {\n  color: blue;\n}\n}\n"
        );
    }

    #[test]
    fn prefers_descendant_prefix_over_at_rule() {
        insta::assert_snapshot!(
            fixed(".a { x: 1; } .a .a { y: 2; }"),
            @".a { x: 1; & .a { y: 2; } }"
        );
    }
}

// =============================================================================
// At-rule Descendant Tests
// =============================================================================

mod at_rule_descendant {
    use super::*;

    #[test]
    fn wraps_in_nest() {
        insta::assert_snapshot!(
            fixed(".a { color: red; } .x .a { color: blue; }"),
            @".a { color: red; @nest .x & { color: blue; } }"
        );
    }

    #[test]
    fn keeps_multiline_whitespace() {
        let source = ".a {\n  color: red;\n}\n.x .a {\n  color: blue;\n}\n";
        assert_eq!(
            fixed(source),
            ".a {\n  color: red;\n@nest .x & {\n  color: blue;\n}\n}\n"
        );
    }

    #[test]
    fn wraps_first_rule_into_following_rule() {
        insta::assert_snapshot!(fixed(".x .a {} .a {}"), @".a {@nest .x & {}}");
    }

    #[test]
    fn requires_a_space() {
        let source = ".a { color: red; } .x.a { color: blue; }";
        assert_eq!(fixed(source), source);
    }

    #[test]
    fn report_names_both_selectors() {
        assert_eq!(
            messages(&Linter::new(), ".a { color: red; } .x .a { color: blue; }"),
            vec!["Expected \".x .a\" inside \".a\"."]
        );
    }
}

// =============================================================================
// Media Collapse Tests
// =============================================================================

mod media_collapse {
    use super::*;

    #[test]
    fn collapses_media() {
        insta::assert_snapshot!(
            fixed(".x { color: red; } @media (min-width: 1px) { .x { color: blue; } }"),
            @".x { color: red; @media (min-width: 1px) { color: blue; } }"
        );
    }

    #[test]
    fn collapses_media_before_rule() {
        insta::assert_snapshot!(
            fixed("@media print { .x { a: 1; } .y { b: 2; } } .x { c: 3; }"),
            @"@media print { .y { b: 2; } } .x { c: 3; @media print { a: 1; } }"
        );
    }

    #[test]
    fn collapses_leading_media() {
        insta::assert_snapshot!(
            fixed("@media (min-width: 1px) { .x { color: blue; } } .x { color: red; }"),
            @".x { color: red; @media (min-width: 1px) { color: blue; } }"
        );
    }

    #[test]
    fn keeps_multiline_whitespace() {
        let source =
            ".x {\n  color: red;\n}\n@media (min-width: 1px) {\n  .x {\n    color: blue;\n  }\n}\n";
        assert_eq!(
            fixed(source),
            ".x {\n  color: red;\n  @media (min-width: 1px) {\n    color: blue;\n  }\n}\n"
        );
    }

    #[test]
    fn ignores_other_at_rules() {
        let source = ".x { color: red; } @supports (display: grid) { .x { color: blue; } }";
        assert_eq!(fixed(source), source);
    }

    #[test]
    fn report_names_media() {
        assert_eq!(
            messages(
                &Linter::new(),
                ".x { color: red; } @media (min-width: 1px) { .x { color: blue; } }"
            ),
            vec!["Expected \"@media (min-width: 1px)\" inside \".x\"."]
        );
    }
}

// =============================================================================
// Walker Tests
// =============================================================================

mod walker {
    use super::*;

    #[test]
    fn revisits_after_each_fix() {
        insta::assert_snapshot!(
            fixed(".a { x: 1; } .a .b { y: 2; } .a .b .c { z: 3; }"),
            @".a { x: 1; & .b { y: 2; & .c { z: 3; } } }"
        );
    }

    #[test]
    fn does_not_skip_siblings() {
        insta::assert_snapshot!(
            fixed(".a { x: 1; } .a .b { y: 2; } .a .c { z: 3; } .d { w: 4; } .d:focus { v: 5; }"),
            @".a { x: 1; & .b { y: 2; } & .c { z: 3; } } .d { w: 4; &:focus { v: 5; } }"
        );
    }

    #[test]
    fn walks_nested_blocks() {
        insta::assert_snapshot!(
            fixed("@media print { .a { color: red; } .a .b { color: blue; } }"),
            @"@media print { .a { color: red; & .b { color: blue; } } }"
        );
    }

    #[test]
    fn stops_at_comments_and_declarations() {
        let source = ".a { color: red; } /* split */ .a .b { color: blue; }";
        assert_eq!(fixed(source), source);
    }

    #[test]
    fn fix_is_idempotent() {
        let sources = [
            ".a { color: red; } .a .b { color: blue; }",
            ".a { color: red; } .x .a { color: blue; }",
            ".x { color: red; } @media (min-width: 1px) { .x { color: blue; } }",
            ".a { x: 1; } .a .b { y: 2; } .a .b .c { z: 3; }",
        ];
        for source in sources {
            let once = fixed(source);
            assert_eq!(fixed(&once), once);
        }
    }

    #[test]
    fn report_mode_leaves_source_alone() {
        let source = ".p { .a { x: 1; } .a .b { y: 2; } } .q { } .q:focus { }";
        let linter = Linter::new();
        assert_eq!(
            messages(&linter, source),
            vec![
                "Expected \".a .b\" inside \".a\".",
                "Expected \".q:focus\" inside \".q\".",
            ]
        );
        let result = linter.lint(source, "test.css");
        assert_eq!(result.error_count, 2);
    }
}

// =============================================================================
// Option Tests
// =============================================================================

mod options {
    use super::*;

    #[test]
    fn except_pattern_suppresses_match() {
        let linter =
            configured(r#"{ "rules": { "csstools/use-nesting": ["always", { "except": "/^:/" }] } }"#);
        let source = ".a { color: red; } .a:hover { color: blue; } .b { x: 1; } .b .c { y: 2; }";
        assert_eq!(
            linter.fix(source, "test.css").output,
            ".a { color: red; } .a:hover { color: blue; } .b { x: 1; & .c { y: 2; } }"
        );
    }

    #[test]
    fn except_literal_suppresses_match() {
        let linter =
            configured(r#"{ "rules": { "csstools/use-nesting": ["always", { "except": [" .b"] }] } }"#);
        assert!(messages(&linter, ".a { color: red; } .a .b { color: blue; }").is_empty());
    }

    #[test]
    fn only_limits_matches() {
        let linter =
            configured(r#"{ "rules": { "csstools/use-nesting": [true, { "only": [":hover"] }] } }"#);
        assert!(messages(&linter, ".a { color: red; } .a .b { color: blue; }").is_empty());
        assert_eq!(
            messages(&linter, ".a { color: red; } .a:hover { color: blue; }"),
            vec!["Expected \".a:hover\" inside \".a\"."]
        );
    }

    #[test]
    fn filter_sees_at_rule_prefix() {
        let linter =
            configured(r#"{ "rules": { "csstools/use-nesting": ["always", { "except": ".x" }] } }"#);
        assert!(messages(&linter, ".a { color: red; } .x .a { color: blue; }").is_empty());
    }

    #[test]
    fn filter_sees_media_selector() {
        let linter =
            configured(r#"{ "rules": { "csstools/use-nesting": ["always", { "only": ".y" }] } }"#);
        let source = ".x { color: red; } @media print { .x { color: blue; } }";
        assert!(messages(&linter, source).is_empty());
    }

    #[test]
    fn disabled_actions_report_nothing() {
        for action in [r#""ignore""#, "false", "null"] {
            let linter = configured(&format!(
                r#"{{ "rules": {{ "csstools/use-nesting": {action} }} }}"#
            ));
            assert!(!linter
                .lint(".a { color: red; } .a .b { color: blue; }", "test.css")
                .has_diagnostics());
        }
    }

    #[test]
    fn disabled_rule_ignores_bad_options() {
        let linter =
            configured(r#"{ "rules": { "csstools/use-nesting": [false, { "foo": 1 }] } }"#);
        assert!(messages(&linter, ".a { color: red; } .a .b { color: blue; }").is_empty());
    }

    #[test]
    fn invalid_action_reports_invalid_option() {
        let linter = configured(r#"{ "rules": { "csstools/use-nesting": "never" } }"#);
        let result = linter.lint(".a { color: red; } .a .b { color: blue; }", "test.css");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].rule_name, INVALID_OPTION);
        insta::assert_snapshot!(
            result.diagnostics[0].message.as_str(),
            @r#"Invalid option value "never" for rule "csstools/use-nesting""#
        );
    }

    #[test]
    fn invalid_secondary_options_report_invalid_option() {
        let linter =
            configured(r#"{ "rules": { "csstools/use-nesting": ["always", { "except": 5 }] } }"#);
        assert_eq!(
            messages(&linter, ".a {}"),
            vec!["Invalid option value \"5\" for rule \"csstools/use-nesting\""]
        );

        let linter =
            configured(r#"{ "rules": { "csstools/use-nesting": ["always", { "only": "/(/" }] } }"#);
        assert_eq!(
            messages(&linter, ".a {}"),
            vec!["Invalid option value \"/(/\" for rule \"csstools/use-nesting\""]
        );
    }
}

// =============================================================================
// Syntax Error Tests
// =============================================================================

mod syntax_errors {
    use super::*;

    #[test]
    fn unexpected_close() {
        let result = Linter::new().lint("}", "test.css");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].rule_name, SYNTAX_ERROR);
        insta::assert_snapshot!(result.diagnostics[0].message.as_str(), @"1:1: Unexpected }");
    }

    #[test]
    fn fix_returns_source_unchanged() {
        let source = ".a { color: red; } .a .b { color: blue;";
        let fixed = Linter::new().fix(source, "test.css");
        assert_eq!(fixed.output, source);
        assert!(fixed.result.has_errors());
    }
}
