//! csstools/use-nesting
//!
//! Require adjacent rules that share a selector to be written with CSS
//! nesting.
//!
//! Three relations between a rule and its previous sibling are detected:
//!
//! - **Descendant prefix**: every selector of one rule starts with every
//!   selector of the other at a token boundary.
//! - **At-rule descendant**: every selector of one rule ends with
//!   `" " + selector` of the other.
//! - **Media collapse**: a rule repeats the selector of the first rule
//!   inside an adjacent `@media` block.
//!
//! ## Examples
//!
//! Before:
//! ```css
//! .a { color: red; }
//! .a .b { color: blue; }
//! .x .a { color: green; }
//! ```
//!
//! After:
//! ```css
//! .a { color: red; & .b { color: blue; } @nest .x & { color: green; } }
//! ```
//!
//! Before:
//! ```css
//! .x { color: red; }
//! @media (min-width: 1px) { .x { color: blue; } }
//! ```
//!
//! After:
//! ```css
//! .x { color: red; @media (min-width: 1px) { color: blue; } }
//! ```

use nido_relief::{NodeId, NodeKind, Stylesheet};

use crate::config::RuleAction;
use crate::context::LintContext;
use crate::diagnostic::Severity;
use crate::filter::Filter;

use super::{CssRule, CssRuleMeta};

static META: CssRuleMeta = CssRuleMeta {
    name: UseNesting::NAME,
    description: "Require nesting for adjacent rules that share a selector",
    fixable: true,
    default_severity: Severity::Error,
};

/// Use nesting rule
#[derive(Debug, Clone)]
pub struct UseNesting {
    action: RuleAction,
    filter: Filter,
}

impl Default for UseNesting {
    fn default() -> Self {
        Self::new(RuleAction::Always, Filter::default())
    }
}

impl UseNesting {
    pub const NAME: &'static str = "csstools/use-nesting";

    pub fn new(action: RuleAction, filter: Filter) -> Self {
        Self { action, filter }
    }

    /// First relation that holds between `node` and `prev`, checked in
    /// priority order, with the pair oriented as `(rule1, rule2)`.
    fn find_pair(
        &self,
        sheet: &Stylesheet,
        node: NodeId,
        prev: NodeId,
    ) -> Option<(Relation, NodeId, NodeId)> {
        Relation::PRIORITY.into_iter().find_map(|relation| {
            if relation.holds(sheet, node, prev, &self.filter) {
                Some((relation, node, prev))
            } else if relation.holds(sheet, prev, node, &self.filter) {
                Some((relation, prev, node))
            } else {
                None
            }
        })
    }
}

impl CssRule for UseNesting {
    fn meta(&self) -> &'static CssRuleMeta {
        &META
    }

    fn check(&self, ctx: &mut LintContext<'_>, sheet: &mut Stylesheet) {
        if !self.action.is_enabled() {
            return;
        }
        let fix = ctx.fix();

        sheet.walk_mut(|sheet, node| loop {
            let Some(prev) = sheet.prev(node) else {
                break;
            };
            if !sheet.kind(node).is_rule_like() || !sheet.kind(prev).is_rule_like() {
                break;
            }
            let Some((relation, rule1, rule2)) = self.find_pair(sheet, node, prev) else {
                break;
            };

            if !fix {
                let message = expected_message(sheet, rule1, rule2);
                ctx.report_node(sheet, rule1, message, Some(relation.help()));
                break;
            }

            tracing::trace!(
                "use-nesting: {:?} {:?} next to {:?}",
                relation,
                sheet.selector(rule1),
                sheet.node(rule2).selector().or(sheet.node(rule2).params())
            );
            relation.apply(sheet, rule1, rule2);
        });
    }
}

/// How two adjacent nodes can be nested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `.a` + `.a .b` becomes `.a { & .b {} }`
    DescendantPrefix,
    /// `.a` + `.x .a` becomes `.a { @nest .x & {} }`
    AtRuleDescendant,
    /// `.x` + `@media q { .x {} }` becomes `.x { @media q {} }`
    MediaCollapse,
}

impl Relation {
    /// Order in which relations are tried
    pub const PRIORITY: [Relation; 3] = [
        Relation::DescendantPrefix,
        Relation::AtRuleDescendant,
        Relation::MediaCollapse,
    ];

    /// Whether `rule1` can be nested into `rule2` through this relation
    pub fn holds(self, sheet: &Stylesheet, rule1: NodeId, rule2: NodeId, filter: &Filter) -> bool {
        match self {
            Self::DescendantPrefix => is_descendant_candidate(sheet, rule1, rule2, filter),
            Self::AtRuleDescendant => is_at_rule_candidate(sheet, rule1, rule2, filter),
            Self::MediaCollapse => is_media_candidate(sheet, rule1, rule2, filter),
        }
    }

    /// Rewrite the tree for a pair this relation holds for
    pub fn apply(self, sheet: &mut Stylesheet, rule1: NodeId, rule2: NodeId) {
        match self {
            Self::DescendantPrefix => fix_descendant_prefix(sheet, rule1, rule2),
            Self::AtRuleDescendant => fix_at_rule_descendant(sheet, rule1, rule2),
            Self::MediaCollapse => fix_media_collapse(sheet, rule1, rule2),
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            Self::DescendantPrefix => "Nest the rule and replace the shared selector prefix with `&`",
            Self::AtRuleDescendant => "Nest the rule as `@nest <prefix> &`",
            Self::MediaCollapse => "Move the `@media` block inside the rule",
        }
    }
}

// ===========================================================================
// Predicates
// ===========================================================================

/// Selector list of a rule. `None` for other nodes and for rules with an
/// empty selector entry.
fn rule_selectors(sheet: &Stylesheet, id: NodeId) -> Option<Vec<String>> {
    let selectors = sheet.selectors(id)?;
    if selectors.iter().any(String::is_empty) {
        return None;
    }
    Some(selectors)
}

/// First child of a `@media` block, when it is a rule
fn media_first_rule(sheet: &Stylesheet, media: NodeId) -> Option<NodeId> {
    match sheet.kind(media) {
        NodeKind::AtRule { name, .. } if name == "media" => {}
        _ => return None,
    }
    let first = sheet.first_child(media)?;
    matches!(sheet.kind(first), NodeKind::Rule { .. }).then_some(first)
}

#[inline]
fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_'
}

/// Prefix left after removing `" " + tail` from the end of `selector`
#[inline]
fn strip_descendant_tail<'s>(selector: &'s str, tail: &str) -> Option<&'s str> {
    if tail.len() >= selector.len() {
        return None;
    }
    selector.strip_suffix(tail)?.strip_suffix(' ')
}

/// Every selector of `rule2` prefixes every selector of `rule1`, followed
/// by a byte that cannot continue an identifier. The filter sees the
/// remaining suffix.
pub fn is_descendant_candidate(
    sheet: &Stylesheet,
    rule1: NodeId,
    rule2: NodeId,
    filter: &Filter,
) -> bool {
    let (Some(selectors1), Some(selectors2)) =
        (rule_selectors(sheet, rule1), rule_selectors(sheet, rule2))
    else {
        return false;
    };

    selectors2.iter().all(|s2| {
        selectors1.iter().all(|s1| {
            if s2.len() >= s1.len() || !s1.starts_with(s2.as_str()) {
                return false;
            }
            let suffix = &s1[s2.len()..];
            !is_word_byte(suffix.as_bytes()[0]) && filter.accepts(suffix)
        })
    })
}

/// Every selector of `rule1` ends with `" " + s2` for every selector `s2`
/// of `rule2`. The filter sees the leading part.
pub fn is_at_rule_candidate(
    sheet: &Stylesheet,
    rule1: NodeId,
    rule2: NodeId,
    filter: &Filter,
) -> bool {
    let (Some(selectors1), Some(selectors2)) =
        (rule_selectors(sheet, rule1), rule_selectors(sheet, rule2))
    else {
        return false;
    };

    selectors2.iter().all(|s2| {
        selectors1.iter().all(|s1| {
            strip_descendant_tail(s1, s2).is_some_and(|prefix| filter.accepts(prefix))
        })
    })
}

/// `rule1` is a rule and `rule2` a `@media` block whose first child has the
/// same selector text. The filter sees that selector.
pub fn is_media_candidate(
    sheet: &Stylesheet,
    rule1: NodeId,
    rule2: NodeId,
    filter: &Filter,
) -> bool {
    let Some(selector) = sheet.selector(rule1).filter(|selector| !selector.is_empty()) else {
        return false;
    };
    let Some(first) = media_first_rule(sheet, rule2) else {
        return false;
    };
    sheet.selector(first) == Some(selector) && filter.accepts(selector)
}

// ===========================================================================
// Mutators
// ===========================================================================

/// Replace the longest selector of `outer` that prefixes each selector of
/// `inner` with `&`, then move `inner` to the end of `outer`.
pub fn fix_descendant_prefix(sheet: &mut Stylesheet, inner: NodeId, outer: NodeId) {
    let (Some(inner_selectors), Some(outer_selectors)) =
        (sheet.selectors(inner), sheet.selectors(outer))
    else {
        return;
    };

    let rewritten: Vec<String> = inner_selectors
        .iter()
        .map(|s1| {
            let prefix = outer_selectors
                .iter()
                .filter(|s2| s1.starts_with(s2.as_str()))
                .map(String::len)
                .max()
                .unwrap_or(0);
            format!("&{}", &s1[prefix..])
        })
        .collect();

    sheet.set_selectors(inner, &rewritten);
    sheet.append(outer, inner);
}

/// Detach `outer`, turn each of its selectors `<prefix> <tail>` into
/// `<prefix> &`, and append an `@nest` at-rule holding its children to
/// `inner`.
pub fn fix_at_rule_descendant(sheet: &mut Stylesheet, outer: NodeId, inner: NodeId) {
    let (Some(outer_selectors), Some(inner_selectors)) =
        (sheet.selectors(outer), sheet.selectors(inner))
    else {
        return;
    };

    sheet.remove(outer);

    let rewritten: Vec<String> = outer_selectors
        .iter()
        .map(|s1| {
            let prefix = inner_selectors
                .iter()
                .filter_map(|s2| strip_descendant_tail(s1, s2))
                .min_by_key(|prefix| prefix.len());
            match prefix {
                Some(prefix) => format!("{prefix} &"),
                None => s1.clone(),
            }
        })
        .collect();
    sheet.set_selectors(outer, &rewritten);

    let params = sheet.selector(outer).unwrap_or_default().to_string();
    let nest = sheet.create_at_rule("nest", params);
    let mut raws = sheet.raws(outer).clone();
    raws.after_name = Some(" ".to_string());
    let source = sheet.source(outer);
    {
        let node = sheet.node_mut(nest);
        node.raws = raws;
        node.source = source;
    }

    let children = sheet.children(outer).to_vec();
    for child in children {
        sheet.append(nest, child);
    }
    sheet.append(inner, nest);
}

/// Move the body of the first rule of `media` into a copy of `media`
/// appended to `rule`. The emptied rule is removed, and so is `media` once
/// it has no children left.
pub fn fix_media_collapse(sheet: &mut Stylesheet, rule: NodeId, media: NodeId) {
    let Some(first) = media_first_rule(sheet, media) else {
        return;
    };

    let wrapper = sheet.clone_empty(media);
    let first_raws = sheet.raws(first).clone();
    {
        let raws = sheet.raws_mut(wrapper);
        raws.before = first_raws.before;
        raws.after = first_raws.after;
        raws.semicolon = first_raws.semicolon;
    }

    let children = sheet.children(first).to_vec();
    for child in children {
        let copy = sheet.clone_node(child);
        sheet.append(wrapper, copy);
    }
    sheet.append(rule, wrapper);

    sheet.remove(first);
    if sheet.children(media).is_empty() {
        sheet.remove(media);
    }
}

// ===========================================================================
// Reporter
// ===========================================================================

/// `Expected "<outside>" inside "<inside>".` for `rule1` found next to
/// `rule2`.
pub fn expected_message(sheet: &Stylesheet, rule1: NodeId, rule2: NodeId) -> String {
    let selector1 = sheet.selector(rule1).unwrap_or_default();
    match sheet.kind(rule2) {
        NodeKind::AtRule { name, params, .. } => {
            format!("Expected \"@{name} {params}\" inside \"{selector1}\".")
        }
        _ => {
            let selector2 = sheet.selector(rule2).unwrap_or_default();
            format!("Expected \"{selector1}\" inside \"{selector2}\".")
        }
    }
}
