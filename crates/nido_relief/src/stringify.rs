//! Stylesheet serializer.
//!
//! An untouched tree prints back to its exact source. Raws that are unknown
//! (nodes created or rewritten by a fix) are inferred from the first node in
//! the same tree that has them, falling back to fixed defaults.

use crate::ast::{NodeId, NodeKind, Raws};
use crate::tree::Stylesheet;

/// Which raw a caller asks for on the node itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Own {
    Before,
    After,
    Between,
    Left,
    Right,
}

/// Which formatting family to infer when the node has no own raw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Detect {
    Before,
    After,
    BeforeDecl,
    BeforeRule,
    BeforeComment,
    BeforeClose,
    BeforeOpen,
    Colon,
    Indent,
    EmptyBody,
    CommentLeft,
    CommentRight,
}

impl Detect {
    fn default_value(self) -> &'static str {
        match self {
            Self::Before
            | Self::After
            | Self::BeforeDecl
            | Self::BeforeRule
            | Self::BeforeComment
            | Self::BeforeClose => "\n",
            Self::BeforeOpen => " ",
            Self::Colon => ": ",
            Self::Indent => "    ",
            Self::EmptyBody => "",
            Self::CommentLeft | Self::CommentRight => " ",
        }
    }
}

fn own_raw(raws: &Raws, own: Own) -> Option<&str> {
    match own {
        Own::Before => raws.before.as_deref(),
        Own::After => raws.after.as_deref(),
        Own::Between => raws.between.as_deref(),
        Own::Left => raws.left.as_deref(),
        Own::Right => raws.right.as_deref(),
    }
}

/// Drop everything after the last newline
fn strip_trailing_line(value: &str) -> String {
    match value.rfind('\n') {
        Some(newline) => value[..=newline].to_string(),
        None => value.to_string(),
    }
}

fn only_whitespace(value: &str) -> String {
    value.chars().filter(|c| c.is_whitespace()).collect()
}

impl Stylesheet {
    /// Serialize the whole stylesheet.
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        self.print(self.root(), false, &mut out);
        out
    }

    /// Serialize a single node and its subtree, without its `before` raw.
    pub fn node_to_css(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.print(id, false, &mut out);
        out
    }

    /// `between` raw of a rule or at-rule, inferred when missing
    pub(crate) fn raw_between_block(&self, id: NodeId) -> String {
        self.raw(id, Some(Own::Between), Detect::BeforeOpen)
    }

    fn print(&self, id: NodeId, semicolon: bool, out: &mut String) {
        let node = self.node(id);
        match &node.kind {
            NodeKind::Root => {
                self.print_body(id, out);
                if let Some(after) = &node.raws.after {
                    out.push_str(after);
                }
            }
            NodeKind::Rule { selector } => self.print_block(id, selector, out),
            NodeKind::AtRule {
                name,
                params,
                has_block,
            } => {
                let mut start = format!("@{name}");
                match &node.raws.after_name {
                    Some(after_name) => start.push_str(after_name),
                    None if !params.is_empty() => start.push(' '),
                    None => {}
                }
                start.push_str(params);
                if *has_block {
                    self.print_block(id, &start, out);
                } else {
                    out.push_str(&start);
                    if let Some(between) = &node.raws.between {
                        out.push_str(between);
                    }
                    if semicolon {
                        out.push(';');
                    }
                }
            }
            NodeKind::Decl {
                prop,
                value,
                important,
            } => {
                out.push_str(prop);
                out.push_str(&self.raw(id, Some(Own::Between), Detect::Colon));
                out.push_str(value);
                if *important {
                    out.push_str(node.raws.important.as_deref().unwrap_or(" !important"));
                }
                if semicolon {
                    out.push(';');
                }
            }
            NodeKind::Comment { text } => {
                out.push_str("/*");
                out.push_str(&self.raw(id, Some(Own::Left), Detect::CommentLeft));
                out.push_str(text);
                out.push_str(&self.raw(id, Some(Own::Right), Detect::CommentRight));
                out.push_str("*/");
            }
        }
    }

    fn print_block(&self, id: NodeId, start: &str, out: &mut String) {
        out.push_str(start);
        out.push_str(&self.raw(id, Some(Own::Between), Detect::BeforeOpen));
        out.push('{');
        let after = if self.children(id).is_empty() {
            self.raw(id, Some(Own::After), Detect::EmptyBody)
        } else {
            self.print_body(id, out);
            self.raw(id, Some(Own::After), Detect::After)
        };
        out.push_str(&after);
        out.push('}');
    }

    fn print_body(&self, id: NodeId, out: &mut String) {
        let children = self.children(id);
        let mut last = children.len().saturating_sub(1);
        while last > 0 && matches!(self.kind(children[last]), NodeKind::Comment { .. }) {
            last -= 1;
        }
        let semicolon = self.raw_semicolon(id);

        for (i, &child) in children.iter().enumerate() {
            out.push_str(&self.raw(child, Some(Own::Before), Detect::Before));
            self.print(child, last != i || semicolon, out);
        }
    }

    // =======================================================================
    // Raw inference
    // =======================================================================

    fn tree_root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    fn raw(&self, id: NodeId, own: Option<Own>, detect: Detect) -> String {
        if let Some(value) = own.and_then(|own| own_raw(self.raws(id), own)) {
            return value.to_string();
        }

        let parent = self.parent(id);
        if detect == Detect::Before {
            match parent {
                None => return String::new(),
                Some(parent)
                    if matches!(self.kind(parent), NodeKind::Root)
                        && self.first_child(parent) == Some(id) =>
                {
                    return String::new();
                }
                Some(_) => {}
            }
        }
        if parent.is_none() {
            return detect.default_value().to_string();
        }

        let root = self.tree_root_of(id);
        let inferred = match detect {
            Detect::Before | Detect::After => Some(self.raw_before_after(id, detect)),
            Detect::BeforeDecl => Some(self.raw_before_decl(root, id)),
            Detect::BeforeRule => self.raw_before_rule(root),
            Detect::BeforeComment => Some(self.raw_before_comment(root, id)),
            Detect::BeforeClose => self.raw_before_close(root),
            Detect::BeforeOpen => self.first_raw(root, |kind, raws| {
                (!matches!(kind, NodeKind::Decl { .. }))
                    .then(|| raws.between.clone())
                    .flatten()
            }),
            Detect::Colon => self.first_raw(root, |kind, raws| match kind {
                NodeKind::Decl { .. } => raws
                    .between
                    .as_deref()
                    .map(|between| between.chars().filter(|c| c.is_whitespace() || *c == ':').collect()),
                _ => None,
            }),
            Detect::Indent => self.raw_indent(root),
            Detect::EmptyBody => self.raw_empty_body(root),
            Detect::CommentLeft => self.first_raw(root, |_, raws| raws.left.clone()),
            Detect::CommentRight => self.first_raw(root, |_, raws| raws.right.clone()),
        };

        inferred.unwrap_or_else(|| detect.default_value().to_string())
    }

    /// First value produced by `pick` over the descendants of `root`
    fn first_raw<F>(&self, root: NodeId, mut pick: F) -> Option<String>
    where
        F: FnMut(&NodeKind, &Raws) -> Option<String>,
    {
        self.descendants(root).into_iter().find_map(|id| {
            let node = self.node(id);
            pick(&node.kind, &node.raws)
        })
    }

    fn raw_before_after(&self, id: NodeId, detect: Detect) -> String {
        let mut value = match self.kind(id) {
            NodeKind::Decl { .. } => self.raw(id, None, Detect::BeforeDecl),
            NodeKind::Comment { .. } => self.raw(id, None, Detect::BeforeComment),
            _ if detect == Detect::Before => self.raw(id, None, Detect::BeforeRule),
            _ => self.raw(id, None, Detect::BeforeClose),
        };

        if value.contains('\n') {
            let indent = self.raw(id, None, Detect::Indent);
            for _ in 0..self.depth(id) {
                value.push_str(&indent);
            }
        }
        value
    }

    fn raw_before_decl(&self, root: NodeId, id: NodeId) -> String {
        let found = self.first_raw(root, |kind, raws| match kind {
            NodeKind::Decl { .. } => raws.before.as_deref().map(|before| {
                if before.contains('\n') {
                    strip_trailing_line(before)
                } else {
                    before.to_string()
                }
            }),
            _ => None,
        });
        match found {
            Some(value) => only_whitespace(&value),
            None => self.raw(id, None, Detect::BeforeRule),
        }
    }

    fn raw_before_rule(&self, root: NodeId) -> Option<String> {
        let root_first = self.first_child(root);
        self.descendants(root)
            .into_iter()
            .find_map(|id| {
                let node = self.node(id);
                let counts = !node.children.is_empty()
                    && (node.parent != Some(root) || root_first != Some(id));
                if !counts {
                    return None;
                }
                node.raws.before.as_deref().map(|before| {
                    if before.contains('\n') {
                        strip_trailing_line(before)
                    } else {
                        before.to_string()
                    }
                })
            })
            .map(|value| only_whitespace(&value))
    }

    fn raw_before_comment(&self, root: NodeId, id: NodeId) -> String {
        let found = self.first_raw(root, |kind, raws| match kind {
            NodeKind::Comment { .. } => raws.before.as_deref().map(|before| {
                if before.contains('\n') {
                    strip_trailing_line(before)
                } else {
                    before.to_string()
                }
            }),
            _ => None,
        });
        match found {
            Some(value) => only_whitespace(&value),
            None => self.raw(id, None, Detect::BeforeDecl),
        }
    }

    fn raw_before_close(&self, root: NodeId) -> Option<String> {
        self.descendants(root)
            .into_iter()
            .find_map(|id| {
                let node = self.node(id);
                if node.children.is_empty() {
                    return None;
                }
                node.raws.after.as_deref().map(|after| {
                    if after.contains('\n') {
                        strip_trailing_line(after)
                    } else {
                        after.to_string()
                    }
                })
            })
            .map(|value| only_whitespace(&value))
    }

    fn raw_indent(&self, root: NodeId) -> Option<String> {
        self.descendants(root).into_iter().find_map(|id| {
            let parent = self.parent(id)?;
            if parent == root || self.parent(parent) != Some(root) {
                return None;
            }
            let before = self.raws(id).before.as_deref()?;
            let last_line = before.rsplit('\n').next().unwrap_or_default();
            Some(only_whitespace(last_line))
        })
    }

    fn raw_empty_body(&self, root: NodeId) -> Option<String> {
        self.descendants(root).into_iter().find_map(|id| {
            let node = self.node(id);
            if node.kind.is_container() && node.children.is_empty() {
                node.raws.after.clone()
            } else {
                None
            }
        })
    }

    fn raw_semicolon(&self, id: NodeId) -> bool {
        if let Some(semicolon) = self.raws(id).semicolon {
            return semicolon;
        }
        let root = self.tree_root_of(id);
        self.descendants(root)
            .into_iter()
            .find_map(|candidate| {
                let node = self.node(candidate);
                let last = *node.children.last()?;
                if matches!(self.kind(last), NodeKind::Decl { .. }) {
                    node.raws.semicolon
                } else {
                    None
                }
            })
            .unwrap_or(false)
    }
}
