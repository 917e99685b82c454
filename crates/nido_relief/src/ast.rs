//! Stylesheet node types.
//!
//! Nodes live in the [`Stylesheet`](crate::Stylesheet) arena and refer to each
//! other through [`NodeId`]. Every node keeps the raw whitespace around it in
//! [`Raws`] so that serializing an untouched tree reproduces the input.

use serde::{Deserialize, Serialize};

/// Index of a node inside its stylesheet arena.
///
/// Ids stay valid after a node is detached; they are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Node type discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum NodeType {
    Root = 0,
    Rule = 1,
    AtRule = 2,
    Decl = 3,
    Comment = 4,
}

/// Source position in the stylesheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    /// Byte offset from start of file
    pub offset: u32,
    /// 1-indexed line number
    pub line: u32,
    /// 1-indexed column number
    pub column: u32,
}

impl Position {
    pub const fn new(offset: u32, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

/// Source span [start, end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct SourceSpan {
    pub start: Position,
    pub end: Position,
}

impl SourceSpan {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Raw formatting captured by the parser.
///
/// `None` means "not known"; the serializer infers a value from the rest of
/// the tree in that case.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Raws {
    /// Whitespace (and stray text) before the node
    pub before: Option<String>,
    /// Whitespace before the closing `}` of a container
    pub after: Option<String>,
    /// Rule/at-rule: text between the prelude and `{`.
    /// Decl: text between the property and the value, colon included.
    pub between: Option<String>,
    /// At-rule: text between the name and the params
    pub after_name: Option<String>,
    /// Container: whether the last declaration carries a `;`
    pub semicolon: Option<bool>,
    /// Decl: the exact `!important` text
    pub important: Option<String>,
    /// Comment: whitespace after `/*`
    pub left: Option<String>,
    /// Comment: whitespace before `*/`
    pub right: Option<String>,
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    Rule {
        selector: String,
    },
    AtRule {
        name: String,
        params: String,
        /// `false` for statements such as `@import "a.css";`
        has_block: bool,
    },
    Decl {
        prop: String,
        value: String,
        important: bool,
    },
    Comment {
        text: String,
    },
}

impl NodeKind {
    #[inline]
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Root => NodeType::Root,
            Self::Rule { .. } => NodeType::Rule,
            Self::AtRule { .. } => NodeType::AtRule,
            Self::Decl { .. } => NodeType::Decl,
            Self::Comment { .. } => NodeType::Comment,
        }
    }

    /// Whether the node can hold children
    #[inline]
    pub fn is_container(&self) -> bool {
        match self {
            Self::Root | Self::Rule { .. } => true,
            Self::AtRule { has_block, .. } => *has_block,
            Self::Decl { .. } | Self::Comment { .. } => false,
        }
    }

    /// Rules and at-rules, the nodes nesting operates on
    #[inline]
    pub fn is_rule_like(&self) -> bool {
        matches!(self, Self::Rule { .. } | Self::AtRule { .. })
    }
}

/// A node in the stylesheet arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub raws: Raws,
    pub source: Option<SourceSpan>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            raws: Raws::default(),
            source: None,
        }
    }

    #[inline]
    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// Selector text of a rule
    #[inline]
    pub fn selector(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Rule { selector } => Some(selector),
            _ => None,
        }
    }

    /// At-rule name, without the `@`
    #[inline]
    pub fn at_rule_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::AtRule { name, .. } => Some(name),
            _ => None,
        }
    }

    /// At-rule params
    #[inline]
    pub fn params(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::AtRule { params, .. } => Some(params),
            _ => None,
        }
    }
}
