//! Stylesheet tree operations.
//!
//! The [`Stylesheet`] owns every node in a flat arena and provides the
//! tree-manipulation methods that keep parent/child links consistent.
//! Detached nodes stay in the arena, so a [`NodeId`] never dangles.

use crate::ast::{Node, NodeId, NodeKind, NodeType, Raws, SourceSpan};
use crate::list;

/// Iteration state of one container during [`Stylesheet::walk_mut`].
#[derive(Debug, Clone, Copy)]
struct Cursor {
    container: NodeId,
    /// Index of the next child to visit
    next: usize,
}

/// A parsed (or synthesized) stylesheet.
#[derive(Debug, Clone)]
pub struct Stylesheet {
    nodes: Vec<Node>,
    root: NodeId,
    cursors: Vec<Cursor>,
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Stylesheet {
    /// Create a stylesheet holding an empty root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Root)],
            root: NodeId(0),
            cursors: Vec::new(),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    #[inline]
    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.node(id).node_type()
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    #[inline]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    #[inline]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    #[inline]
    pub fn raws(&self, id: NodeId) -> &Raws {
        &self.node(id).raws
    }

    #[inline]
    pub fn raws_mut(&mut self, id: NodeId) -> &mut Raws {
        &mut self.node_mut(id).raws
    }

    #[inline]
    pub fn source(&self, id: NodeId) -> Option<SourceSpan> {
        self.node(id).source
    }

    /// Position of `id` inside its parent's child list
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }

    /// Previous sibling, `None` for first children and detached nodes
    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_of(id)?;
        index
            .checked_sub(1)
            .map(|prev| self.children(parent)[prev])
    }

    /// Next sibling, `None` for last children and detached nodes
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_of(id)?;
        self.children(parent).get(index + 1).copied()
    }

    /// Depth below the root (root children are at depth 0)
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            if parent == self.root {
                break;
            }
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }

    // =======================================================================
    // Node creation
    // =======================================================================

    /// Allocate a detached node.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        self.alloc(Node::new(kind))
    }

    pub fn create_rule(&mut self, selector: impl Into<String>) -> NodeId {
        self.create(NodeKind::Rule {
            selector: selector.into(),
        })
    }

    /// Create an at-rule with a block.
    pub fn create_at_rule(&mut self, name: impl Into<String>, params: impl Into<String>) -> NodeId {
        self.create(NodeKind::AtRule {
            name: name.into(),
            params: params.into(),
            has_block: true,
        })
    }

    pub fn create_decl(&mut self, prop: impl Into<String>, value: impl Into<String>) -> NodeId {
        self.create(NodeKind::Decl {
            prop: prop.into(),
            value: value.into(),
            important: false,
        })
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.create(NodeKind::Comment { text: text.into() })
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Deep copy of `id` and its subtree. The copy is detached.
    pub fn clone_node(&mut self, id: NodeId) -> NodeId {
        let copy = self.clone_empty(id);
        let children = self.children(id).to_vec();
        for child in children {
            let child_copy = self.clone_node(child);
            self.node_mut(child_copy).parent = Some(copy);
            self.node_mut(copy).children.push(child_copy);
        }
        copy
    }

    /// Copy of `id` without its children. The copy is detached.
    pub fn clone_empty(&mut self, id: NodeId) -> NodeId {
        let original = self.node(id);
        let node = Node {
            kind: original.kind.clone(),
            parent: None,
            children: Vec::new(),
            raws: original.raws.clone(),
            source: original.source,
        };
        self.alloc(node)
    }

    // =======================================================================
    // Tree mutation
    // =======================================================================

    /// Append `child` as the last child of `parent`.
    ///
    /// If `child` already has a parent it is first removed from its current
    /// position. A child without a `before` raw borrows the whitespace of the
    /// previous last child.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(parent != child, "cannot append a node to itself");
        if self.parent(child).is_some() {
            self.remove(child);
        }

        if self.raws(child).before.is_none() {
            let sample = self
                .last_child(parent)
                .and_then(|last| self.raws(last).before.as_deref())
                .map(|before| before.chars().filter(|c| c.is_whitespace()).collect::<String>());
            if sample.is_some() {
                self.raws_mut(child).before = sample;
            }
        }

        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Detach `id` from its parent. No-op for detached nodes.
    ///
    /// Removing the first child of the root hands its `before` raw to the
    /// sibling that becomes first.
    pub fn remove(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let Some(index) = self.index_of(id) else {
            return;
        };

        if parent == self.root && index == 0 {
            if let Some(&next) = self.children(parent).get(1) {
                let before = self.raws(id).before.clone();
                self.raws_mut(next).before = before;
            }
        }

        self.node_mut(parent).children.remove(index);
        self.node_mut(id).parent = None;

        for cursor in &mut self.cursors {
            if cursor.container == parent && index < cursor.next {
                cursor.next -= 1;
            }
        }
    }

    /// Detach every child of `id`.
    pub fn remove_all(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.node_mut(child).parent = None;
        }
    }

    // =======================================================================
    // Selectors
    // =======================================================================

    /// Selector text of a rule
    #[inline]
    pub fn selector(&self, id: NodeId) -> Option<&str> {
        self.node(id).selector()
    }

    /// Selector list of a rule, split on top-level commas
    pub fn selectors(&self, id: NodeId) -> Option<Vec<String>> {
        self.selector(id).map(list::comma)
    }

    /// Replace the selector text of a rule. No-op for other nodes.
    pub fn set_selector(&mut self, id: NodeId, value: impl Into<String>) {
        if let NodeKind::Rule { selector } = &mut self.node_mut(id).kind {
            *selector = value.into();
        }
    }

    /// Replace the selector list of a rule.
    ///
    /// Entries are joined with the separator the current selector already
    /// uses, or with `,` followed by the rule's `between` whitespace.
    pub fn set_selectors<S: AsRef<str>>(&mut self, id: NodeId, values: &[S]) {
        let Some(current) = self.selector(id) else {
            return;
        };
        let separator = match current.find(',') {
            Some(comma) => {
                let rest = &current[comma + 1..];
                let spaces = rest.len() - rest.trim_start().len();
                current[comma..comma + 1 + spaces].to_string()
            }
            None => format!(",{}", self.raw_between_block(id)),
        };
        let joined = values
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(&separator);
        self.set_selector(id, joined);
    }

    // =======================================================================
    // Traversal
    // =======================================================================

    /// All descendants of `id` in document order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// Visit every descendant of the root, allowing the callback to mutate
    /// the tree.
    ///
    /// Removing a sibling at or before the node being visited does not make
    /// the walk skip the following node. After the callback returns, the
    /// current children of the visited node are walked, wherever that node
    /// lives by then.
    pub fn walk_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Stylesheet, NodeId),
    {
        let root = self.root;
        self.walk_container(root, &mut f);
    }

    fn walk_container<F>(&mut self, container: NodeId, f: &mut F)
    where
        F: FnMut(&mut Stylesheet, NodeId),
    {
        let slot = self.cursors.len();
        self.cursors.push(Cursor { container, next: 0 });

        loop {
            let index = self.cursors[slot].next;
            let Some(&child) = self.children(container).get(index) else {
                break;
            };
            self.cursors[slot].next = index + 1;

            f(self, child);
            if !self.children(child).is_empty() {
                self.walk_container(child, f);
            }
        }

        self.cursors.pop();
    }
}
