//! Arena storage for the syntax tree and the structural edits it supports.
//!
//! Nodes and tokens live in two `la_arena` arenas and refer to each other by
//! index. Child lists are index sequences, so replacing a subtree is a swap of
//! one slot in the parent's list. Ranges and the concatenated text are derived
//! data and are recomputed after every edit.
//!
//! Edits never free arena slots: detached subtrees stay allocated, with empty
//! ranges, until [`SyntaxTree::compact`] rebuilds the arenas.

use std::fmt;
use std::ops::Range;

use la_arena::{Arena, Idx};
use text_size::{TextRange, TextSize};

use crate::{NodeOrToken, SyntaxKind, SyntaxNode, SyntaxToken};

pub type NodeId = Idx<NodeData>;
pub type TokenId = Idx<TokenData>;
pub type ElementId = NodeOrToken<NodeId, TokenId>;

/// Raw node stored in the tree arena.
#[derive(Clone)]
pub struct NodeData {
    pub(crate) kind: SyntaxKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<ElementId>,
    pub(crate) range: TextRange,
}

/// Raw token stored in the tree arena. Tokens own their text.
#[derive(Clone)]
pub struct TokenData {
    pub(crate) kind: SyntaxKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) text: Box<str>,
    pub(crate) range: TextRange,
}

/// Owned, editable syntax tree for a single source text.
#[derive(Clone)]
pub struct SyntaxTree {
    pub(crate) nodes: Arena<NodeData>,
    pub(crate) tokens: Arena<TokenData>,
    pub(crate) root: NodeId,
    pub(crate) text: String,
}

impl SyntaxTree {
    /// Returns the root syntax node.
    #[inline]
    pub fn root(&self) -> SyntaxNode<'_> {
        self.node(self.root)
    }

    /// Returns the full text currently spelled by the tree.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> SyntaxNode<'_> {
        SyntaxNode { tree: self, id }
    }

    #[inline]
    pub fn token(&self, id: TokenId) -> SyntaxToken<'_> {
        SyntaxToken { tree: self, id }
    }

    /// Returns the parent of `element`, `None` for the root and for detached
    /// elements.
    pub fn parent_of(&self, element: ElementId) -> Option<NodeId> {
        match element {
            NodeOrToken::Node(node) => self.nodes[node].parent,
            NodeOrToken::Token(token) => self.tokens[token].parent,
        }
    }

    /// Returns the parent of `element` and the element's index in its child list.
    pub(crate) fn position_in_parent(&self, element: ElementId) -> Option<(NodeId, usize)> {
        let parent = self.parent_of(element)?;
        let index = self.nodes[parent].children.iter().position(|&child| child == element)?;
        Some((parent, index))
    }

    /// Returns `true` if `node` is reachable from the root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        std::iter::successors(Some(node), |&node| self.nodes[node].parent)
            .last()
            .is_some_and(|top| top == self.root)
    }

    /// Copies `source_node` (and its subtree) out of `source` and puts it where
    /// `target` is. `target` is detached and the id of the copy is returned.
    /// The detached subtree keeps its ids but spells no text.
    ///
    /// Replacing the root makes the copy the new root.
    pub fn replace_node(
        &mut self,
        target: NodeId,
        source: &SyntaxTree,
        source_node: NodeId,
    ) -> NodeId {
        let parent = self.nodes[target].parent;
        let NodeOrToken::Node(new_node) =
            self.graft(source, NodeOrToken::Node(source_node), parent)
        else {
            unreachable!("grafting a node yields a node")
        };

        match self.position_in_parent(NodeOrToken::Node(target)) {
            Some((parent, index)) => self.nodes[parent].children[index] = NodeOrToken::Node(new_node),
            None => self.root = new_node,
        }
        self.detach(NodeOrToken::Node(target));

        self.relayout();
        new_node
    }

    /// Replaces the children of `parent` at `range` with copies of
    /// `replacement`, which are elements of `source`. Children outside `range`
    /// keep their ids.
    ///
    /// Returns the ids of the inserted copies.
    #[track_caller]
    pub fn splice_children(
        &mut self,
        parent: NodeId,
        range: Range<usize>,
        source: &SyntaxTree,
        replacement: &[ElementId],
    ) -> Vec<ElementId> {
        assert!(
            range.start <= range.end && range.end <= self.nodes[parent].children.len(),
            "child range {range:?} is out of bounds"
        );

        let inserted = replacement
            .iter()
            .map(|&element| self.graft(source, element, Some(parent)))
            .collect::<Vec<_>>();

        let removed = self.nodes[parent]
            .children
            .splice(range, inserted.iter().copied())
            .collect::<Vec<_>>();
        for element in removed {
            self.detach(element);
        }

        self.relayout();
        inserted
    }

    /// Rebuilds the arenas from the root, dropping every detached element.
    ///
    /// Every `NodeId` and `TokenId` handed out before is invalidated.
    pub fn compact(&mut self) {
        let mut live = Self {
            nodes: Arena::new(),
            tokens: Arena::new(),
            root: self.root,
            text: String::new(),
        };
        let NodeOrToken::Node(root) = live.graft(self, NodeOrToken::Node(self.root), None) else {
            unreachable!("grafting a node yields a node")
        };
        live.root = root;
        live.text = std::mem::take(&mut self.text);
        *self = live;
    }

    fn detach(&mut self, element: ElementId) {
        match element {
            NodeOrToken::Node(node) => self.nodes[node].parent = None,
            NodeOrToken::Token(token) => self.tokens[token].parent = None,
        }
        self.clear_ranges(element);
    }

    /// Empties the ranges of a subtree that is no longer laid out.
    fn clear_ranges(&mut self, element: ElementId) {
        let empty = TextRange::empty(TextSize::new(0));
        match element {
            NodeOrToken::Token(token) => self.tokens[token].range = empty,
            NodeOrToken::Node(node) => {
                self.nodes[node].range = empty;
                for index in 0..self.nodes[node].children.len() {
                    let child = self.nodes[node].children[index];
                    self.clear_ranges(child);
                }
            }
        }
    }

    /// Deep-copies `element` of `source` into this tree's arenas.
    fn graft(
        &mut self,
        source: &SyntaxTree,
        element: ElementId,
        parent: Option<NodeId>,
    ) -> ElementId {
        match element {
            NodeOrToken::Token(token) => {
                let data = &source.tokens[token];
                NodeOrToken::Token(self.tokens.alloc(TokenData {
                    kind: data.kind,
                    parent,
                    text: data.text.clone(),
                    range: data.range,
                }))
            }
            NodeOrToken::Node(node) => {
                let data = &source.nodes[node];
                let id = self.nodes.alloc(NodeData {
                    kind: data.kind,
                    parent,
                    children: Vec::with_capacity(data.children.len()),
                    range: data.range,
                });
                for &child in &data.children {
                    let child = self.graft(source, child, Some(id));
                    self.nodes[id].children.push(child);
                }
                NodeOrToken::Node(id)
            }
        }
    }

    /// Recomputes every range and the concatenated text, walking from the root.
    pub(crate) fn relayout(&mut self) {
        let mut text = String::with_capacity(self.text.len());
        self.layout_node(self.root, &mut text);
        self.text = text;
    }

    fn layout_node(&mut self, node: NodeId, text: &mut String) {
        let start = TextSize::of(text.as_str());

        for index in 0..self.nodes[node].children.len() {
            match self.nodes[node].children[index] {
                NodeOrToken::Token(token) => {
                    let token_start = TextSize::of(text.as_str());
                    text.push_str(&self.tokens[token].text);
                    self.tokens[token].range =
                        TextRange::new(token_start, TextSize::of(text.as_str()));
                }
                NodeOrToken::Node(child) => self.layout_node(child, text),
            }
        }

        self.nodes[node].range = TextRange::new(start, TextSize::of(text.as_str()));
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("nodes", &self.nodes.len())
            .field("tokens", &self.tokens.len())
            .field("text_len", &self.text.len())
            .finish_non_exhaustive()
    }
}
