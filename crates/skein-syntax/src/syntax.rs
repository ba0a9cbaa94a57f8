//! Borrowed handles for navigating a `SyntaxTree`.

use std::fmt;

use text_size::{TextRange, TextSize};

use crate::tree::{ElementId, NodeId, SyntaxTree, TokenId};
use crate::SyntaxKind;

/// Node handle tied to the lifetime of the tree.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'a> {
    pub(crate) tree: &'a SyntaxTree,
    pub(crate) id: NodeId,
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.tree, other.tree)
    }
}

impl Eq for SyntaxNode<'_> {}

impl<'a> SyntaxNode<'a> {
    #[inline]
    pub fn id(self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn tree(self) -> &'a SyntaxTree {
        self.tree
    }

    /// Returns this node's kind.
    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.tree.nodes[self.id].kind
    }

    /// Returns the text range covered by this node.
    #[inline]
    pub fn text_range(self) -> TextRange {
        self.tree.nodes[self.id].range
    }

    /// Returns the text covered by this node.
    #[inline]
    pub fn text(self) -> &'a str {
        &self.tree.text[self.text_range()]
    }

    /// Returns the parent node if any.
    #[inline]
    pub fn parent(self) -> Option<Self> {
        Some(Self { tree: self.tree, id: self.tree.nodes[self.id].parent? })
    }

    /// Returns an iterator of ancestors starting from this node.
    #[inline]
    pub fn ancestors(self) -> impl Iterator<Item = SyntaxNode<'a>> + Clone {
        std::iter::successors(Some(self), |it| it.parent())
    }

    /// Iterates children including tokens.
    #[inline]
    pub fn children_with_tokens(self) -> ChildrenWithTokens<'a> {
        ChildrenWithTokens { tree: self.tree, children: self.tree.nodes[self.id].children.iter() }
    }

    /// Iterates child nodes, skipping tokens.
    #[inline]
    pub fn children(self) -> impl DoubleEndedIterator<Item = SyntaxNode<'a>> + Clone {
        self.children_with_tokens().filter_map(NodeOrToken::into_node)
    }

    #[inline]
    pub fn first_child_or_token(self) -> Option<SyntaxElement<'a>> {
        self.children_with_tokens().next()
    }

    #[inline]
    pub fn last_child_or_token(self) -> Option<SyntaxElement<'a>> {
        self.children_with_tokens().next_back()
    }

    #[inline]
    pub fn next_sibling_or_token(self) -> Option<SyntaxElement<'a>> {
        sibling(self.tree, NodeOrToken::Node(self.id), 1)
    }

    #[inline]
    pub fn prev_sibling_or_token(self) -> Option<SyntaxElement<'a>> {
        sibling(self.tree, NodeOrToken::Node(self.id), -1)
    }

    /// Returns a preorder iterator over nodes.
    #[inline]
    pub fn preorder(self) -> Preorder<'a> {
        Preorder { inner: PreorderWithTokens::new(self) }
    }

    /// Returns a preorder iterator over nodes and tokens.
    #[inline]
    pub fn preorder_with_tokens(self) -> PreorderWithTokens<'a> {
        PreorderWithTokens::new(self)
    }

    /// Iterates this node and all nodes below it in preorder.
    pub fn descendants(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        self.preorder().filter_map(|event| match event {
            WalkEvent::Enter(node) => Some(node),
            WalkEvent::Leave(_) => None,
        })
    }
}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            return write!(f, "{:?}@{:?}", self.kind(), self.text_range());
        }

        let mut level = 0;
        for event in self.preorder_with_tokens() {
            match event {
                WalkEventWithTokens::EnterNode(node) => {
                    writeln!(f, "{:indent$}{:?}", "", node, indent = level * 2)?;
                    level += 1;
                }
                WalkEventWithTokens::LeaveNode(_) => level -= 1,
                WalkEventWithTokens::Token(token) => {
                    writeln!(f, "{:indent$}{:?}", "", token, indent = level * 2)?;
                }
            }
        }
        Ok(())
    }
}

/// Token handle tied to the lifetime of the tree.
#[derive(Clone, Copy)]
pub struct SyntaxToken<'a> {
    pub(crate) tree: &'a SyntaxTree,
    pub(crate) id: TokenId,
}

impl PartialEq for SyntaxToken<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.tree, other.tree)
    }
}

impl Eq for SyntaxToken<'_> {}

impl<'a> SyntaxToken<'a> {
    #[inline]
    pub fn id(self) -> TokenId {
        self.id
    }

    /// Returns this token's kind.
    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.tree.tokens[self.id].kind
    }

    /// Returns `true` if this token is trivia.
    #[inline]
    pub fn is_trivia(self) -> bool {
        self.kind().is_trivia()
    }

    #[inline]
    pub fn text_range(self) -> TextRange {
        self.tree.tokens[self.id].range
    }

    #[inline]
    pub fn text(self) -> &'a str {
        &self.tree.tokens[self.id].text
    }

    /// Returns the parent node, `None` once the token has been detached.
    #[inline]
    pub fn parent(self) -> Option<SyntaxNode<'a>> {
        Some(SyntaxNode { tree: self.tree, id: self.tree.tokens[self.id].parent? })
    }

    #[inline]
    pub fn next_sibling_or_token(self) -> Option<SyntaxElement<'a>> {
        sibling(self.tree, NodeOrToken::Token(self.id), 1)
    }

    #[inline]
    pub fn prev_sibling_or_token(self) -> Option<SyntaxElement<'a>> {
        sibling(self.tree, NodeOrToken::Token(self.id), -1)
    }
}

impl fmt::Debug for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?} {:?}", self.kind(), self.text_range(), self.text())
    }
}

/// Node or token element inside the tree.
pub type SyntaxElement<'a> = NodeOrToken<SyntaxNode<'a>, SyntaxToken<'a>>;

impl<'a> SyntaxElement<'a> {
    #[inline]
    pub fn kind(self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    #[inline]
    pub fn text_range(self) -> TextRange {
        match self {
            NodeOrToken::Node(node) => node.text_range(),
            NodeOrToken::Token(token) => token.text_range(),
        }
    }

    #[inline]
    pub fn id(self) -> ElementId {
        match self {
            NodeOrToken::Node(node) => NodeOrToken::Node(node.id),
            NodeOrToken::Token(token) => NodeOrToken::Token(token.id),
        }
    }

    #[inline]
    pub fn next_sibling_or_token(self) -> Option<Self> {
        match self {
            NodeOrToken::Node(node) => node.next_sibling_or_token(),
            NodeOrToken::Token(token) => token.next_sibling_or_token(),
        }
    }

    #[inline]
    pub fn prev_sibling_or_token(self) -> Option<Self> {
        match self {
            NodeOrToken::Node(node) => node.prev_sibling_or_token(),
            NodeOrToken::Token(token) => token.prev_sibling_or_token(),
        }
    }
}

fn sibling(tree: &SyntaxTree, element: ElementId, delta: isize) -> Option<SyntaxElement<'_>> {
    let (parent, index) = tree.position_in_parent(element)?;
    let index = index.checked_add_signed(delta)?;
    let child = *tree.nodes[parent].children.get(index)?;
    Some(element_handle(tree, child))
}

#[inline]
fn element_handle(tree: &SyntaxTree, element: ElementId) -> SyntaxElement<'_> {
    match element {
        NodeOrToken::Node(id) => NodeOrToken::Node(SyntaxNode { tree, id }),
        NodeOrToken::Token(id) => NodeOrToken::Token(SyntaxToken { tree, id }),
    }
}

/// Iterator over children including tokens.
#[derive(Clone)]
pub struct ChildrenWithTokens<'a> {
    tree: &'a SyntaxTree,
    children: std::slice::Iter<'a, ElementId>,
}

impl<'a> Iterator for ChildrenWithTokens<'a> {
    type Item = SyntaxElement<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.children.next().map(|&child| element_handle(self.tree, child))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.children.size_hint()
    }
}

impl DoubleEndedIterator for ChildrenWithTokens<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.children.next_back().map(|&child| element_handle(self.tree, child))
    }
}

impl ExactSizeIterator for ChildrenWithTokens<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.children.len()
    }
}

/// Preorder traversal over nodes.
#[derive(Clone)]
pub struct Preorder<'a> {
    inner: PreorderWithTokens<'a>,
}

impl Preorder<'_> {
    /// Skips the current subtree during traversal.
    #[inline]
    pub fn skip_subtree(&mut self) {
        self.inner.skip_subtree();
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = WalkEvent<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|item| match item {
            WalkEventWithTokens::EnterNode(it) => Some(WalkEvent::Enter(it)),
            WalkEventWithTokens::LeaveNode(it) => Some(WalkEvent::Leave(it)),
            WalkEventWithTokens::Token(_) => None,
        })
    }
}

/// Preorder walk event for nodes.
#[derive(Clone, Copy, Debug)]
pub enum WalkEvent<'a> {
    Enter(SyntaxNode<'a>),
    Leave(SyntaxNode<'a>),
}

/// Preorder traversal over nodes and tokens.
#[derive(Clone)]
pub struct PreorderWithTokens<'a> {
    stack: Vec<(SyntaxNode<'a>, ChildrenWithTokens<'a>)>,
    root: Option<SyntaxNode<'a>>,
}

impl<'a> PreorderWithTokens<'a> {
    #[inline]
    fn new(start: SyntaxNode<'a>) -> Self {
        Self { stack: Vec::with_capacity(32), root: Some(start) }
    }

    /// Skips the current subtree during traversal.
    #[inline]
    pub fn skip_subtree(&mut self) {
        assert!(self.stack.pop().is_some(), "must have a subtree to skip");
    }
}

impl<'a> Iterator for PreorderWithTokens<'a> {
    type Item = WalkEventWithTokens<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let Some((_, active_node)) = self.stack.last_mut() else {
            let root = self.root.take()?;
            self.stack.push((root, root.children_with_tokens()));
            return Some(WalkEventWithTokens::EnterNode(root));
        };
        match active_node.next() {
            Some(NodeOrToken::Node(child)) => {
                self.stack.push((child, child.children_with_tokens()));
                Some(WalkEventWithTokens::EnterNode(child))
            }
            Some(NodeOrToken::Token(child)) => Some(WalkEventWithTokens::Token(child)),
            None => {
                let (exited_node, _) = self.stack.pop()?;
                Some(WalkEventWithTokens::LeaveNode(exited_node))
            }
        }
    }
}

/// Preorder walk event including tokens.
#[derive(Clone, Copy, Debug)]
pub enum WalkEventWithTokens<'a> {
    EnterNode(SyntaxNode<'a>),
    LeaveNode(SyntaxNode<'a>),
    Token(SyntaxToken<'a>),
}

/// Node-or-token wrapper used throughout the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeOrToken<N, T> {
    Node(N),
    Token(T),
}

impl<N, T> NodeOrToken<N, T> {
    /// Converts into the node variant, if any.
    pub fn into_node(self) -> Option<N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    /// Converts into the token variant, if any.
    pub fn into_token(self) -> Option<T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }

    pub fn as_node(&self) -> Option<&N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }
}

/// Returns the deepest node of `kind` whose range contains `offset`
/// (inclusive of the end).
pub fn find_node_at_offset(
    root: SyntaxNode<'_>,
    kind: SyntaxKind,
    offset: TextSize,
) -> Option<SyntaxNode<'_>> {
    root.descendants()
        .filter(|node| node.kind() == kind && node.text_range().contains_inclusive(offset))
        .last()
}
