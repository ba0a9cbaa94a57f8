//! Lossless, editable syntax tree with parent pointers.
//!
//! Nodes and tokens live in arenas owned by `SyntaxTree` and are navigated
//! through lightweight handles borrowing the tree. Whitespace and comments are
//! ordinary tokens, so the tree always spells its source text exactly.

/// Typed AST wrappers around the raw syntax tree.
pub mod ast;
mod builder;
mod syntax;
mod syntax_kind;
mod syntax_set;
mod tree;

#[cfg(test)]
mod tests;

/// Incremental builder for constructing a `SyntaxTree`.
pub use builder::Builder;
/// Primary syntax tree API types and adapters.
pub use syntax::{
    ChildrenWithTokens, NodeOrToken, Preorder, PreorderWithTokens, SyntaxElement, SyntaxNode,
    SyntaxToken, WalkEvent, WalkEventWithTokens, find_node_at_offset,
};
/// Token and node kinds used throughout the tree.
pub use syntax_kind::SyntaxKind;
/// Compact set for grouping `SyntaxKind` values.
pub use syntax_set::SyntaxSet;
/// Arena storage and structural edits.
pub use tree::{ElementId, NodeData, NodeId, SyntaxTree, TokenData, TokenId};
