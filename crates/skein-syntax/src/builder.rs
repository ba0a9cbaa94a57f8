//! Incremental builder for the syntax tree.

use la_arena::Arena;
use text_size::{TextRange, TextSize};

use crate::tree::{NodeData, NodeId, TokenData};
use crate::{NodeOrToken, SyntaxKind, SyntaxTree};

const DEFAULT_TREE_DEPTH: usize = 64;

/// Builds a `SyntaxTree` over `text` from start/token/finish calls.
///
/// Tokens consume `text` front to back; every byte must end up in exactly
/// one token by the time `finish` is called.
pub struct Builder<'t> {
    nodes: Arena<NodeData>,
    tokens: Arena<TokenData>,
    text: &'t str,
    opened: Vec<NodeId>,
    root: Option<NodeId>,
    text_len: TextSize,
}

impl Drop for Builder<'_> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.opened.is_empty() {
            panic!("you should call `Builder::finish()`");
        }
    }
}

impl<'t> Builder<'t> {
    pub fn new(text: &'t str) -> Self {
        Self {
            nodes: Arena::default(),
            tokens: Arena::default(),
            text,
            opened: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            root: None,
            text_len: TextSize::new(0),
        }
    }

    /// Starts a new node of the given kind.
    #[track_caller]
    pub fn start_node(&mut self, kind: SyntaxKind) {
        let parent = self.opened.last().copied();
        assert!(parent.is_some() || self.root.is_none(), "a tree has exactly one root");

        let node = self.nodes.alloc(NodeData {
            kind,
            parent,
            children: Vec::new(),
            range: TextRange::empty(self.text_len),
        });
        match parent {
            Some(parent) => self.nodes[parent].children.push(NodeOrToken::Node(node)),
            None => self.root = Some(node),
        }
        self.opened.push(node);
    }

    /// Finishes the most recently started node.
    #[track_caller]
    pub fn finish_node(&mut self) {
        let node = self.opened.pop().expect("no opened nodes?");
        let start = self.nodes[node].range.start();
        self.nodes[node].range = TextRange::new(start, self.text_len);
    }

    /// Adds a token covering the next `len` bytes of the text.
    #[track_caller]
    pub fn token(&mut self, kind: SyntaxKind, len: TextSize) {
        let parent = *self.opened.last().expect("tokens must be inside a node");
        let range = TextRange::at(self.text_len, len);
        assert!(self.text.is_char_boundary(usize::from(range.end())));

        let token = self.tokens.alloc(TokenData {
            kind,
            parent: Some(parent),
            text: self.text[range].into(),
            range,
        });
        self.nodes[parent].children.push(NodeOrToken::Token(token));
        self.text_len = range.end();
    }

    /// Finishes building and returns the tree.
    #[track_caller]
    pub fn finish(mut self) -> SyntaxTree {
        assert!(self.opened.is_empty(), "unfinished nodes");
        let root = self.root.expect("empty tree");
        debug_assert_eq!(usize::from(self.text_len), self.text.len(), "text not fully consumed");

        let mut tree = SyntaxTree {
            nodes: std::mem::take(&mut self.nodes),
            tokens: std::mem::take(&mut self.tokens),
            root,
            text: self.text.to_owned(),
        };
        tree.relayout();
        tree
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;
    use crate::SyntaxKind::*;

    fn build() -> SyntaxTree {
        let text = "x = \"a\"";
        let mut builder = Builder::new(text);
        builder.start_node(MODULE);
        builder.start_node(BINARY_EXPR);
        builder.start_node(IDENT);
        builder.token(NAME, 1.into());
        builder.finish_node();
        builder.token(WHITESPACE, 1.into());
        builder.token(BINARY_OPERATOR, 1.into());
        builder.token(WHITESPACE, 1.into());
        builder.start_node(STRING_TEMPLATE);
        builder.token(OPEN_QUOTE, 1.into());
        builder.start_node(LITERAL_STRING_TEMPLATE_ENTRY);
        builder.token(REGULAR_STRING_PART, 1.into());
        builder.finish_node();
        builder.token(CLOSING_QUOTE, 1.into());
        builder.finish_node();
        builder.finish_node();
        builder.finish_node();
        builder.finish()
    }

    #[test]
    fn builds_lossless_tree() {
        let tree = build();

        assert_eq!(tree.text(), "x = \"a\"");
        assert_eq!(tree.root().text(), tree.text());
        expect![[r#"
            MODULE@0..7
              BINARY_EXPR@0..7
                IDENT@0..1
                  NAME@0..1 "x"
                WHITESPACE@1..2 " "
                BINARY_OPERATOR@2..3 "="
                WHITESPACE@3..4 " "
                STRING_TEMPLATE@4..7
                  OPEN_QUOTE@4..5 "\""
                  LITERAL_STRING_TEMPLATE_ENTRY@5..6
                    REGULAR_STRING_PART@5..6 "a"
                  CLOSING_QUOTE@6..7 "\""
        "#]]
        .assert_eq(&format!("{:#?}", tree.root()));
    }

    #[test]
    fn empty_node_gets_empty_range() {
        let mut builder = Builder::new("a");
        builder.start_node(MODULE);
        builder.start_node(ERROR);
        builder.finish_node();
        builder.token(NAME, 1.into());
        builder.finish_node();
        let tree = build_and_check(builder);

        let error = tree.root().children().next().unwrap();
        assert_eq!(error.kind(), ERROR);
        assert_eq!(error.text_range(), TextRange::empty(0.into()));
    }

    fn build_and_check(builder: Builder<'_>) -> SyntaxTree {
        let tree = builder.finish();
        assert_eq!(tree.root().text(), tree.text());
        tree
    }

    #[test]
    #[should_panic(expected = "you should call `Builder::finish()`")]
    fn dropping_open_builder_panics() {
        let mut builder = Builder::new("");
        builder.start_node(MODULE);
        drop(builder);
    }
}
