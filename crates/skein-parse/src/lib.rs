//! Error-tolerant recursive-descent parser producing `SyntaxTree`s.

use skein_errors::Diagnostic;
use skein_syntax::SyntaxKind::{EXPR_FRAGMENT, MODULE};
use skein_syntax::{NodeId, SyntaxTree, ast};

mod grammar;
mod parser;
#[cfg(test)]
mod tests;

/// A parsed tree together with the diagnostics reported while parsing it.
#[derive(Debug, Clone)]
pub struct Parse {
    tree: SyntaxTree,
    diagnostics: Vec<Diagnostic>,
}

impl Parse {
    fn new(parser: parser::Parser<'_>) -> Self {
        let (tree, diagnostics) = parser.build_tree();
        Self { tree, diagnostics }
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn into_tree(self) -> SyntaxTree {
        self.tree
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// The expression of a fragment parse.
    pub fn expr(&self) -> Option<NodeId> {
        let root = self.tree.root();
        if root.kind() != EXPR_FRAGMENT {
            return None;
        }
        root.children().find(|node| ast::is_expr(node.kind())).map(|node| node.id())
    }
}

/// Parses a sequence of statements and function declarations.
pub fn module(text: &str) -> Parse {
    let mut parser = parser::Parser::new(text);
    grammar::items::module(&mut parser);
    let parse = Parse::new(parser);
    debug_assert_eq!(parse.tree.root().kind(), MODULE);

    tracing::debug!(len = text.len(), diagnostics = parse.diagnostics.len(), "parsed module");
    parse
}

/// Parses `text` as a single expression, keeping whatever follows it as an
/// error node.
pub fn fragment(text: &str) -> Parse {
    let mut parser = parser::Parser::new(text);
    grammar::fragment(&mut parser);
    Parse::new(parser)
}

/// Parses `text` as exactly one expression.
///
/// Returns `None` when the text is not a single well-formed expression.
/// Leading and trailing trivia are allowed.
pub fn expression(text: &str) -> Option<Parse> {
    let parse = fragment(text);
    if !parse.diagnostics.is_empty() || parse.expr().is_none() {
        tracing::trace!(diagnostics = parse.diagnostics.len(), "not an expression");
        return None;
    }
    Some(parse)
}
