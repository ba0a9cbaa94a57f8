use skein_syntax::SyntaxKind::*;
use skein_syntax::ast::{AstNode as _, StringTemplate, TemplateEntry};
use skein_syntax::{NodeId, SyntaxNode, SyntaxSet, SyntaxTree};

use crate::escaper::{StringTemplateEscaper, TextEscaper};
use crate::update::{self, UpdateError};

/// Entry kinds that may appear in a literal hosting an injection.
pub const INJECTABLE_ENTRIES: SyntaxSet =
    SyntaxSet::new([LITERAL_STRING_TEMPLATE_ENTRY, ESCAPE_STRING_TEMPLATE_ENTRY]);

/// A node able to host text in another language.
///
/// Implementors are plain node ids; every operation takes the tree it lives in.
pub trait InjectionHost: Copy {
    type Escaper<'t>: TextEscaper;

    /// Whether the node is an attached, closed literal made only of injectable
    /// entries.
    fn is_valid_host(self, tree: &SyntaxTree) -> bool;

    fn create_text_escaper(self, tree: &SyntaxTree) -> Self::Escaper<'_>;

    /// Rewrites the node from `text` and returns the node now standing in its
    /// place. On error the tree is left untouched.
    fn update_text(self, tree: &mut SyntaxTree, text: &str) -> Result<Self, UpdateError>;
}

/// Injection host backed by a `STRING_TEMPLATE` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StringTemplateHost(NodeId);

impl StringTemplateHost {
    pub fn cast(node: SyntaxNode<'_>) -> Option<Self> {
        StringTemplate::cast(node).map(|template| Self(template.syntax().id()))
    }

    pub fn node(self) -> NodeId {
        self.0
    }

    pub fn template(self, tree: &SyntaxTree) -> StringTemplate<'_> {
        match StringTemplate::cast(tree.node(self.0)) {
            Some(template) => template,
            None => panic!("{:?} is not a string template", tree.node(self.0)),
        }
    }

    /// The template's entries in source order.
    pub fn entries(self, tree: &SyntaxTree) -> impl Iterator<Item = TemplateEntry<'_>> {
        self.template(tree).entries()
    }
}

impl InjectionHost for StringTemplateHost {
    type Escaper<'t> = StringTemplateEscaper<'t>;

    fn is_valid_host(self, tree: &SyntaxTree) -> bool {
        if !tree.is_attached(self.0) {
            return false;
        }

        for child in tree.node(self.0).children_with_tokens().skip(1) {
            match child.kind() {
                CLOSING_QUOTE => return true,
                kind if !INJECTABLE_ENTRIES.contains(kind) => return false,
                _ => {}
            }
        }
        false
    }

    fn create_text_escaper(self, tree: &SyntaxTree) -> StringTemplateEscaper<'_> {
        StringTemplateEscaper::new(self.template(tree))
    }

    fn update_text(self, tree: &mut SyntaxTree, text: &str) -> Result<Self, UpdateError> {
        update::update_string_template(self, tree, text).map(Self)
    }
}

/// Every node kind that can host an injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Host {
    StringTemplate(StringTemplateHost),
}

impl Host {
    pub fn cast(node: SyntaxNode<'_>) -> Option<Self> {
        match node.kind() {
            STRING_TEMPLATE => StringTemplateHost::cast(node).map(Host::StringTemplate),
            _ => None,
        }
    }

    pub fn node(self) -> NodeId {
        match self {
            Host::StringTemplate(host) => host.node(),
        }
    }
}

impl InjectionHost for Host {
    type Escaper<'t> = StringTemplateEscaper<'t>;

    fn is_valid_host(self, tree: &SyntaxTree) -> bool {
        match self {
            Host::StringTemplate(host) => host.is_valid_host(tree),
        }
    }

    fn create_text_escaper(self, tree: &SyntaxTree) -> Self::Escaper<'_> {
        match self {
            Host::StringTemplate(host) => host.create_text_escaper(tree),
        }
    }

    fn update_text(self, tree: &mut SyntaxTree, text: &str) -> Result<Self, UpdateError> {
        match self {
            Host::StringTemplate(host) => host.update_text(tree, text).map(Host::StringTemplate),
        }
    }
}
