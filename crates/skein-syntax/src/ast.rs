use crate::SyntaxKind::*;
use crate::{SyntaxKind, SyntaxNode, SyntaxToken};

pub trait AstNode<'a>: Sized {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self>;

    fn syntax(self) -> SyntaxNode<'a>;
}

/// String literal with optional template entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringTemplate<'a>(SyntaxNode<'a>);

impl<'a> AstNode<'a> for StringTemplate<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
        (syntax.kind() == STRING_TEMPLATE).then_some(Self(syntax))
    }

    fn syntax(self) -> SyntaxNode<'a> {
        self.0
    }
}

impl<'a> StringTemplate<'a> {
    pub fn open_quote(self) -> Option<SyntaxToken<'a>> {
        self.0.first_child_or_token()?.into_token().filter(|token| token.kind() == OPEN_QUOTE)
    }

    /// `None` for an unterminated literal.
    pub fn closing_quote(self) -> Option<SyntaxToken<'a>> {
        self.0.last_child_or_token()?.into_token().filter(|token| token.kind() == CLOSING_QUOTE)
    }

    /// Triple-quoted literals have no escapes.
    pub fn is_raw(self) -> bool {
        self.open_quote().is_some_and(|quote| quote.text() == "\"\"\"")
    }

    pub fn entries(self) -> impl Iterator<Item = TemplateEntry<'a>> + 'a {
        self.0.children().filter_map(TemplateEntry::cast)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateEntry<'a> {
    Literal(LiteralEntry<'a>),
    Escape(EscapeEntry<'a>),
    Short(ShortEntry<'a>),
    Long(LongEntry<'a>),
}

impl<'a> AstNode<'a> for TemplateEntry<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
        match syntax.kind() {
            LITERAL_STRING_TEMPLATE_ENTRY => Self::Literal(LiteralEntry(syntax)).into(),
            ESCAPE_STRING_TEMPLATE_ENTRY => Self::Escape(EscapeEntry(syntax)).into(),
            SHORT_STRING_TEMPLATE_ENTRY => Self::Short(ShortEntry(syntax)).into(),
            LONG_STRING_TEMPLATE_ENTRY => Self::Long(LongEntry(syntax)).into(),
            _ => None,
        }
    }

    fn syntax(self) -> SyntaxNode<'a> {
        match self {
            Self::Literal(entry) => entry.0,
            Self::Escape(entry) => entry.0,
            Self::Short(entry) => entry.0,
            Self::Long(entry) => entry.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralEntry<'a>(SyntaxNode<'a>);

impl<'a> LiteralEntry<'a> {
    pub fn text(self) -> &'a str {
        self.0.text()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapeEntry<'a>(SyntaxNode<'a>);

impl<'a> EscapeEntry<'a> {
    /// The escape as written, e.g. `\n` or `\u0041`.
    pub fn text(self) -> &'a str {
        self.0.text()
    }
}

/// `$name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortEntry<'a>(SyntaxNode<'a>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongEntry<'a>(SyntaxNode<'a>);

impl<'a> LongEntry<'a> {
    pub fn is_closed(self) -> bool {
        self.0
            .last_child_or_token()
            .is_some_and(|last| last.kind() == LONG_TEMPLATE_ENTRY_END)
    }
}

/// Returns `true` for node kinds produced by the expression grammar.
pub fn is_expr(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        LITERAL
            | IDENT
            | BINARY_EXPR
            | POSTFIX_EXPR
            | PREFIX_EXPR
            | PAREN_EXPR
            | CALL_EXPR
            | FIELD_EXPR
            | IF_EXPR
            | LOOP_EXPR
            | WHILE_EXPR
            | STRING_TEMPLATE
    )
}

