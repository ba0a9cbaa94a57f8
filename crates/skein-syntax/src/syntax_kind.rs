#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACE,
    RIGHT_BRACE,
    COMMA,
    EQ,
    DOT,

    FUN_KW,
    IF_KW,
    ELSE_KW,
    LOOP_KW,
    VAL_KW,
    WHILE_KW,
    TRUE_KW,
    FALSE_KW,
    NAME,

    INT_NUMBER,
    FLOAT_NUMBER,
    BINARY_OPERATOR,
    POSTFIX_OPERATOR,
    PREFIX_OPERATOR,

    OPEN_QUOTE,
    CLOSING_QUOTE,
    REGULAR_STRING_PART,
    ESCAPE_SEQUENCE,
    SHORT_TEMPLATE_ENTRY_START,
    LONG_TEMPLATE_ENTRY_START,
    LONG_TEMPLATE_ENTRY_END,

    WHITESPACE,
    NEWLINE,
    LINE_COMMENT,

    UNKNOWN,
    EOF,

    MODULE,
    EXPR_FRAGMENT,
    FUN_DECL,
    PARAM_LIST,
    STMT_LIST,
    VAL_STMT,
    EXPR_STMT,
    LITERAL,
    IDENT,
    BINARY_EXPR,
    POSTFIX_EXPR,
    PREFIX_EXPR,
    PAREN_EXPR,
    CALL_EXPR,
    ARG_LIST,
    FIELD_EXPR,
    IF_EXPR,
    LOOP_EXPR,
    WHILE_EXPR,

    STRING_TEMPLATE,
    LITERAL_STRING_TEMPLATE_ENTRY,
    ESCAPE_STRING_TEMPLATE_ENTRY,
    SHORT_STRING_TEMPLATE_ENTRY,
    LONG_STRING_TEMPLATE_ENTRY,

    ERROR,
    TOMBSTONE,
}

impl SyntaxKind {
    /// Whitespace, line breaks and comments.
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::NEWLINE | Self::LINE_COMMENT)
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::FUN_KW
                | Self::IF_KW
                | Self::ELSE_KW
                | Self::LOOP_KW
                | Self::VAL_KW
                | Self::WHILE_KW
                | Self::TRUE_KW
                | Self::FALSE_KW
        )
    }
}
