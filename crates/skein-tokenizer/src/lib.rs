//! Lazy lexer for skein source text.
//!
//! Tokens are produced on demand. String literals switch the lexer into a
//! string mode, and `${` inside a string switches back into code until the
//! matching `}`; the active modes are kept on a stack.

mod cursor;

use cursor::{Cursor, EOF_CHAR};
pub use skein_syntax::SyntaxKind;
use skein_syntax::SyntaxKind::*;
use text_size::{TextRange, TextSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

impl Token {
    const EOF: Self = Self { kind: EOF, range: TextRange::empty(TextSize::new(0)) };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Code inside `${ ... }`, with the number of unmatched `{` seen so far.
    Template { braces: u32 },
    String { raw: bool },
}

pub struct Tokenizer<'t> {
    text: &'t str,
    cursor: Cursor<'t>,
    current: Token,
    modes: Vec<Mode>,
    /// Set after a `$` that starts a short template entry.
    short_name: bool,
}

impl<'t> Tokenizer<'t> {
    pub fn new(text: &'t str) -> Self {
        let mut tokenizer = Self {
            text,
            cursor: Cursor::new(text),
            current: Token::EOF,
            modes: Vec::new(),
            short_name: false,
        };
        tokenizer.next_token();
        tokenizer
    }

    pub fn peek(&self) -> &Token {
        &self.current
    }

    /// Returns the current token and lexes the next one.
    pub fn next_token(&mut self) -> Token {
        let kind = self.syntax_kind();
        let range = self.range();
        self.cursor.reset_pos_within_token();

        std::mem::replace(&mut self.current, Token { kind, range })
    }

    fn offset(&self) -> TextSize {
        TextSize::of(self.text) - self.cursor.len()
    }

    fn range(&self) -> TextRange {
        let end = self.offset();
        TextRange::new(end - self.cursor.pos_within_token(), end)
    }

    fn text(&self) -> &'t str {
        &self.text[self.range()]
    }

    fn syntax_kind(&mut self) -> SyntaxKind {
        if self.cursor.is_eof() {
            return EOF;
        }

        if std::mem::take(&mut self.short_name) {
            self.cursor.advance_while(is_ident_continue);
            return NAME;
        }

        match self.modes.last() {
            Some(&Mode::String { raw }) => self.string_part(raw),
            _ => self.code(),
        }
    }

    fn code(&mut self) -> SyntaxKind {
        let previous = self.cursor.previous();

        match self.cursor.advance() {
            '\n' => NEWLINE,
            '\r' if self.cursor.matches('\n') => {
                self.cursor.advance();
                NEWLINE
            }
            '/' if self.cursor.matches('/') => {
                self.cursor.advance_while(|c| c != '\n' && c != '\r');
                LINE_COMMENT
            }
            first_char if first_char.is_whitespace() => {
                self.cursor.advance_while(|c| c.is_whitespace() && c != '\n' && c != '\r');
                WHITESPACE
            }
            '(' => LEFT_PAREN,
            ')' => RIGHT_PAREN,
            '{' => {
                if let Some(Mode::Template { braces }) = self.modes.last_mut() {
                    *braces += 1;
                }
                LEFT_BRACE
            }
            '}' => match self.modes.last_mut() {
                Some(Mode::Template { braces: 0 }) => {
                    self.modes.pop();
                    LONG_TEMPLATE_ENTRY_END
                }
                Some(Mode::Template { braces }) => {
                    *braces -= 1;
                    RIGHT_BRACE
                }
                _ => RIGHT_BRACE,
            },
            ',' => COMMA,
            '"' => {
                let raw = self.cursor.rest().starts_with("\"\"");
                if raw {
                    self.cursor.advance_by(2);
                }
                self.modes.push(Mode::String { raw });
                OPEN_QUOTE
            }
            first_char @ '0'..='9' => self.number(first_char),
            first_char if is_ident_start(first_char) => {
                self.cursor.advance_while(is_ident_continue);

                match self.text() {
                    "fun" => FUN_KW,
                    "if" => IF_KW,
                    "else" => ELSE_KW,
                    "loop" => LOOP_KW,
                    "val" => VAL_KW,
                    "while" => WHILE_KW,
                    "true" => TRUE_KW,
                    "false" => FALSE_KW,
                    _ => NAME,
                }
            }
            first_char if is_operator(first_char) => {
                self.cursor.advance_while(is_operator);

                let left_bound = match previous {
                    '(' | '{' | ',' => false,
                    EOF_CHAR => false,
                    prev => !prev.is_whitespace(),
                };

                let right_bound = match self.cursor.peek() {
                    ')' | '}' | ',' => false,
                    '.' => !left_bound,
                    EOF_CHAR => false,
                    peeked => !peeked.is_whitespace(),
                };

                match self.text() {
                    "=" => EQ,
                    "." => DOT,
                    _ => {
                        if left_bound == right_bound {
                            BINARY_OPERATOR
                        } else if left_bound {
                            POSTFIX_OPERATOR
                        } else {
                            PREFIX_OPERATOR
                        }
                    }
                }
            }
            _ => UNKNOWN,
        }
    }

    fn string_part(&mut self, raw: bool) -> SyntaxKind {
        match self.cursor.advance() {
            '"' if !raw => {
                self.modes.pop();
                CLOSING_QUOTE
            }
            '"' => {
                let run = 1 + self.cursor.rest().chars().take_while(|&c| c == '"').count();
                match run {
                    3 => {
                        self.cursor.advance_by(2);
                        self.modes.pop();
                        CLOSING_QUOTE
                    }
                    // The last three quotes of a longer run close the string.
                    4.. => {
                        self.cursor.advance_by(run - 4);
                        REGULAR_STRING_PART
                    }
                    _ => {
                        self.cursor.advance_by(run - 1);
                        self.regular_string_part(raw)
                    }
                }
            }
            '\\' if !raw => {
                if self.cursor.matches('u') {
                    self.cursor.advance();
                    for _ in 0..4 {
                        if !self.cursor.peek().is_ascii_hexdigit() {
                            break;
                        }
                        self.cursor.advance();
                    }
                } else if !self.cursor.is_eof() && !self.cursor.matches('\n') {
                    self.cursor.advance();
                }
                ESCAPE_SEQUENCE
            }
            '$' if is_ident_start(self.cursor.peek()) => {
                self.short_name = true;
                SHORT_TEMPLATE_ENTRY_START
            }
            '$' if self.cursor.matches('{') => {
                self.cursor.advance();
                self.modes.push(Mode::Template { braces: 0 });
                LONG_TEMPLATE_ENTRY_START
            }
            '\n' if !raw => {
                // A line break ends a regular string that was never closed.
                self.modes.pop();
                NEWLINE
            }
            _ => self.regular_string_part(raw),
        }
    }

    fn regular_string_part(&mut self, raw: bool) -> SyntaxKind {
        while !self.cursor.is_eof() {
            match self.cursor.peek() {
                '"' => break,
                '\\' | '\n' if !raw => break,
                '$' if starts_template_entry(self.cursor.second()) => break,
                _ => {
                    self.cursor.advance();
                }
            }
        }
        REGULAR_STRING_PART
    }

    fn number(&mut self, c: char) -> SyntaxKind {
        if c == '0' {
            match self.cursor.peek() {
                'b' | 'o' => {
                    self.cursor.advance();
                    self.digits(false);
                }
                'x' => {
                    self.cursor.advance();
                    self.digits(true);
                }
                '0'..='9' | '_' | '.' | 'e' | 'E' => {
                    self.digits(false);
                }
                _ => return INT_NUMBER,
            }
        } else {
            self.digits(false);
        }

        if self.cursor.matches('.') && self.cursor.second().is_ascii_digit() {
            self.cursor.advance();
            self.digits(false);
            self.float_exponent();
            return FLOAT_NUMBER;
        }

        if self.cursor.matches('e') || self.cursor.matches('E') {
            self.float_exponent();
            return FLOAT_NUMBER;
        }

        INT_NUMBER
    }

    fn digits(&mut self, allow_hex: bool) {
        loop {
            match self.cursor.peek() {
                '_' | '0'..='9' => {
                    self.cursor.advance();
                }
                'a'..='f' | 'A'..='F' if allow_hex => {
                    self.cursor.advance();
                }
                _ => return,
            }
        }
    }

    fn float_exponent(&mut self) {
        if self.cursor.matches('e') || self.cursor.matches('E') {
            self.cursor.advance();
            if self.cursor.matches('-') || self.cursor.matches('+') {
                self.cursor.advance();
            }
            self.digits(false);
        }
    }
}

/// Lexes the whole of `text`, stopping before `EOF`.
pub fn tokenize(text: &str) -> impl Iterator<Item = Token> + '_ {
    let mut tokenizer = Tokenizer::new(text);
    std::iter::from_fn(move || {
        let token = tokenizer.next_token();
        (token.kind != EOF).then_some(token)
    })
}

/// Returns the character an escape sequence such as `\n` or `\u0041` stands
/// for, or `None` if the escape is illegal.
pub fn unescape(escape: &str) -> Option<char> {
    let mut chars = escape.strip_prefix('\\')?.chars();
    let c = match chars.next()? {
        't' => '\t',
        'b' => '\u{8}',
        'n' => '\n',
        'r' => '\r',
        '\'' => '\'',
        '"' => '"',
        '\\' => '\\',
        '$' => '$',
        'u' => {
            let hex = chars.as_str();
            if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return None;
            }
            return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
        }
        _ => return None,
    };
    chars.next().is_none().then_some(c)
}

pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Returns `true` if `$` followed by `next` opens a template entry.
pub fn starts_template_entry(next: char) -> bool {
    is_ident_start(next) || next == '{'
}

fn is_operator(c: char) -> bool {
    matches!(
        c,
        '/' | '=' | '-' | '+' | '*' | '%' | '<' | '>' | '!' | '&' | '|' | '^' | '~' | '.' | '?'
    )
}
