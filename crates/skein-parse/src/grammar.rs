use skein_syntax::SyntaxKind::{self, *};
use skein_syntax::SyntaxSet;

use crate::parser::Parser;

pub(crate) mod exprs;
pub(crate) mod items;
mod templates;

/// Tokens an expression never starts with and that close an enclosing
/// construct; the expression parser leaves them for the caller.
pub(crate) const EXPR_RECOVERY: SyntaxSet =
    SyntaxSet::new([EOF, RIGHT_BRACE, LONG_TEMPLATE_ENTRY_END, CLOSING_QUOTE]);

pub(crate) fn name(p: &mut Parser<'_>) -> bool {
    match p.peek_kind() {
        NAME => {
            let m = p.start();
            p.advance();
            m.complete(p, IDENT);
            true
        }
        _ => {
            p.error("expected identifier");
            false
        }
    }
}

pub(crate) fn delimited(
    p: &mut Parser<'_>,
    bra: SyntaxKind,
    ket: SyntaxKind,
    delim: SyntaxKind,
    unexpected_delim_message: &'static str,
    first_set: &SyntaxSet,
    mut parser: impl FnMut(&mut Parser<'_>) -> bool,
) {
    debug_assert_eq!(p.peek_kind(), bra);
    p.advance();

    while !p.at(ket) && !p.at(EOF) {
        if p.at(delim) {
            p.error_and_bump(unexpected_delim_message);
            continue;
        }

        if !parser(p) {
            break;
        }

        if !p.eat(delim) {
            if first_set.contains(p.peek_kind()) {
                p.expect(delim, "expected ','");
            } else {
                break;
            }
        }
    }

    let ket_message = match ket {
        RIGHT_PAREN => "expected ')'",
        RIGHT_BRACE => "expected '}'",
        _ => "expected closing delimiter",
    };
    p.expect(ket, ket_message);
}

/// Parses a lone expression; anything after it is wrapped in an `ERROR` node.
pub(crate) fn fragment(p: &mut Parser<'_>) {
    let m = p.start();
    exprs::expr(p);

    if !p.at(EOF) {
        let error = p.start();
        p.error("unexpected trailing input");
        while !p.at(EOF) {
            p.advance();
        }
        error.complete(p, ERROR);
    }

    p.bump_trivia();
    m.complete(p, EXPR_FRAGMENT);
}
