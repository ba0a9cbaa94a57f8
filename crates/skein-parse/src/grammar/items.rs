use skein_syntax::SyntaxKind::*;
use skein_syntax::SyntaxSet;

use super::{delimited, exprs, name};
use crate::parser::Parser;

pub(crate) fn module(p: &mut Parser<'_>) {
    let m = p.start();

    while !p.at(EOF) {
        match p.peek_kind() {
            RIGHT_BRACE | LONG_TEMPLATE_ENTRY_END => p.error_and_bump("unexpected '}'"),
            CLOSING_QUOTE => p.error_and_bump("unexpected '\"'"),
            _ => stmt(p),
        }
    }

    p.bump_trivia();
    m.complete(p, MODULE);
}

pub(crate) fn stmt(p: &mut Parser<'_>) {
    match p.peek_kind() {
        FUN_KW => fun_decl(p),
        VAL_KW => {
            let m = p.start();
            p.advance();
            name(p);
            if p.expect(EQ, "expected '='") {
                exprs::expr(p);
            }
            m.complete(p, VAL_STMT);
        }
        _ => _ = exprs::expr(p).map(|m| m.precede(p).complete(p, EXPR_STMT)),
    }
}

fn fun_decl(p: &mut Parser<'_>) {
    debug_assert_eq!(p.peek_kind(), FUN_KW);

    let m = p.start();
    p.advance();
    name(p);

    if p.at(LEFT_PAREN) {
        param_list(p);
    } else {
        p.error("expected '('");
    }

    exprs::block(p);
    m.complete(p, FUN_DECL);
}

fn param_list(p: &mut Parser<'_>) {
    let m = p.start();
    delimited(
        p,
        LEFT_PAREN,
        RIGHT_PAREN,
        COMMA,
        "expected parameter",
        &SyntaxSet::new([NAME]),
        |p| p.at(NAME) && name(p),
    );
    m.complete(p, PARAM_LIST);
}
