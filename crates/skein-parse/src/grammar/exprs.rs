use skein_syntax::SyntaxKind::*;
use skein_syntax::SyntaxSet;

use super::{EXPR_RECOVERY, delimited, items, templates};
use crate::parser::{CompletedMarker, Parser};

pub(crate) const EXPR_FIRST: SyntaxSet = SyntaxSet::new([
    NAME,
    INT_NUMBER,
    FLOAT_NUMBER,
    TRUE_KW,
    FALSE_KW,
    OPEN_QUOTE,
    LEFT_PAREN,
    IF_KW,
    LOOP_KW,
    WHILE_KW,
    PREFIX_OPERATOR,
]);

pub(crate) fn expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let mut lhs = unary_expr(p)?;

    while p.peek_kind() == BINARY_OPERATOR {
        let m = lhs.precede(p);
        p.advance();
        expr(p);
        lhs = m.complete(p, BINARY_EXPR);
    }

    lhs.into()
}

pub(crate) fn block(p: &mut Parser<'_>) {
    if p.peek_kind() != LEFT_BRACE {
        p.error("expected a block");
        return;
    }

    let m = p.start();
    p.advance();

    while !EXPR_RECOVERY.contains(p.peek_kind()) {
        items::stmt(p);
    }

    p.expect(RIGHT_BRACE, "expected '}'");
    m.complete(p, STMT_LIST);
}

fn unary_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    match p.peek_kind() {
        LOOP_KW => {
            let m = p.start();
            p.advance();
            block(p);
            m.complete(p, LOOP_EXPR).into()
        }
        WHILE_KW => {
            let m = p.start();
            p.advance();
            expr(p);
            block(p);
            m.complete(p, WHILE_EXPR).into()
        }
        IF_KW => if_(p),
        PREFIX_OPERATOR => {
            let m = p.start();
            p.advance();
            unary_expr(p);
            m.complete(p, PREFIX_EXPR).into()
        }
        _ => postfix_expr(p),
    }
}

fn if_(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    debug_assert_eq!(p.peek_kind(), IF_KW);

    let m = p.start();
    p.advance();
    expr(p);
    block(p);
    if p.eat(ELSE_KW) {
        if p.at(IF_KW) {
            if_(p);
        } else {
            block(p);
        }
    }
    m.complete(p, IF_EXPR).into()
}

fn postfix_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let mut lhs = primary_expr(p)?;

    loop {
        lhs = match p.peek_kind() {
            POSTFIX_OPERATOR => {
                let m = lhs.precede(p);
                p.advance();
                m.complete(p, POSTFIX_EXPR)
            }
            LEFT_PAREN => {
                let m = lhs.precede(p);
                arg_list(p);
                m.complete(p, CALL_EXPR)
            }
            DOT => {
                let m = lhs.precede(p);
                p.advance();
                p.expect(NAME, "expected identifier");
                m.complete(p, FIELD_EXPR)
            }
            _ => break,
        };
    }

    lhs.into()
}

fn arg_list(p: &mut Parser<'_>) {
    let m = p.start();
    delimited(p, LEFT_PAREN, RIGHT_PAREN, COMMA, "expected argument", &EXPR_FIRST, |p| {
        expr(p).is_some()
    });
    m.complete(p, ARG_LIST);
}

fn primary_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    match p.peek_kind() {
        INT_NUMBER | FLOAT_NUMBER | TRUE_KW | FALSE_KW => {
            let m = p.start();
            p.advance();
            m.complete(p, LITERAL).into()
        }
        OPEN_QUOTE => templates::string_template(p).into(),
        LEFT_PAREN => {
            let m = p.start();
            p.advance();
            if !p.at(RIGHT_PAREN) {
                expr(p);
            }
            p.expect(RIGHT_PAREN, "expected ')'");
            m.complete(p, PAREN_EXPR).into()
        }
        NAME => {
            let m = p.start();
            p.advance();
            m.complete(p, IDENT).into()
        }
        kind if EXPR_RECOVERY.contains(kind) => {
            p.error("expected expression");
            None
        }
        _ => {
            p.error_and_bump("expected expression");
            None
        }
    }
}
