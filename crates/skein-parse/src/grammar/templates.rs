use skein_syntax::SyntaxKind::{self, *};

use super::exprs;
use crate::parser::{CompletedMarker, Parser};

pub(crate) fn string_template(p: &mut Parser<'_>) -> CompletedMarker {
    debug_assert_eq!(p.peek_kind(), OPEN_QUOTE);

    let open_quote = p.peek_range();
    let m = p.start();
    p.advance();

    loop {
        match p.peek_kind() {
            REGULAR_STRING_PART => wrap(p, LITERAL_STRING_TEMPLATE_ENTRY),
            ESCAPE_SEQUENCE => {
                let escape = p.peek_text();
                if skein_tokenizer::unescape(escape).is_none() {
                    let range = p.peek_range();
                    p.error_at(&format!("illegal escape: `{escape}`"), range);
                }
                wrap(p, ESCAPE_STRING_TEMPLATE_ENTRY);
            }
            SHORT_TEMPLATE_ENTRY_START => short_entry(p),
            LONG_TEMPLATE_ENTRY_START => long_entry(p),
            CLOSING_QUOTE => {
                p.advance();
                break;
            }
            _ => {
                p.error_at("unterminated string template", open_quote);
                break;
            }
        }
    }

    m.complete(p, STRING_TEMPLATE)
}

fn wrap(p: &mut Parser<'_>, kind: SyntaxKind) {
    let m = p.start();
    p.advance();
    m.complete(p, kind);
}

fn short_entry(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    if p.at(NAME) {
        wrap(p, IDENT);
    } else {
        p.error("expected identifier");
    }
    m.complete(p, SHORT_STRING_TEMPLATE_ENTRY);
}

fn long_entry(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    exprs::expr(p);

    if !p.at(LONG_TEMPLATE_ENTRY_END) {
        p.error("expected '}'");
        if !p.at(EOF) {
            let error = p.start();
            while !p.at(LONG_TEMPLATE_ENTRY_END) && !p.at(EOF) {
                p.advance();
            }
            error.complete(p, ERROR);
        }
    }

    p.eat(LONG_TEMPLATE_ENTRY_END);
    m.complete(p, LONG_STRING_TEMPLATE_ENTRY);
}
