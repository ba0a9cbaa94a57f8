use expect_test::{Expect, expect};
use skein_syntax::SyntaxKind::*;

use crate::Parse;

fn debug(parse: &Parse) -> String {
    let mut actual = format!("{:#?}", parse.tree().root());
    if !parse.diagnostics().is_empty() {
        actual.push_str("Errors:\n");
        for diagnostic in parse.diagnostics() {
            actual.push_str(&format!("  {:?} {}\n", diagnostic.range(), diagnostic.message()));
        }
    }
    actual
}

fn check(text: &str, expect: Expect) {
    let parse = crate::module(text);
    assert_eq!(parse.tree().text(), text);
    expect.assert_eq(&debug(&parse));
}

#[test]
fn template_entries() {
    check(
        r#"val s = "a$b\n${x + 1}""#,
        expect![[r#"
            MODULE@0..23
              VAL_STMT@0..23
                VAL_KW@0..3 "val"
                WHITESPACE@3..4 " "
                IDENT@4..5
                  NAME@4..5 "s"
                WHITESPACE@5..6 " "
                EQ@6..7 "="
                WHITESPACE@7..8 " "
                STRING_TEMPLATE@8..23
                  OPEN_QUOTE@8..9 "\""
                  LITERAL_STRING_TEMPLATE_ENTRY@9..10
                    REGULAR_STRING_PART@9..10 "a"
                  SHORT_STRING_TEMPLATE_ENTRY@10..12
                    SHORT_TEMPLATE_ENTRY_START@10..11 "$"
                    IDENT@11..12
                      NAME@11..12 "b"
                  ESCAPE_STRING_TEMPLATE_ENTRY@12..14
                    ESCAPE_SEQUENCE@12..14 "\\n"
                  LONG_STRING_TEMPLATE_ENTRY@14..22
                    LONG_TEMPLATE_ENTRY_START@14..16 "${"
                    BINARY_EXPR@16..21
                      IDENT@16..17
                        NAME@16..17 "x"
                      WHITESPACE@17..18 " "
                      BINARY_OPERATOR@18..19 "+"
                      WHITESPACE@19..20 " "
                      LITERAL@20..21
                        INT_NUMBER@20..21 "1"
                    LONG_TEMPLATE_ENTRY_END@21..22 "}"
                  CLOSING_QUOTE@22..23 "\""
        "#]],
    );
}

#[test]
fn illegal_escape_and_dangling_newline() {
    check(
        "\"ab\\q\nx",
        expect![[r#"
            MODULE@0..7
              EXPR_STMT@0..5
                STRING_TEMPLATE@0..5
                  OPEN_QUOTE@0..1 "\""
                  LITERAL_STRING_TEMPLATE_ENTRY@1..3
                    REGULAR_STRING_PART@1..3 "ab"
                  ESCAPE_STRING_TEMPLATE_ENTRY@3..5
                    ESCAPE_SEQUENCE@3..5 "\\q"
              NEWLINE@5..6 "\n"
              EXPR_STMT@6..7
                IDENT@6..7
                  NAME@6..7 "x"
            Errors:
              3..5 illegal escape: `\q`
              0..1 unterminated string template
        "#]],
    );
}

#[test]
fn function_with_call() {
    check(
        "fun f(a, b) { f(a) }",
        expect![[r#"
            MODULE@0..20
              FUN_DECL@0..20
                FUN_KW@0..3 "fun"
                WHITESPACE@3..4 " "
                IDENT@4..5
                  NAME@4..5 "f"
                PARAM_LIST@5..11
                  LEFT_PAREN@5..6 "("
                  IDENT@6..7
                    NAME@6..7 "a"
                  COMMA@7..8 ","
                  WHITESPACE@8..9 " "
                  IDENT@9..10
                    NAME@9..10 "b"
                  RIGHT_PAREN@10..11 ")"
                WHITESPACE@11..12 " "
                STMT_LIST@12..20
                  LEFT_BRACE@12..13 "{"
                  WHITESPACE@13..14 " "
                  EXPR_STMT@14..18
                    CALL_EXPR@14..18
                      IDENT@14..15
                        NAME@14..15 "f"
                      ARG_LIST@15..18
                        LEFT_PAREN@15..16 "("
                        IDENT@16..17
                          NAME@16..17 "a"
                        RIGHT_PAREN@17..18 ")"
                  WHITESPACE@18..19 " "
                  RIGHT_BRACE@19..20 "}"
        "#]],
    );
}

#[test]
fn long_entry_recovery() {
    check(
        r#""${a b}""#,
        expect![[r#"
            MODULE@0..8
              EXPR_STMT@0..8
                STRING_TEMPLATE@0..8
                  OPEN_QUOTE@0..1 "\""
                  LONG_STRING_TEMPLATE_ENTRY@1..7
                    LONG_TEMPLATE_ENTRY_START@1..3 "${"
                    IDENT@3..4
                      NAME@3..4 "a"
                    WHITESPACE@4..5 " "
                    ERROR@5..6
                      NAME@5..6 "b"
                    LONG_TEMPLATE_ENTRY_END@6..7 "}"
                  CLOSING_QUOTE@7..8 "\""
            Errors:
              5..6 expected '}'
        "#]],
    );
}

#[test]
fn stray_closing_brace() {
    check(
        "}",
        expect![[r#"
            MODULE@0..1
              ERROR@0..1
                RIGHT_BRACE@0..1 "}"
            Errors:
              0..1 unexpected '}'
        "#]],
    );
}

#[test]
fn leading_and_trailing_trivia_stay_in_root() {
    let parse = crate::module("  // hi\nx\n");
    let root = parse.tree().root();

    assert_eq!(root.text(), "  // hi\nx\n");
    assert_eq!(
        root.children_with_tokens().map(|child| child.kind()).collect::<Vec<_>>(),
        [WHITESPACE, LINE_COMMENT, NEWLINE, EXPR_STMT, NEWLINE]
    );
}

#[test]
fn expression_accepts_single_expression() {
    let parse = crate::expression("  \"x$y\"  ").unwrap();
    let expr = parse.tree().node(parse.expr().unwrap());

    assert_eq!(parse.tree().root().kind(), EXPR_FRAGMENT);
    assert_eq!(expr.kind(), STRING_TEMPLATE);
    assert_eq!(expr.text(), "\"x$y\"");
}

#[test]
fn expression_rejects_everything_else() {
    for text in ["", "   ", "a b", "\"abc", "\"\\q\"", "\"${\"", "(a", "val x = 1", "}"] {
        assert!(crate::expression(text).is_none(), "{text:?} should not be an expression");
    }
}

#[test]
fn fragment_keeps_trailing_input() {
    let parse = crate::fragment("\"a\" tail");

    assert_eq!(parse.tree().text(), "\"a\" tail");
    assert_eq!(parse.diagnostics()[0].message(), "unexpected trailing input");
    assert_eq!(parse.tree().node(parse.expr().unwrap()).kind(), STRING_TEMPLATE);
}

#[test]
fn malformed_input_is_lossless() {
    let inputs = [
        "\"${",
        "\"\\",
        "}}}",
        "\"\"\"",
        "\"\"\"a\n${b\"\"\"",
        "fun",
        "fun f( { }",
        "val = ",
        "((",
        "\"$",
        "\"${ \"\" }\"",
        "a\0b",
        "if a { } else",
        "while { loop",
        "f(,,)",
        "a.",
        "\r\n\"x\r\n",
    ];

    for text in inputs {
        let parse = crate::module(text);
        assert_eq!(parse.tree().text(), text, "{text:?}");
        assert_eq!(parse.tree().root().text_range().len(), text_size::TextSize::of(text));
    }
}

#[test]
fn raw_template_spans_lines() {
    let parse = crate::expression("\"\"\"a\n$b\"\"\"").unwrap();
    let expr = parse.tree().node(parse.expr().unwrap());

    assert_eq!(
        expr.children_with_tokens().map(|child| child.kind()).collect::<Vec<_>>(),
        [OPEN_QUOTE, LITERAL_STRING_TEMPLATE_ENTRY, SHORT_STRING_TEMPLATE_ENTRY, CLOSING_QUOTE]
    );
}
