use expect_test::expect;
use text_size::{TextRange, TextSize};

use crate::SyntaxKind::*;
use crate::ast::{AstNode as _, StringTemplate, TemplateEntry};
use crate::{Builder, NodeOrToken, SyntaxKind, SyntaxTree, WalkEvent};

enum Step {
    Start(SyntaxKind),
    Token(SyntaxKind, u32),
    Finish,
}

use Step::*;

fn tree(text: &str, steps: &[Step]) -> SyntaxTree {
    let mut builder = Builder::new(text);
    for step in steps {
        match *step {
            Start(kind) => builder.start_node(kind),
            Token(kind, len) => builder.token(kind, TextSize::new(len)),
            Finish => builder.finish_node(),
        }
    }
    builder.finish()
}

/// `"a$b"` followed by ` x`.
fn template() -> SyntaxTree {
    tree(
        "\"a$b\" x",
        &[
            Start(MODULE),
            Start(STRING_TEMPLATE),
            Token(OPEN_QUOTE, 1),
            Start(LITERAL_STRING_TEMPLATE_ENTRY),
            Token(REGULAR_STRING_PART, 1),
            Finish,
            Start(SHORT_STRING_TEMPLATE_ENTRY),
            Token(SHORT_TEMPLATE_ENTRY_START, 1),
            Start(IDENT),
            Token(NAME, 1),
            Finish,
            Finish,
            Token(CLOSING_QUOTE, 1),
            Finish,
            Token(WHITESPACE, 1),
            Start(IDENT),
            Token(NAME, 1),
            Finish,
            Finish,
        ],
    )
}

/// `"zz"` as a standalone tree.
fn replacement() -> SyntaxTree {
    tree(
        "\"zz\"",
        &[
            Start(EXPR_FRAGMENT),
            Start(STRING_TEMPLATE),
            Token(OPEN_QUOTE, 1),
            Start(LITERAL_STRING_TEMPLATE_ENTRY),
            Token(REGULAR_STRING_PART, 2),
            Finish,
            Token(CLOSING_QUOTE, 1),
            Finish,
            Finish,
        ],
    )
}

#[test]
fn navigation() {
    let tree = template();
    let root = tree.root();
    let string = root.children().next().unwrap();

    assert_eq!(string.kind(), STRING_TEMPLATE);
    assert_eq!(string.parent(), Some(root));
    assert_eq!(string.text(), "\"a$b\"");
    assert_eq!(string.children_with_tokens().len(), 4);

    let open = string.first_child_or_token().unwrap();
    assert_eq!(open.kind(), OPEN_QUOTE);
    assert_eq!(open.next_sibling_or_token().unwrap().kind(), LITERAL_STRING_TEMPLATE_ENTRY);
    assert!(open.prev_sibling_or_token().is_none());
    assert_eq!(string.next_sibling_or_token().unwrap().kind(), WHITESPACE);

    let name = string
        .descendants()
        .find(|node| node.kind() == IDENT)
        .and_then(|ident| ident.first_child_or_token())
        .and_then(NodeOrToken::into_token)
        .unwrap();
    assert_eq!(name.text(), "b");
    assert_eq!(name.text_range(), TextRange::new(3.into(), 4.into()));
    assert_eq!(
        name.parent().unwrap().ancestors().map(|node| node.kind()).collect::<Vec<_>>(),
        [IDENT, SHORT_STRING_TEMPLATE_ENTRY, STRING_TEMPLATE, MODULE]
    );
}

#[test]
fn preorder_visits_nodes_in_order() {
    let tree = template();
    let kinds = tree
        .root()
        .preorder()
        .filter_map(|event| match event {
            WalkEvent::Enter(node) => Some(node.kind()),
            WalkEvent::Leave(_) => None,
        })
        .collect::<Vec<_>>();

    assert_eq!(
        kinds,
        [
            MODULE,
            STRING_TEMPLATE,
            LITERAL_STRING_TEMPLATE_ENTRY,
            SHORT_STRING_TEMPLATE_ENTRY,
            IDENT,
            IDENT
        ]
    );
}

#[test]
fn skip_subtree() {
    let tree = template();
    let mut preorder = tree.root().preorder();
    let mut entered = Vec::new();
    while let Some(event) = preorder.next() {
        if let WalkEvent::Enter(node) = event {
            entered.push(node.kind());
            if node.kind() == STRING_TEMPLATE {
                preorder.skip_subtree();
            }
        }
    }

    assert_eq!(entered, [MODULE, STRING_TEMPLATE, IDENT]);
}

#[test]
fn ast_entries() {
    let tree = template();
    let string = StringTemplate::cast(tree.root().children().next().unwrap()).unwrap();

    assert!(!string.is_raw());
    assert_eq!(string.open_quote().unwrap().text(), "\"");
    assert_eq!(string.closing_quote().unwrap().text(), "\"");

    let entries = string.entries().collect::<Vec<_>>();
    assert_eq!(entries.len(), 2);
    assert!(matches!(entries[0], TemplateEntry::Literal(entry) if entry.text() == "a"));
    assert!(matches!(entries[1], TemplateEntry::Short(_)));
    assert_eq!(entries[1].syntax().text(), "$b");
}

#[test]
fn replace_node_relayouts() {
    let mut tree = template();
    let target = tree.root().children().next().unwrap().id();
    let source = replacement();
    let source_node = source.root().children().next().unwrap().id();

    let new_node = tree.replace_node(target, &source, source_node);

    assert_eq!(tree.text(), "\"zz\" x");
    assert!(tree.is_attached(new_node));
    assert!(!tree.is_attached(target));
    assert_eq!(tree.node(new_node).parent(), Some(tree.root()));
    expect![[r#"
        MODULE@0..6
          STRING_TEMPLATE@0..4
            OPEN_QUOTE@0..1 "\""
            LITERAL_STRING_TEMPLATE_ENTRY@1..3
              REGULAR_STRING_PART@1..3 "zz"
            CLOSING_QUOTE@3..4 "\""
          WHITESPACE@4..5 " "
          IDENT@5..6
            NAME@5..6 "x"
    "#]]
    .assert_eq(&format!("{:#?}", tree.root()));
}

#[test]
fn replace_root() {
    let mut tree = template();
    let source = replacement();

    let new_root = tree.replace_node(tree.root().id(), &source, source.root().id());

    assert_eq!(tree.root().id(), new_root);
    assert_eq!(tree.root().kind(), EXPR_FRAGMENT);
    assert_eq!(tree.text(), "\"zz\"");
}

#[test]
fn splice_keeps_surrounding_ids() {
    let mut tree = template();
    let string = tree.root().children().next().unwrap();
    let string_id = string.id();
    let quotes = [string.first_child_or_token().unwrap(), string.last_child_or_token().unwrap()]
        .map(|quote| quote.id());

    let source = replacement();
    let source_string = source.root().children().next().unwrap();
    let source_entries =
        source_string.children().map(|entry| NodeOrToken::Node(entry.id())).collect::<Vec<_>>();

    let inserted = tree.splice_children(string_id, 1..3, &source, &source_entries);

    assert_eq!(inserted.len(), 1);
    assert_eq!(tree.text(), "\"zz\" x");
    let string = tree.node(string_id);
    assert_eq!(string.text_range(), TextRange::new(0.into(), 4.into()));
    assert_eq!(string.first_child_or_token().unwrap().id(), quotes[0]);
    assert_eq!(string.last_child_or_token().unwrap().id(), quotes[1]);
    assert_eq!(tree.token(quotes[1].into_token().unwrap()).text_range().start(), 3.into());
}

#[test]
fn splice_can_delete() {
    let mut tree = template();
    let string = tree.root().children().next().unwrap().id();

    let inserted = tree.splice_children(string, 1..3, &replacement(), &[]);

    assert!(inserted.is_empty());
    assert_eq!(tree.text(), "\"\" x");
    assert_eq!(tree.node(string).children().count(), 0);
}

#[test]
fn detached_subtrees_spell_no_text() {
    let mut tree = template();
    let string = tree.root().children().next().unwrap();
    let target = string.id();
    let entry = string.children().next().unwrap().id();
    let source = replacement();

    tree.splice_children(target, 1..2, &source, &[]);
    assert!(!tree.is_attached(entry));
    assert_eq!(tree.node(entry).text(), "");

    tree.replace_node(target, &source, source.root().children().next().unwrap().id());
    let detached = tree.node(target);
    assert_eq!(detached.parent(), None);
    assert_eq!(detached.text_range(), TextRange::empty(TextSize::new(0)));
    assert!(detached.descendants().all(|node| node.text().is_empty()));
    assert_eq!(tree.text(), "\"zz\" x");
}

#[test]
fn compact_drops_detached_elements() {
    let mut tree = template();
    let source = replacement();
    let source_node = source.root().children().next().unwrap().id();
    for _ in 0..3 {
        let target = tree.root().children().next().unwrap().id();
        tree.replace_node(target, &source, source_node);
    }
    assert_eq!((tree.nodes.len(), tree.tokens.len()), (12, 16));
    let dump = format!("{:#?}", tree.root());

    tree.compact();

    assert_eq!((tree.nodes.len(), tree.tokens.len()), (4, 5));
    assert_eq!(tree.text(), "\"zz\" x");
    assert_eq!(format!("{:#?}", tree.root()), dump);
    assert!(tree.root().descendants().all(|node| tree.is_attached(node.id())));
}

#[test]
#[should_panic(expected = "out of bounds")]
fn splice_out_of_bounds() {
    let mut tree = template();
    let string = tree.root().children().next().unwrap().id();
    tree.splice_children(string, 2..9, &replacement(), &[]);
}

#[test]
fn tree_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SyntaxTree>();
}
