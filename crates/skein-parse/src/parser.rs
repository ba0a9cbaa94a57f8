use drop_bomb::DropBomb;
use skein_errors::Diagnostic;
use skein_syntax::{Builder, SyntaxKind, SyntaxTree};
use skein_tokenizer::{Token, Tokenizer};
use text_size::TextRange;

pub(crate) struct Parser<'t> {
    text: &'t str,
    tokenizer: Tokenizer<'t>,
    events: Vec<Event>,
    /// Trivia seen after the last significant token, not yet placed in the tree.
    trivia: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(text: &'t str) -> Self {
        let mut parser = Self {
            text,
            tokenizer: Tokenizer::new(text),
            events: Vec::new(),
            trivia: Vec::new(),
            diagnostics: Vec::new(),
        };
        parser.skip_trivia();
        parser
    }

    pub(crate) fn peek_kind(&self) -> SyntaxKind {
        self.tokenizer.peek().kind
    }

    pub(crate) fn peek_range(&self) -> TextRange {
        self.tokenizer.peek().range
    }

    pub(crate) fn peek_text(&self) -> &'t str {
        &self.text[self.peek_range()]
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn advance(&mut self) {
        if self.at(SyntaxKind::EOF) {
            return;
        }

        self.bump_trivia();
        let token = self.tokenizer.next_token();
        self.events.push(Event::Token(token));
        self.skip_trivia();
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if !self.at(kind) {
            return false;
        }
        self.advance();
        true
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind, message: &str) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error(message);
        false
    }

    /// Places buffered trivia into the node that is currently open.
    pub(crate) fn bump_trivia(&mut self) {
        self.events.extend(self.trivia.drain(..).map(Event::Token));
    }

    fn skip_trivia(&mut self) {
        while self.peek_kind().is_trivia() {
            let token = self.tokenizer.next_token();
            self.trivia.push(token);
        }
    }

    pub(crate) fn start(&mut self) -> Marker {
        // Leading trivia of the text belongs inside the root node.
        if !self.events.is_empty() {
            self.bump_trivia();
        }

        let pos = self.events.len() as u32;
        self.events.push(Event::TOMBSTONE);
        Marker::new(pos)
    }

    pub(crate) fn error(&mut self, message: &str) {
        let range = self.peek_range();
        self.error_at(message, range);
    }

    pub(crate) fn error_at(&mut self, message: &str, range: TextRange) {
        tracing::trace!(?range, "parse error: {message}");
        self.diagnostics.push(Diagnostic::error(message, range));
    }

    /// Reports `message` and wraps the current token in an `ERROR` node.
    pub(crate) fn error_and_bump(&mut self, message: &str) {
        let m = self.start();
        self.error(message);
        self.advance();
        m.complete(self, SyntaxKind::ERROR);
    }

    pub(crate) fn build_tree(self) -> (SyntaxTree, Vec<Diagnostic>) {
        let Parser { text, tokenizer: _, mut events, trivia, diagnostics } = self;
        debug_assert!(trivia.is_empty(), "trivia must be bumped before the root is completed");

        let mut builder = Builder::new(text);
        let mut forward_parents = Vec::new();

        for i in 0..events.len() {
            match std::mem::replace(&mut events[i], Event::TOMBSTONE) {
                Event::Start { kind, forward_parent } => {
                    if kind == SyntaxKind::TOMBSTONE {
                        continue;
                    }

                    forward_parents.push(kind);
                    let mut idx = i;
                    let mut fp = forward_parent;
                    while let Some(fwd) = fp {
                        idx += fwd as usize;

                        fp = match std::mem::replace(&mut events[idx], Event::TOMBSTONE) {
                            Event::Start { kind, forward_parent } => {
                                if kind != SyntaxKind::TOMBSTONE {
                                    forward_parents.push(kind);
                                }
                                forward_parent
                            }
                            _ => unreachable!(),
                        };
                    }

                    for kind in forward_parents.drain(..).rev() {
                        builder.start_node(kind);
                    }
                }
                Event::Finish => {
                    builder.finish_node();
                }
                Event::Token(Token { kind, range }) => {
                    builder.token(kind, range.len());
                }
            }
        }

        (builder.finish(), diagnostics)
    }
}

enum Event {
    Start { kind: SyntaxKind, forward_parent: Option<u32> },
    Token(Token),
    Finish,
}

impl Event {
    const TOMBSTONE: Self = Event::Start { kind: SyntaxKind::TOMBSTONE, forward_parent: None };
}

pub(crate) struct Marker {
    position: u32,
    bomb: DropBomb,
}

impl Marker {
    fn new(pos: u32) -> Marker {
        Marker {
            position: pos,
            bomb: DropBomb::new("Marker must be either completed or abandoned"),
        }
    }

    pub(crate) fn complete(mut self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.bomb.defuse();

        match &mut p.events[self.position as usize] {
            Event::Start { kind: slot, .. } => {
                *slot = kind;
            }
            _ => unreachable!(),
        }

        p.events.push(Event::Finish);
        CompletedMarker::new(self.position)
    }
}

pub(crate) struct CompletedMarker {
    pos: u32,
}

impl CompletedMarker {
    fn new(pos: u32) -> Self {
        CompletedMarker { pos }
    }

    /// Starts a node that will wrap this one. Pending trivia is left alone so
    /// it lands after the wrapped node, not inside it.
    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let new_pos = Marker::new(p.events.len() as u32);
        p.events.push(Event::TOMBSTONE);

        match &mut p.events[self.pos as usize] {
            Event::Start { forward_parent, .. } => {
                *forward_parent = Some(new_pos.position - self.pos);
            }
            _ => unreachable!(),
        }

        new_pos
    }
}
