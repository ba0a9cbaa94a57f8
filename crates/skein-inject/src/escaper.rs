//! Mapping between the decoded value of a literal and its source text.

use skein_syntax::ast::{AstNode as _, StringTemplate, TemplateEntry};
use skein_tokenizer::starts_template_entry;
use text_size::{TextRange, TextSize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EscapeError {
    #[error("literal contains an interpolation")]
    NotDecodable,
    #[error("literal contains an illegal escape sequence")]
    IllegalEscape,
    #[error("range boundary falls inside an escape sequence")]
    SplitEscape,
    #[error("text cannot be represented in this literal")]
    Unrepresentable,
    #[error("host node is no longer part of the tree")]
    Detached,
}

/// Translates between decoded text and the encoded text stored in a host.
///
/// All ranges and offsets are relative to the start of the host node.
pub trait TextEscaper {
    /// The part of the host that holds content, without the quotes.
    fn relevant_text_range(&self) -> TextRange;

    /// Decodes the content within `range` and remembers, for every decoded
    /// byte, where it came from.
    fn decode(&mut self, range: TextRange) -> Result<&str, EscapeError>;

    /// Returns the host offset recorded for `decoded` by the last `decode`.
    ///
    /// The offset one past the decoded text is valid and maps to the end of
    /// the decoded range.
    fn offset_in_host(&self, decoded: TextSize) -> Option<TextSize>;

    /// `false` for content spanning several lines, and for a host that is no
    /// longer in the tree.
    fn is_one_line(&self) -> bool;

    /// Encodes `text` the way it would be spelled inside this host.
    fn encode(&self, text: &str) -> Result<String, EscapeError>;
}

pub struct StringTemplateEscaper<'t> {
    template: StringTemplate<'t>,
    raw: bool,
    /// Detached hosts spell no text and decode nothing.
    attached: bool,
    decoded: String,
    offsets: Vec<TextSize>,
}

impl<'t> StringTemplateEscaper<'t> {
    pub(crate) fn new(template: StringTemplate<'t>) -> Self {
        let node = template.syntax();
        Self {
            template,
            raw: template.is_raw(),
            attached: node.tree().is_attached(node.id()),
            decoded: String::new(),
            offsets: Vec::new(),
        }
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    fn decode_into(&mut self, range: TextRange) -> Result<(), EscapeError> {
        if !self.attached {
            return Err(EscapeError::Detached);
        }

        let node = self.template.syntax();
        let host_start = node.text_range().start();
        let mut end = range.start();

        for entry in node.children() {
            let entry_range = entry.text_range() - host_start;
            let Some(overlap) = entry_range.intersect(range).filter(|it| !it.is_empty()) else {
                continue;
            };

            match TemplateEntry::cast(entry) {
                Some(TemplateEntry::Literal(literal)) => {
                    let text = &literal.text()[overlap - entry_range.start()];
                    self.decoded.push_str(text);
                    self.offsets.extend(
                        (0..u32::from(overlap.len())).map(|i| overlap.start() + TextSize::new(i)),
                    );
                }
                Some(TemplateEntry::Escape(escape)) => {
                    if overlap != entry_range {
                        return Err(EscapeError::SplitEscape);
                    }
                    let c = skein_tokenizer::unescape(escape.text())
                        .ok_or(EscapeError::IllegalEscape)?;
                    self.decoded.push(c);
                    self.offsets.extend(std::iter::repeat_n(overlap.start(), c.len_utf8()));
                }
                _ => return Err(EscapeError::NotDecodable),
            }
            end = overlap.end();
        }

        self.offsets.push(end);
        Ok(())
    }
}

impl TextEscaper for StringTemplateEscaper<'_> {
    fn relevant_text_range(&self) -> TextRange {
        let node = self.template.syntax();
        let host_start = node.text_range().start();

        let start =
            self.template.open_quote().map_or(host_start, |quote| quote.text_range().end());
        let end = self
            .template
            .closing_quote()
            .map_or(node.text_range().end(), |quote| quote.text_range().start());

        TextRange::new(start, end.max(start)) - host_start
    }

    fn decode(&mut self, range: TextRange) -> Result<&str, EscapeError> {
        self.decoded.clear();
        self.offsets.clear();

        if let Err(error) = self.decode_into(range) {
            tracing::trace!(?range, %error, "decode failed");
            self.decoded.clear();
            self.offsets.clear();
            return Err(error);
        }
        Ok(&self.decoded)
    }

    fn offset_in_host(&self, decoded: TextSize) -> Option<TextSize> {
        self.offsets.get(usize::from(decoded)).copied()
    }

    fn is_one_line(&self) -> bool {
        if !self.attached || self.template.syntax().text().contains('\n') {
            return false;
        }

        !self.template.entries().any(|entry| {
            matches!(
                entry,
                TemplateEntry::Escape(escape)
                    if matches!(skein_tokenizer::unescape(escape.text()), Some('\n' | '\r'))
            )
        })
    }

    fn encode(&self, text: &str) -> Result<String, EscapeError> {
        if self.raw {
            return encode_raw(text);
        }

        let mut encoded = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '\\' => encoded.push_str("\\\\"),
                '"' => encoded.push_str("\\\""),
                '$' => encoded.push_str("\\$"),
                '\n' => encoded.push_str("\\n"),
                '\r' => encoded.push_str("\\r"),
                '\t' => encoded.push_str("\\t"),
                '\u{8}' => encoded.push_str("\\b"),
                c if c.is_control() => encoded.push_str(&format!("\\u{:04x}", c as u32)),
                c => encoded.push(c),
            }
        }
        Ok(encoded)
    }
}

/// Raw literals have no escapes: text is kept verbatim unless it would end
/// the literal or start an entry.
fn encode_raw(text: &str) -> Result<String, EscapeError> {
    if text.contains("\"\"\"") {
        return Err(EscapeError::Unrepresentable);
    }

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '$' && chars.peek().is_some_and(|&next| starts_template_entry(next)) {
            return Err(EscapeError::Unrepresentable);
        }
    }
    Ok(text.to_owned())
}
