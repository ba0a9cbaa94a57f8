//! Writing decoded text back into a string template.

use skein_syntax::SyntaxKind::*;
use skein_syntax::ast::{AstNode as _, StringTemplate};
use skein_syntax::{ElementId, NodeId, SyntaxTree};
use text_size::TextSize;
use thiserror::Error;

use crate::escaper::{EscapeError, StringTemplateEscaper, TextEscaper};
use crate::host::{InjectionHost as _, StringTemplateHost};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    #[error(transparent)]
    Escape(#[from] EscapeError),
    #[error("patched literal `{0}` is not a string template")]
    Reparse(String),
    #[error("host node is no longer part of the tree")]
    Detached,
}

pub(crate) fn update_string_template(
    host: StringTemplateHost,
    tree: &mut SyntaxTree,
    text: &str,
) -> Result<NodeId, UpdateError> {
    if !tree.is_attached(host.node()) {
        return Err(UpdateError::Detached);
    }

    if let Some(parse) = skein_parse::expression(text) {
        let template =
            parse.expr().filter(|&expr| parse.tree().node(expr).kind() == STRING_TEMPLATE);
        if let Some(expr) = template {
            let new_node = tree.replace_node(host.node(), parse.tree(), expr);
            tracing::debug!(?new_node, "replaced string template");
            return Ok(new_node);
        }
    }

    let Some(patch) = Patch::compute(host, tree, text)? else {
        tracing::trace!("decoded text unchanged");
        return Ok(host.node());
    };

    let Patch { parse, interior, replacement } = patch;
    let inserted = tree.splice_children(host.node(), interior, parse.tree(), &replacement);
    tracing::debug!(entries = inserted.len(), "patched string template");
    Ok(host.node())
}

/// A reparsed literal whose entries replace the host's entries.
struct Patch {
    parse: skein_parse::Parse,
    /// Child indices of the host's entries.
    interior: std::ops::Range<usize>,
    replacement: Vec<ElementId>,
}

impl Patch {
    /// Returns `None` when `text` is already the decoded content.
    fn compute(
        host: StringTemplateHost,
        tree: &SyntaxTree,
        text: &str,
    ) -> Result<Option<Self>, UpdateError> {
        let mut escaper = host.create_text_escaper(tree);
        let content = escaper.relevant_text_range();
        let old = escaper.decode(content)?.to_owned();
        if old == text {
            return Ok(None);
        }
        escaper.encode(text)?;

        let mut prefix = common_prefix_len(&old, text);
        // Keep a literal `$` out of the untouched prefix; the middle may start
        // with a name and turn it into an entry.
        if old[..prefix].ends_with('$') {
            prefix -= 1;
        }
        let suffix = common_suffix_len(&old[prefix..], &text[prefix..]);

        let start = host_offset(&escaper, prefix)?;
        let end = host_offset(&escaper, old.len() - suffix)?;
        let middle = escaper.encode(&text[prefix..text.len() - suffix])?;

        let host_text = tree.node(host.node()).text();
        let (before, after) = (&host_text[..usize::from(start)], &host_text[usize::from(end)..]);
        let literal = format!("{before}{middle}{after}");
        tracing::trace!(%literal, "reparsing patched literal");

        let parse = skein_parse::fragment(&literal);
        let whole = parse.tree().root().text_range();
        let Some(new_template) = parse
            .expr()
            .and_then(|expr| StringTemplate::cast(parse.tree().node(expr)))
            .filter(|template| template.syntax().text_range() == whole)
        else {
            return Err(UpdateError::Reparse(literal));
        };

        // The splice must not have created entries or escapes that change the value.
        let mut check = StringTemplateEscaper::new(new_template);
        let range = check.relevant_text_range();
        if check.decode(range).ok() != Some(text) {
            return Err(EscapeError::Unrepresentable.into());
        }

        let old_interior = interior(host.template(tree));
        let new_interior = interior(new_template);
        let replacement = new_template
            .syntax()
            .children_with_tokens()
            .skip(new_interior.start)
            .take(new_interior.len())
            .map(|child| child.id())
            .collect();

        Ok(Some(Self { interior: old_interior, replacement, parse }))
    }
}

/// Indices of the children between the quotes.
fn interior(template: StringTemplate<'_>) -> std::ops::Range<usize> {
    let len = template.syntax().children_with_tokens().len();
    let start = usize::from(template.open_quote().is_some());
    start..len - usize::from(template.closing_quote().is_some())
}

fn host_offset(
    escaper: &StringTemplateEscaper<'_>,
    decoded: usize,
) -> Result<TextSize, EscapeError> {
    let decoded = TextSize::try_from(decoded).ok();
    decoded.and_then(|decoded| escaper.offset_in_host(decoded)).ok_or(EscapeError::Unrepresentable)
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|&((_, x), y)| x != y)
        .map_or_else(|| a.len().min(b.len()), |((i, _), _)| i)
}

fn common_suffix_len(a: &str, b: &str) -> usize {
    a.chars()
        .rev()
        .zip(b.chars().rev())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len_utf8())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_affixes_respect_char_boundaries() {
        assert_eq!(common_prefix_len("héllo", "hélp"), 4);
        assert_eq!(common_prefix_len("abc", "abcdef"), 3);
        assert_eq!(common_prefix_len("é", "è"), 0);
        assert_eq!(common_suffix_len("xé", "yé"), 2);
        assert_eq!(common_suffix_len("abc", "abc"), 3);
        assert_eq!(common_suffix_len("", "abc"), 0);
    }
}
