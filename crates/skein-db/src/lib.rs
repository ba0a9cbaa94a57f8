//! The salsa database and the queries run over source files.

pub use skein_errors::Diagnostic;
use skein_inject::{Host, InjectionHost as _, TextEscaper as _, UpdateError};
use skein_inputs::File;
use skein_syntax::SyntaxKind::STRING_TEMPLATE;
use skein_syntax::ast::TemplateEntry;
use skein_syntax::{SyntaxTree, find_node_at_offset};
use text_size::{TextRange, TextSize};
use thiserror::Error;

#[salsa::db]
#[derive(Default, Clone)]
pub struct RootDatabase {
    storage: salsa::Storage<Self>,
}

#[salsa::db]
impl salsa::Database for RootDatabase {}

/// Parse diagnostics of `file`, in the order they were reported.
#[salsa::tracked(returns(ref))]
pub fn check_file(db: &dyn salsa::Database, file: File) -> Vec<Diagnostic> {
    let parse = skein_parse::module(file.text(db));
    tracing::debug!(path = %file.path(db), diagnostics = parse.diagnostics().len(), "checked file");
    parse.diagnostics().to_vec()
}

/// What the injection machinery sees in one string template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub range: TextRange,
    pub raw: bool,
    pub valid: bool,
    pub one_line: bool,
    pub entries: usize,
    pub interpolations: usize,
    /// Decoded content; only present for valid hosts.
    pub decoded: Option<String>,
}

impl HostInfo {
    fn new(tree: &SyntaxTree, host: Host) -> Self {
        let Host::StringTemplate(template) = host;
        let (entries, interpolations) =
            template.entries(tree).fold((0, 0), |(entries, interpolations), entry| {
                let interpolated = matches!(entry, TemplateEntry::Short(_) | TemplateEntry::Long(_));
                (entries + 1, interpolations + usize::from(interpolated))
            });

        let valid = host.is_valid_host(tree);
        let mut escaper = host.create_text_escaper(tree);
        let decoded = valid.then(|| {
            let range = escaper.relevant_text_range();
            escaper.decode(range).map(str::to_owned)
        });
        let decoded = match decoded {
            Some(Ok(decoded)) => Some(decoded),
            Some(Err(error)) => {
                tracing::warn!(%error, "valid host failed to decode");
                None
            }
            None => None,
        };

        Self {
            range: tree.node(host.node()).text_range(),
            raw: escaper.is_raw(),
            valid,
            one_line: escaper.is_one_line(),
            entries,
            interpolations,
            decoded,
        }
    }
}

/// Every string template of `file` in preorder.
#[salsa::tracked(returns(ref))]
pub fn injection_hosts(db: &dyn salsa::Database, file: File) -> Vec<HostInfo> {
    let parse = skein_parse::module(file.text(db));
    let tree = parse.tree();
    tree.root().descendants().filter_map(Host::cast).map(|host| HostInfo::new(tree, host)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectError {
    #[error("no string template at offset {0:?}")]
    NoHost(TextSize),
    #[error(transparent)]
    Update(#[from] UpdateError),
}

/// Rewrites the innermost string template covering `offset` from `text` and
/// returns the resulting document.
pub fn inject(
    db: &dyn salsa::Database,
    file: File,
    offset: TextSize,
    text: &str,
) -> Result<String, InjectError> {
    let mut tree = skein_parse::module(file.text(db)).into_tree();
    let host = find_node_at_offset(tree.root(), STRING_TEMPLATE, offset)
        .and_then(Host::cast)
        .ok_or(InjectError::NoHost(offset))?;

    host.update_text(&mut tree, text)?;
    Ok(tree.text().to_owned())
}
