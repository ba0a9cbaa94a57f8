pub use line_index::{LineCol, LineIndex};

/// A source file known to the database.
#[salsa::input(debug)]
pub struct File {
    #[returns(ref)]
    pub path: camino::Utf8PathBuf,
    #[returns(deref)]
    pub text: String,
}

#[salsa::tracked]
impl File {
    #[salsa::tracked(returns(ref), no_eq)]
    pub fn line_index(self, db: &dyn salsa::Database) -> LineIndex {
        LineIndex::new(self.text(db))
    }
}

impl File {
    /// One-based line and column of `offset`, as printed in reports.
    pub fn line_col(self, db: &dyn salsa::Database, offset: line_index::TextSize) -> LineCol {
        let LineCol { line, col } = self.line_index(db).line_col(offset);
        LineCol { line: line + 1, col: col + 1 }
    }
}
