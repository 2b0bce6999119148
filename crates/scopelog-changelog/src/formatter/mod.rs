//! Changelog formatters

mod markdown;

pub use markdown::MarkdownFormatter;

use crate::types::{Cell, ChangelogMatrix};

/// Trait for changelog formatters
pub trait ChangelogFormatter: Send + Sync {
    /// Render a cell's entries as the formatter's default body
    fn body(&self, entries: &[String]) -> String;

    /// Render the matrix, asking `body` for the text under each tier heading
    fn render(&self, matrix: &ChangelogMatrix, body: &mut dyn FnMut(&Cell<'_>) -> String)
        -> String;

    /// Render the matrix with the default bodies
    fn format(&self, matrix: &ChangelogMatrix) -> String {
        self.render(matrix, &mut |cell| self.body(cell.entries))
    }
}
