//! Commit parsing

mod conventional;
pub mod references;

pub use conventional::ConventionalParser;

use crate::types::ParsedCommit;

/// Trait for commit parsers
pub trait CommitParser: Send + Sync {
    /// Parse a raw commit message.
    ///
    /// Returns `None` for messages that are not in the parser's format;
    /// those are dropped from the changelog without a diagnostic.
    fn parse(&self, message: &str) -> Option<ParsedCommit>;
}
