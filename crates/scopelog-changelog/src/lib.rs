//! Scopelog Changelog - Commit classification for release changelogs
//!
//! This crate parses conventional commit messages, sorts them into a
//! bucket × tier matrix driven by a scope table, renders the matrix as
//! markdown and optionally rewrites it into prose.

pub mod authors;
pub mod classifier;
pub mod formatter;
pub mod generator;
pub mod narrative;
pub mod parser;
pub mod types;

pub use classifier::{Decision, ScopeClassifier, SkipReason};
pub use formatter::{ChangelogFormatter, MarkdownFormatter};
pub use generator::{classify, classify_with_narrative, ChangelogDraft, ChangelogGenerator};
pub use narrative::{
    NarrativeError, NarrativeOutcome, NarrativeRewriter, NarrativeState, OpenAiRewriter,
    TextRewriter,
};
pub use parser::{CommitParser, ConventionalParser};
pub use types::{ChangelogMatrix, Classification, ClassifiedEntry, ParsedCommit, Tier};
