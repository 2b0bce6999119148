//! Conventional Commits header parser
//!
//! Parses `type(scope1, scope2): subject` headers. Unlike the reference
//! grammar, several comma-separated scopes are allowed.

use regex::Regex;
use std::sync::LazyLock;

use super::references::{extract_flags, extract_pr_numbers, strip_pr_references};
use super::CommitParser;
use crate::types::ParsedCommit;

/// Regex for parsing commit headers
static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<type>[A-Za-z0-9_]+)(?:\((?P<scope>[A-Za-z0-9_$.*, -]*)\))?: (?P<subject>.*)$",
    )
    .expect("Invalid regex")
});

/// Parser for Conventional Commits headers with multiple scopes
#[derive(Debug, Clone, Default)]
pub struct ConventionalParser;

impl ConventionalParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }

    /// Split a scope group into trimmed, lower-cased scopes
    fn parse_scopes(group: &str) -> Vec<String> {
        group
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
            .collect()
    }
}

impl CommitParser for ConventionalParser {
    fn parse(&self, message: &str) -> Option<ParsedCommit> {
        let header = message.lines().next()?;
        let caps = HEADER_REGEX.captures(header)?;

        let commit_type = caps.name("type")?.as_str().to_lowercase();
        let scopes = caps
            .name("scope")
            .map(|m| Self::parse_scopes(m.as_str()))
            .unwrap_or_default();

        let mut subject = strip_pr_references(caps.name("subject")?.as_str());
        let flags = extract_flags(&mut subject);

        Some(ParsedCommit {
            commit_type,
            scopes,
            subject,
            flags,
            pr_numbers: extract_pr_numbers(message),
        })
    }
}
