//! Scope classification
//!
//! Assigns each parsed commit to exactly one (bucket, tier) cell of the
//! changelog, or drops it.

use scopelog_core::BucketTable;
use tracing::{debug, info, warn};

use crate::types::{ClassifiedEntry, ParsedCommit, Tier};

/// Scopes that mark CI and infrastructure work
const INFRA_SCOPES: [&str; 2] = ["infra", "ci"];

/// Why a commit was left out of the changelog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Carried an `[ignore]` or `[skip ci]` flag
    Flagged,
    /// Nothing left to display once flags and references were stripped
    EmptySubject,
}

/// Outcome of classifying one commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Commit is excluded from the changelog
    Skip(SkipReason),
    /// Commit is placed in a cell
    Include(ClassifiedEntry),
    /// Commit declared scopes no bucket knows; placed in the default
    /// bucket's internal tier
    Fallback(ClassifiedEntry),
}

impl Decision {
    /// Consume the decision, returning the entry to record
    pub fn into_entry(self) -> Option<ClassifiedEntry> {
        match self {
            Self::Skip(_) => None,
            Self::Include(entry) | Self::Fallback(entry) => Some(entry),
        }
    }
}

/// Maps commits onto a bucket table
#[derive(Debug, Clone, Copy)]
pub struct ScopeClassifier<'a> {
    table: &'a BucketTable,
    default_bucket: &'a str,
}

impl<'a> ScopeClassifier<'a> {
    /// Create a classifier over a validated table.
    ///
    /// Returns `None` when the table has no buckets.
    pub fn new(table: &'a BucketTable) -> Option<Self> {
        let default_bucket = table.default_bucket()?.name.as_str();
        Some(Self {
            table,
            default_bucket,
        })
    }

    /// Classify one commit.
    ///
    /// Precedence: skip flags, empty subject, the ci/infra override, then
    /// bucket lookup. The first bucket in table order that contains any of
    /// the declared scopes wins; a commit never lands in two buckets.
    pub fn classify(&self, commit: &ParsedCommit) -> Decision {
        let tier = commit.flagged_tier();

        if commit.is_skipped() {
            info!(subject = %commit.subject, "skipping flagged commit");
            return Decision::Skip(SkipReason::Flagged);
        }

        if commit.subject.is_empty() {
            debug!(scopes = ?commit.scopes, "skipping commit with empty subject");
            return Decision::Skip(SkipReason::EmptySubject);
        }

        if let [scope] = commit.scopes.as_slice() {
            if INFRA_SCOPES.contains(&scope.as_str()) {
                return Decision::Include(self.entry(self.default_bucket, Tier::Internal, commit));
            }
        }

        if commit.scopes.is_empty() {
            return Decision::Include(self.entry(self.default_bucket, tier, commit));
        }

        let matched = self
            .table
            .iter()
            .find(|bucket| commit.scopes.iter().any(|scope| bucket.contains(scope)));

        match matched {
            Some(bucket) => Decision::Include(self.entry(&bucket.name, tier, commit)),
            None => {
                warn!(
                    subject = %commit.subject,
                    scopes = ?commit.scopes,
                    bucket = self.default_bucket,
                    "commit scopes match no bucket, listing it as internal"
                );
                Decision::Fallback(self.entry(self.default_bucket, Tier::Internal, commit))
            }
        }
    }

    fn entry(&self, bucket: &str, tier: Tier, commit: &ParsedCommit) -> ClassifiedEntry {
        ClassifiedEntry {
            bucket: bucket.to_string(),
            tier,
            text: commit.subject.clone(),
        }
    }
}
