//! Changelog types

use std::collections::BTreeSet;
use std::fmt;

use scopelog_core::BucketTable;
use serde::{Deserialize, Serialize};

/// Bracketed control flags recognized in commit subjects
pub mod flags {
    /// Drop the commit from the changelog
    pub const IGNORE: &str = "ignore";
    /// Drop the commit from the changelog (CI skip marker)
    pub const SKIP_CI: &str = "skip ci";
    /// Engineering-only change
    pub const INTERNAL: &str = "internal";
    /// Change only visible to administrators
    pub const ADMIN: &str = "admin";
}

/// Audience tier of a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// User-facing change
    User,
    /// Admin-only change
    Admin,
    /// Internal/engineering change
    Internal,
}

impl Tier {
    /// All tiers in rendering order
    pub const ALL: [Tier; 3] = [Tier::User, Tier::Admin, Tier::Internal];

    /// Returns the string representation of the tier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A commit header parsed from conventional commit format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCommit {
    /// Commit type (feat, fix, etc.)
    pub commit_type: String,
    /// Declared scopes, lower-cased, in declaration order
    pub scopes: Vec<String>,
    /// Display subject, with flags and `(#N)` references stripped
    pub subject: String,
    /// Bracketed flags found in the subject
    pub flags: BTreeSet<String>,
    /// Pull request numbers referenced anywhere in the message
    pub pr_numbers: BTreeSet<u64>,
}

impl ParsedCommit {
    /// Check whether a flag was present
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// Check whether the commit opted out of the changelog
    pub fn is_skipped(&self) -> bool {
        self.has_flag(flags::SKIP_CI) || self.has_flag(flags::IGNORE)
    }

    /// Tier requested by flags (internal > admin > user)
    pub fn flagged_tier(&self) -> Tier {
        if self.has_flag(flags::INTERNAL) {
            Tier::Internal
        } else if self.has_flag(flags::ADMIN) {
            Tier::Admin
        } else {
            Tier::User
        }
    }
}

/// A commit assigned to one bucket and tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedEntry {
    /// Bucket name
    pub bucket: String,
    /// Audience tier
    pub tier: Tier,
    /// Display text
    pub text: String,
}

/// Entries of one bucket, split by tier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BucketEntries {
    /// Bucket name
    pub name: String,
    /// User-facing entries
    pub user: Vec<String>,
    /// Admin entries
    pub admin: Vec<String>,
    /// Internal entries
    pub internal: Vec<String>,
}

impl BucketEntries {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Entries for a tier, in processing order
    pub fn entries(&self, tier: Tier) -> &[String] {
        match tier {
            Tier::User => &self.user,
            Tier::Admin => &self.admin,
            Tier::Internal => &self.internal,
        }
    }

    fn entries_mut(&mut self, tier: Tier) -> &mut Vec<String> {
        match tier {
            Tier::User => &mut self.user,
            Tier::Admin => &mut self.admin,
            Tier::Internal => &mut self.internal,
        }
    }

    /// Check if no tier has entries
    pub fn is_empty(&self) -> bool {
        self.user.is_empty() && self.admin.is_empty() && self.internal.is_empty()
    }
}

/// One non-empty (bucket, tier) cell of the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell<'a> {
    /// Bucket name
    pub bucket: &'a str,
    /// Tier
    pub tier: Tier,
    /// Entries in processing order
    pub entries: &'a [String],
}

/// Bucket × tier matrix of changelog entries
///
/// Buckets keep the order of the table the matrix was created from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangelogMatrix {
    buckets: Vec<BucketEntries>,
}

impl ChangelogMatrix {
    /// Create an empty matrix with one slot per bucket of the table
    pub fn new(table: &BucketTable) -> Self {
        Self {
            buckets: table.names().map(BucketEntries::new).collect(),
        }
    }

    /// Append an entry to its (bucket, tier) cell
    pub fn push(&mut self, entry: ClassifiedEntry) {
        let index = match self.buckets.iter().position(|b| b.name == entry.bucket) {
            Some(index) => index,
            None => {
                self.buckets.push(BucketEntries::new(entry.bucket.clone()));
                self.buckets.len() - 1
            }
        };
        self.buckets[index].entries_mut(entry.tier).push(entry.text);
    }

    /// Entries of a cell
    pub fn entries(&self, bucket: &str, tier: Tier) -> &[String] {
        self.buckets
            .iter()
            .find(|b| b.name == bucket)
            .map(|b| b.entries(tier))
            .unwrap_or(&[])
    }

    /// All buckets in table order, including empty ones
    pub fn buckets(&self) -> impl Iterator<Item = &BucketEntries> {
        self.buckets.iter()
    }

    /// Non-empty cells in rendering order: bucket, then tier
    pub fn cells(&self) -> impl Iterator<Item = Cell<'_>> {
        self.buckets.iter().flat_map(|bucket| {
            Tier::ALL.into_iter().filter_map(move |tier| {
                let entries = bucket.entries(tier);
                (!entries.is_empty()).then_some(Cell {
                    bucket: &bucket.name,
                    tier,
                    entries,
                })
            })
        })
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.buckets
            .iter()
            .map(|b| b.user.len() + b.admin.len() + b.internal.len())
            .sum()
    }

    /// Check if the matrix holds no entries
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(BucketEntries::is_empty)
    }
}

/// Result of classifying a list of commit messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Deterministic report
    pub report: String,
    /// Rewritten report, present only when every section was rewritten
    pub report_narrative: Option<String>,
    /// Referenced pull request numbers, sorted and unique
    pub pr_numbers: Vec<u64>,
    /// GitHub logins of the humans behind Copilot-authored commits
    pub authors: Vec<String>,
}

impl Classification {
    /// The report to publish: the narrative when available, else the deterministic one
    pub fn preferred_report(&self) -> &str {
        self.report_narrative.as_deref().unwrap_or(&self.report)
    }
}
