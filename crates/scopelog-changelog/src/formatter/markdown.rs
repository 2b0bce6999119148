//! Slack-flavoured markdown formatter
//!
//! Layout, per non-empty bucket in table order:
//!
//! ```text
//! **Console**
//!
//! :rocket: _User-facing_
//! * first entry
//! * second entry
//!
//! :house: _Internal_
//! * third entry
//!
//! ```
//!
//! Bucket blocks are separated by one extra blank line.

use tracing::{debug, instrument};

use super::ChangelogFormatter;
use crate::types::{Cell, ChangelogMatrix, Tier};

/// Markdown changelog formatter
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    /// Create a new markdown formatter
    pub fn new() -> Self {
        Self
    }

    /// Fixed heading for a tier
    pub fn tier_heading(tier: Tier) -> &'static str {
        match tier {
            Tier::User => ":rocket: _User-facing_",
            Tier::Admin => ":nerd_face: _Admin_",
            Tier::Internal => ":house: _Internal_",
        }
    }
}

impl ChangelogFormatter for MarkdownFormatter {
    fn body(&self, entries: &[String]) -> String {
        entries
            .iter()
            .map(|entry| format!("* {}", entry))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[instrument(skip_all, fields(entries = matrix.len()))]
    fn render(
        &self,
        matrix: &ChangelogMatrix,
        body: &mut dyn FnMut(&Cell<'_>) -> String,
    ) -> String {
        let mut output = String::new();
        let mut rendered_buckets = 0;

        for bucket in matrix.buckets().filter(|b| !b.is_empty()) {
            if rendered_buckets > 0 {
                output.push('\n');
            }
            output.push_str(&format!("**{}**\n\n", bucket.name));

            for tier in Tier::ALL {
                let entries = bucket.entries(tier);
                if entries.is_empty() {
                    continue;
                }
                let cell = Cell {
                    bucket: &bucket.name,
                    tier,
                    entries,
                };
                output.push_str(Self::tier_heading(tier));
                output.push('\n');
                output.push_str(&body(&cell));
                output.push_str("\n\n");
            }

            rendered_buckets += 1;
        }

        debug!(buckets = rendered_buckets, output_len = output.len(), "changelog rendered");
        output
    }
}
