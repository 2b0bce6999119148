//! Changelog generation

use std::collections::BTreeSet;

use scopelog_core::BucketTable;
use tracing::{debug, info, instrument, warn};

use crate::authors::copilot_original_author;
use crate::classifier::{Decision, ScopeClassifier};
use crate::formatter::{ChangelogFormatter, MarkdownFormatter};
use crate::narrative::{NarrativeRewriter, NarrativeState};
use crate::parser::{CommitParser, ConventionalParser};
use crate::types::{ChangelogMatrix, Classification};

/// Aggregated output of one classification run, before rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogDraft {
    /// Entries by bucket and tier
    pub matrix: ChangelogMatrix,
    /// PR numbers of included commits, sorted and unique
    pub pr_numbers: Vec<u64>,
    /// Original authors of included Copilot commits, sorted and unique
    pub authors: Vec<String>,
}

/// Changelog generator
pub struct ChangelogGenerator {
    parser: Box<dyn CommitParser>,
    formatter: Box<dyn ChangelogFormatter>,
    table: BucketTable,
}

impl ChangelogGenerator {
    /// Create a generator with the default parser and formatter.
    ///
    /// Fails if the bucket table is invalid.
    pub fn new(table: BucketTable) -> scopelog_core::Result<Self> {
        table.validate()?;
        Ok(Self {
            parser: Box::new(ConventionalParser::new()),
            formatter: Box::new(MarkdownFormatter::new()),
            table,
        })
    }

    /// Use a custom parser
    pub fn with_parser<P: CommitParser + 'static>(mut self, parser: P) -> Self {
        self.parser = Box::new(parser);
        self
    }

    /// Use a custom formatter
    pub fn with_formatter<F: ChangelogFormatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// The bucket table in use
    pub fn table(&self) -> &BucketTable {
        &self.table
    }

    /// Parse, classify and aggregate commit messages, in input order
    #[instrument(skip_all, fields(message_count = messages.len()))]
    pub fn generate<S: AsRef<str>>(&self, messages: &[S]) -> ChangelogDraft {
        info!(message_count = messages.len(), "classifying commits");

        let mut matrix = ChangelogMatrix::new(&self.table);
        let mut pr_numbers = BTreeSet::new();
        let mut authors = BTreeSet::new();

        let Some(classifier) = ScopeClassifier::new(&self.table) else {
            warn!("bucket table is empty, nothing to classify");
            return ChangelogDraft {
                matrix,
                pr_numbers: Vec::new(),
                authors: Vec::new(),
            };
        };

        let mut skipped = 0usize;
        for message in messages {
            let message = message.as_ref();
            let Some(commit) = self.parser.parse(message) else {
                debug!(raw = message, "not a conventional commit, dropping");
                skipped += 1;
                continue;
            };

            match classifier.classify(&commit) {
                Decision::Skip(_) => skipped += 1,
                Decision::Include(entry) | Decision::Fallback(entry) => {
                    pr_numbers.extend(commit.pr_numbers.iter().copied());
                    if let Some(login) = copilot_original_author(message) {
                        authors.insert(login);
                    }
                    matrix.push(entry);
                }
            }
        }

        debug!(
            included = matrix.len(),
            skipped,
            pr_count = pr_numbers.len(),
            "commits classified"
        );

        ChangelogDraft {
            matrix,
            pr_numbers: pr_numbers.into_iter().collect(),
            authors: authors.into_iter().collect(),
        }
    }

    /// Classify messages and render the deterministic report
    #[instrument(skip_all, fields(message_count = messages.len()))]
    pub fn classify<S: AsRef<str>>(&self, messages: &[S]) -> Classification {
        let draft = self.generate(messages);
        let report = self.formatter.format(&draft.matrix);
        Classification {
            report,
            report_narrative: None,
            pr_numbers: draft.pr_numbers,
            authors: draft.authors,
        }
    }

    /// Classify messages and additionally attempt the narrative rewrite.
    ///
    /// `report_narrative` is set only when every section was rewritten.
    #[instrument(skip_all, fields(message_count = messages.len()))]
    pub async fn classify_with_narrative<S: AsRef<str>>(
        &self,
        messages: &[S],
        rewriter: &NarrativeRewriter,
    ) -> Classification {
        let draft = self.generate(messages);
        let report = self.formatter.format(&draft.matrix);

        let outcome = rewriter.rewrite(&draft.matrix, self.formatter.as_ref()).await;
        if outcome.state == NarrativeState::Failed {
            info!("using the deterministic changelog");
        }

        Classification {
            report,
            report_narrative: outcome.report,
            pr_numbers: draft.pr_numbers,
            authors: draft.authors,
        }
    }
}

/// Classify commit messages against a bucket table
pub fn classify<S: AsRef<str>>(
    messages: &[S],
    table: &BucketTable,
) -> scopelog_core::Result<Classification> {
    Ok(ChangelogGenerator::new(table.clone())?.classify(messages))
}

/// Classify commit messages and attempt the narrative rewrite
pub async fn classify_with_narrative<S: AsRef<str>>(
    messages: &[S],
    table: &BucketTable,
    rewriter: &NarrativeRewriter,
) -> scopelog_core::Result<Classification> {
    let generator = ChangelogGenerator::new(table.clone())?;
    Ok(generator.classify_with_narrative(messages, rewriter).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrative::{NarrativeError, TextRewriter};
    use async_trait::async_trait;
    use scopelog_core::{ConfigError, ScopelogError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn worker_table() -> BucketTable {
        BucketTable::new().with_bucket("Worker", ["worker"])
    }

    fn monorepo_table() -> BucketTable {
        BucketTable::new()
            .with_bucket("Console", ["app", "console"])
            .with_bucket("Api", ["api"])
            .with_bucket("Empty", ["empty"])
    }

    fn monorepo_messages() -> Vec<&'static str> {
        vec![
            "feat(app): some admin change [admin]",
            "feat(console): feature with console scope",
            "feat(api): Api internal change [internal]",
            "feat(api): [internal]",
            "chore(ci, app, api): Change to ignore [skip ci]",
            "chore(ci): Change to ignore [ignore][admin]",
            "feat(api): Api change for user",
            "feat(app, api, ci): App + Api change for user",
            "fix(ci): Some ci fix should be internal",
            "feat(api): New cool feature in API 💥 (#46)",
            "feat(intl): Change sign-up text (#46)",
        ]
    }

    #[test]
    fn test_worker_changelog() {
        let messages = [
            "feat: some admin change [admin]",
            "feat: just new feature with scope",
            "feat(worker): worker scope internal change [internal]",
            "chore(ci): Change to ignore [skip ci]",
            "feat(worker): Update packages [internal]",
            "feat: Change sign-up text (#46)",
        ];
        let result = classify(&messages, &worker_table()).unwrap();
        assert_eq!(
            result.report,
            "**Worker**\n\n\
             :rocket: _User-facing_\n\
             * just new feature with scope\n\
             * Change sign-up text\n\n\
             :nerd_face: _Admin_\n\
             * some admin change\n\n\
             :house: _Internal_\n\
             * worker scope internal change\n\
             * Update packages\n\n"
        );
        assert_eq!(result.pr_numbers, vec![46]);
        assert!(result.report_narrative.is_none());
    }

    #[test]
    fn test_worker_changelog_without_references() {
        let messages = [
            "feat: some admin change [admin]",
            "feat(worker): Update packages [internal]",
        ];
        let result = classify(&messages, &worker_table()).unwrap();
        assert!(result.pr_numbers.is_empty());
        assert_eq!(result.preferred_report(), result.report);
    }

    #[test]
    fn test_monorepo_changelog() {
        let result = classify(&monorepo_messages(), &monorepo_table()).unwrap();
        assert_eq!(
            result.report,
            "**Console**\n\n\
             :rocket: _User-facing_\n\
             * feature with console scope\n\
             * App + Api change for user\n\n\
             :nerd_face: _Admin_\n\
             * some admin change\n\n\
             :house: _Internal_\n\
             * Some ci fix should be internal\n\
             * Change sign-up text\n\n\n\
             **Api**\n\n\
             :rocket: _User-facing_\n\
             * Api change for user\n\
             * New cool feature in API 💥\n\n\
             :house: _Internal_\n\
             * Api internal change\n\n"
        );
        assert_eq!(result.pr_numbers, vec![46]);
        assert!(!result.report.contains("Empty"));
        assert!(!result.report.contains("Change to ignore"));
    }

    #[test]
    fn test_pr_numbers_sorted_and_unique() {
        let messages = [
            "feat: first feature (#10)",
            "fix: bug fix (#5)",
            "feat(worker): another feature (#20)",
            "chore: update deps (#15)",
            "feat: feature without PR number",
            "fix: again (#5)",
        ];
        let result = classify(&messages, &worker_table()).unwrap();
        assert_eq!(result.pr_numbers, vec![5, 10, 15, 20]);
        assert!(result.report.contains("first feature"));
        assert!(result.report.contains("bug fix"));
    }

    #[test]
    fn test_skipped_commits_contribute_no_pr_numbers() {
        let messages = ["chore: release (#99) [skip ci]", "feat: thing (#3)"];
        let result = classify(&messages, &worker_table()).unwrap();
        assert_eq!(result.pr_numbers, vec![3]);
    }

    #[test]
    fn test_included_subjects_appear_exactly_once() {
        let result = classify(&monorepo_messages(), &monorepo_table()).unwrap();
        for subject in [
            "some admin change",
            "feature with console scope",
            "Api internal change",
            "Api change for user",
            "App + Api change for user",
            "Some ci fix should be internal",
            "Change sign-up text",
        ] {
            assert_eq!(
                result.report.matches(&format!("* {}\n", subject)).count(),
                1,
                "{subject}"
            );
        }
        assert_eq!(result.report.lines().filter(|l| l.starts_with("* ")).count(), 8);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let generator = ChangelogGenerator::new(monorepo_table()).unwrap();
        let first = generator.classify(&monorepo_messages());
        let second = generator.classify(&monorepo_messages());
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_conventional_messages_are_dropped() {
        let messages = ["Merge branch 'main'", "WIP", "feat: kept"];
        let result = classify(&messages, &worker_table()).unwrap();
        assert_eq!(result.report, "**Worker**\n\n:rocket: _User-facing_\n* kept\n\n");
    }

    #[test]
    fn test_empty_input_renders_nothing() {
        let messages: [&str; 0] = [];
        let result = classify(&messages, &worker_table()).unwrap();
        assert_eq!(result.report, "");
        assert!(result.pr_numbers.is_empty());
    }

    #[test]
    fn test_invalid_table_fails_fast() {
        let err = classify(&["feat: x"], &BucketTable::new()).unwrap_err();
        assert!(matches!(
            err,
            ScopelogError::Config(ConfigError::InvalidValue { .. })
        ));

        let duplicated = BucketTable::new()
            .with_bucket("Api", ["api"])
            .with_bucket("Api", ["api2"]);
        assert!(ChangelogGenerator::new(duplicated).is_err());
    }

    #[test]
    fn test_copilot_authors_from_included_commits() {
        let messages = [
            "feat: added by agent\n\nCo-authored-by: Copilot <Copilot@users.noreply.github.com>\nCo-authored-by: Jane <1+octo-jane@users.noreply.github.com>",
            "fix: skipped [ignore]\n\nCo-authored-by: Copilot <Copilot@users.noreply.github.com>\nCo-authored-by: bob <bob@example.com>",
            "fix: regular commit",
        ];
        let result = classify(&messages, &worker_table()).unwrap();
        assert_eq!(result.authors, vec!["octo-jane".to_string()]);
    }

    struct FailingOnSecond {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextRewriter for FailingOnSecond {
        async fn rewrite(&self, bullets: &[String]) -> crate::narrative::Result<String> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 1 {
                return Err(NarrativeError::ApiError {
                    status: 503,
                    message: "unavailable".to_string(),
                });
            }
            Ok(format!("* {} rewritten.", bullets.len()))
        }
    }

    struct Echo;

    #[async_trait]
    impl TextRewriter for Echo {
        async fn rewrite(&self, bullets: &[String]) -> crate::narrative::Result<String> {
            Ok(format!("* {} changes.", bullets.len()))
        }
    }

    #[tokio::test]
    async fn test_narrative_failure_keeps_deterministic_report() {
        let messages = [
            "feat(app): console change",
            "feat(api): api change",
            "fix(api): api internal [internal]",
        ];
        let rewriter = NarrativeRewriter::new(
            Arc::new(FailingOnSecond {
                calls: AtomicUsize::new(0),
            }),
            Duration::from_secs(5),
        );

        let plain = classify(&messages, &monorepo_table()).unwrap();
        let result = classify_with_narrative(&messages, &monorepo_table(), &rewriter)
            .await
            .unwrap();
        assert_eq!(result.report, plain.report);
        assert!(result.report_narrative.is_none());
        assert_eq!(result.preferred_report(), plain.report);
    }

    #[tokio::test]
    async fn test_narrative_success_keeps_headings() {
        let messages = ["feat(app): one", "feat(app): two [admin]", "feat(api): three"];
        let rewriter = NarrativeRewriter::new(Arc::new(Echo), Duration::from_secs(5));

        let result = classify_with_narrative(&messages, &monorepo_table(), &rewriter)
            .await
            .unwrap();
        assert_eq!(
            result.report_narrative.as_deref(),
            Some(
                "**Console**\n\n\
                 :rocket: _User-facing_\n* 1 changes.\n\n\
                 :nerd_face: _Admin_\n* 1 changes.\n\n\n\
                 **Api**\n\n\
                 :rocket: _User-facing_\n* 1 changes.\n\n"
            )
        );
        assert!(result.report.contains("* one"));
    }

    #[tokio::test]
    async fn test_disabled_narrative_matches_plain_classification() {
        let generator = ChangelogGenerator::new(monorepo_table()).unwrap();
        let plain = generator.classify(&monorepo_messages());
        let result = generator
            .classify_with_narrative(&monorepo_messages(), &NarrativeRewriter::disabled())
            .await;
        assert_eq!(result, plain);
    }
}
