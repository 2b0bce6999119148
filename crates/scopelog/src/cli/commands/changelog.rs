//! Changelog command

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::{info, warn};

use scopelog_changelog::{ChangelogGenerator, Classification, NarrativeRewriter, NarrativeState};
use scopelog_core::config::{load_config_or_default, resolve_bucket_table, Config};
use scopelog_core::NarrativeConfig;
use scopelog_core::workflow::{read_commit_messages, write_changelog};

use crate::cli::output::{self, Printer};
use crate::cli::{Cli, OutputFormat};

/// Classify commit messages into a changelog
#[derive(Debug, Args)]
pub struct ChangelogCommand {
    /// File with commit messages (default: read stdin)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Bucket table as a JSON object, e.g. '{"Api": ["api"]}'
    #[arg(long, value_name = "JSON")]
    pub scopes: Option<String>,

    /// Also rewrite the changelog into prose
    #[arg(long)]
    pub narrative: bool,

    /// Write the changelog to the configured changelog file
    #[arg(short, long)]
    pub write: bool,

    /// Write the changelog to this file instead
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl ChangelogCommand {
    /// Execute the changelog command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            input = ?self.input,
            narrative = self.narrative,
            write = self.write,
            output = ?self.output,
            "executing changelog command"
        );
        let cwd = std::env::current_dir()?;
        let (config, config_path) = load_config_or_default(&cwd);
        if let Some(path) = &config_path {
            info!(path = %path.display(), "using configuration file");
        }

        let table = resolve_bucket_table(self.scopes.as_deref(), &config)?;
        let generator = ChangelogGenerator::new(table)?;
        let messages = read_commit_messages(self.input.as_deref())?;

        let printer = Printer::new(cli);
        let classification = if self.narrative {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(self.classify_with_narrative(&generator, &messages, &config, printer))?
        } else {
            generator.classify(&messages)
        };

        let destination = self
            .output
            .clone()
            .or_else(|| self.write.then(|| cwd.join(&config.changelog.file)));
        self.emit(&classification, destination.as_deref(), cli.format, printer)
    }

    async fn classify_with_narrative(
        &self,
        generator: &ChangelogGenerator,
        messages: &[String],
        config: &Config,
        printer: Printer,
    ) -> anyhow::Result<Classification> {
        let rewriter = NarrativeRewriter::from_config(&config.narrative)?;
        if rewriter.initial_state() == NarrativeState::Disabled {
            printer.warning(narrative_unavailable(&config.narrative));
        }

        let classification = tokio::select! {
            classification = generator.classify_with_narrative(messages, &rewriter) => {
                if rewriter.initial_state() == NarrativeState::Enabled
                    && classification.report_narrative.is_none()
                    && !classification.report.is_empty()
                {
                    printer.warning("Narrative rewrite failed, using the plain changelog");
                }
                classification
            }
            _ = tokio::signal::ctrl_c() => {
                warn!("interrupted, skipping the narrative rewrite");
                generator.classify(messages)
            }
        };

        Ok(classification)
    }

    fn emit(
        &self,
        classification: &Classification,
        destination: Option<&Path>,
        format: OutputFormat,
        printer: Printer,
    ) -> anyhow::Result<()> {
        if let Some(path) = destination {
            write_changelog(path, classification.preferred_report())?;
            printer.success(format!("Changelog written to {}", output::path(path)));
        }

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(classification)?);
            }
            OutputFormat::Text => {
                if destination.is_none() {
                    print!("{}", classification.preferred_report());
                }
                printer.summary(
                    "Pull requests",
                    &output::pull_requests(&classification.pr_numbers),
                );
                printer.summary("Authors", &classification.authors.join(", "));
            }
        }

        Ok(())
    }
}

/// Why `--narrative` produced no rewrite before any request was made
fn narrative_unavailable(config: &NarrativeConfig) -> String {
    if config.enabled {
        format!(
            "No token in ${}, skipping the narrative rewrite",
            config.token_env
        )
    } else {
        "Narrative rewrite is disabled in the configuration, ignoring --narrative".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrative_unavailable_names_the_cause() {
        let disabled = NarrativeConfig {
            enabled: false,
            ..NarrativeConfig::default()
        };
        let message = narrative_unavailable(&disabled);
        assert!(message.contains("disabled"));
        assert!(!message.contains('$'));

        let missing_token = NarrativeConfig {
            token_env: "SCOPELOG_TEST_TOKEN_THAT_IS_NOT_SET".to_string(),
            ..NarrativeConfig::default()
        };
        assert_eq!(
            narrative_unavailable(&missing_token),
            "No token in $SCOPELOG_TEST_TOKEN_THAT_IS_NOT_SET, skipping the narrative rewrite"
        );
    }
}
