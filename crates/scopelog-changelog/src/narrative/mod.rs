//! Narrative rewrite of the changelog
//!
//! An optional, best-effort pass that asks a text-generation service to turn
//! each (bucket, tier) bullet list into prose. The pass is all-or-nothing:
//! the first failure abandons every section rewritten so far and the caller
//! keeps the deterministic report.

pub mod error;
mod openai;

pub use error::{NarrativeError, Result};
pub use openai::OpenAiRewriter;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scopelog_core::NarrativeConfig;
use tracing::{debug, info, warn};

use crate::formatter::ChangelogFormatter;
use crate::types::{ChangelogMatrix, Tier};

/// System prompt describing the writer persona
pub const ROLE_DEFINITION: &str = "Act as a technical writer who cares about detail. \
    You write release changelogs in user-friendly language and fix grammar and spelling mistakes.";

/// Rewrite instruction, sent with the persona so the bullets stay plain data
pub const REWRITE_REQUEST: &str = "Rewrite the release changes below into user-friendly text. \
    For each line write one meaningful sentence in the past tense, \
    start each bullet point with `* ` and end each sentence with `.`.";

/// A text-generation service that rewrites one bullet list
#[async_trait]
pub trait TextRewriter: Send + Sync {
    /// Rewrite the entries of one changelog section
    async fn rewrite(&self, bullets: &[String]) -> Result<String>;
}

/// Lifecycle of a rewrite pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrativeState {
    /// No credential, the pass never runs
    Disabled,
    /// Rewriting (or finished rewriting) sections
    Enabled,
    /// A request failed; nothing from this pass is used
    Failed,
}

/// What a rewrite pass produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeOutcome {
    /// Final state of the pass
    pub state: NarrativeState,
    /// Rewritten report, only when every section was rewritten
    pub report: Option<String>,
}

/// Drives the rewrite pass over a changelog matrix
#[derive(Clone)]
pub struct NarrativeRewriter {
    client: Option<Arc<dyn TextRewriter>>,
    timeout: Duration,
}

impl NarrativeRewriter {
    /// A rewriter that never runs
    pub fn disabled() -> Self {
        Self {
            client: None,
            timeout: Duration::ZERO,
        }
    }

    /// A rewriter backed by `client`, bounding each request by `timeout`
    pub fn new(client: Arc<dyn TextRewriter>, timeout: Duration) -> Self {
        Self {
            client: Some(client),
            timeout,
        }
    }

    /// Build from configuration.
    ///
    /// Enabled only when the configured token environment variable is set.
    pub fn from_config(config: &NarrativeConfig) -> Result<Self> {
        match OpenAiRewriter::from_config(config)? {
            Some(client) => {
                info!(model = %config.model, "narrative rewrite enabled");
                Ok(Self::new(Arc::new(client), config.timeout()))
            }
            None => {
                debug!(token_env = %config.token_env, "no narrative credential, rewrite disabled");
                Ok(Self::disabled())
            }
        }
    }

    /// State the pass starts in
    pub fn initial_state(&self) -> NarrativeState {
        if self.client.is_some() {
            NarrativeState::Enabled
        } else {
            NarrativeState::Disabled
        }
    }

    /// Rewrite every non-empty cell of `matrix`, one request at a time.
    ///
    /// Never fails: any error moves the pass to [`NarrativeState::Failed`]
    /// and no report is returned. Dropping the returned future cancels the
    /// in-flight request.
    pub async fn rewrite(
        &self,
        matrix: &ChangelogMatrix,
        formatter: &dyn ChangelogFormatter,
    ) -> NarrativeOutcome {
        let Some(client) = &self.client else {
            return NarrativeOutcome {
                state: NarrativeState::Disabled,
                report: None,
            };
        };

        if matrix.is_empty() {
            debug!("nothing to rewrite");
            return NarrativeOutcome {
                state: NarrativeState::Enabled,
                report: None,
            };
        }

        let mut bodies: HashMap<(String, Tier), String> = HashMap::new();
        for cell in matrix.cells() {
            debug!(bucket = cell.bucket, tier = %cell.tier, entries = cell.entries.len(), "rewriting section");

            let result = match tokio::time::timeout(self.timeout, client.rewrite(cell.entries)).await
            {
                Ok(Ok(text)) if text.trim().is_empty() => Err(NarrativeError::InvalidResponse(
                    "empty rewrite".to_string(),
                )),
                Ok(result) => result,
                Err(_) => Err(NarrativeError::Timeout(self.timeout)),
            };

            match result {
                Ok(text) => {
                    bodies.insert((cell.bucket.to_string(), cell.tier), text.trim().to_string());
                }
                Err(error) => {
                    warn!(
                        bucket = cell.bucket,
                        tier = %cell.tier,
                        %error,
                        rewritten = bodies.len(),
                        "narrative rewrite failed, keeping the deterministic changelog"
                    );
                    return NarrativeOutcome {
                        state: NarrativeState::Failed,
                        report: None,
                    };
                }
            }
        }

        let report = formatter.render(matrix, &mut |cell| {
            bodies
                .remove(&(cell.bucket.to_string(), cell.tier))
                .unwrap_or_else(|| formatter.body(cell.entries))
        });

        info!(sections = matrix.cells().count(), "narrative rewrite complete");
        NarrativeOutcome {
            state: NarrativeState::Enabled,
            report: Some(report),
        }
    }
}

impl std::fmt::Debug for NarrativeRewriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativeRewriter")
            .field("state", &self.initial_state())
            .field("timeout", &self.timeout)
            .finish()
    }
}
