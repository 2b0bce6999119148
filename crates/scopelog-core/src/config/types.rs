//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::buckets::BucketTable;

/// Main configuration for Scopelog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project name
    pub name: Option<String>,

    /// Scope-to-bucket table, in display order
    pub buckets: BucketTable,

    /// Changelog output configuration
    pub changelog: ChangelogConfig,

    /// Narrative rewrite configuration
    pub narrative: NarrativeConfig,
}

/// Changelog output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// File `scopelog changelog --write` writes to
    pub file: PathBuf,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("changelog.txt"),
        }
    }
}

/// Narrative rewrite configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// Whether the rewrite pass may run at all
    pub enabled: bool,

    /// Model identifier passed to the text-generation API
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    pub base_url: String,

    /// Environment variable holding the API token
    pub token_env: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com".to_string(),
            token_env: "OPEN_AI_TOKEN".to_string(),
            timeout_secs: 30,
        }
    }
}

impl NarrativeConfig {
    /// Resolve the API token from the configured environment variable.
    ///
    /// Returns `None` when the pass is disabled or the variable is unset/blank.
    pub fn credential(&self) -> Option<String> {
        if !self.enabled {
            return None;
        }
        std::env::var(&self.token_env)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
