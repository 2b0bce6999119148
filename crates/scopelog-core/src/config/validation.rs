//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    config.buckets.validate()?;
    validate_changelog(config)?;
    validate_narrative(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_changelog(config: &Config) -> Result<()> {
    if config.changelog.file.as_os_str().is_empty() {
        return Err(ConfigError::invalid("changelog.file", "file path cannot be empty").into());
    }
    Ok(())
}

fn validate_narrative(config: &Config) -> Result<()> {
    let narrative = &config.narrative;
    if !narrative.enabled {
        return Ok(());
    }

    if narrative.model.trim().is_empty() {
        return Err(ConfigError::invalid("narrative.model", "model cannot be empty").into());
    }

    if narrative.timeout_secs == 0 {
        return Err(
            ConfigError::invalid("narrative.timeout_secs", "timeout must be at least 1 second")
                .into(),
        );
    }

    if !(narrative.base_url.starts_with("http://") || narrative.base_url.starts_with("https://")) {
        return Err(ConfigError::invalid(
            "narrative.base_url",
            "must be an http:// or https:// URL",
        )
        .into());
    }

    Ok(())
}
