//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};

use super::buckets::BucketTable;
use super::defaults::{config_file_names, SCOPES_ENV_VAR};
use super::types::Config;
use super::validation::validate_config;

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<Config> {
    let format = if path.extension().is_some_and(|e| e == "toml") {
        "TOML"
    } else {
        "YAML"
    };
    info!(path = %path.display(), format, "loading config");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

    let config: Config = if format == "TOML" {
        toml::from_str(&content).map_err(ConfigError::TomlError)?
    } else {
        serde_yaml::from_str(&content).map_err(ConfigError::YamlError)?
    };

    validate_config(&config)?;
    debug!(path = %path.display(), buckets = config.buckets.len(), "config loaded and validated");
    Ok(config)
}

/// Find configuration file in directory or parent directories.
///
/// At each directory level the search checks:
///   1. `<dir>/<name>`          (e.g. `scopelog.yaml`)
///   2. `<dir>/.github/<name>`  (e.g. `.github/scopelog.yaml`)
///
/// The first match wins. Parents are walked until the filesystem root.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in config_file_names() {
            let config_path = current.join(name);
            if config_path.exists() {
                info!(path = %config_path.display(), "found config file");
                return Some(config_path);
            }

            let github_path = current.join(".github").join(name);
            if github_path.exists() {
                info!(path = %github_path.display(), "found config file in .github/");
                return Some(github_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

/// Load configuration from directory (searching parent directories)
pub fn load_config_from_dir(dir: &Path) -> Result<(Config, PathBuf)> {
    let config_path = find_config(dir).ok_or_else(|| ConfigError::NotFound(dir.to_path_buf()))?;

    let config = load_config(&config_path)?;
    Ok((config, config_path))
}

/// Load configuration or use defaults
pub fn load_config_or_default(dir: &Path) -> (Config, Option<PathBuf>) {
    match load_config_from_dir(dir) {
        Ok((config, path)) => (config, Some(path)),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "no usable config found, using defaults");
            (Config::default(), None)
        }
    }
}

/// Resolve the bucket table to classify with.
///
/// Precedence: an inline JSON table (`--scopes`), then the
/// `SCOPELOG_SCOPES` environment variable, then the configuration file.
/// Whatever source wins is validated before it is returned.
pub fn resolve_bucket_table(inline_json: Option<&str>, config: &Config) -> Result<BucketTable> {
    if let Some(json) = inline_json {
        debug!("using bucket table from command line");
        return BucketTable::from_json(json);
    }

    if let Ok(json) = std::env::var(SCOPES_ENV_VAR) {
        if !json.trim().is_empty() {
            debug!(env = SCOPES_ENV_VAR, "using bucket table from environment");
            return BucketTable::from_json(&json);
        }
    }

    if config.buckets.is_empty() {
        return Err(ConfigError::MissingField("buckets".to_string()).into());
    }
    config.buckets.validate()?;
    Ok(config.buckets.clone())
}
