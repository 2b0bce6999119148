//! Scopelog - Scope-bucketed release changelogs from commit messages

mod cli;
mod exit_codes;

use clap::Parser;
use scopelog_core::ScopelogError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use cli::Cli;

fn main() {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_level());

    if let Err(err) = cli.execute() {
        cli::output::error(format!("{:#}", err));
        std::process::exit(exit_code(&err));
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ScopelogError>() {
        Some(ScopelogError::Config(_)) => exit_codes::CONFIG_ERROR,
        _ => exit_codes::ERROR,
    }
}

/// Set up tracing with two layers:
/// - Console: RUST_LOG, else the level from the verbosity flags
/// - File: always debug-level JSON to ~/.scopelog/logs/
fn init_tracing(level: &str) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    if let Some(log_dir) = log_directory() {
        let file_appender = tracing_appender::rolling::daily(&log_dir, "scopelog.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(console_layer)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_target(true)
                    .with_filter(EnvFilter::new("debug")),
            )
            .init();

        return Some(guard);
    }

    tracing_subscriber::registry().with(console_layer).init();

    None
}

/// Returns the log directory path, creating it if needed.
fn log_directory() -> Option<std::path::PathBuf> {
    let log_dir = dirs::home_dir()?.join(".scopelog").join("logs");
    std::fs::create_dir_all(&log_dir).ok()?;
    Some(log_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopelog_core::{ChangelogError, ConfigError};

    #[test]
    fn test_exit_codes() {
        let config_err = anyhow::Error::from(ScopelogError::from(ConfigError::MissingField(
            "buckets".to_string(),
        )));
        assert_eq!(exit_code(&config_err), exit_codes::CONFIG_ERROR);

        let input_err = anyhow::Error::from(ScopelogError::from(ChangelogError::InputNotFound(
            "commits.txt".into(),
        )));
        assert_eq!(exit_code(&input_err), exit_codes::ERROR);

        assert_eq!(exit_code(&anyhow::anyhow!("other")), exit_codes::ERROR);
    }
}
