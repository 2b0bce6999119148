//! Validate command

use clap::Args;
use console::style;
use tracing::info;

use scopelog_core::config::{load_config_from_dir, validation::validate_config, Config};

use crate::cli::output::{self, Printer};
use crate::cli::{Cli, OutputFormat};
use crate::exit_codes;

/// Validate the configuration file
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

impl ValidateCommand {
    /// Execute the validate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(strict = self.strict, "executing validate command");
        let cwd = std::env::current_dir()?;

        let mut errors: Vec<String> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();

        let (config, config_path) = match load_config_from_dir(&cwd) {
            Ok((c, p)) => (Some(c), Some(p)),
            Err(e) => {
                errors.push(format!("Configuration: {}", e));
                (None, None)
            }
        };

        if let Some(ref cfg) = config {
            if let Err(e) = validate_config(cfg) {
                errors.push(format!("Configuration validation: {}", e));
            }
            warnings.extend(Self::warnings(cfg));
        }

        if self.strict {
            errors.append(&mut warnings);
        }

        let passed = errors.is_empty();

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "valid": passed,
                    "config_path": config_path.map(|p| p.to_string_lossy().to_string()),
                    "buckets": config.as_ref().map(|c| &c.buckets),
                    "errors": errors,
                    "warnings": warnings
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    println!("{}", output::heading("Validation Results"));
                    println!();

                    if let Some(path) = &config_path {
                        println!("Config: {}", output::path(path));
                        println!();
                    }

                    if let Some(cfg) = &config {
                        for bucket in &cfg.buckets {
                            println!(
                                "{}",
                                output::field(&bucket.name, &bucket.scopes.join(", "))
                            );
                        }
                        println!();
                    }

                    if !errors.is_empty() {
                        println!("{}", style("Errors:").red().bold());
                        for error in &errors {
                            println!("  {} {}", style("✗").red(), error);
                        }
                        println!();
                    }

                    if !warnings.is_empty() {
                        println!("{}", style("Warnings:").yellow().bold());
                        for warning in &warnings {
                            println!("  {} {}", style("!").yellow(), warning);
                        }
                        println!();
                    }

                    if passed {
                        Printer::new(cli).success("Configuration is valid");
                    } else {
                        output::error(format!(
                            "Validation failed with {} error(s)",
                            errors.len()
                        ));
                    }
                }
            }
        }

        if !passed {
            std::process::exit(exit_codes::ERROR);
        }

        Ok(())
    }

    fn warnings(config: &Config) -> Vec<String> {
        let mut warnings = Vec::new();

        for bucket in &config.buckets {
            if bucket.scopes.iter().all(|s| s.trim().is_empty()) {
                warnings.push(format!(
                    "Bucket '{}' has no scopes and only receives routed commits",
                    bucket.name
                ));
            }
        }

        if config.narrative.enabled && config.narrative.credential().is_none() {
            warnings.push(format!(
                "Narrative rewrite is enabled but ${} is not set",
                config.narrative.token_env
            ));
        }

        warnings
    }
}
