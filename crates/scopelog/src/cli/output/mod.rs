//! Terminal output for the CLI
//!
//! Reports go to stdout untouched. Status lines are decorated with a
//! colored mark; confirmations are muted by `--quiet` and `--format json`,
//! warnings only by `--quiet`.

use std::fmt::Display;
use std::path::Path;

use console::{style, StyledObject};

use crate::cli::{Cli, OutputFormat};

/// Prints status lines according to the global output flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Printer {
    quiet: bool,
    text: bool,
}

impl Printer {
    pub fn new(cli: &Cli) -> Self {
        Self {
            quiet: cli.quiet,
            text: cli.format == OutputFormat::Text,
        }
    }

    /// Whether confirmations and summaries are shown
    pub fn shows_status(&self) -> bool {
        !self.quiet && self.text
    }

    /// Confirm a completed action on stdout
    pub fn success(&self, message: impl Display) {
        if self.shows_status() {
            println!("{}", status_line(style("✓").green().bold(), message));
        }
    }

    /// Follow-up hint on stdout
    pub fn hint(&self, message: impl Display) {
        if self.shows_status() {
            println!("{}", status_line(style("→").blue(), message));
        }
    }

    /// Degraded-but-continuing notice on stderr
    pub fn warning(&self, message: impl Display) {
        if !self.quiet {
            eprintln!("{}", status_line(style("!").yellow().bold(), message));
        }
    }

    /// `key: value` summary line on stderr, skipped when `value` is empty
    pub fn summary(&self, key: &str, value: &str) {
        if self.shows_status() && !value.is_empty() {
            eprintln!("{}", field(key, value));
        }
    }
}

/// Report a fatal error; never muted
pub fn error(message: impl Display) {
    eprintln!("{}", status_line(style("✗").red().bold(), message));
}

fn status_line(mark: StyledObject<&str>, message: impl Display) -> String {
    format!("{} {}", mark, message)
}

/// Indented `key: value` line
pub fn field(key: &str, value: &str) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

/// Bold section title
pub fn heading(text: &str) -> String {
    style(text).bold().to_string()
}

/// A path highlighted for display
pub fn path(path: &Path) -> StyledObject<std::path::Display<'_>> {
    style(path.display()).cyan()
}

/// Pull request references as `#12, #34`
pub fn pull_requests(numbers: &[u64]) -> String {
    numbers
        .iter()
        .map(|n| format!("#{}", n))
        .collect::<Vec<_>>()
        .join(", ")
}
