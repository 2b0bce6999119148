//! Changelog input and output files

use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{ChangelogError, Result};

/// Parse a commit log into individual commit messages.
///
/// When the whole input is a JSON array of strings, each element is one full
/// message, bodies included. Anything else, including subjects that merely
/// start with a bracketed tag, is treated as `git log --pretty=%s` output:
/// one subject per line, blank lines ignored.
pub fn parse_commit_log(text: &str) -> Vec<String> {
    if text.trim_start().starts_with('[') {
        match serde_json::from_str::<Vec<String>>(text) {
            Ok(messages) => {
                debug!(count = messages.len(), "parsed commit messages from JSON");
                return messages;
            }
            Err(e) => debug!(error = %e, "input is not a JSON array, reading lines"),
        }
    }

    let messages: Vec<String> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.trim_end().to_string())
        .collect();
    debug!(count = messages.len(), "parsed commit messages from lines");
    messages
}

/// Read commit messages from a file, or from stdin when no path is given
pub fn read_commit_messages(path: Option<&Path>) -> Result<Vec<String>> {
    let content = match path {
        Some(path) => {
            if !path.exists() {
                return Err(ChangelogError::InputNotFound(path.to_path_buf()).into());
            }
            info!(path = %path.display(), "reading commit messages");
            std::fs::read_to_string(path).map_err(ChangelogError::Io)?
        }
        None => {
            info!("reading commit messages from stdin");
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(ChangelogError::Io)?;
            buf
        }
    };

    Ok(parse_commit_log(&content))
}

/// Write changelog to file, replacing any previous content
pub fn write_changelog(path: &Path, content: &str) -> Result<()> {
    info!(path = %path.display(), bytes = content.len(), "writing changelog");
    std::fs::write(path, content).map_err(|e| ChangelogError::WriteFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(())
}
