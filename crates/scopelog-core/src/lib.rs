//! Scopelog Core - Core library for release changelogs
//!
//! This crate provides the error taxonomy, configuration (including the
//! scope-to-bucket table) and the file plumbing shared by the changelog
//! engine and the CLI.

pub mod config;
pub mod error;
pub mod workflow;

pub use config::{Bucket, BucketTable, Config, NarrativeConfig};
pub use error::{ChangelogError, ConfigError, Result, ScopelogError};
