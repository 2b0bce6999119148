//! Workflow plumbing around the changelog engine

mod changelog;

pub use changelog::*;
