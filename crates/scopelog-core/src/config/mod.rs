//! Configuration system for Scopelog

mod buckets;
pub mod defaults;
mod loader;
mod types;
pub mod validation;

pub use buckets::{Bucket, BucketTable};
pub use defaults::*;
pub use loader::*;
pub use types::*;
pub use validation::*;
