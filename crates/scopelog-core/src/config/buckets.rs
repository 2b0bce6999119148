//! Scope-to-bucket table
//!
//! The table maps a display bucket (e.g. "Console") to the commit scopes that
//! belong to it. Bucket order is significant: the first bucket is the default
//! bucket, and when a commit's scopes match several buckets the earliest one
//! wins. The table is therefore stored as an ordered list rather than a map,
//! and (de)serialized as a map in document order.

use std::collections::HashSet;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::error::{ConfigError, Result};

/// A named group of commit scopes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// Display name of the bucket
    pub name: String,
    /// Raw scope identifiers, as configured
    pub scopes: Vec<String>,
}

impl Bucket {
    /// Create a new bucket
    pub fn new<I, S>(name: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            scopes: scopes.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether a (lower-cased) commit scope belongs to this bucket
    pub fn contains(&self, scope: &str) -> bool {
        self.scopes
            .iter()
            .any(|s| s.trim().to_lowercase() == scope)
    }
}

/// Ordered scope-to-bucket table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketTable {
    buckets: Vec<Bucket>,
}

impl BucketTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bucket (builder style)
    pub fn with_bucket<I, S>(mut self, name: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Bucket::new(name, scopes));
        self
    }

    /// Append a bucket
    pub fn push(&mut self, bucket: Bucket) {
        self.buckets.push(bucket);
    }

    /// Parse a table from a JSON object such as `{"Api": ["api"]}` and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let table: BucketTable = serde_json::from_str(json).map_err(ConfigError::JsonError)?;
        table.validate()?;
        Ok(table)
    }

    /// Validate the table.
    ///
    /// A table needs at least one bucket (the default bucket), every bucket
    /// name must be non-empty and bucket names must be unique.
    pub fn validate(&self) -> Result<()> {
        if self.buckets.is_empty() {
            return Err(ConfigError::invalid("buckets", "at least one bucket is required").into());
        }

        let mut seen = HashSet::new();
        for (i, bucket) in self.buckets.iter().enumerate() {
            if bucket.name.trim().is_empty() {
                return Err(ConfigError::invalid(
                    format!("buckets[{}]", i),
                    "bucket name cannot be empty",
                )
                .into());
            }
            if !seen.insert(bucket.name.as_str()) {
                return Err(ConfigError::invalid(
                    format!("buckets.{}", bucket.name),
                    "bucket name is declared more than once",
                )
                .into());
            }
        }

        debug!(bucket_count = self.buckets.len(), "bucket table validated");
        Ok(())
    }

    /// The default bucket (first in table order)
    pub fn default_bucket(&self) -> Option<&Bucket> {
        self.buckets.first()
    }

    /// Look up a bucket by name
    pub fn get(&self, name: &str) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.name == name)
    }

    /// Iterate buckets in table order
    pub fn iter(&self) -> std::slice::Iter<'_, Bucket> {
        self.buckets.iter()
    }

    /// Bucket names in table order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|b| b.name.as_str())
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Check if the table has no buckets
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl<'a> IntoIterator for &'a BucketTable {
    type Item = &'a Bucket;
    type IntoIter = std::slice::Iter<'a, Bucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.iter()
    }
}

impl Serialize for BucketTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for bucket in &self.buckets {
            map.serialize_entry(&bucket.name, &bucket.scopes)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for BucketTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = BucketTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of bucket names to lists of scopes")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut table = BucketTable::new();
                while let Some((name, scopes)) = access.next_entry::<String, Vec<String>>()? {
                    table.push(Bucket { name, scopes });
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}
