//! On-disk cache data model
//!
//! The cache maps entry name to an [`EntryRecord`]: the last-known
//! modification timestamp of every dependency file observed for that entry.
//! A record's key set IS the previously known dependency set, so membership
//! is as meaningful as the timestamps themselves.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Sentinel timestamp for a file that could not be stat-ed
pub const MISSING_MTIME: i64 = -1;

/// Dependency path → last-known mtime in milliseconds since epoch
pub type EntryRecord = BTreeMap<PathBuf, i64>;

/// Persisted cache: entry name → dependency timestamp record
///
/// Serializes transparently as a single JSON object. `BTreeMap` keeps the
/// document stable across writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cache {
    entries: BTreeMap<String, EntryRecord>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached record for an entry, if one exists
    pub fn entry(&self, name: &str) -> Option<&EntryRecord> {
        self.entries.get(name)
    }

    /// Replace an entry's record as a whole. Records are never field-patched.
    pub fn insert(&mut self, name: String, record: EntryRecord) {
        self.entries.insert(name, record);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Transient pairing of an entry name with its resolved dependency file set
///
/// Produced by the host build graph after module resolution completes and
/// consumed once to regenerate the cache. The set deduplicates paths.
#[derive(Debug, Clone)]
pub struct EntryPointInfo {
    pub name: String,
    pub dependency_set: BTreeSet<PathBuf>,
}

impl EntryPointInfo {
    pub fn new<I, P>(name: impl Into<String>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            name: name.into(),
            dependency_set: dependencies.into_iter().map(Into::into).collect(),
        }
    }
}
