//! SampleTable - concurrent upsert-or-merge store
//!
//! The table is the single structure mutated by every producer task, so its
//! concurrency discipline matters more than anything else in this crate.
//! `DashMap` shards the key space; `entry()` takes only the owning shard's
//! lock, which makes upsert-or-merge atomic per key while upserts on
//! distinct keys proceed in parallel.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use thiserror::Error;

use crate::key::SampleKey;
use crate::sample::{Sample, SampleError};

/// Sample table errors
#[derive(Debug, Error)]
pub enum TableError {
    /// An incoming sample could not be merged into the existing entry
    #[error("merge failed: {0}")]
    Merge(#[from] SampleError),
}

/// Concurrent key -> sample store with merge-on-collision semantics.
///
/// # Consistency
///
/// - `upsert_merge` is atomic per key: concurrent upserts on one key never
///   lose an update
/// - `range` is not a snapshot; entries mutated during a pass may be seen
///   in a partially-updated state
/// - `clear` gives no ordering guarantee against in-flight upserts; callers
///   needing a clean cut must serialize externally
#[derive(Debug, Default)]
pub struct SampleTable {
    map: DashMap<SampleKey, Sample>,
}

impl SampleTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
        }
    }

    /// Insert the sample, or merge it into the existing entry for its key.
    pub fn upsert_merge(&self, sample: Sample) -> Result<(), TableError> {
        match self.map.entry(sample.key().clone()) {
            Entry::Occupied(mut existing) => existing.get_mut().merge(&sample)?,
            Entry::Vacant(slot) => {
                slot.insert(sample);
            }
        }
        Ok(())
    }

    /// Approximate count of distinct keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when no entries are present.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Invoke `visit` once per entry.
    pub fn range(&self, mut visit: impl FnMut(&Sample)) {
        for entry in self.map.iter() {
            visit(entry.value());
        }
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.map.clear();
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;
