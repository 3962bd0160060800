//! Stored record representation

use rustc_hash::FxHashMap;
use tidemark_core::{Generation, NanoTime, Value};

/// A record as held by the storage engine.
///
/// `last_update_time` is stamped on every write and is the comparison
/// key for truncation. The generation counter tracks overwrites; it
/// restarts at 1 when a write lands on a logically-truncated record.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    /// Named payload bins
    pub bins: FxHashMap<String, Value>,
    /// Write counter
    pub generation: Generation,
    /// Timestamp of the most recent write
    pub last_update_time: NanoTime,
}

impl StoredRecord {
    /// Create a record from its first write.
    pub fn new(bins: FxHashMap<String, Value>, last_update_time: NanoTime) -> Self {
        StoredRecord {
            bins,
            generation: Generation::INITIAL,
            last_update_time,
        }
    }

    /// Produce the record state after an overwrite.
    pub fn overwritten(&self, bins: FxHashMap<String, Value>, last_update_time: NanoTime) -> Self {
        StoredRecord {
            bins,
            generation: self.generation.bump(),
            last_update_time,
        }
    }

    /// Look up a bin by name.
    pub fn bin(&self, name: &str) -> Option<&Value> {
        self.bins.get(name)
    }
}
