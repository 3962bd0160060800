//! Sharded record store
//!
//! DashMap keyed by namespace, FxHashMap within each shard — the same
//! shape as the engine's other hot-path maps. Reads are lock-free at the
//! DashMap level; writes lock only the target namespace's shard.
//!
//! Every operation consults the visibility filter against the live
//! watermark registry, so a truncate call takes logical effect the
//! moment the registry advances, long before the reclamation scanner
//! physically evicts anything.

use crate::record::StoredRecord;
use crate::visibility::is_truncated;
use crate::watermark::{ContainerKey, WatermarkRegistry};
use dashmap::DashMap;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tidemark_core::{Generation, NanoTime, Namespace, RecordKey, SetName, Value};

/// Per-namespace shard
#[derive(Debug, Default)]
struct Shard {
    data: FxHashMap<RecordKey, StoredRecord>,
}

/// Result of one bounded sweep over a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Records physically removed by this sweep
    pub removed: usize,
    /// True when the record budget ran out with suppressed records
    /// possibly remaining — the caller must not advance its low
    /// watermark for the container
    pub exhausted: bool,
}

/// Visibility-filtered record storage, sharded by namespace.
pub struct RecordStore {
    shards: DashMap<Namespace, Shard>,
    registry: Arc<WatermarkRegistry>,
}

impl RecordStore {
    /// Create a store that filters visibility through `registry`.
    pub fn new(registry: Arc<WatermarkRegistry>) -> Self {
        RecordStore {
            shards: DashMap::new(),
            registry,
        }
    }

    /// The watermark registry this store filters through.
    pub fn registry(&self) -> &Arc<WatermarkRegistry> {
        &self.registry
    }

    /// Write a record.
    ///
    /// Overwriting a visible record bumps its generation; overwriting a
    /// logically-truncated record is a fresh write and restarts the
    /// generation at 1. Returns the resulting generation.
    pub fn put(
        &self,
        key: RecordKey,
        bins: FxHashMap<String, Value>,
        last_update_time: NanoTime,
    ) -> Generation {
        let mut shard = self.shards.entry(key.namespace.clone()).or_default();
        let replaced = match shard.data.get(&key) {
            Some(existing)
                if !is_truncated(
                    &self.registry,
                    &key.namespace,
                    &key.set,
                    existing.last_update_time,
                ) =>
            {
                existing.overwritten(bins, last_update_time)
            }
            _ => StoredRecord::new(bins, last_update_time),
        };
        let generation = replaced.generation;
        shard.data.insert(key, replaced);
        generation
    }

    /// Read a record; logically-truncated records read as absent.
    pub fn get(&self, key: &RecordKey) -> Option<StoredRecord> {
        self.shards.get(&key.namespace).and_then(|shard| {
            shard.data.get(key).and_then(|record| {
                if is_truncated(
                    &self.registry,
                    &key.namespace,
                    &key.set,
                    record.last_update_time,
                ) {
                    None
                } else {
                    Some(record.clone())
                }
            })
        })
    }

    /// Existence check with the same visibility semantics as `get`.
    pub fn exists(&self, key: &RecordKey) -> bool {
        self.shards
            .get(&key.namespace)
            .map(|shard| {
                shard.data.get(key).is_some_and(|record| {
                    !is_truncated(
                        &self.registry,
                        &key.namespace,
                        &key.set,
                        record.last_update_time,
                    )
                })
            })
            .unwrap_or(false)
    }

    /// Remove a record.
    ///
    /// Physically drops the entry either way; returns the record only
    /// when it was visible (removing a truncated record reports
    /// not-found, since the caller could not have observed it).
    pub fn remove(&self, key: &RecordKey) -> Option<StoredRecord> {
        let mut shard = self.shards.get_mut(&key.namespace)?;
        let record = shard.data.remove(key)?;
        if is_truncated(
            &self.registry,
            &key.namespace,
            &key.set,
            record.last_update_time,
        ) {
            None
        } else {
            Some(record)
        }
    }

    /// Count visible records in a namespace, optionally scoped to a set.
    pub fn count_visible(&self, namespace: &Namespace, set: Option<&SetName>) -> usize {
        self.shards
            .get(namespace)
            .map(|shard| {
                shard
                    .data
                    .iter()
                    .filter(|(k, _)| set.map_or(true, |s| s == &k.set))
                    .filter(|(k, r)| {
                        !is_truncated(&self.registry, namespace, &k.set, r.last_update_time)
                    })
                    .count()
            })
            .unwrap_or(0)
    }

    /// Count physically-present records (including suppressed ones not
    /// yet reclaimed), optionally scoped to a set.
    pub fn physical_count(&self, namespace: &Namespace, set: Option<&SetName>) -> usize {
        self.shards
            .get(namespace)
            .map(|shard| {
                shard
                    .data
                    .keys()
                    .filter(|k| set.map_or(true, |s| s == &k.set))
                    .count()
            })
            .unwrap_or(0)
    }

    /// True when the namespace holds any record, visible or not.
    pub fn namespace_exists(&self, namespace: &Namespace) -> bool {
        self.shards
            .get(namespace)
            .map(|shard| !shard.data.is_empty())
            .unwrap_or(false)
    }

    /// True when the set holds any record, visible or not.
    pub fn set_exists(&self, namespace: &Namespace, set: &SetName) -> bool {
        self.physical_count(namespace, Some(set)) > 0
    }

    /// Physically evict suppressed records within one container scope,
    /// removing at most `budget` records.
    ///
    /// Idempotent: re-sweeping a fully reclaimed container removes
    /// nothing. Holds the namespace shard's write guard for the
    /// duration of the (bounded) walk.
    pub fn sweep_container(&self, container: &ContainerKey, budget: usize) -> SweepOutcome {
        let Some(mut shard) = self.shards.get_mut(&container.namespace) else {
            return SweepOutcome {
                removed: 0,
                exhausted: false,
            };
        };

        let mut victims = Vec::new();
        let mut exhausted = false;
        for (key, record) in shard.data.iter() {
            let in_scope = match &container.set {
                Some(set) => set == &key.set,
                None => true,
            };
            if !in_scope {
                continue;
            }
            if is_truncated(
                &self.registry,
                &container.namespace,
                &key.set,
                record.last_update_time,
            ) {
                if victims.len() == budget {
                    exhausted = true;
                    break;
                }
                victims.push(key.clone());
            }
        }

        for key in &victims {
            shard.data.remove(key);
        }

        SweepOutcome {
            removed: victims.len(),
            exhausted,
        }
    }

    /// Total physically-present records across all namespaces.
    pub fn total_records(&self) -> usize {
        self.shards.iter().map(|entry| entry.data.len()).sum()
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("namespaces", &self.shards.len())
            .field("total_records", &self.total_records())
            .finish()
    }
}
