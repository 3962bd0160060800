//! Watermark registry
//!
//! Process-wide truncation state: for each (namespace) and each
//! (namespace, set) container, the highest truncation threshold ever
//! accepted. Entries are created lazily on the first truncate call for a
//! container and never implicitly deleted.
//!
//! # Concurrency
//!
//! - Reads are one lock-free DashMap probe per level (hot path: one call
//!   per record touch).
//! - Updates use `AtomicU64::fetch_max`, so two racing truncate calls on
//!   the same container can never lose the larger threshold, and a
//!   smaller or equal threshold is an accepted no-op.
//! - Updates are immediately visible to the visibility filter; there is
//!   no cached or batched snapshot in the read path.

use crate::persist::SnapshotFile;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use tidemark_core::{Namespace, Result, SetName};

/// Registry key: a namespace, or a set within a namespace.
///
/// `set = None` is the namespace-level container; its watermark
/// suppresses every record in the namespace regardless of set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerKey {
    /// Namespace the watermark applies to
    pub namespace: Namespace,
    /// Set within the namespace; `None` means the whole namespace
    pub set: Option<SetName>,
}

impl ContainerKey {
    /// Key for a namespace-level watermark.
    pub fn namespace_level(namespace: Namespace) -> Self {
        ContainerKey {
            namespace,
            set: None,
        }
    }

    /// Key for a set-level watermark.
    pub fn set_level(namespace: Namespace, set: SetName) -> Self {
        ContainerKey {
            namespace,
            set: Some(set),
        }
    }
}

impl std::fmt::Display for ContainerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.set {
            Some(set) => write!(f, "{}:{}", self.namespace, set),
            None => write!(f, "{}", self.namespace),
        }
    }
}

/// Per-container truncation watermarks with atomic max-update.
///
/// A watermark of 0 means "no truncation" for that container. Stored
/// values are nanoseconds since the Unix epoch (the same unit as record
/// `last_update_time`).
pub struct WatermarkRegistry {
    marks: DashMap<ContainerKey, AtomicU64>,
    snapshot: Option<SnapshotFile>,
    // Serializes file-backed advances: the candidate mark must hit
    // disk before it becomes visible, and the snapshot on disk must
    // never be missing an already-visible mark.
    advance_lock: Mutex<()>,
}

impl WatermarkRegistry {
    /// Create an in-memory registry with no crash persistence.
    pub fn in_memory() -> Self {
        WatermarkRegistry {
            marks: DashMap::new(),
            snapshot: None,
            advance_lock: Mutex::new(()),
        }
    }

    /// Open a registry backed by a snapshot file, restoring any
    /// previously persisted watermarks.
    pub fn open(path: PathBuf) -> Result<Self> {
        let snapshot = SnapshotFile::new(path);
        let marks = DashMap::new();
        for (container, mark) in snapshot.load()? {
            marks.insert(container, AtomicU64::new(mark));
        }
        Ok(WatermarkRegistry {
            marks,
            snapshot: Some(snapshot),
            advance_lock: Mutex::new(()),
        })
    }

    /// Read the watermark for one container (0 = no truncation).
    pub fn get(&self, container: &ContainerKey) -> u64 {
        self.marks
            .get(container)
            .map(|m| m.load(Ordering::Acquire))
            .unwrap_or(0)
    }

    /// Effective watermark for a record in (namespace, set): the larger
    /// of the namespace-level and set-level marks.
    pub fn effective(&self, namespace: &Namespace, set: &SetName) -> u64 {
        let ns_mark = self.get(&ContainerKey::namespace_level(namespace.clone()));
        let set_mark = self.get(&ContainerKey::set_level(namespace.clone(), set.clone()));
        ns_mark.max(set_mark)
    }

    /// Advance a container's watermark to `max(existing, threshold)`.
    ///
    /// Returns the watermark in effect afterwards. Atomic with respect
    /// to concurrent advances on the same container; a smaller or equal
    /// threshold is accepted but has no additional effect.
    ///
    /// When the registry is file-backed, the candidate mark is written
    /// to the snapshot *before* it becomes visible to the filter: a
    /// failed write returns an error and leaves the watermark exactly
    /// where it was, and a successful return means the mark is durable.
    pub fn advance(&self, container: ContainerKey, threshold: u64) -> Result<u64> {
        if self.snapshot.is_some() {
            let _guard = self.advance_lock.lock();
            let candidate = self.get(&container).max(threshold);
            if let Some(snapshot) = &self.snapshot {
                snapshot.store(|| self.export_with(&container, candidate))?;
            }
            Ok(self.apply(container, threshold))
        } else {
            Ok(self.apply(container, threshold))
        }
    }

    /// Publish a mark into the in-memory map.
    fn apply(&self, container: ContainerKey, threshold: u64) -> u64 {
        let entry = self
            .marks
            .entry(container)
            .or_insert_with(|| AtomicU64::new(0));
        let prev = entry.fetch_max(threshold, Ordering::AcqRel);
        prev.max(threshold)
    }

    /// Current nonzero marks with `container` raised to at least `mark`.
    fn export_with(&self, container: &ContainerKey, mark: u64) -> Vec<(ContainerKey, u64)> {
        let mut entries = self.export();
        match entries.iter_mut().find(|(c, _)| c == container) {
            Some((_, existing)) => *existing = (*existing).max(mark),
            None if mark > 0 => entries.push((container.clone(), mark)),
            None => {}
        }
        entries
    }

    /// All (container, watermark) pairs with a nonzero mark.
    pub fn export(&self) -> Vec<(ContainerKey, u64)> {
        self.marks
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().load(Ordering::Acquire)))
            .filter(|(_, mark)| *mark > 0)
            .collect()
    }

    /// Number of containers with a registered watermark.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// True when no watermark has ever been registered.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

impl std::fmt::Debug for WatermarkRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkRegistry")
            .field("containers", &self.marks.len())
            .field("persistent", &self.snapshot.is_some())
            .finish()
    }
}
