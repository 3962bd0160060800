//! Watermark snapshot persistence
//!
//! The watermark registry is tiny (one u64 per truncated container) and
//! write-rare (one update per truncate call), so durability is a full
//! snapshot rewrite rather than a log: serialize all entries with
//! bincode, write to a temp file, fsync, then atomically rename into
//! place. A crash mid-write leaves the previous snapshot intact.

use crate::watermark::ContainerKey;
use parking_lot::Mutex;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tidemark_core::Result;

/// Atomically-replaced snapshot file holding the watermark registry.
pub struct SnapshotFile {
    path: PathBuf,
    // Serializes writers so the last snapshot on disk always contains
    // every accepted advance (the export runs under this lock).
    write_lock: Mutex<()>,
}

impl SnapshotFile {
    /// Create a handle for the snapshot at `path`. The file need not
    /// exist yet.
    pub fn new(path: PathBuf) -> Self {
        SnapshotFile {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// Load the persisted entries; an absent file is an empty registry.
    pub fn load(&self) -> Result<Vec<(ContainerKey, u64)>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let bytes = fs::read(&self.path)?;
        let entries = bincode::deserialize(&bytes)?;
        Ok(entries)
    }

    /// Persist a snapshot produced by `export`.
    ///
    /// The export closure runs under the write lock, so concurrent
    /// callers cannot interleave a stale snapshot after a fresher one.
    pub fn store<F>(&self, export: F) -> Result<()>
    where
        F: FnOnce() -> Vec<(ContainerKey, u64)>,
    {
        let _guard = self.write_lock.lock();
        let entries = export();
        let bytes = bincode::serialize(&entries)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        {
            let mut file = File::create(&tmp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;

        // The rename is only durable once the directory entry is; sync
        // the parent as well.
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                File::open(parent)?.sync_all()?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for SnapshotFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotFile")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidemark_core::{Namespace, SetName};

    fn key(ns: &str, set: Option<&str>) -> ContainerKey {
        ContainerKey {
            namespace: Namespace::new(ns).unwrap(),
            set: set.map(|s| SetName::new(s).unwrap()),
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = SnapshotFile::new(dir.path().join("none.bin"));
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn test_store_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let file = SnapshotFile::new(dir.path().join("marks.bin"));

        let entries = vec![
            (key("test", None), 100u64),
            (key("test", Some("truncate")), 250u64),
        ];
        let stored = entries.clone();
        file.store(move || stored).unwrap();

        let loaded = file.load().unwrap();
        assert_eq!(loaded, entries);
    }

    #[test]
    fn test_store_replaces_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let file = SnapshotFile::new(dir.path().join("marks.bin"));

        file.store(|| vec![(key("a", None), 1)]).unwrap();
        file.store(|| vec![(key("a", None), 2)]).unwrap();

        let loaded = file.load().unwrap();
        assert_eq!(loaded, vec![(key("a", None), 2)]);
    }

    #[test]
    fn test_store_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = SnapshotFile::new(dir.path().join("nested/deeper/marks.bin"));
        file.store(|| vec![(key("a", None), 7)]).unwrap();
        assert_eq!(file.load().unwrap().len(), 1);
    }

    #[test]
    fn test_no_tmp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("marks.bin");
        let file = SnapshotFile::new(path.clone());
        file.store(|| vec![(key("a", None), 1)]).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }
}
