//! Engine facade
//!
//! Owns the watermark registry, the record store, the write clock, and
//! the reclamation scanner's lifecycle. Record writes are stamped by
//! the engine's clock; truncation goes through `truncate()`, which
//! applies the epoch and future guards before advancing the registry.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::info;

use tidemark_core::{Error, Generation, NanoTime, Namespace, RecordKey, Result, SetName, Value, STORE_EPOCH};
use tidemark_storage::{
    ContainerKey, ReclamationScanner, RecordStore, ScannerConfig, StoredRecord, SweepReport,
    WatermarkRegistry,
};

use crate::clock::WriteClock;
use crate::config::{EngineConfig, CONFIG_FILE_NAME};

/// A running Tidemark engine.
pub struct Engine {
    store: Arc<RecordStore>,
    registry: Arc<WatermarkRegistry>,
    clock: WriteClock,
    scanner: ReclamationScanner,
    scanner_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Engine {
    /// Open an engine with the given configuration.
    ///
    /// When `watermark_path` is set, previously persisted watermarks
    /// are loaded so truncation survives restart.
    pub fn open(config: EngineConfig) -> Result<Self> {
        let registry = match &config.watermark_path {
            Some(path) => Arc::new(WatermarkRegistry::open(PathBuf::from(path))?),
            None => Arc::new(WatermarkRegistry::in_memory()),
        };
        let store = Arc::new(RecordStore::new(Arc::clone(&registry)));
        let scanner = ReclamationScanner::new(
            Arc::clone(&store),
            ScannerConfig {
                sweep_interval: config.sweep_interval(),
                max_records_per_pass: config.max_records_per_pass,
            },
        );
        info!(
            watermarks = registry.len(),
            sweep_interval_ms = config.sweep_interval_ms,
            "engine opened"
        );
        Ok(Engine {
            store,
            registry,
            clock: WriteClock::new(),
            scanner,
            scanner_handle: Mutex::new(None),
        })
    }

    /// Open an engine rooted at a data directory.
    ///
    /// Creates the directory and a default `tidemark.toml` on first
    /// open, then loads settings from the file. A relative
    /// `watermark_path` in the config resolves against the directory.
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let config_path = dir.join(CONFIG_FILE_NAME);
        EngineConfig::write_default_if_missing(&config_path)?;
        let mut config = EngineConfig::from_file(&config_path)?;
        if let Some(path) = config.watermark_path.take() {
            config.watermark_path = Some(if path.is_relative() {
                dir.join(path)
            } else {
                path
            });
        }
        Engine::open(config)
    }

    /// Open with defaults and no watermark persistence.
    pub fn open_in_memory() -> Self {
        // Infallible: no snapshot file to load
        Engine::open(EngineConfig::default()).expect("in-memory open cannot fail")
    }

    /// Start the background reclamation scanner. Idempotent.
    pub fn start_reclamation(&self) {
        let mut handle = self.scanner_handle.lock();
        if handle.is_none() {
            *handle = Some(self.scanner.start());
        }
    }

    /// Run one reclamation pass synchronously.
    pub fn run_reclamation_pass(&self) -> SweepReport {
        self.scanner.run_pass()
    }

    /// Write a record, stamping it with the engine clock.
    pub fn put(&self, key: RecordKey, bins: FxHashMap<String, Value>) -> Generation {
        self.store.put(key, bins, self.clock.tick())
    }

    /// Read a record; truncated records read as absent.
    pub fn get(&self, key: &RecordKey) -> Option<StoredRecord> {
        self.store.get(key)
    }

    /// Visibility-filtered existence check.
    pub fn exists(&self, key: &RecordKey) -> bool {
        self.store.exists(key)
    }

    /// Remove a record; removing a truncated record reports not-found.
    pub fn remove(&self, key: &RecordKey) -> Option<StoredRecord> {
        self.store.remove(key)
    }

    /// Truncate a namespace or set: every record whose last-update
    /// time is at or below `threshold` becomes invisible at once.
    ///
    /// A zero threshold means "now": it resolves to the engine clock
    /// at processing time, so writes ticked after this call survive.
    /// Returns the watermark that now governs the container.
    ///
    /// # Errors
    ///
    /// `Error::ServerDomain` when a nonzero threshold falls before the
    /// store epoch (2010-01-01) or after the current clock reading.
    pub fn truncate(
        &self,
        namespace: &Namespace,
        set: Option<&SetName>,
        threshold: NanoTime,
    ) -> Result<u64> {
        let resolved = if threshold.as_nanos() == 0 {
            // Sentinel: truncate everything written up to this instant.
            // Ticking (not peeking) guarantees later writes are strictly
            // newer than the watermark.
            self.clock.tick()
        } else {
            if threshold.is_before(STORE_EPOCH) {
                return Err(Error::ServerDomain(format!(
                    "truncate threshold {} predates the store epoch {}",
                    threshold, STORE_EPOCH
                )));
            }
            let now = self.clock.peek();
            if threshold.is_after(now) {
                return Err(Error::ServerDomain(format!(
                    "truncate threshold {} is in the future (now {})",
                    threshold, now
                )));
            }
            threshold
        };

        let container = match set {
            Some(set) => ContainerKey::set_level(namespace.clone(), set.clone()),
            None => ContainerKey::namespace_level(namespace.clone()),
        };
        let applied = self.registry.advance(container.clone(), resolved.as_nanos())?;
        info!(%container, watermark = applied, "truncate applied");
        Ok(applied)
    }

    /// The store backing this engine.
    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    /// The watermark registry backing this engine.
    pub fn registry(&self) -> &Arc<WatermarkRegistry> {
        &self.registry
    }

    /// The engine's write clock.
    pub fn clock(&self) -> &WriteClock {
        &self.clock
    }

    /// Stop the reclamation scanner and wait for it to exit.
    pub fn shutdown(&self) {
        self.scanner.shutdown();
        if let Some(handle) = self.scanner_handle.lock().take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("store", &self.store)
            .field("watermarks", &self.registry.len())
            .finish()
    }
}
