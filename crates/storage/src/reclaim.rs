//! Watermark reclamation background task
//!
//! This module provides ReclamationScanner that runs in a background
//! thread and periodically evicts records already suppressed by the
//! watermark registry, reclaiming their physical space.
//!
//! # Design Notes
//!
//! - Eviction is cosmetic: suppressed records are invisible from the
//!   moment the registry advances, so a pass can run at any pace
//! - Bounded work per pass (max_records_per_pass) keeps shard write
//!   guards short-lived
//! - Per-container progress marks skip containers already reclaimed up
//!   to their current watermark
//! - Graceful shutdown via atomic flag

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use dashmap::DashMap;
use tracing::{debug, trace};

use crate::store::RecordStore;
use crate::watermark::{ContainerKey, WatermarkRegistry};

/// Scanner tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct ScannerConfig {
    /// How often to run a reclamation pass
    pub sweep_interval: Duration,
    /// Physical evictions allowed per pass, across all containers
    pub max_records_per_pass: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            sweep_interval: Duration::from_millis(500),
            max_records_per_pass: 10_000,
        }
    }
}

/// What one reclamation pass accomplished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Containers inspected this pass
    pub containers_visited: usize,
    /// Containers skipped because they were already reclaimed up to
    /// their current watermark
    pub containers_skipped: usize,
    /// Records physically evicted
    pub records_removed: usize,
    /// True when the per-pass budget ran out before all containers
    /// were fully swept
    pub budget_exhausted: bool,
}

/// Background reclamation task
///
/// Periodically walks the registry's containers and evicts records
/// whose last-update time falls at or below the container's watermark.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use tidemark_storage::{RecordStore, ReclamationScanner, ScannerConfig, WatermarkRegistry};
///
/// let registry = Arc::new(WatermarkRegistry::in_memory());
/// let store = Arc::new(RecordStore::new(Arc::clone(&registry)));
/// let scanner = ReclamationScanner::new(Arc::clone(&store), ScannerConfig::default());
/// let handle = scanner.start();
///
/// // ... use the store ...
///
/// scanner.shutdown();
/// handle.join().unwrap();
/// ```
pub struct ReclamationScanner {
    store: Arc<RecordStore>,
    config: ScannerConfig,
    /// Per-container watermark value up to which physical eviction is
    /// known complete; a container is skipped while its mark has not
    /// moved past this
    progress: Arc<DashMap<ContainerKey, u64>>,
    /// Shutdown signal
    shutdown: Arc<AtomicBool>,
}

impl ReclamationScanner {
    /// Create a scanner over `store`; no thread starts until `start()`.
    pub fn new(store: Arc<RecordStore>, config: ScannerConfig) -> Self {
        ReclamationScanner {
            store,
            config,
            progress: Arc::new(DashMap::new()),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the background reclamation task
    ///
    /// Returns a JoinHandle for the scanner thread. The thread runs
    /// until `shutdown()` is called.
    pub fn start(&self) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let progress = Arc::clone(&self.progress);
        let shutdown = Arc::clone(&self.shutdown);
        let config = self.config;

        thread::Builder::new()
            .name("tidemark-reclaim".to_string())
            .spawn(move || {
                while !shutdown.load(Ordering::Relaxed) {
                    // Sleep first (don't sweep immediately on start).
                    // Use smaller sleep intervals to check shutdown
                    // more frequently.
                    let sleep_interval = Duration::from_millis(50).min(config.sweep_interval);
                    let mut elapsed = Duration::ZERO;

                    while elapsed < config.sweep_interval {
                        if shutdown.load(Ordering::Relaxed) {
                            return;
                        }
                        thread::sleep(sleep_interval);
                        elapsed += sleep_interval;
                    }

                    let report = sweep_once(&store, &progress, config.max_records_per_pass);
                    if report.records_removed > 0 {
                        debug!(
                            removed = report.records_removed,
                            visited = report.containers_visited,
                            exhausted = report.budget_exhausted,
                            "reclamation pass"
                        );
                    }
                }
            })
            .expect("failed to spawn reclamation thread")
    }

    /// Run one reclamation pass on the calling thread.
    ///
    /// Useful for deterministic tests and for forcing reclamation
    /// without waiting for the next interval.
    pub fn run_pass(&self) -> SweepReport {
        sweep_once(&self.store, &self.progress, self.config.max_records_per_pass)
    }

    /// Signal shutdown (for graceful termination)
    ///
    /// After calling this, the background thread exits on its next
    /// shutdown check.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Check if shutdown has been signaled
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }
}

/// One bounded pass over every container the registry knows about.
fn sweep_once(
    store: &RecordStore,
    progress: &DashMap<ContainerKey, u64>,
    max_records: usize,
) -> SweepReport {
    let registry: &Arc<WatermarkRegistry> = store.registry();
    let mut report = SweepReport::default();
    let mut remaining = max_records;

    for (container, mark) in registry.export() {
        let reclaimed_up_to = progress.get(&container).map(|p| *p).unwrap_or(0);
        if mark <= reclaimed_up_to {
            report.containers_skipped += 1;
            continue;
        }

        if remaining == 0 {
            report.budget_exhausted = true;
            break;
        }

        report.containers_visited += 1;
        trace!(%container, mark, "sweeping container");

        let outcome = store.sweep_container(&container, remaining);
        report.records_removed += outcome.removed;
        remaining -= outcome.removed;

        if outcome.exhausted {
            // Suppressed records may remain; retry from the same
            // progress point next pass.
            report.budget_exhausted = true;
            break;
        }
        progress.insert(container, mark);
    }

    report
}
