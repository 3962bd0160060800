//! Storage layer for Tidemark
//!
//! This crate implements the truncation-by-watermark mechanism around a
//! sharded record store:
//! - WatermarkRegistry: per-container truncation thresholds with atomic
//!   compare-and-max update and optional snapshot persistence
//! - Visibility filter: the cheap "is this record logically truncated?"
//!   predicate consulted on every record touch
//! - RecordStore: DashMap-sharded record storage (per-namespace shards,
//!   FxHashMap within)
//! - ReclamationScanner: throttled background sweep that physically
//!   evicts suppressed records

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod persist;
pub mod reclaim;
pub mod record;
pub mod store;
pub mod visibility;
pub mod watermark;

pub use persist::SnapshotFile;
pub use reclaim::{ReclamationScanner, ScannerConfig, SweepReport};
pub use record::StoredRecord;
pub use store::{RecordStore, SweepOutcome};
pub use visibility::is_truncated;
pub use watermark::{ContainerKey, WatermarkRegistry};
