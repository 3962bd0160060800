//! Tidemark — record-oriented storage with truncation by watermark
//!
//! Truncation here is a metadata operation: instead of deleting
//! records one by one, an admin call advances a per-container
//! watermark and every record last written at or before it becomes
//! invisible at once. A background scanner reclaims the physical
//! space later, at its own pace.
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//! use tidemarkdb::{Arg, Client, Engine, Namespace, SetName, Value};
//!
//! let engine = Arc::new(Engine::open_in_memory());
//! let client = Client::new(engine);
//!
//! let ns = Namespace::new("test").unwrap();
//! let set = SetName::new("demo").unwrap();
//!
//! let mut bins = tidemarkdb::Bins::default();
//! bins.insert("greeting".to_string(), Value::from("hello"));
//! client.put(&ns, &set, "key-1", bins);
//!
//! // Truncate the set as of "now"; the record disappears immediately.
//! client
//!     .truncate(&Arg::from("test"), &Arg::from("demo"), &Arg::Int(0), None)
//!     .unwrap();
//! assert!(!client.exists(&ns, &set, "key-1"));
//! ```
//!
//! # Crates
//!
//! - `tidemark-core` — shared types: errors, time, names, values
//! - `tidemark-storage` — watermark registry, record store, visibility
//!   filter, reclamation scanner
//! - `tidemark-engine` — engine lifecycle, write clock, truncate admin
//!   path, configuration
//! - `tidemark-client` — loosely-typed argument surface and guards

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use tidemark_core::{
    Error, Generation, KeyDigest, NanoTime, Namespace, RecordKey, Result, SetName, Value,
    STORE_EPOCH,
};

pub use tidemark_storage::{
    is_truncated, ContainerKey, ReclamationScanner, RecordStore, ScannerConfig, SnapshotFile,
    StoredRecord, SweepOutcome, SweepReport, WatermarkRegistry,
};

pub use tidemark_engine::{
    AdminRequestHandler, Engine, EngineConfig, InfoPolicy, TruncateCommand, TruncatePhase,
    TruncateReceipt, WriteClock,
};

pub use tidemark_client::{
    namespace_arg, parse_truncate_args, set_arg, threshold_arg, Arg, Client, TruncateArgs,
};

/// Bin map type used for record payloads.
pub type Bins = rustc_hash::FxHashMap<String, Value>;
