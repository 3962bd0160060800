//! Tidemark engine orchestration
//!
//! Ties the storage layer together into a running engine: a strictly
//! monotonic write clock, the truncate admin path with its epoch and
//! future guards, and the reclamation scanner lifecycle.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod admin;
pub mod clock;
pub mod config;
pub mod engine;

pub use admin::{AdminRequestHandler, TruncateCommand, TruncatePhase, TruncateReceipt};
pub use clock::WriteClock;
pub use config::{EngineConfig, InfoPolicy, CONFIG_FILE_NAME};
pub use engine::Engine;
