//! Error taxonomy for Tidemark
//!
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations. The variants preserve the client/server validation
//! split: `TypeArgument`, `RangeOverflow` and `RangeUnderflow` are raised
//! locally before any engine interaction; `ServerDomain` is only raised by
//! the engine, which alone knows the store epoch and authoritative "now".
//! The two sides are never collapsed into one variant — callers are
//! expected to tell them apart.

use std::io;
use thiserror::Error;

/// Result type alias for Tidemark operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the Tidemark storage engine
#[derive(Debug, Error)]
pub enum Error {
    /// Caller supplied a value of the wrong kind (wrong namespace/set
    /// type, wrong threshold type, missing required argument).
    /// Detected locally; never reaches the engine.
    #[error("invalid argument type: {0}")]
    TypeArgument(String),

    /// Threshold exceeds the representable 64-bit nanosecond range.
    /// Detected locally; never retried.
    #[error("threshold out of range: {0}")]
    RangeOverflow(String),

    /// Threshold is negative. Detected locally; never retried.
    #[error("threshold is negative: {0}")]
    RangeUnderflow(String),

    /// Threshold is syntactically valid but semantically invalid at the
    /// server (before the store epoch, or in the future). Retrying with
    /// the same threshold would fail identically.
    #[error("server rejected threshold: {0}")]
    ServerDomain(String),

    /// The synchronous watermark-update step exceeded the caller's
    /// info policy deadline. The watermark was not modified.
    #[error("operation timed out: {0}")]
    Timeout(String),

    /// I/O error (watermark snapshot file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl Error {
    /// True for errors detected locally before any engine interaction.
    pub fn is_client_side(&self) -> bool {
        matches!(
            self,
            Error::TypeArgument(_) | Error::RangeOverflow(_) | Error::RangeUnderflow(_)
        )
    }
}
