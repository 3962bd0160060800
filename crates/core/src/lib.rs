//! Core types and traits for Tidemark
//!
//! This crate defines the foundational types used throughout the system:
//! - Namespace / SetName: validated container names
//! - RecordKey: composite record identity with a 20-byte digest
//! - NanoTime: nanosecond timestamp and the store epoch origin
//! - Value: unified bin value enum
//! - Error: error taxonomy shared by client and server

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod time;
pub mod types;
pub mod value;

pub use error::{Error, Result};
pub use time::{NanoTime, STORE_EPOCH};
pub use types::{Generation, KeyDigest, Namespace, RecordKey, SetName};
pub use value::Value;
