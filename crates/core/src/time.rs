//! Nanosecond-precision timestamp type
//!
//! Every record carries a `last_update_time` recorded at its most recent
//! write; truncation thresholds are expressed in the same unit. Both are
//! nanoseconds since the Unix epoch, stored as `u64`.
//!
//! ## The store epoch
//!
//! The engine's internal representation of a threshold is relative to
//! [`STORE_EPOCH`] (2010-01-01T00:00:00Z), not the Unix epoch. A nonzero
//! threshold earlier than the store epoch would produce a negative
//! internal value and is a server-side domain error — see
//! [`NanoTime::since_store_epoch`].
//!
//! The zero value is never a valid threshold: callers use `0` as the
//! "truncate as of now" sentinel, resolved server-side at request
//! processing time.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Nanosecond-precision timestamp
///
/// Represents a point in time as nanoseconds since the Unix epoch.
/// This is the canonical time representation in the engine.
///
/// ## Invariants
///
/// - Always non-negative (u64)
/// - Always in nanoseconds
/// - Comparable and orderable
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NanoTime(u64);

/// The store's custom epoch origin: 2010-01-01T00:00:00Z.
///
/// All internal threshold arithmetic is relative to this origin. It is
/// distinct from the Unix epoch that [`NanoTime`] counts from.
pub const STORE_EPOCH: NanoTime = NanoTime::from_secs(1_262_304_000);

impl NanoTime {
    /// Unix epoch (1970-01-01 00:00:00 UTC)
    pub const UNIX_ZERO: NanoTime = NanoTime(0);

    /// Maximum representable timestamp
    pub const MAX: NanoTime = NanoTime(u64::MAX);

    /// Create a timestamp for the current moment
    ///
    /// Uses system time. Returns zero if the system clock is before the
    /// Unix epoch (e.g. clock went backwards due to NTP adjustment).
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        NanoTime(duration.as_nanos() as u64)
    }

    /// Create a timestamp from nanoseconds since the Unix epoch
    #[inline]
    pub const fn from_nanos(nanos: u64) -> Self {
        NanoTime(nanos)
    }

    /// Create a timestamp from seconds since the Unix epoch
    #[inline]
    pub const fn from_secs(secs: u64) -> Self {
        NanoTime(secs.saturating_mul(1_000_000_000))
    }

    /// Get nanoseconds since the Unix epoch
    #[inline]
    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Get seconds since the Unix epoch (truncates)
    #[inline]
    pub const fn as_secs(&self) -> u64 {
        self.0 / 1_000_000_000
    }

    /// Convert to the store's internal epoch representation.
    ///
    /// Returns `None` when this timestamp precedes [`STORE_EPOCH`] — the
    /// internal representation would be negative, which the engine
    /// rejects as a domain error.
    pub const fn since_store_epoch(&self) -> Option<u64> {
        if self.0 >= STORE_EPOCH.0 {
            Some(self.0 - STORE_EPOCH.0)
        } else {
            None
        }
    }

    /// Check if this timestamp is before another
    #[inline]
    pub fn is_before(&self, other: NanoTime) -> bool {
        self.0 < other.0
    }

    /// Check if this timestamp is after another
    #[inline]
    pub fn is_after(&self, other: NanoTime) -> bool {
        self.0 > other.0
    }
}

impl Default for NanoTime {
    fn default() -> Self {
        NanoTime::UNIX_ZERO
    }
}

impl std::fmt::Display for NanoTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // "seconds.nanoseconds" for readability
        write!(f, "{}.{:09}", self.0 / 1_000_000_000, self.0 % 1_000_000_000)
    }
}

impl From<u64> for NanoTime {
    fn from(nanos: u64) -> Self {
        NanoTime::from_nanos(nanos)
    }
}

impl From<NanoTime> for u64 {
    fn from(ts: NanoTime) -> Self {
        ts.0
    }
}
