//! Visibility filter
//!
//! The pure predicate that makes truncation logically instantaneous:
//! a record is suppressed when its last-update-time is at or before the
//! namespace-level watermark, or at or before the watermark of its own
//! set. Evaluated against the live registry — never a cached snapshot —
//! on every read, existence check, remove, and overwrite check.
//!
//! A record written after a truncate call carries a last-update-time
//! strictly greater than the resolved watermark (the engine's write
//! clock is strictly monotonic), so it is never affected, even when
//! written microseconds later. Records written concurrently with the
//! registry update race with last-writer-relative-to-watermark
//! semantics; that ordering is well-defined, not a bug.

use crate::watermark::WatermarkRegistry;
use tidemark_core::{NanoTime, Namespace, SetName};

/// Is a record with this last-update-time logically truncated?
///
/// Two lock-free map probes and an integer compare — cheap enough for
/// every record touch on the hot path.
#[inline]
pub fn is_truncated(
    registry: &WatermarkRegistry,
    namespace: &Namespace,
    set: &SetName,
    last_update_time: NanoTime,
) -> bool {
    last_update_time.as_nanos() <= registry.effective(namespace, set)
}
