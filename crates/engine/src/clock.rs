//! Strictly monotonic write clock
//!
//! Record last-update times come from this clock rather than the raw
//! wall clock, so two writes never share a timestamp. That matters for
//! truncate-to-now: resolving the sentinel threshold reads the clock,
//! and every write ticked after that resolution strictly exceeds the
//! resulting watermark and stays visible.

use std::sync::atomic::{AtomicU64, Ordering};
use tidemark_core::NanoTime;

/// Monotonic nanosecond clock backed by the wall clock.
///
/// `tick()` returns `max(wall_now, last + 1)`: it follows real time
/// when real time moves forward and degrades to a counter when writes
/// arrive faster than clock resolution (or the wall clock steps back).
#[derive(Debug, Default)]
pub struct WriteClock {
    last: AtomicU64,
}

impl WriteClock {
    /// A fresh clock. Nothing has been issued yet; the first `tick()`
    /// simply follows the wall clock.
    pub fn new() -> Self {
        WriteClock {
            last: AtomicU64::new(0),
        }
    }

    /// Issue the next write timestamp. Strictly greater than every
    /// timestamp previously issued by this clock.
    pub fn tick(&self) -> NanoTime {
        let wall = NanoTime::now().as_nanos();
        // fetch_update yields the previous value; the issued timestamp
        // is what the closure stored. The closure always returns Some,
        // so the update cannot fail.
        let prev = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(wall.max(last + 1))
            })
            .expect("update closure always returns Some");
        NanoTime::from_nanos(wall.max(prev + 1))
    }

    /// The current reading without advancing: wall time, bumped past
    /// the last issued timestamp if the wall clock has not caught up.
    pub fn peek(&self) -> NanoTime {
        let wall = NanoTime::now().as_nanos();
        let last = self.last.load(Ordering::Acquire);
        NanoTime::from_nanos(wall.max(last))
    }
}
