//! Throughput metrics
//!
//! The actuation loop increments a counter every tick; a once-per-second
//! timer on the presentation side reads and resets it to derive a
//! ticks-per-second figure. The read-modify-write is a single atomic swap,
//! so a racing increment is at worst attributed to the next interval and
//! the value can never go negative or otherwise corrupt.

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-second tick counter shared between the loop and the reporter.
#[derive(Debug, Default)]
pub struct TickCounter {
    ticks: AtomicU64,
}

impl TickCounter {
    /// Create a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one loop iteration.
    pub fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Read and reset the counter, returning the ticks since the last take.
    pub fn take(&self) -> u64 {
        self.ticks.swap(0, Ordering::Relaxed)
    }
}
