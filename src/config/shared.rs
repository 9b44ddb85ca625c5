//! Shared configuration holder
//!
//! The actuation loop snapshots the configuration at the top of every tick
//! while the presentation layer replaces it on control changes. Updates are
//! atomic with respect to reads: a reader always sees a complete snapshot,
//! never a half-applied one. Lock scope is limited to the copy itself; no
//! I/O ever happens under this lock.

use parking_lot::Mutex;
use std::sync::Arc;

use super::Config;

/// Thread-safe holder of the current tunable parameters.
///
/// Cheap to clone; clones share the same underlying configuration.
#[derive(Clone)]
pub struct SharedConfig {
    inner: Arc<Mutex<Config>>,
}

impl SharedConfig {
    /// Wrap an initial configuration.
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(Mutex::new(config)),
        }
    }

    /// Take a full copy of the current configuration.
    pub fn snapshot(&self) -> Config {
        self.inner.lock().clone()
    }

    /// Replace the configuration with a complete new snapshot.
    ///
    /// The writer always supplies the whole (clamped) snapshot, so partial
    /// updates cannot be observed.
    pub fn replace(&self, config: Config) {
        *self.inner.lock() = config;
    }
}
