//! Synthetic Input Backend
//!
//! Relative pointer motion through the OS input-injection facility, via
//! `enigo`. Always available; the host API does not report delivery
//! failure, so errors here are surfaced but treated as transient by the
//! caller.

use enigo::{Coordinate, Enigo, Mouse, Settings};

use super::{BackendError, OutputBackend};

/// Output backend issuing OS-level relative pointer-motion events.
pub struct SyntheticInputBackend {
    enigo: Enigo,
}

impl SyntheticInputBackend {
    /// Connect to the host's input-injection facility.
    pub fn new() -> Result<Self, BackendError> {
        let enigo =
            Enigo::new(&Settings::default()).map_err(|e| BackendError::Inject(e.to_string()))?;
        Ok(Self { enigo })
    }
}

impl OutputBackend for SyntheticInputBackend {
    fn send(&mut self, dx: i32, dy: i32) -> Result<(), BackendError> {
        self.enigo
            .move_mouse(dx, dy, Coordinate::Rel)
            .map_err(|e| BackendError::Inject(e.to_string()))
    }
}
