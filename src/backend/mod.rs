//! Output Backends
//!
//! A backend delivers one relative pointer motion. Exactly two
//! implementations exist: OS-level synthetic input injection and the
//! serial-attached hardware device. The actuation loop selects between
//! them each tick by a single flag plus the hardware liveness check,
//! never by inspecting the concrete type.

use thiserror::Error;

use crate::device::DeviceError;

pub mod serial;

#[cfg(feature = "os-input")]
pub mod synthetic;

pub use serial::SerialDeviceBackend;

#[cfg(feature = "os-input")]
pub use synthetic::SyntheticInputBackend;

/// Backend error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// Synthetic input injection failed
    #[error("pointer injection failed: {0}")]
    Inject(String),

    /// The serial device backend failed or is not connected
    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// A channel for relative (dx, dy) pointer motion.
pub trait OutputBackend: Send {
    /// Deliver one relative motion.
    fn send(&mut self, dx: i32, dy: i32) -> Result<(), BackendError>;

    /// Whether this backend can currently deliver motions.
    ///
    /// Synthetic input is always available; the serial backend reports the
    /// link's liveness flag.
    fn is_ready(&self) -> bool {
        true
    }
}
