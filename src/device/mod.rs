//! Serial Device Connection
//!
//! Discovery, handshake, and liveness tracking for the serial-attached
//! motion hardware. The [`DeviceLink`] probes every enumerated port against
//! the profile catalog, configures whichever device answers, and exposes a
//! lock-free connected flag the actuation loop checks every tick.
//!
//! Reconnection is never automatic: a failed write marks the link
//! disconnected and a new scan is an explicit, separately-triggered
//! operation.

pub mod error;
pub mod manager;
pub mod profile;
pub mod transport;

pub use error::{DeviceError, Result};
pub use manager::{DeviceLink, HandshakeTiming};
pub use profile::{DeviceProfile, BAUD_DEFAULT, CATALOG};
pub use transport::{HostSerial, SerialIo, SerialTransport};

/// Connection lifecycle of the serial device. Exactly one of these holds at
/// any time; transitions are driven only by [`DeviceLink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// No device attached
    Disconnected,
    /// A scan is in progress
    Searching,
    /// A device answered the handshake and is configured
    Connected {
        /// Port path the device was found on
        port: String,
        /// Name of the matched profile
        profile: &'static str,
    },
}
