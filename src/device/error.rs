//! Device Connection Error Types

use thiserror::Error;

/// Result type for device operations
pub type Result<T> = std::result::Result<T, DeviceError>;

/// Serial device error types
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Opening a candidate port failed
    #[error("failed to open {port}: {source}")]
    Open {
        /// Port path that failed to open
        port: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The candidate answered, but no profile keyword matched
    #[error("no handshake match on {port} for profile {profile}")]
    HandshakeMismatch {
        /// Port path that was probed
        port: String,
        /// Profile that was tried
        profile: &'static str,
    },

    /// Serial read or write failed
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Send attempted while no device is connected
    #[error("serial device not connected")]
    NotConnected,

    /// Every enumerated port was tried against every profile without success
    #[error("no supported hardware found")]
    NotFound,
}
