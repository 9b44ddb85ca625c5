//! Engine → Presentation Notifications
//!
//! Fire-and-forget events from the core to whatever renders status. The
//! channel is unbounded and the core never waits on delivery; the
//! presentation side drains it on its own schedule.

use crossbeam_channel::{Receiver, Sender};

/// How a status message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSeverity {
    /// Healthy state (device connected)
    Ok,
    /// Failure state (device lost, scan exhausted)
    Error,
    /// Neutral progress information (scan in progress)
    Info,
}

/// Events emitted by the core for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Device connection status changed
    DeviceStatus {
        /// Human-readable status text
        message: String,
        /// Presentation severity
        severity: StatusSeverity,
    },

    /// One motion command was delivered to the hardware device
    Activity,
}

/// Create the engine event channel.
pub fn channel() -> (Sender<EngineEvent>, Receiver<EngineEvent>) {
    crossbeam_channel::unbounded()
}
