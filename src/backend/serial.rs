//! Serial Hardware Backend
//!
//! Routes motions through the shared [`DeviceLink`]. Zero motions are
//! filtered at the link level (never written to the wire); a write failure
//! marks the link disconnected, making the loop fall back to synthetic
//! input on its next tick. Reconnection is a separate, explicitly
//! triggered operation.

use std::sync::Arc;

use crate::device::DeviceLink;

use super::{BackendError, OutputBackend};

/// Output backend writing motion commands to the connected serial device.
pub struct SerialDeviceBackend {
    link: Arc<DeviceLink>,
}

impl SerialDeviceBackend {
    /// Create a backend over the shared device link.
    pub fn new(link: Arc<DeviceLink>) -> Self {
        Self { link }
    }
}

impl OutputBackend for SerialDeviceBackend {
    fn send(&mut self, dx: i32, dy: i32) -> Result<(), BackendError> {
        self.link.send_move(dx, dy)?;
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.link.is_connected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceError, HandshakeTiming, SerialIo, SerialTransport};
    use std::time::Duration;

    struct NoPorts;

    impl SerialTransport for NoPorts {
        fn enumerate(&self) -> Vec<String> {
            Vec::new()
        }
        fn open(
            &self,
            path: &str,
            _baud: u32,
            _timeout: Duration,
        ) -> crate::device::Result<Box<dyn SerialIo>> {
            Err(DeviceError::Open {
                port: path.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such port"),
            })
        }
    }

    #[test]
    fn test_disconnected_backend_is_not_ready() {
        let link = Arc::new(DeviceLink::with_timing(
            Box::new(NoPorts),
            HandshakeTiming::immediate(),
        ));
        let mut backend = SerialDeviceBackend::new(link);

        assert!(!backend.is_ready());
        assert!(matches!(
            backend.send(1, 1),
            Err(BackendError::Device(DeviceError::NotConnected))
        ));
    }
}
