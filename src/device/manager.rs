//! Device Connection Manager
//!
//! Implements the discovery and handshake protocol: every enumerated port
//! is opened at the default baud rate and probed with each profile's
//! version query in catalog order. A candidate that answers with one of the
//! profile's keywords is finalized (optional raw init bytes, baud switch,
//! optional init command, near-zero timeouts) and becomes the connected
//! device. Any I/O failure while probing a candidate only disqualifies that
//! candidate; only total exhaustion is reported upward.
//!
//! The handshake involves multi-hundred-millisecond settle delays, so
//! `connect()` must run on a blocking-capable task, never on the actuation
//! thread.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::error::{DeviceError, Result};
use super::profile::{self, DeviceProfile, BAUD_DEFAULT, CATALOG};
use super::transport::{SerialIo, SerialTransport};
use super::ConnectionState;

/// Delays and timeouts used by the handshake protocol.
///
/// Defaults follow the hardware's boot characteristics; tests substitute
/// [`HandshakeTiming::immediate`] so scripted handshakes run instantly.
#[derive(Debug, Clone, Copy)]
pub struct HandshakeTiming {
    /// Device boot/settle delay between opening a port and writing
    pub settle: Duration,
    /// Wait between writing the handshake and draining the response
    pub response_wait: Duration,
    /// I/O timeout while probing (bounded blocking, tolerates boot latency)
    pub handshake_timeout: Duration,
    /// I/O timeout once connected (fast streaming mode, reads not needed)
    pub streaming_timeout: Duration,
}

impl Default for HandshakeTiming {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(500),
            response_wait: Duration::from_millis(200),
            handshake_timeout: Duration::from_millis(500),
            streaming_timeout: Duration::from_millis(1),
        }
    }
}

impl HandshakeTiming {
    /// All-zero timing for scripted transports.
    pub fn immediate() -> Self {
        Self {
            settle: Duration::ZERO,
            response_wait: Duration::ZERO,
            handshake_timeout: Duration::ZERO,
            streaming_timeout: Duration::ZERO,
        }
    }
}

struct LinkInner {
    port: Option<Box<dyn SerialIo>>,
    state: ConnectionState,
}

/// Serial device connection manager.
///
/// Shared between the scan task (connect/close) and the actuation loop
/// (liveness check + motion sends). The connected flag is lock-free so the
/// loop's backend selection never contends with an in-progress scan.
pub struct DeviceLink {
    transport: Box<dyn SerialTransport>,
    timing: HandshakeTiming,
    inner: Mutex<LinkInner>,
    connected: AtomicBool,
}

impl DeviceLink {
    /// Create a link over the given transport with default timing.
    pub fn new(transport: Box<dyn SerialTransport>) -> Self {
        Self::with_timing(transport, HandshakeTiming::default())
    }

    /// Create a link with explicit handshake timing.
    pub fn with_timing(transport: Box<dyn SerialTransport>, timing: HandshakeTiming) -> Self {
        Self {
            transport,
            timing,
            inner: Mutex::new(LinkInner {
                port: None,
                state: ConnectionState::Disconnected,
            }),
            connected: AtomicBool::new(false),
        }
    }

    /// Whether a device is currently connected. Lock-free.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.inner.lock().state.clone()
    }

    /// Scan all ports for a supported device and configure the first match.
    ///
    /// Closes any existing connection first. Returns the resulting
    /// [`ConnectionState::Connected`] on success, or
    /// [`DeviceError::NotFound`] after exhausting every (port, profile)
    /// candidate. Individual candidate failures are swallowed.
    pub fn connect(&self) -> Result<ConnectionState> {
        self.close();
        self.inner.lock().state = ConnectionState::Searching;

        let ports = self.transport.enumerate();
        debug!("Scanning {} serial port(s)", ports.len());

        for port in &ports {
            for device in CATALOG {
                match self.try_candidate(port, device) {
                    Ok(io) => {
                        let state = ConnectionState::Connected {
                            port: port.clone(),
                            profile: device.name,
                        };
                        {
                            let mut inner = self.inner.lock();
                            inner.port = Some(io);
                            inner.state = state.clone();
                        }
                        self.connected.store(true, Ordering::Release);
                        info!(
                            "Connected to {} on {} at {} baud",
                            device.name, port, device.baud_high
                        );
                        return Ok(state);
                    }
                    Err(e) => {
                        debug!("Candidate {}/{} rejected: {}", port, device.name, e);
                    }
                }
            }
        }

        self.inner.lock().state = ConnectionState::Disconnected;
        warn!("No supported hardware found");
        Err(DeviceError::NotFound)
    }

    /// Close any open connection. Idempotent; always leaves the link
    /// Disconnected.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        if inner.port.take().is_some() {
            info!("Serial connection closed");
        }
        inner.state = ConnectionState::Disconnected;
        self.connected.store(false, Ordering::Release);
    }

    /// Write a relative-motion command to the connected device.
    ///
    /// A (0, 0) motion is a no-op success; a zero command is never written.
    /// A failed write marks the link disconnected and returns the error;
    /// no retry or reconnect is attempted here.
    pub fn send_move(&self, dx: i32, dy: i32) -> Result<()> {
        if !self.is_connected() {
            return Err(DeviceError::NotConnected);
        }
        if dx == 0 && dy == 0 {
            return Ok(());
        }

        let mut inner = self.inner.lock();
        let Some(port) = inner.port.as_mut() else {
            self.connected.store(false, Ordering::Release);
            return Err(DeviceError::NotConnected);
        };

        if let Err(e) = port.write_all(&profile::move_command(dx, dy)) {
            warn!("Serial write failed, marking disconnected: {}", e);
            inner.state = ConnectionState::Disconnected;
            self.connected.store(false, Ordering::Release);
            return Err(DeviceError::Io(e));
        }
        Ok(())
    }

    /// Probe one (port, profile) candidate. Returns the configured channel
    /// on a keyword match.
    fn try_candidate(&self, port: &str, device: &DeviceProfile) -> Result<Box<dyn SerialIo>> {
        let mut io = self
            .transport
            .open(port, BAUD_DEFAULT, self.timing.handshake_timeout)?;

        // Device boot/settle delay before the first write.
        std::thread::sleep(self.timing.settle);

        io.write_all(device.handshake)?;
        std::thread::sleep(self.timing.response_wait);

        let response = drain_response(io.as_mut());
        if !device.matches(&response) {
            return Err(DeviceError::HandshakeMismatch {
                port: port.to_string(),
                profile: device.name,
            });
        }
        debug!("Found {} on {}, finalizing connection", device.name, port);

        if !device.init_sequence.is_empty() {
            io.write_all(device.init_sequence)?;
        }
        if device.baud_high != BAUD_DEFAULT {
            io.set_baud_rate(device.baud_high)?;
        }
        if !device.init_command.is_empty() {
            io.write_all(device.init_command)?;
        }
        io.set_timeout(self.timing.streaming_timeout)?;

        Ok(io)
    }
}

/// Drain all currently-available input, returning the trimmed lines joined
/// and lower-cased. Read errors end the drain with whatever was collected.
fn drain_response(io: &mut dyn SerialIo) -> String {
    let mut raw = Vec::new();
    let mut chunk = [0u8; 256];

    loop {
        match io.bytes_to_read() {
            Ok(0) | Err(_) => break,
            Ok(_) => match io.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => raw.extend_from_slice(&chunk[..n]),
                Err(e) => {
                    debug!("Handshake read error: {}", e);
                    break;
                }
            },
        }
    }

    String::from_utf8_lossy(&raw)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
