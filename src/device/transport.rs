//! Serial Transport Abstraction
//!
//! The connection manager talks to the host's serial layer through the
//! [`SerialTransport`] and [`SerialIo`] traits so the handshake protocol
//! can be exercised against scripted ports in tests. The production
//! implementation is backed by the `serialport` crate.

use std::io;
use std::time::Duration;

use tracing::debug;

use super::error::{DeviceError, Result};

/// An open serial channel.
///
/// Byte-oriented with bounded blocking: the configured timeout covers both
/// reads and writes.
pub trait SerialIo: Send {
    /// Write all bytes.
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Number of bytes currently available to read without blocking.
    fn bytes_to_read(&mut self) -> io::Result<u32>;

    /// Read into `buf`, returning the number of bytes read.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Reconfigure the channel's baud rate.
    fn set_baud_rate(&mut self, baud: u32) -> io::Result<()>;

    /// Reconfigure the channel's I/O timeout.
    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()>;
}

/// Enumerable, openable serial ports on one host.
pub trait SerialTransport: Send + Sync {
    /// List the paths of all serial ports currently present.
    fn enumerate(&self) -> Vec<String>;

    /// Open a port at the given baud rate and I/O timeout.
    fn open(&self, path: &str, baud: u32, timeout: Duration) -> Result<Box<dyn SerialIo>>;
}

/// Production transport backed by the `serialport` crate.
pub struct HostSerial;

impl SerialTransport for HostSerial {
    fn enumerate(&self) -> Vec<String> {
        match serialport::available_ports() {
            Ok(ports) => ports.into_iter().map(|p| p.port_name).collect(),
            Err(e) => {
                debug!("Serial enumeration failed: {}", e);
                Vec::new()
            }
        }
    }

    fn open(&self, path: &str, baud: u32, timeout: Duration) -> Result<Box<dyn SerialIo>> {
        let port = serialport::new(path, baud)
            .timeout(timeout)
            .open()
            .map_err(|e| DeviceError::Open {
                port: path.to_string(),
                source: to_io_error(e),
            })?;
        Ok(Box::new(HostPort { port }))
    }
}

struct HostPort {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialIo for HostPort {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        io::Write::write_all(&mut self.port, data)
    }

    fn bytes_to_read(&mut self) -> io::Result<u32> {
        self.port.bytes_to_read().map_err(to_io_error)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(&mut self.port, buf)
    }

    fn set_baud_rate(&mut self, baud: u32) -> io::Result<()> {
        self.port.set_baud_rate(baud).map_err(to_io_error)
    }

    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.port.set_timeout(timeout).map_err(to_io_error)
    }
}

fn to_io_error(e: serialport::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e.to_string())
}
