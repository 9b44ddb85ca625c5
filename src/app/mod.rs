//! Application Orchestration
//!
//! Wires the long-lived services together: the shared configuration, the
//! serial device link, the actuation loop on its own blocking thread, the
//! device scan task, and the once-per-second presentation drain that turns
//! engine events and the tick counter into log output.
//!
//! Every service is explicitly constructed and owned here; there is no
//! ambient global state. Shutdown clears the running flag (observed by the
//! loop within one tick), joins the loop, closes the serial link, and
//! persists the current configuration snapshot.

use anyhow::Result;
use crossbeam_channel::{Receiver, Sender};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::backend::{OutputBackend, SerialDeviceBackend};
use crate::config::{Config, SharedConfig};
use crate::device::{ConnectionState, DeviceLink, HandshakeTiming, HostSerial, SerialTransport};
use crate::engine::{events, ActuationLoop, EngineEvent, StatusSeverity};
use crate::input::ButtonSampler;
use crate::utils::TickCounter;

/// Top-level service container and run loop.
pub struct App {
    shared: SharedConfig,
    link: Arc<DeviceLink>,
    ticks: Arc<TickCounter>,
    running: Arc<AtomicBool>,
    events_tx: Sender<EngineEvent>,
    events_rx: Receiver<EngineEvent>,
    config_path: PathBuf,
    connect_on_start: bool,
}

impl App {
    /// Build the application over the host's serial layer.
    pub fn new(config: Config, config_path: PathBuf) -> Self {
        Self::with_transport(
            config,
            config_path,
            Box::new(HostSerial),
            HandshakeTiming::default(),
        )
    }

    /// Build the application over an explicit serial transport.
    pub fn with_transport(
        config: Config,
        config_path: PathBuf,
        transport: Box<dyn SerialTransport>,
        timing: HandshakeTiming,
    ) -> Self {
        let (events_tx, events_rx) = events::channel();
        Self {
            shared: SharedConfig::new(config),
            link: Arc::new(DeviceLink::with_timing(transport, timing)),
            ticks: Arc::new(TickCounter::new()),
            running: Arc::new(AtomicBool::new(true)),
            events_tx,
            events_rx,
            config_path,
            connect_on_start: false,
        }
    }

    /// Force a device scan at startup even when `use_makcu` is off.
    pub fn connect_on_start(mut self, connect: bool) -> Self {
        self.connect_on_start = connect;
        self
    }

    /// Shared configuration handle for presentation-side edits.
    pub fn shared_config(&self) -> SharedConfig {
        self.shared.clone()
    }

    /// Replace the configuration with a complete new snapshot.
    ///
    /// Invoked on every control change; values are clamped before they
    /// become visible to the loop.
    pub fn apply(&self, config: Config) {
        self.shared.replace(config.clamped());
    }

    /// Run until interrupted, then shut down in order.
    pub async fn run(self, sampler: Box<dyn ButtonSampler>, synthetic: Box<dyn OutputBackend>) -> Result<()> {
        let hardware = Box::new(SerialDeviceBackend::new(self.link.clone()));
        let mut engine = ActuationLoop::new(
            self.shared.clone(),
            sampler,
            synthetic,
            hardware,
            self.events_tx.clone(),
            self.ticks.clone(),
            self.running.clone(),
        );
        let engine_task = tokio::task::spawn_blocking(move || engine.run());

        if self.connect_on_start || self.shared.snapshot().use_makcu {
            self.spawn_scan();
        }

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        let mut interval = tokio::time::interval(Duration::from_secs(1));

        loop {
            tokio::select! {
                result = &mut ctrl_c => {
                    if let Err(e) = result {
                        warn!("Signal handler failed: {}", e);
                    }
                    break;
                }
                _ = interval.tick() => {
                    self.drain_events();
                    debug!("Loop rate: {} ticks/sec", self.ticks.take());
                }
            }
        }

        info!("Shutting down");
        self.running.store(false, Ordering::Relaxed);
        if engine_task.await.is_err() {
            warn!("Actuation task did not shut down cleanly");
        }
        self.link.close();

        let snapshot = self.shared.snapshot();
        if let Err(e) = snapshot.save(&self.config_path) {
            warn!("Failed to save config: {}", e);
        }
        Ok(())
    }

    /// Kick off a device scan on its own blocking task.
    ///
    /// The handshake protocol sleeps for most of a second per candidate, so
    /// it must never run on the actuation thread or block event draining.
    pub fn spawn_scan(&self) {
        let link = self.link.clone();
        let tx = self.events_tx.clone();

        let _ = tx.send(EngineEvent::DeviceStatus {
            message: "Scanning for supported hardware...".to_string(),
            severity: StatusSeverity::Info,
        });

        tokio::task::spawn_blocking(move || {
            let event = match link.connect() {
                Ok(ConnectionState::Connected { port, profile }) => EngineEvent::DeviceStatus {
                    message: format!("Connected: {profile} on {port}"),
                    severity: StatusSeverity::Ok,
                },
                Ok(_) | Err(_) => EngineEvent::DeviceStatus {
                    message: "No supported hardware found".to_string(),
                    severity: StatusSeverity::Error,
                },
            };
            let _ = tx.send(event);
        });
    }

    fn drain_events(&self) {
        for event in self.events_rx.try_iter() {
            match event {
                EngineEvent::DeviceStatus { message, severity } => match severity {
                    StatusSeverity::Ok | StatusSeverity::Info => info!("Device: {}", message),
                    StatusSeverity::Error => error!("Device: {}", message),
                },
                EngineEvent::Activity => debug!("Hardware activity"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceError, SerialIo};

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

    fn test_app() -> App {
        App::with_transport(
            Config::default(),
            PathBuf::from("/tmp/unused.json"),
            Box::new(NoPorts),
            HandshakeTiming::immediate(),
        )
    }

    #[test]
    fn test_apply_clamps_before_publishing() {
        let app = test_app();
        let mut config = Config::default();
        config.recoil_strength = 99;
        config.smoothing = 0;

        app.apply(config);

        let snapshot = app.shared_config().snapshot();
        assert_eq!(snapshot.recoil_strength, 20);
        assert_eq!(snapshot.smoothing, 1);
    }

    #[tokio::test]
    async fn test_scan_with_no_ports_reports_error_status() {
        let app = test_app();
        app.spawn_scan();

        // Info event is queued synchronously
        let first = app.events_rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(matches!(
            first,
            EngineEvent::DeviceStatus {
                severity: StatusSeverity::Info,
                ..
            }
        ));

        let second = app.events_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        match second {
            EngineEvent::DeviceStatus { message, severity } => {
                assert_eq!(severity, StatusSeverity::Error);
                assert!(message.contains("No supported hardware"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(!app.link.is_connected());
    }
}
