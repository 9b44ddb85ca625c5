//! # cloud-recoil
//!
//! Recoil compensation utility with dual output paths.
//!
//! A fixed-cadence actuation loop samples trigger buttons, snapshots the
//! shared configuration, splits each tick's displacement into near-equal
//! sub-steps, and injects relative mouse movement either synthetically on
//! the host or through a serial-attached hardware passthrough device.
//!
//! ## Architecture
//!
//! ```text
//!  ┌────────────┐   snapshot   ┌───────────────┐   sub-steps   ┌───────────────┐
//!  │ SharedConfig├─────────────▶│ ActuationLoop ├──────────────▶│ OutputBackend │
//!  └────────────┘              └──────┬────────┘               └──────┬────────┘
//!        ▲                            │ events                 ┌──────┴────────┐
//!   presentation                      ▼                        │ synthetic OR  │
//!   (replace)                  ┌────────────┐                  │ serial device │
//!                              │    App     │◀── DeviceLink ───┤ (handshake,   │
//!                              └────────────┘    scan/close    │  move cmds)   │
//!                                                              └───────────────┘
//! ```
//!
//! The loop never blocks on device discovery: the handshake protocol runs on
//! its own blocking task and flips the link's readiness flag, which the loop
//! reads once per tick to pick a backend.

#![warn(missing_docs)]

/// Application orchestration: service wiring, run loop, shutdown.
pub mod app;
/// Output backends: synthetic host injection and serial passthrough.
pub mod backend;
/// Configuration model, persistence, and the shared handle.
pub mod config;
/// Serial device profiles, handshake protocol, and connection management.
pub mod device;
/// Actuation loop, movement planning, and engine events.
pub mod engine;
/// Trigger button sampling.
pub mod input;
/// Small shared utilities.
pub mod utils;
