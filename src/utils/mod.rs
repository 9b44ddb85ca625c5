//! Utility types
//!
//! Small cross-cutting helpers: at present, the tick-rate counter the
//! presentation layer samples once per second.

pub mod metrics;

pub use metrics::TickCounter;
