//! Tether lifecycle monitor.
//!
//! A single long-lived worker that consumes the container runtime's event
//! feed and keeps the [`tether_resolve::NameRegistry`] current: workloads
//! are registered when they start and deregistered when they stop, with
//! the whole picture rebuilt on startup and after a feed reconnect.

pub mod monitor;

pub use monitor::{EventMonitor, MonitorError};
