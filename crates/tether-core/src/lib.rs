//! Shared types for the tether name plane.
//!
//! Everything the other tether crates agree on lives here:
//! - **`config`** — tether.toml parsing and environment overrides
//! - **`workload`** — read-only workload metadata snapshots
//! - **`event`** — lifecycle event feed items and the recognized action set
//! - **`runtime`** — the container runtime interface boundary

pub mod config;
pub mod event;
pub mod runtime;
pub mod workload;

pub use config::TetherConfig;
pub use event::{LifecycleAction, WorkloadEvent};
pub use runtime::{ContainerRuntime, RuntimeError, RuntimeResult};
pub use workload::{Labels, NetworkAttachment, PortBinding, Workload, WorkloadSummary};
