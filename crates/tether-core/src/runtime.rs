//! Container runtime interface boundary.
//!
//! The concrete engine client (socket transport, wire format) lives in the
//! host daemon. These crates only depend on this trait, which makes the
//! monitor testable against a scripted in-memory runtime.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::event::WorkloadEvent;
use crate::workload::{Workload, WorkloadSummary};

/// Result type alias for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors surfaced by the runtime collaborator.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("workload not found: {0}")]
    NotFound(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("runtime unavailable: {0}")]
    Unavailable(String),
}

/// What the name plane needs from a container runtime.
///
/// Implementations must be safe to share across tasks. `create_network`
/// is idempotent: an "already exists" response from the engine maps to
/// `Ok`, not an error.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Enumerate currently known workloads.
    async fn list_workloads(&self) -> RuntimeResult<Vec<WorkloadSummary>>;

    /// Inspect one workload's live metadata.
    ///
    /// Fails with [`RuntimeError::NotFound`] once the workload is gone,
    /// which removal paths must tolerate.
    async fn inspect_workload(&self, id: &str) -> RuntimeResult<Workload>;

    /// Open the lifecycle event feed.
    ///
    /// The receiver yielding `None` means the feed terminated (engine
    /// restart, broken socket); the consumer resubscribes.
    async fn subscribe_events(&self) -> RuntimeResult<mpsc::Receiver<WorkloadEvent>>;

    /// Ensure the named network exists.
    async fn create_network(&self, name: &str) -> RuntimeResult<()>;

    /// Attach a workload to a network.
    async fn connect_network(&self, id: &str, network: &str) -> RuntimeResult<()>;
}
