//! Lifecycle event feed items.
//!
//! The runtime delivers `{id, action}` pairs with free-form action
//! strings. `LifecycleAction` is the closed set this system recognizes;
//! anything else lands in `Unrecognized` so a new runtime action name
//! shows up loudly in tests instead of vanishing into a default branch.

use serde::{Deserialize, Serialize};

/// One item from the runtime's event feed, as delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadEvent {
    /// Workload the event refers to.
    pub id: String,
    /// Raw action string; may carry a detail suffix (`"health_status: healthy"`).
    pub action: String,
}

/// Recognized lifecycle actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleAction {
    Create,
    Start,
    Stop,
    Kill,
    Die,
    Destroy,
    Connect,
    Disconnect,
    /// Exec sub-events; not a workload lifecycle change.
    Exec,
    Unrecognized(String),
}

impl LifecycleAction {
    /// Parse a raw action string.
    ///
    /// Multi-part actions are truncated at the first `:`; most actions
    /// are just the bare word.
    pub fn parse(raw: &str) -> Self {
        let head = raw.split(':').next().unwrap_or(raw);
        match head {
            "create" => LifecycleAction::Create,
            "start" => LifecycleAction::Start,
            "stop" => LifecycleAction::Stop,
            "kill" => LifecycleAction::Kill,
            "die" => LifecycleAction::Die,
            "destroy" => LifecycleAction::Destroy,
            "connect" => LifecycleAction::Connect,
            "disconnect" => LifecycleAction::Disconnect,
            "exec_create" | "exec_start" | "exec_die" => LifecycleAction::Exec,
            other => LifecycleAction::Unrecognized(other.to_string()),
        }
    }

    /// Actions that take a workload out of service.
    pub fn is_removal(&self) -> bool {
        matches!(
            self,
            LifecycleAction::Stop
                | LifecycleAction::Kill
                | LifecycleAction::Die
                | LifecycleAction::Destroy
        )
    }
}
