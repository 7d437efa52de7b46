//! Event monitor — the registry's single writer.
//!
//! `bootstrap()` primes the registry from a full enumeration before any
//! live event is consumed; `run()` then follows the feed until shutdown,
//! reconnecting with exponential backoff when the feed dies. While
//! disconnected the registry keeps serving its last known state.

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use tether_core::{
    ContainerRuntime, LifecycleAction, RuntimeError, TetherConfig, Workload, WorkloadEvent,
};
use tether_resolve::{NameRegistry, derive_fqdns, select_address};

/// First reconnect delay after the feed closes.
const RECONNECT_BASE: Duration = Duration::from_secs(1);
/// Reconnect delay cap.
const RECONNECT_MAX: Duration = Duration::from_secs(60);

/// Monitor failures that abort startup.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The event feed could not be opened on the first attempt. Nothing
    /// useful can run without it.
    #[error("cannot subscribe to runtime events: {0}")]
    Subscribe(#[source] RuntimeError),
}

/// Consumes the runtime's lifecycle events and drives registry updates.
///
/// All runtime I/O (inspection, enumeration, network attach) happens
/// here, outside the registry's critical section. Per-event errors are
/// contained; nothing crosses into the resolve path.
pub struct EventMonitor<R> {
    runtime: R,
    registry: NameRegistry,
    base_domain: String,
    network: String,
    auto_attach: bool,
    /// FQDNs registered per workload, captured at registration time so
    /// removal never depends on inspecting an already-gone workload.
    registered: HashMap<String, Vec<String>>,
    events: Option<mpsc::Receiver<WorkloadEvent>>,
}

impl<R: ContainerRuntime> EventMonitor<R> {
    pub fn new(runtime: R, registry: NameRegistry, config: &TetherConfig) -> Self {
        Self {
            runtime,
            registry,
            base_domain: config.naming.base_domain.clone(),
            network: config.network.name.clone(),
            auto_attach: config.network.auto_attach,
            registered: HashMap::new(),
            events: None,
        }
    }

    /// Prime the registry: ensure the connectivity network exists, open
    /// the event feed, then enumerate and register every known workload.
    ///
    /// The feed is opened *before* enumeration, so events raised while
    /// enumerating queue up and nothing falls in the gap. Once this
    /// returns, the registry is ready to serve resolutions.
    pub async fn bootstrap(&mut self) -> Result<(), MonitorError> {
        if let Err(e) = self.runtime.create_network(&self.network).await {
            warn!(network = %self.network, error = %e, "could not ensure connectivity network");
        }

        let events = self
            .runtime
            .subscribe_events()
            .await
            .map_err(MonitorError::Subscribe)?;
        self.events = Some(events);

        self.enumerate().await;
        info!(entries = self.registry.len(), "name registry primed");
        Ok(())
    }

    /// Follow the event feed until `shutdown` flips.
    ///
    /// Call after [`bootstrap`](Self::bootstrap); if the feed was not
    /// opened yet, it is opened here and a failure is fatal the same way.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<(), MonitorError> {
        let mut events = match self.events.take() {
            Some(events) => events,
            None => self
                .runtime
                .subscribe_events()
                .await
                .map_err(MonitorError::Subscribe)?,
        };

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    info!("event monitor shutting down");
                    return Ok(());
                }
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => {
                        warn!("event feed closed, reconnecting");
                        match self.reconnect(&mut shutdown).await {
                            Some(fresh) => events = fresh,
                            None => return Ok(()),
                        }
                    }
                }
            }
        }
    }

    /// Resubscribe with exponential backoff, then resynchronize.
    ///
    /// Returns `None` when shutdown was requested while waiting.
    async fn reconnect(
        &mut self,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Option<mpsc::Receiver<WorkloadEvent>> {
        let mut backoff = RECONNECT_BASE;
        loop {
            tokio::select! {
                _ = shutdown.changed() => return None,
                _ = tokio::time::sleep(backoff) => {}
            }

            match self.runtime.subscribe_events().await {
                Ok(events) => {
                    info!("event feed reconnected");
                    // Catch up on everything missed while disconnected.
                    self.enumerate().await;
                    return Some(events);
                }
                Err(e) => {
                    warn!(error = %e, backoff_secs = backoff.as_secs(), "resubscribe failed");
                    backoff = (backoff * 2).min(RECONNECT_MAX);
                }
            }
        }
    }

    /// Full sweep: register every currently known workload and drop
    /// registrations for workloads that no longer exist.
    async fn enumerate(&mut self) {
        let summaries = match self.runtime.list_workloads().await {
            Ok(summaries) => summaries,
            Err(e) => {
                warn!(error = %e, "workload enumeration failed");
                return;
            }
        };

        let mut stale = std::mem::take(&mut self.registered);
        for summary in summaries {
            match self.runtime.inspect_workload(&summary.id).await {
                Ok(workload) => {
                    stale.remove(&workload.id);
                    self.register(&workload);
                }
                Err(e) => {
                    // Inspection may be a transient blip; keep whatever
                    // registration this workload already had.
                    if let Some(fqdns) = stale.remove(&summary.id) {
                        self.registered.insert(summary.id.clone(), fqdns);
                    }
                    warn!(id = %summary.id, error = %e, "skipping workload, inspection failed");
                }
            }
        }

        // Workloads that vanished while the feed was down.
        for (id, fqdns) in stale {
            self.registry.remove(&fqdns);
            debug!(%id, "dropped names of vanished workload");
        }
    }

    fn register(&mut self, workload: &Workload) {
        let fqdns = derive_fqdns(workload, &self.base_domain);
        match select_address(workload, &self.network) {
            Some(address) => {
                self.registry.upsert(&fqdns, &address);
                info!(id = %workload.id, fqdns = ?fqdns, %address, "workload registered");
                self.registered.insert(workload.id.clone(), fqdns);
            }
            None => {
                debug!(id = %workload.id, "no reachable address, nothing to register");
            }
        }
    }

    async fn handle_event(&mut self, event: WorkloadEvent) {
        let action = LifecycleAction::parse(&event.action);
        if action == LifecycleAction::Exec {
            // Exec sub-events are not workload lifecycle changes.
            return;
        }
        debug!(id = %event.id, ?action, "lifecycle event");

        match action {
            LifecycleAction::Start => self.on_start(&event.id).await,
            LifecycleAction::Create => self.on_create(&event.id).await,
            LifecycleAction::Stop
            | LifecycleAction::Kill
            | LifecycleAction::Die
            | LifecycleAction::Destroy => self.on_removal(&event.id).await,
            LifecycleAction::Connect | LifecycleAction::Disconnect => {
                // Observational only: address assignment is not reliable
                // at these points. Start/stop carry the registry updates.
            }
            LifecycleAction::Exec => {}
            LifecycleAction::Unrecognized(name) => {
                debug!(action = %name, "ignoring unrecognized action");
            }
        }
    }

    async fn on_start(&mut self, id: &str) {
        match self.runtime.inspect_workload(id).await {
            Ok(workload) => self.register(&workload),
            Err(e) => warn!(%id, error = %e, "start event but inspection failed"),
        }
    }

    async fn on_create(&self, id: &str) {
        if !self.auto_attach {
            return;
        }
        // Best-effort: the workload still starts without connectivity.
        match self.runtime.connect_network(id, &self.network).await {
            Ok(()) => debug!(%id, network = %self.network, "attached to connectivity network"),
            Err(e) => warn!(%id, network = %self.network, error = %e, "auto-attach failed"),
        }
    }

    async fn on_removal(&mut self, id: &str) {
        if let Some(fqdns) = self.registered.remove(id) {
            self.registry.remove(&fqdns);
            info!(%id, fqdns = ?fqdns, "workload deregistered");
            return;
        }

        // Not registered by this process: recompute from live metadata.
        match self.runtime.inspect_workload(id).await {
            Ok(workload) => {
                let fqdns = derive_fqdns(&workload, &self.base_domain);
                self.registry.remove(&fqdns);
            }
            Err(e) => {
                // Workload already gone and names unknown; any entry it
                // owned stays in place until the next full sweep.
                debug!(%id, error = %e, "cannot derive names for removal");
            }
        }
    }
}
