//! Read-only workload metadata snapshots.
//!
//! The container runtime supplies these per workload. They are plain data:
//! all naming and address decisions based on them live in `tether-resolve`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Host-part override label.
pub const LABEL_HOSTNAME: &str = "io.tether.hostname";
/// Subdomain override label.
pub const LABEL_SUBDOMAIN: &str = "io.tether.subdomain";
/// Domain-tail override label.
pub const LABEL_DOMAIN: &str = "io.tether.domain";
/// Boolean label selecting the runtime-assigned domain name.
pub const LABEL_USE_WORKLOAD_DOMAIN: &str = "io.tether.use-workload-domain";
/// Compose-convention service name.
pub const LABEL_COMPOSE_SERVICE: &str = "com.docker.compose.service";
/// Compose-convention project name.
pub const LABEL_COMPOSE_PROJECT: &str = "com.docker.compose.project";

/// Workload labels with presence-carrying accessors.
///
/// An accessor returns `None` both when the key is missing and when its
/// value is the empty string: runtimes emit empty values for unset
/// labels, and nothing downstream should have to compare against `""`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Labels(HashMap<String, String>);

impl Labels {
    pub fn new(map: HashMap<String, String>) -> Self {
        Self(map)
    }

    /// Raw lookup, empty values reported as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    pub fn host_name(&self) -> Option<&str> {
        self.get(LABEL_HOSTNAME)
    }

    pub fn subdomain(&self) -> Option<&str> {
        self.get(LABEL_SUBDOMAIN)
    }

    pub fn domain(&self) -> Option<&str> {
        self.get(LABEL_DOMAIN)
    }

    pub fn compose_service(&self) -> Option<&str> {
        self.get(LABEL_COMPOSE_SERVICE)
    }

    pub fn compose_project(&self) -> Option<&str> {
        self.get(LABEL_COMPOSE_PROJECT)
    }

    /// True only when the label value is exactly `"true"`.
    pub fn use_workload_domain(&self) -> bool {
        self.get(LABEL_USE_WORKLOAD_DOMAIN) == Some("true")
    }
}

impl From<HashMap<String, String>> for Labels {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, String)> for Labels {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One network the workload is attached to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkAttachment {
    /// Network name as known to the runtime.
    pub network: String,
    /// Address assigned on that network, if any.
    pub address: Option<String>,
}

/// One published port mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortBinding {
    /// Container-side port spec, e.g. `"8080/tcp"`.
    pub container_port: String,
    /// Host-side address the port is published on, if any.
    pub host_ip: Option<String>,
    pub host_port: Option<String>,
}

/// Full metadata snapshot for one workload, as inspected from the runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workload {
    /// Opaque runtime identifier.
    pub id: String,
    /// Conventional name; runtimes prefix it with `/`.
    pub name: String,
    /// Runtime-assigned short hostname. Autogenerated values look like a
    /// 12-character hex ID and are not meaningful names.
    pub hostname: Option<String>,
    /// Runtime-assigned domain suffix.
    pub domain_name: Option<String>,
    pub labels: Labels,
    /// Attachment order is the runtime's enumeration order.
    pub networks: Vec<NetworkAttachment>,
    pub port_bindings: Vec<PortBinding>,
}

impl Workload {
    /// The conventional name with one leading `/` stripped.
    pub fn bare_name(&self) -> &str {
        self.name.strip_prefix('/').unwrap_or(&self.name)
    }
}

/// Enumeration result: just enough to drive a follow-up inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadSummary {
    pub id: String,
    pub name: String,
}
