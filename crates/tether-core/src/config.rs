//! tether.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration consumed by the name plane.
///
/// Values are fixed for the process lifetime. The host daemon loads this
/// once at startup; environment variables override file values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TetherConfig {
    pub naming: NamingConfig,
    pub network: NetworkConfig,
    pub resolver: ResolverConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Base domain appended to workload names when nothing else applies,
    /// e.g. a workload `web` becomes `web.container`.
    pub base_domain: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Connectivity network workloads must share with the proxy.
    pub name: String,
    /// Attach newly created workloads to the connectivity network.
    pub auto_attach: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Deadline for a system DNS fallback lookup, e.g. "5s" or "500ms".
    pub timeout: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            base_domain: "container".to_string(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: "tether".to_string(),
            auto_attach: false,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout: "5s".to_string(),
        }
    }
}

impl Default for TetherConfig {
    fn default() -> Self {
        Self {
            naming: NamingConfig::default(),
            network: NetworkConfig::default(),
            resolver: ResolverConfig::default(),
        }
    }
}

impl TetherConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: TetherConfig = toml::from_str(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Load defaults, then environment overrides.
    pub fn from_env() -> Self {
        let mut config = TetherConfig::default();
        config.apply_env();
        config
    }

    /// Apply `TETHER_*` environment overrides in place.
    pub fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("TETHER_BASE_DOMAIN")
            && !v.is_empty()
        {
            self.naming.base_domain = v;
        }
        if let Ok(v) = std::env::var("TETHER_NETWORK")
            && !v.is_empty()
        {
            self.network.name = v;
        }
        if let Ok(v) = std::env::var("TETHER_AUTO_ATTACH") {
            self.network.auto_attach = parse_bool(&v);
        }
        if let Ok(v) = std::env::var("TETHER_RESOLVE_TIMEOUT")
            && !v.is_empty()
        {
            self.resolver.timeout = v;
        }
    }

    /// Resolver deadline as a `Duration`, falling back to 5s on a
    /// malformed value.
    pub fn resolve_timeout(&self) -> Duration {
        parse_duration(&self.resolver.timeout).unwrap_or(Duration::from_secs(5))
    }
}

fn parse_bool(s: &str) -> bool {
    matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

/// Parse a human duration string: `"5s"`, `"500ms"`.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        ms.parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.parse::<u64>().ok().map(Duration::from_secs)
    } else {
        None
    }
}
