//! The resolve capability handed to the proxy.
//!
//! Registry first, system DNS second. The proxy calls this once per
//! name-resolution need, from any number of connection tasks; it never
//! mutates the registry.

use std::net::IpAddr;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::registry::NameRegistry;

/// Resolution failures, as surfaced to the proxy.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Not in the registry and not resolvable externally.
    #[error("name not found: {0}")]
    NotFound(String),

    /// The registry held a value that does not parse as an IP address.
    #[error("registry entry for {name} is not a usable address: {address}")]
    InvalidAddress { name: String, address: String },

    /// The system lookup itself failed.
    #[error("system lookup failed for {name}: {source}")]
    Lookup {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The system lookup exceeded the configured deadline.
    #[error("system lookup timed out for {0}")]
    Timeout(String),
}

/// Resolves names against the registry with a system-DNS fallback.
#[derive(Clone)]
pub struct Resolver {
    registry: NameRegistry,
    timeout: Duration,
}

impl Resolver {
    pub fn new(registry: NameRegistry, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    /// Resolve `name` to an IP address.
    ///
    /// A registry hit is parsed and returned without ever consulting the
    /// system resolver. A miss falls back to `tokio::net::lookup_host`
    /// on the name verbatim, bounded by the configured timeout; dropping
    /// the returned future cancels the lookup.
    pub async fn resolve(&self, name: &str) -> Result<IpAddr, ResolveError> {
        if let Some(address) = self.registry.lookup(name) {
            debug!(%name, %address, source = "registry", "resolved");
            return address.parse::<IpAddr>().map_err(|_| ResolveError::InvalidAddress {
                name: name.to_string(),
                address,
            });
        }

        debug!(%name, source = "system", "name not registered, falling back");
        let lookup = tokio::net::lookup_host(format!("{name}:0"));
        match tokio::time::timeout(self.timeout, lookup).await {
            Err(_) => Err(ResolveError::Timeout(name.to_string())),
            Ok(Err(source)) => Err(ResolveError::Lookup {
                name: name.to_string(),
                source,
            }),
            Ok(Ok(mut addrs)) => addrs
                .next()
                .map(|a| a.ip())
                .ok_or_else(|| ResolveError::NotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn resolver(registry: NameRegistry) -> Resolver {
        Resolver::new(registry, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn registry_hit_returns_parsed_address() {
        let registry = NameRegistry::new();
        registry.upsert(&["web.container".to_string()], "10.0.0.7");

        let ip = resolver(registry).resolve("web.container").await.unwrap();
        assert_eq!(ip, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)));
    }

    #[tokio::test]
    async fn registry_hit_is_case_insensitive() {
        let registry = NameRegistry::new();
        registry.upsert(&["web.container".to_string()], "10.0.0.7");

        let ip = resolver(registry).resolve("WEB.CONTAINER").await.unwrap();
        assert_eq!(ip, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)));
    }

    #[tokio::test]
    async fn registry_hit_never_reaches_system_dns() {
        // A registered name that would also fail system resolution must
        // come back from the registry, proving no fallback was attempted.
        let registry = NameRegistry::new();
        registry.upsert(
            &["no-such-host.definitely.invalid".to_string()],
            "192.0.2.9",
        );

        let ip = resolver(registry)
            .resolve("no-such-host.definitely.invalid")
            .await
            .unwrap();
        assert_eq!(ip, IpAddr::V4(Ipv4Addr::new(192, 0, 2, 9)));
    }

    #[tokio::test]
    async fn registry_hit_supports_ipv6() {
        let registry = NameRegistry::new();
        registry.upsert(&["v6.container".to_string()], "fd00::7");

        let ip = resolver(registry).resolve("v6.container").await.unwrap();
        assert_eq!(ip, "fd00::7".parse::<IpAddr>().unwrap());
    }

    #[tokio::test]
    async fn invalid_registry_value_is_an_error_not_a_fallback() {
        let registry = NameRegistry::new();
        registry.upsert(&["bad.container".to_string()], "not-an-address");

        let err = resolver(registry).resolve("bad.container").await.unwrap_err();
        match err {
            ResolveError::InvalidAddress { name, address } => {
                assert_eq!(name, "bad.container");
                assert_eq!(address, "not-an-address");
            }
            other => panic!("expected InvalidAddress, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn miss_falls_back_to_system_dns() {
        let ip = resolver(NameRegistry::new()).resolve("localhost").await.unwrap();
        assert!(ip.is_loopback());
    }

    #[tokio::test]
    async fn unresolvable_miss_is_not_found() {
        let err = resolver(NameRegistry::new())
            .resolve("no-such-host.definitely.invalid")
            .await
            .unwrap_err();
        assert!(
            matches!(err, ResolveError::NotFound(_) | ResolveError::Lookup { .. }),
            "expected NotFound or Lookup, got {err:?}"
        );
    }

    #[tokio::test]
    async fn zero_timeout_cuts_off_system_lookup() {
        let resolver = Resolver::new(NameRegistry::new(), Duration::ZERO);
        let err = resolver.resolve("localhost").await.unwrap_err();
        assert!(matches!(err, ResolveError::Timeout(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn zero_timeout_does_not_affect_registry_hits() {
        let registry = NameRegistry::new();
        registry.upsert(&["web.container".to_string()], "10.0.0.7");

        let resolver = Resolver::new(registry, Duration::ZERO);
        assert!(resolver.resolve("web.container").await.is_ok());
    }

    #[tokio::test]
    async fn concurrent_resolutions_share_one_resolver() {
        let registry = NameRegistry::new();
        registry.upsert(&["web.container".to_string()], "10.0.0.7");
        let resolver = resolver(registry);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let resolver = resolver.clone();
                tokio::spawn(async move { resolver.resolve("web.container").await })
            })
            .collect();

        for handle in handles {
            let ip = handle.await.unwrap().unwrap();
            assert_eq!(ip, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)));
        }
    }
}
