//! FQDN derivation from workload metadata.
//!
//! Deterministic and total: every workload gets at least one name, built
//! from label overrides and compose conventions, falling back to plain
//! defaults. The interface returns a list: today every workload derives
//! exactly one FQDN, but registration and removal are written against
//! the list shape.

use tether_core::Workload;

/// Derive the FQDNs under which a workload should be registered.
///
/// Host part, first match wins:
/// 1. `io.tether.hostname` label
/// 2. compose service label
/// 3. runtime hostname, unless it looks autogenerated
/// 4. conventional name, leading `/` stripped
///
/// Domain part: when `io.tether.use-workload-domain` is `"true"` and the
/// runtime assigned a domain name, the FQDN is `host.domain` and labels
/// are not consulted further. Otherwise `host[.subdomain].tail`, where the
/// subdomain comes from the subdomain label or the compose project, and
/// the tail from the domain label or `base_domain`.
pub fn derive_fqdns(workload: &Workload, base_domain: &str) -> Vec<String> {
    let host = host_part(workload);

    let fqdn = if workload.labels.use_workload_domain()
        && let Some(domain) = runtime_domain(workload)
    {
        format!("{host}.{domain}")
    } else {
        let mut fqdn = format!("{host}.");
        if let Some(sub) = workload
            .labels
            .subdomain()
            .or_else(|| workload.labels.compose_project())
        {
            fqdn.push_str(sub);
            fqdn.push('.');
        }
        fqdn.push_str(domain_tail(workload, base_domain));
        fqdn
    };

    vec![fqdn.to_lowercase()]
}

fn host_part(workload: &Workload) -> &str {
    if let Some(host) = workload.labels.host_name() {
        return host;
    }
    if let Some(service) = workload.labels.compose_service() {
        return service;
    }
    if let Some(hostname) = usable_hostname(workload) {
        return hostname;
    }
    workload.bare_name()
}

/// Runtimes autogenerate a 12-character hex hostname when none was
/// configured. Length is the only signal checked, so a deliberately
/// 12-character hostname is also skipped.
fn usable_hostname(workload: &Workload) -> Option<&str> {
    workload
        .hostname
        .as_deref()
        .filter(|h| !h.is_empty() && h.len() != 12)
}

fn runtime_domain(workload: &Workload) -> Option<&str> {
    workload.domain_name.as_deref().filter(|d| !d.is_empty())
}

fn domain_tail<'a>(workload: &'a Workload, base_domain: &'a str) -> &'a str {
    if let Some(domain) = workload.labels.domain() {
        return domain;
    }
    if workload.labels.use_workload_domain()
        && let Some(domain) = runtime_domain(workload)
    {
        return domain;
    }
    base_domain
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_core::workload::{
        LABEL_COMPOSE_PROJECT, LABEL_COMPOSE_SERVICE, LABEL_DOMAIN, LABEL_HOSTNAME,
        LABEL_SUBDOMAIN, LABEL_USE_WORKLOAD_DOMAIN,
    };
    use tether_core::{Labels, Workload};

    fn workload(name: &str, labels: &[(&str, &str)]) -> Workload {
        Workload {
            id: "w1".to_string(),
            name: name.to_string(),
            hostname: None,
            domain_name: None,
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Labels>(),
            networks: vec![],
            port_bindings: vec![],
        }
    }

    #[test]
    fn plain_name_gets_base_domain() {
        let w = workload("/svcweb", &[]);
        assert_eq!(derive_fqdns(&w, "container"), vec!["svcweb.container"]);
    }

    #[test]
    fn compose_project_becomes_subdomain() {
        let w = workload("/web", &[(LABEL_COMPOSE_PROJECT, "shop")]);
        assert_eq!(derive_fqdns(&w, "container"), vec!["web.shop.container"]);
    }

    #[test]
    fn subdomain_and_domain_labels_ignore_base_domain() {
        let w = workload(
            "/web",
            &[(LABEL_SUBDOMAIN, "admin"), (LABEL_DOMAIN, "internal")],
        );
        assert_eq!(derive_fqdns(&w, "container"), vec!["web.admin.internal"]);
    }

    #[test]
    fn subdomain_label_beats_compose_project() {
        let w = workload(
            "/web",
            &[(LABEL_SUBDOMAIN, "admin"), (LABEL_COMPOSE_PROJECT, "shop")],
        );
        assert_eq!(derive_fqdns(&w, "container"), vec!["web.admin.container"]);
    }

    #[test]
    fn workload_domain_mode_wins_over_all_labels() {
        let mut w = workload(
            "/api",
            &[
                (LABEL_USE_WORKLOAD_DOMAIN, "true"),
                (LABEL_SUBDOMAIN, "admin"),
                (LABEL_DOMAIN, "internal"),
            ],
        );
        w.hostname = Some("api".to_string());
        w.domain_name = Some("svc.local".to_string());
        assert_eq!(derive_fqdns(&w, "container"), vec!["api.svc.local"]);
    }

    #[test]
    fn workload_domain_flag_without_domain_falls_through() {
        let w = workload("/api", &[(LABEL_USE_WORKLOAD_DOMAIN, "true")]);
        assert_eq!(derive_fqdns(&w, "container"), vec!["api.container"]);
    }

    #[test]
    fn hostname_label_wins_host_part() {
        let mut w = workload("/web", &[(LABEL_HOSTNAME, "store")]);
        w.hostname = Some("realhost".to_string());
        assert_eq!(derive_fqdns(&w, "container"), vec!["store.container"]);
    }

    #[test]
    fn compose_service_beats_hostname() {
        let mut w = workload("/shop_web_1", &[(LABEL_COMPOSE_SERVICE, "web")]);
        w.hostname = Some("realhost".to_string());
        assert_eq!(derive_fqdns(&w, "container"), vec!["web.container"]);
    }

    #[test]
    fn meaningful_hostname_beats_name() {
        let mut w = workload("/shop_web_1", &[]);
        w.hostname = Some("frontdoor".to_string());
        assert_eq!(derive_fqdns(&w, "container"), vec!["frontdoor.container"]);
    }

    #[test]
    fn twelve_char_hostname_is_skipped() {
        // Looks autogenerated: exactly 12 characters.
        let mut w = workload("/web", &[]);
        w.hostname = Some("a1b2c3d4e5f6".to_string());
        assert_eq!(derive_fqdns(&w, "container"), vec!["web.container"]);
    }

    #[test]
    fn twelve_char_check_uses_length_only() {
        // Not hex at all, still 12 characters, still skipped.
        let mut w = workload("/web", &[]);
        w.hostname = Some("twelve-chars".to_string());
        assert_eq!(w.hostname.as_ref().unwrap().len(), 12);
        assert_eq!(derive_fqdns(&w, "container"), vec!["web.container"]);
    }

    #[test]
    fn eleven_and_thirteen_char_hostnames_are_used() {
        let mut w = workload("/web", &[]);
        w.hostname = Some("elevenchars".to_string());
        assert_eq!(derive_fqdns(&w, "container"), vec!["elevenchars.container"]);

        w.hostname = Some("thirteenchars".to_string());
        assert_eq!(derive_fqdns(&w, "container"), vec!["thirteenchars.container"]);
    }

    #[test]
    fn empty_label_values_are_not_overrides() {
        let mut w = workload(
            "/web",
            &[(LABEL_HOSTNAME, ""), (LABEL_SUBDOMAIN, ""), (LABEL_DOMAIN, "")],
        );
        w.hostname = Some("".to_string());
        assert_eq!(derive_fqdns(&w, "container"), vec!["web.container"]);
    }

    #[test]
    fn output_is_lower_cased() {
        let w = workload("/Web", &[(LABEL_COMPOSE_PROJECT, "Shop")]);
        assert_eq!(derive_fqdns(&w, "Container"), vec!["web.shop.container"]);
    }

    #[test]
    fn total_even_with_empty_metadata() {
        // Worst case: nothing to go on but the (empty) name and defaults.
        let w = workload("", &[]);
        assert_eq!(derive_fqdns(&w, "container"), vec![".container"]);
    }
}
