//! Best-address selection among a workload's network attachments.

use tether_core::Workload;

/// Pick the address the proxy should dial for a workload.
///
/// Precedence:
/// 1. the attachment on `preferred_network` (case-insensitive), when it
///    has an assigned address
/// 2. the first attachment with an assigned address, in the runtime's
///    attachment order. With several candidate networks this tie-break
///    is enumeration-order-dependent and not stable across engine versions
/// 3. the first port binding published on a host-side address, for
///    workloads only reachable through the host
///
/// Returns `None` when no tier yields an address: the workload is not
/// currently reachable. A preferred-network attachment without an
/// assigned address does not short-circuit; scanning continues.
pub fn select_address(workload: &Workload, preferred_network: &str) -> Option<String> {
    let mut fallback: Option<&str> = None;

    for attachment in &workload.networks {
        let address = attachment.address.as_deref().filter(|a| !a.is_empty());
        if attachment.network.eq_ignore_ascii_case(preferred_network)
            && let Some(address) = address
        {
            return Some(address.to_string());
        }
        if fallback.is_none() {
            fallback = address;
        }
    }

    if let Some(address) = fallback {
        return Some(address.to_string());
    }

    workload
        .port_bindings
        .iter()
        .find_map(|binding| binding.host_ip.as_deref().filter(|ip| !ip.is_empty()))
        .map(str::to_string)
}
