use crate::ports::AccessList;
use filter_aaaa_domain::{ClientScope, FilterConfig, FilterMode};
use std::net::IpAddr;

/// Compute the filtering mode that applies to one client.
///
/// Derived only from immutable inputs, so recomputing it is idempotent; the
/// prepare-response hook still writes it into the query state exactly once.
/// When both configured modes are off the access list is never consulted.
pub fn resolve_mode(config: &FilterConfig, access_list: &dyn AccessList, client: IpAddr) -> FilterMode {
    if config.is_inert() {
        return FilterMode::Disabled;
    }

    if !access_list.matches(client) {
        return FilterMode::Disabled;
    }

    match ClientScope::classify(client) {
        ClientScope::V4 if config.on_v4.is_active() => config.on_v4,
        ClientScope::V6 if config.on_v6.is_active() => config.on_v6,
        _ => FilterMode::Disabled,
    }
}
