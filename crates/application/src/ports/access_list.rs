use std::net::IpAddr;

/// Opaque applicability predicate over client addresses. The filter only
/// ever asks "does the policy apply to this client"; how the match is done
/// belongs to whoever built the list.
pub trait AccessList: Send + Sync {
    fn matches(&self, addr: IpAddr) -> bool;
}
