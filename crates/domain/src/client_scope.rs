use std::net::IpAddr;

/// Address-family classification of a querying client.
///
/// IPv4-mapped IPv6 literals count as `V4`: the packets arrived over an IPv6
/// socket but the client itself is an IPv4 speaker. The two scopes are
/// mutually exclusive and cover every address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientScope {
    V4,
    V6,
}

impl ClientScope {
    pub fn classify(addr: IpAddr) -> ClientScope {
        match addr {
            IpAddr::V4(_) => ClientScope::V4,
            IpAddr::V6(v6) if v6.to_ipv4_mapped().is_some() => ClientScope::V4,
            IpAddr::V6(_) => ClientScope::V6,
        }
    }

    pub fn is_v4(&self) -> bool {
        matches!(self, ClientScope::V4)
    }

    pub fn is_v6(&self) -> bool {
        matches!(self, ClientScope::V6)
    }
}
