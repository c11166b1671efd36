use filter_aaaa_application::ports::AccessList;
use filter_aaaa_domain::ConfigError;
use ipnetwork::IpNetwork;
use std::net::IpAddr;

/// The default when no access list is configured: the policy applies to
/// every client.
pub struct AllowAll;

impl AccessList for AllowAll {
    fn matches(&self, _addr: IpAddr) -> bool {
        true
    }
}

/// Access list built from the configured address/prefix expressions. A bare
/// address counts as a host-sized prefix.
pub struct CidrAccessList {
    networks: Vec<IpNetwork>,
}

impl CidrAccessList {
    pub fn from_expressions(expressions: &[String]) -> Result<Self, ConfigError> {
        let mut networks = Vec::with_capacity(expressions.len());

        for expr in expressions {
            let network = expr
                .parse::<IpNetwork>()
                .or_else(|_| expr.parse::<IpAddr>().map(IpNetwork::from))
                .map_err(|e| {
                    ConfigError::Validation(format!("invalid access-list entry '{}': {}", expr, e))
                })?;
            networks.push(network);
        }

        Ok(Self { networks })
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

impl AccessList for CidrAccessList {
    fn matches(&self, addr: IpAddr) -> bool {
        self.networks.iter().any(|network| network.contains(addr))
    }
}
