use async_trait::async_trait;
use filter_aaaa_domain::{RecordType, RecursionError};

/// A secondary resolution request tied to an already-running query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubLookup {
    pub query_id: u64,
    pub name: String,
    pub rtype: RecordType,
}

/// Fire-and-forget launch of a sub-lookup.
///
/// `Ok` means the host accepted the request and will redeliver the query at
/// the respond-begin hook point once the answer is in; the query suspends
/// until then. `Err` is an immediate, synchronous failure with nothing
/// outstanding.
pub trait RecursionLauncher: Send + Sync {
    fn launch(&self, request: SubLookup) -> Result<(), RecursionError>;
}

/// Async resolution backend a launcher implementation can bridge to: "does a
/// record set of this type exist for this name, asking upstream if needed".
#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn resolve_exists(&self, name: &str, rtype: RecordType) -> Result<bool, RecursionError>;
}
