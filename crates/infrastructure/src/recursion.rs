use dashmap::DashMap;
use filter_aaaa_application::ports::{AddressResolver, RecursionLauncher, SubLookup};
use filter_aaaa_domain::RecursionError;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Result of one sub-lookup, delivered back to the host so it can resume the
/// suspended query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubLookupOutcome {
    pub query_id: u64,
    pub name: String,
    pub found: bool,
}

/// Sub-lookup launcher backed by an async resolver.
///
/// Each accepted launch spawns a task that asks the resolver whether the
/// record exists and pushes the outcome on the channel handed out at
/// construction. The host drains that channel and redelivers each suspended
/// query at the respond-begin hook point. At most one sub-lookup may be
/// outstanding per query.
pub struct SpawnedRecursor {
    resolver: Arc<dyn AddressResolver>,
    outcomes: mpsc::UnboundedSender<SubLookupOutcome>,
    in_flight: Arc<DashMap<u64, ()>>,
}

impl SpawnedRecursor {
    pub fn new(
        resolver: Arc<dyn AddressResolver>,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<SubLookupOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let recursor = Arc::new(Self {
            resolver,
            outcomes: tx,
            in_flight: Arc::new(DashMap::new()),
        });
        (recursor, rx)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

impl RecursionLauncher for SpawnedRecursor {
    fn launch(&self, request: SubLookup) -> Result<(), RecursionError> {
        if self.in_flight.insert(request.query_id, ()).is_some() {
            return Err(RecursionError::AlreadyOutstanding);
        }

        debug!(query_id = request.query_id, name = %request.name, rtype = %request.rtype, "launching sub-lookup");

        let resolver = Arc::clone(&self.resolver);
        let outcomes = self.outcomes.clone();
        let in_flight = Arc::clone(&self.in_flight);
        tokio::spawn(async move {
            let found = match resolver.resolve_exists(&request.name, request.rtype).await {
                Ok(found) => found,
                Err(error) => {
                    // Failure-shaped outcome: the caller falls back to
                    // sending the answer unfiltered.
                    warn!(name = %request.name, %error, "sub-lookup failed");
                    false
                }
            };

            in_flight.remove(&request.query_id);
            let outcome = SubLookupOutcome {
                query_id: request.query_id,
                name: request.name,
                found,
            };
            if outcomes.send(outcome).is_err() {
                debug!("sub-lookup outcome receiver dropped");
            }
        });

        Ok(())
    }
}
