use filter_aaaa_domain::QueryContext;

/// The host's `query_done` continuation: finish building the response for
/// this query and send it. A hook that invokes this reports `Handled` so the
/// normal finalization path is not run a second time.
pub trait QueryCompletion: Send + Sync {
    fn complete(&self, ctx: &mut QueryContext);
}
