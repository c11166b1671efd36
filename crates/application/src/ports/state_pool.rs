use filter_aaaa_domain::{FilterError, QueryFilterState};

/// Recycling allocator for per-query filter state.
///
/// Discipline: the caller owns the state from `acquire` until it hands it
/// back with `release`, and must never touch it afterwards. Implementations
/// must tolerate concurrent acquire/release from many workers.
pub trait FilterStatePool: Send + Sync {
    fn acquire(&self) -> Result<Box<QueryFilterState>, FilterError>;
    fn release(&self, state: Box<QueryFilterState>);
}
