use filter_aaaa_application::ports::FilterStatePool;
use filter_aaaa_domain::{FilterError, QueryFilterState};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// States added to the free list per refill.
///
/// One refill is expected to cover all simultaneous queries the server
/// handles, so steady state allocates nothing.
pub const DEFAULT_FILL_COUNT: usize = 1024;

/// Recycling pool of per-query filter states.
///
/// The free list is never capped: released states always go back on it and
/// are only dropped when the pool itself is torn down at module shutdown.
/// An optional outstanding limit turns runaway acquisition into
/// `FilterError::PoolExhausted` instead of unbounded growth.
pub struct StatePool {
    free: Mutex<Vec<Box<QueryFilterState>>>,
    fill_count: usize,
    max_outstanding: Option<usize>,
    outstanding: AtomicUsize,
    total_created: AtomicU64,
    total_reused: AtomicU64,
}

impl StatePool {
    pub fn new(fill_count: usize) -> Self {
        let pool = Self {
            free: Mutex::new(Vec::new()),
            fill_count: fill_count.max(1),
            max_outstanding: None,
            outstanding: AtomicUsize::new(0),
            total_created: AtomicU64::new(0),
            total_reused: AtomicU64::new(0),
        };
        pool.refill(&mut pool.free_list());
        pool
    }

    pub fn with_limit(fill_count: usize, max_outstanding: usize) -> Self {
        let mut pool = Self::new(fill_count);
        pool.max_outstanding = Some(max_outstanding);
        pool
    }

    fn free_list(&self) -> MutexGuard<'_, Vec<Box<QueryFilterState>>> {
        self.free.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn refill(&self, free: &mut Vec<Box<QueryFilterState>>) {
        free.reserve(self.fill_count);
        for _ in 0..self.fill_count {
            free.push(Box::new(QueryFilterState::new()));
        }
        self.total_created
            .fetch_add(self.fill_count as u64, Ordering::Relaxed);
        debug!(fill_count = self.fill_count, "refilled filter state pool");
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            total_created: self.total_created.load(Ordering::Relaxed),
            total_reused: self.total_reused.load(Ordering::Relaxed),
            free: self.free_list().len(),
            outstanding: self.outstanding.load(Ordering::Relaxed),
        }
    }
}

impl FilterStatePool for StatePool {
    fn acquire(&self) -> Result<Box<QueryFilterState>, FilterError> {
        if let Some(limit) = self.max_outstanding {
            if self.outstanding.load(Ordering::Relaxed) >= limit {
                return Err(FilterError::PoolExhausted);
            }
        }

        let mut free = self.free_list();
        if free.is_empty() {
            self.refill(&mut free);
        } else {
            self.total_reused.fetch_add(1, Ordering::Relaxed);
        }

        let state = free.pop().ok_or(FilterError::PoolExhausted)?;
        self.outstanding.fetch_add(1, Ordering::Relaxed);
        Ok(state)
    }

    fn release(&self, mut state: Box<QueryFilterState>) {
        state.reset();
        self.outstanding
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                Some(n.saturating_sub(1))
            })
            .ok();
        self.free_list().push(state);
    }
}

#[derive(Debug, Clone)]
pub struct PoolStats {
    /// States allocated since startup.
    pub total_created: u64,
    /// Acquires served from the free list.
    pub total_reused: u64,
    /// States currently on the free list.
    pub free: usize,
    /// States currently owned by live queries.
    pub outstanding: usize,
}

impl PoolStats {
    pub fn reuse_rate(&self) -> f64 {
        if self.total_created == 0 {
            0.0
        } else {
            self.total_reused as f64 / self.total_created as f64
        }
    }
}
