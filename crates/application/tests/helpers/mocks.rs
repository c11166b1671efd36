#![allow(dead_code)]

use filter_aaaa_application::ports::{
    AccessList, FilterStatePool, QueryCompletion, RecordDatabase, RecursionLauncher, RrsetLookup,
    SubLookup,
};
use filter_aaaa_application::AaaaFilter;
use filter_aaaa_domain::{
    FilterConfig, FilterError, FilterMode, QueryContext, QueryFilterState, RecordType,
    RecursionError,
};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub struct MockRecordDatabase {
    outcomes: Mutex<HashMap<(String, RecordType), RrsetLookup>>,
}

impl MockRecordDatabase {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(HashMap::new()),
        }
    }

    pub fn set(&self, name: &str, rtype: RecordType, outcome: RrsetLookup) {
        self.outcomes
            .lock()
            .unwrap()
            .insert((name.to_string(), rtype), outcome);
    }
}

impl RecordDatabase for MockRecordDatabase {
    fn lookup(&self, name: &str, rtype: RecordType) -> RrsetLookup {
        self.outcomes
            .lock()
            .unwrap()
            .get(&(name.to_string(), rtype))
            .copied()
            .unwrap_or(RrsetLookup::NotCached)
    }
}

pub struct MockRecursor {
    launches: Mutex<Vec<SubLookup>>,
    fail_with: Mutex<Option<RecursionError>>,
}

impl MockRecursor {
    pub fn new() -> Self {
        Self {
            launches: Mutex::new(Vec::new()),
            fail_with: Mutex::new(None),
        }
    }

    pub fn fail_with(&self, error: RecursionError) {
        *self.fail_with.lock().unwrap() = Some(error);
    }

    pub fn launch_count(&self) -> usize {
        self.launches.lock().unwrap().len()
    }

    pub fn last_launch(&self) -> Option<SubLookup> {
        self.launches.lock().unwrap().last().cloned()
    }
}

impl RecursionLauncher for MockRecursor {
    fn launch(&self, request: SubLookup) -> Result<(), RecursionError> {
        if let Some(error) = self.fail_with.lock().unwrap().clone() {
            return Err(error);
        }
        self.launches.lock().unwrap().push(request);
        Ok(())
    }
}

pub struct MockCompletion {
    completions: AtomicUsize,
}

impl MockCompletion {
    pub fn new() -> Self {
        Self {
            completions: AtomicUsize::new(0),
        }
    }

    pub fn count(&self) -> usize {
        self.completions.load(Ordering::Relaxed)
    }
}

impl QueryCompletion for MockCompletion {
    fn complete(&self, _ctx: &mut QueryContext) {
        self.completions.fetch_add(1, Ordering::Relaxed);
    }
}

pub struct StaticAcl {
    allow: bool,
}

impl StaticAcl {
    pub fn new(allow: bool) -> Self {
        Self { allow }
    }
}

impl AccessList for StaticAcl {
    fn matches(&self, _addr: IpAddr) -> bool {
        self.allow
    }
}

pub struct MockStatePool {
    acquired: AtomicUsize,
    released: AtomicUsize,
    fail: AtomicBool,
}

impl MockStatePool {
    pub fn new() -> Self {
        Self {
            acquired: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    pub fn fail_next(&self) {
        self.fail.store(true, Ordering::Relaxed);
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::Relaxed)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::Relaxed)
    }

    pub fn outstanding(&self) -> usize {
        self.acquired() - self.released()
    }
}

impl FilterStatePool for MockStatePool {
    fn acquire(&self) -> Result<Box<QueryFilterState>, FilterError> {
        if self.fail.swap(false, Ordering::Relaxed) {
            return Err(FilterError::PoolExhausted);
        }
        self.acquired.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(QueryFilterState::new()))
    }

    fn release(&self, mut state: Box<QueryFilterState>) {
        state.reset();
        self.released.fetch_add(1, Ordering::Relaxed);
    }
}

/// One filter wired to mocks, with handles kept for assertions.
pub struct TestFilter {
    pub database: Arc<MockRecordDatabase>,
    pub recursor: Arc<MockRecursor>,
    pub completion: Arc<MockCompletion>,
    pub pool: Arc<MockStatePool>,
    pub filter: Arc<AaaaFilter>,
}

impl TestFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self::with_acl(config, true)
    }

    pub fn with_acl(config: FilterConfig, allow: bool) -> Self {
        let database = Arc::new(MockRecordDatabase::new());
        let recursor = Arc::new(MockRecursor::new());
        let completion = Arc::new(MockCompletion::new());
        let pool = Arc::new(MockStatePool::new());
        let filter = Arc::new(AaaaFilter::new(
            config,
            Arc::new(StaticAcl::new(allow)),
            Arc::clone(&database) as Arc<dyn RecordDatabase>,
            Arc::clone(&recursor) as Arc<dyn RecursionLauncher>,
            Arc::clone(&completion) as Arc<dyn QueryCompletion>,
            Arc::clone(&pool) as Arc<dyn FilterStatePool>,
        ));
        Self {
            database,
            recursor,
            completion,
            pool,
            filter,
        }
    }

    /// Run the initialize + prepare hooks the way the host would before
    /// response assembly begins.
    pub fn begin_query(&self, ctx: &mut QueryContext) {
        self.filter.query_initialized(ctx).unwrap();
        self.filter.prepare_response_begin(ctx).unwrap();
    }
}

pub fn v4_client() -> IpAddr {
    "192.0.2.1".parse().unwrap()
}

pub fn v6_client() -> IpAddr {
    "2001:db8::1".parse().unwrap()
}

pub fn filter_on_v6() -> FilterConfig {
    FilterConfig {
        on_v4: FilterMode::Disabled,
        on_v6: FilterMode::Filter,
        access_list: None,
    }
}

pub fn filter_on_both() -> FilterConfig {
    FilterConfig {
        on_v4: FilterMode::Filter,
        on_v6: FilterMode::Filter,
        access_list: None,
    }
}

pub fn break_dnssec_on_v6() -> FilterConfig {
    FilterConfig {
        on_v4: FilterMode::Disabled,
        on_v6: FilterMode::BreakDnssec,
        access_list: None,
    }
}

pub fn inert_config() -> FilterConfig {
    FilterConfig::default()
}
