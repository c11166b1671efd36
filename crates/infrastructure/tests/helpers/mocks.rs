#![allow(dead_code)]

use async_trait::async_trait;
use filter_aaaa_application::ports::{
    AddressResolver, QueryCompletion, RecordDatabase, RecursionLauncher, RrsetLookup, SubLookup,
};
use filter_aaaa_domain::{QueryContext, RecordType, RecursionError};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub struct MockRecordDatabase {
    outcomes: Mutex<HashMap<(String, RecordType), RrsetLookup>>,
}

impl MockRecordDatabase {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(HashMap::new()),
        })
    }

    pub fn set(&self, name: &str, rtype: RecordType, outcome: RrsetLookup) {
        self.outcomes
            .lock()
            .unwrap()
            .insert((name.to_string(), rtype), outcome);
    }

    /// Shorthand for a name with locally-cached sets of the given types.
    pub fn with_cached(self: &Arc<Self>, name: &str, types: &[RecordType]) -> Arc<Self> {
        for rtype in types {
            self.set(name, *rtype, RrsetLookup::Found);
        }
        Arc::clone(self)
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

/// Synchronous launcher that records launches and never resolves anything.
pub struct RecordingRecursor {
    launches: Mutex<Vec<SubLookup>>,
}

impl RecordingRecursor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            launches: Mutex::new(Vec::new()),
        })
    }

    pub fn launch_count(&self) -> usize {
        self.launches.lock().unwrap().len()
    }
}

impl RecursionLauncher for RecordingRecursor {
    fn launch(&self, request: SubLookup) -> Result<(), RecursionError> {
        self.launches.lock().unwrap().push(request);
        Ok(())
    }
}

/// Launcher that refuses every request.
pub struct RefusingRecursor;

impl RecursionLauncher for RefusingRecursor {
    fn launch(&self, _request: SubLookup) -> Result<(), RecursionError> {
        Err(RecursionError::Exhausted)
    }
}

/// Async existence oracle for `SpawnedRecursor` tests.
pub struct StaticAddressResolver {
    exists: bool,
    fail: bool,
    calls: AtomicUsize,
}

impl StaticAddressResolver {
    pub fn found() -> Arc<Self> {
        Arc::new(Self {
            exists: true,
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn absent() -> Arc<Self> {
        Arc::new(Self {
            exists: false,
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            exists: false,
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AddressResolver for StaticAddressResolver {
    async fn resolve_exists(&self, _name: &str, _rtype: RecordType) -> Result<bool, RecursionError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.fail {
            return Err(RecursionError::Rejected("upstream unreachable".into()));
        }
        Ok(self.exists)
    }
}

pub struct CountingCompletion {
    completions: AtomicUsize,
}

impl CountingCompletion {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            completions: AtomicUsize::new(0),
        })
    }

    pub fn count(&self) -> usize {
        self.completions.load(Ordering::Relaxed)
    }
}

impl QueryCompletion for CountingCompletion {
    fn complete(&self, _ctx: &mut QueryContext) {
        self.completions.fetch_add(1, Ordering::Relaxed);
    }
}

/// Route module tracing into test output when RUST_LOG is set.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn v6_client() -> IpAddr {
    "2001:db8::1".parse().unwrap()
}

pub fn v4_client() -> IpAddr {
    "192.0.2.1".parse().unwrap()
}

pub const FILTER_ON_V6: &str = "filter-aaaa-on-v6 = true\n";
pub const FILTER_ON_BOTH: &str = "filter-aaaa-on-v4 = true\nfilter-aaaa-on-v6 = true\n";
pub const BREAK_DNSSEC_ON_V6: &str = "filter-aaaa-on-v6 = \"break-dnssec\"\n";
