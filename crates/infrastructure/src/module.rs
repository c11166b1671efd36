use crate::access_list::{AllowAll, CidrAccessList};
use crate::state_pool::{PoolStats, StatePool, DEFAULT_FILL_COUNT};
use filter_aaaa_application::ports::{
    AccessList, FilterStatePool, QueryCompletion, RecordDatabase, RecursionLauncher,
};
use filter_aaaa_application::{module_api_version, register_hooks, AaaaFilter, HookTable};
use filter_aaaa_domain::{FilterConfig, FilterError};
use std::sync::Arc;
use tracing::{error, info};

pub const MODULE_NAME: &str = "filter-aaaa";

/// The host facilities the module consumes: the local record database, the
/// sub-lookup launcher, and the continuation that finishes a query.
pub struct HostServices {
    pub database: Arc<dyn RecordDatabase>,
    pub recursor: Arc<dyn RecursionLauncher>,
    pub completion: Arc<dyn QueryCompletion>,
}

/// A loaded filter module: the engine wired into a hook table, plus the
/// module-global resources that live until shutdown.
pub struct RegisteredModule {
    filter: Arc<AaaaFilter>,
    hooks: Arc<HookTable>,
    pool: Arc<StatePool>,
}

impl RegisteredModule {
    /// Parse the raw parameter text and bring the module up. A malformed
    /// configuration aborts registration; the host is left without any of
    /// this module's hooks installed.
    pub fn register(params: Option<&str>, host: HostServices) -> Result<Self, FilterError> {
        let config = match params {
            Some(text) => {
                info!(module = MODULE_NAME, "loading module parameters");
                FilterConfig::from_toml_str(text).inspect_err(|e| {
                    error!(module = MODULE_NAME, error = %e, "rejecting module parameters");
                })?
            }
            None => {
                info!(module = MODULE_NAME, "loading module without parameters");
                FilterConfig::default()
            }
        };
        config.validate()?;

        if config.is_inert() {
            info!(
                module = MODULE_NAME,
                "both filter modes are off, module will not alter responses"
            );
        }

        let access_list: Arc<dyn AccessList> = match &config.access_list {
            Some(expressions) => Arc::new(CidrAccessList::from_expressions(expressions)?),
            None => Arc::new(AllowAll),
        };

        let pool = Arc::new(StatePool::new(DEFAULT_FILL_COUNT));
        let filter = Arc::new(AaaaFilter::new(
            config,
            access_list,
            host.database,
            host.recursor,
            host.completion,
            Arc::clone(&pool) as Arc<dyn FilterStatePool>,
        ));

        let mut hooks = HookTable::new();
        register_hooks(&filter, &mut hooks);

        info!(module = MODULE_NAME, version = module_api_version(), "module registered");

        Ok(Self {
            filter,
            hooks: Arc::new(hooks),
            pool,
        })
    }

    /// Hook ABI version, for the host's compatibility check.
    pub fn version() -> u32 {
        module_api_version()
    }

    pub fn hooks(&self) -> &HookTable {
        &self.hooks
    }

    pub fn hooks_shared(&self) -> Arc<HookTable> {
        Arc::clone(&self.hooks)
    }

    pub fn filter(&self) -> &Arc<AaaaFilter> {
        &self.filter
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Release module-global resources. Dropping the module does the same;
    /// this exists so hosts can tear down explicitly at shutdown.
    pub fn shutdown(self) {
        info!(module = MODULE_NAME, "module shut down");
    }
}
