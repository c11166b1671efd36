use crate::engine::AaaaFilter;
use filter_aaaa_domain::{FilterError, QueryContext};
use std::sync::Arc;

/// Hook ABI version reported to the host for compatibility checking.
pub const MODULE_API_VERSION: u32 = 1;

pub fn module_api_version() -> u32 {
    MODULE_API_VERSION
}

/// The fixed points during query processing where hook modules run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    QueryInitialized,
    PrepareResponseBegin,
    RespondBegin,
    RespondAnyFound,
    QueryDoneSend,
    QueryDestroyed,
}

/// What a hook tells the host about the rest of the pipeline.
///
/// `Handled` means the hook already ran the completion continuation itself;
/// the host must not run its normal finalization for this query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookAction {
    Continue,
    Handled,
}

pub type HookFn = Box<dyn Fn(&mut QueryContext) -> Result<HookAction, FilterError> + Send + Sync>;

/// Hooks registered per hook point, run in insertion order. The first hook
/// reporting `Handled` short-circuits the rest.
#[derive(Default)]
pub struct HookTable {
    hooks: Vec<(HookPoint, HookFn)>,
}

impl HookTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, point: HookPoint, hook: HookFn) {
        self.hooks.push((point, hook));
    }

    pub fn run(&self, point: HookPoint, ctx: &mut QueryContext) -> Result<HookAction, FilterError> {
        for (at, hook) in &self.hooks {
            if *at != point {
                continue;
            }
            if hook(ctx)? == HookAction::Handled {
                return Ok(HookAction::Handled);
            }
        }
        Ok(HookAction::Continue)
    }

    pub fn registered(&self, point: HookPoint) -> usize {
        self.hooks.iter().filter(|(at, _)| *at == point).count()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

/// Wire one filter instance into a hook table at all six points.
pub fn register_hooks(filter: &Arc<AaaaFilter>, table: &mut HookTable) {
    let f = Arc::clone(filter);
    table.insert(
        HookPoint::QueryInitialized,
        Box::new(move |ctx| f.query_initialized(ctx)),
    );

    let f = Arc::clone(filter);
    table.insert(
        HookPoint::PrepareResponseBegin,
        Box::new(move |ctx| f.prepare_response_begin(ctx)),
    );

    let f = Arc::clone(filter);
    table.insert(
        HookPoint::RespondBegin,
        Box::new(move |ctx| f.respond_begin(ctx)),
    );

    let f = Arc::clone(filter);
    table.insert(
        HookPoint::RespondAnyFound,
        Box::new(move |ctx| f.respond_any_found(ctx)),
    );

    let f = Arc::clone(filter);
    table.insert(
        HookPoint::QueryDoneSend,
        Box::new(move |ctx| f.query_done_send(ctx)),
    );

    let f = Arc::clone(filter);
    table.insert(
        HookPoint::QueryDestroyed,
        Box::new(move |ctx| f.query_destroyed(ctx)),
    );
}
