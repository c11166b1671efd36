use crate::module::{HostServices, RegisteredModule};
use crate::recursion::SubLookupOutcome;
use dashmap::DashMap;
use filter_aaaa_application::ports::{
    QueryCompletion, RecordDatabase, RecursionLauncher, RrsetLookup,
};
use filter_aaaa_application::{HookAction, HookPoint, HookTable};
use filter_aaaa_domain::{
    FilterError, QueryContext, RecordSet, RecordType, RecursionState, Section,
};
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Record types the driver materializes when answering an ANY query.
const ANY_TYPES: [RecordType; 3] = [RecordType::A, RecordType::AAAA, RecordType::NS];

/// What became of a query fed into the pipeline.
#[derive(Debug)]
pub enum PipelineVerdict {
    Completed(QueryContext),
    /// A sub-lookup was launched; the query is parked until its outcome is
    /// delivered to `resume`.
    Suspended,
}

/// Completion continuation handed to the module: finishing a query means
/// running the done-send hook point and letting the encoder take over.
pub struct PipelineCompletion {
    hooks: OnceLock<Arc<HookTable>>,
}

impl PipelineCompletion {
    fn new() -> Self {
        Self {
            hooks: OnceLock::new(),
        }
    }

    fn wire(&self, hooks: Arc<HookTable>) {
        self.hooks.set(hooks).ok();
    }
}

impl QueryCompletion for PipelineCompletion {
    fn complete(&self, ctx: &mut QueryContext) {
        if let Some(hooks) = self.hooks.get() {
            let _ = hooks.run(HookPoint::QueryDoneSend, ctx);
        }
    }
}

/// Host-side driver exercising the full hook protocol.
///
/// Assembles a response for each query out of the record database, runs the
/// six hook points at the same spots a server would, parks queries whose
/// processing launched a sub-lookup, and resumes them when the outcome comes
/// back. Each query is touched by one caller at a time; the suspension map
/// is the only shared state.
pub struct ResponsePipeline {
    module: RegisteredModule,
    hooks: Arc<HookTable>,
    database: Arc<dyn RecordDatabase>,
    suspended: DashMap<u64, QueryContext>,
}

impl ResponsePipeline {
    /// Register the filter module against this pipeline's completion
    /// continuation and the given host services.
    pub fn with_module(
        params: Option<&str>,
        database: Arc<dyn RecordDatabase>,
        recursor: Arc<dyn RecursionLauncher>,
    ) -> Result<Self, FilterError> {
        let completion = Arc::new(PipelineCompletion::new());
        let module = RegisteredModule::register(
            params,
            HostServices {
                database: Arc::clone(&database),
                recursor,
                completion: Arc::clone(&completion) as Arc<dyn QueryCompletion>,
            },
        )?;
        let hooks = module.hooks_shared();
        completion.wire(Arc::clone(&hooks));

        Ok(Self {
            module,
            hooks,
            database,
            suspended: DashMap::new(),
        })
    }

    pub fn module(&self) -> &RegisteredModule {
        &self.module
    }

    pub fn suspended_count(&self) -> usize {
        self.suspended.len()
    }

    /// Process one query up to the point where the response is ready to
    /// encode, or park it if a sub-lookup was launched.
    pub fn run(&self, mut ctx: QueryContext) -> Result<PipelineVerdict, FilterError> {
        self.hooks.run(HookPoint::QueryInitialized, &mut ctx)?;
        self.hooks.run(HookPoint::PrepareResponseBegin, &mut ctx)?;

        if ctx.qtype == RecordType::ANY {
            self.assemble_any(&mut ctx);
            self.hooks.run(HookPoint::RespondAnyFound, &mut ctx)?;
            return self.finish(ctx);
        }

        self.assemble_answer(&mut ctx);
        let action = self.hooks.run(HookPoint::RespondBegin, &mut ctx)?;
        self.commit_answer(&mut ctx);

        if action == HookAction::Handled {
            return Ok(PipelineVerdict::Completed(ctx));
        }

        if ctx.recursion_state() == RecursionState::AwaitingCoexistenceCheck {
            debug!(query_id = ctx.id, "parking query until sub-lookup completes");
            self.suspended.insert(ctx.id, ctx);
            return Ok(PipelineVerdict::Suspended);
        }

        self.finish(ctx)
    }

    /// Redeliver a parked query at the respond-begin hook point with the
    /// sub-lookup outcome. Unknown ids are stale deliveries and are ignored.
    pub fn resume(
        &self,
        outcome: &SubLookupOutcome,
    ) -> Result<Option<PipelineVerdict>, FilterError> {
        let Some((_, mut ctx)) = self.suspended.remove(&outcome.query_id) else {
            debug!(query_id = outcome.query_id, "dropping stale sub-lookup outcome");
            return Ok(None);
        };

        ctx.qtype = RecordType::A;
        ctx.answer_sig = None;
        ctx.answer = outcome
            .found
            .then(|| RecordSet::new(&ctx.query_name, RecordType::A));

        match self.hooks.run(HookPoint::RespondBegin, &mut ctx)? {
            HookAction::Handled => Ok(Some(PipelineVerdict::Completed(ctx))),
            HookAction::Continue => self.finish(ctx).map(Some),
        }
    }

    /// Tear down a finished query, returning pooled state.
    pub fn destroy(&self, ctx: &mut QueryContext) -> Result<(), FilterError> {
        self.hooks.run(HookPoint::QueryDestroyed, ctx)?;
        Ok(())
    }

    /// Tear down a parked query whose client went away without waiting for
    /// the sub-lookup.
    pub fn abandon(&self, query_id: u64) -> Result<bool, FilterError> {
        match self.suspended.remove(&query_id) {
            Some((_, mut ctx)) => {
                self.destroy(&mut ctx)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn finish(&self, mut ctx: QueryContext) -> Result<PipelineVerdict, FilterError> {
        self.hooks.run(HookPoint::QueryDoneSend, &mut ctx)?;
        Ok(PipelineVerdict::Completed(ctx))
    }

    fn assemble_answer(&self, ctx: &mut QueryContext) {
        let name = ctx.answer_name().to_string();
        if self.database.lookup(&name, ctx.qtype) != RrsetLookup::Found {
            return;
        }
        let signed = self.database.lookup(&name, RecordType::RRSIG) == RrsetLookup::Found;
        ctx.answer = Some(RecordSet::new(&name, ctx.qtype));
        if signed {
            ctx.answer_sig = Some(RecordSet::rrsig(&name, ctx.qtype));
        }

        // NS sets accompanying the answer, as a server would add below it.
        if self.database.lookup(&name, RecordType::NS) == RrsetLookup::Found {
            ctx.message
                .push(Section::Authority, RecordSet::new(&name, RecordType::NS));
            if signed {
                ctx.message
                    .push(Section::Authority, RecordSet::rrsig(&name, RecordType::NS));
            }
        }
    }

    fn commit_answer(&self, ctx: &mut QueryContext) {
        if let Some(answer) = ctx.answer.take() {
            ctx.message.push(Section::Answer, answer);
        }
        if let Some(sig) = ctx.answer_sig.take() {
            ctx.message.push(Section::Answer, sig);
        }
    }

    fn assemble_any(&self, ctx: &mut QueryContext) {
        let name = ctx.answer_name().to_string();
        let signed = self.database.lookup(&name, RecordType::RRSIG) == RrsetLookup::Found;

        for rtype in ANY_TYPES {
            if self.database.lookup(&name, rtype) != RrsetLookup::Found {
                continue;
            }
            ctx.message.push(Section::Answer, RecordSet::new(&name, rtype));
            if signed {
                ctx.message
                    .push(Section::Answer, RecordSet::rrsig(&name, rtype));
            }
        }
    }
}
