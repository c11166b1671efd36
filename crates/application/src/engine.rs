use crate::hooks::HookAction;
use crate::mode::resolve_mode;
use crate::ports::{
    AccessList, FilterStatePool, QueryCompletion, RecordDatabase, RecursionLauncher, RrsetLookup,
    SubLookup,
};
use filter_aaaa_domain::{
    FilterConfig, FilterError, FilterMode, QueryContext, RecordType, RecursionState, Section,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// The AAAA-visibility decision engine.
///
/// One instance per registered module, shared by every in-flight query. All
/// per-query state lives in the query context; the engine itself holds only
/// the immutable policy snapshot and its ports.
pub struct AaaaFilter {
    config: FilterConfig,
    access_list: Arc<dyn AccessList>,
    database: Arc<dyn RecordDatabase>,
    recursor: Arc<dyn RecursionLauncher>,
    completion: Arc<dyn QueryCompletion>,
    pool: Arc<dyn FilterStatePool>,
}

impl AaaaFilter {
    pub fn new(
        config: FilterConfig,
        access_list: Arc<dyn AccessList>,
        database: Arc<dyn RecordDatabase>,
        recursor: Arc<dyn RecursionLauncher>,
        completion: Arc<dyn QueryCompletion>,
        pool: Arc<dyn FilterStatePool>,
    ) -> Self {
        Self {
            config,
            access_list,
            database,
            recursor,
            completion,
            pool,
        }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Attach pool-backed scratch state to a freshly created query context.
    /// Pool exhaustion is a hard failure for the query, surfaced through the
    /// host's normal per-query error path.
    pub fn query_initialized(&self, ctx: &mut QueryContext) -> Result<HookAction, FilterError> {
        let mut state = self.pool.acquire()?;
        state.reset();
        ctx.filter_state = Some(state);
        Ok(HookAction::Continue)
    }

    /// Resolve the effective mode for this client, once, before response
    /// assembly starts.
    pub fn prepare_response_begin(&self, ctx: &mut QueryContext) -> Result<HookAction, FilterError> {
        let mode = resolve_mode(&self.config, self.access_list.as_ref(), ctx.client_addr);
        if let Some(state) = ctx.filter_state.as_mut() {
            state.effective_mode = mode;
            if mode.is_active() {
                debug!(client = %ctx.client_addr, %mode, "AAAA filtering applies to query");
            }
        }
        Ok(HookAction::Continue)
    }

    /// Answer-section handling for explicit (non-ANY) queries.
    ///
    /// For an AAAA query, hide the answer if a matching A is known to exist,
    /// reveal it if the A is known not to, and otherwise go find out via a
    /// sub-lookup. Redelivery of the sub-lookup answer arrives here too, as
    /// an A-type invocation while the coexistence check is outstanding.
    pub fn respond_begin(&self, ctx: &mut QueryContext) -> Result<HookAction, FilterError> {
        if ctx.qtype == RecordType::A
            && ctx.recursion_state() == RecursionState::AwaitingCoexistenceCheck
        {
            return self.finish_coexistence_check(ctx);
        }

        let mode = ctx.effective_mode();
        if mode != FilterMode::BreakDnssec
            && (mode != FilterMode::Filter || (ctx.want_dnssec && ctx.answer_sig.is_some()))
        {
            return Ok(HookAction::Continue);
        }

        if ctx.qtype != RecordType::AAAA || ctx.answer.is_none() {
            return Ok(HookAction::Continue);
        }

        let name = ctx.answer_name().to_string();
        match self.database.lookup(&name, RecordType::A) {
            RrsetLookup::Found => {
                if let Some(answer) = ctx.answer.as_mut() {
                    answer.suppress();
                }
                if let Some(sig) = ctx.answer_sig.as_mut() {
                    sig.suppress();
                }
                ctx.mark_filtered();
                debug!(name = %name, "AAAA suppressed, matching A found locally");
            }
            outcome
                if ctx.authoritative || !ctx.recursion_ok || !outcome.could_exist_upstream() =>
            {
                // No A exists to justify hiding the AAAA.
                if let Some(answer) = ctx.answer.as_mut() {
                    answer.reveal();
                }
                if let Some(sig) = ctx.answer_sig.as_mut() {
                    sig.reveal();
                }
            }
            _ => self.launch_coexistence_check(ctx),
        }

        Ok(HookAction::Continue)
    }

    /// A existence is unknown: keep the AAAA in the answer for now and
    /// resolve the A on the side. If the launch is refused, the AAAA simply
    /// goes out unfiltered.
    fn launch_coexistence_check(&self, ctx: &mut QueryContext) {
        if ctx.recursion_state() != RecursionState::Idle {
            return;
        }

        let request = SubLookup {
            query_id: ctx.id,
            name: ctx.query_name.clone(),
            rtype: RecordType::A,
        };
        match self.recursor.launch(request) {
            Ok(()) => {
                ctx.set_recursion_state(RecursionState::AwaitingCoexistenceCheck);
                debug!(name = %ctx.query_name, "suspended for A coexistence check");
            }
            Err(error) => {
                warn!(name = %ctx.query_name, %error, "A sub-lookup launch failed, sending AAAA unfiltered");
            }
        }
    }

    /// Resumption of a suspended query: the A answer came back. Hide the
    /// speculatively-added AAAA if the A exists, then finish the response
    /// ourselves. The A record itself is discarded; only its existence
    /// mattered.
    fn finish_coexistence_check(&self, ctx: &mut QueryContext) -> Result<HookAction, FilterError> {
        let confirmed = ctx.answer.is_some();
        ctx.answer = None;
        ctx.answer_sig = None;

        if confirmed {
            let name = ctx.answer_name().to_string();
            if let Some(aaaa) = ctx
                .message
                .find(Section::Answer, &name, RecordType::AAAA, None)
            {
                aaaa.suppress();
            }
            if let Some(sig) = ctx.message.find(
                Section::Answer,
                &name,
                RecordType::RRSIG,
                Some(RecordType::AAAA),
            ) {
                sig.suppress();
            }
            debug!(name = %name, "AAAA retroactively suppressed, A confirmed upstream");
        }

        ctx.set_recursion_state(RecursionState::Idle);
        self.completion.complete(ctx);
        Ok(HookAction::Handled)
    }

    /// Answer-section handling for ANY queries, after every set for the name
    /// has been assembled.
    ///
    /// Authoritative answers must show an actual A set for the name;
    /// non-authoritative ones assume an A may exist upstream rather than
    /// resolve it from here.
    pub fn respond_any_found(&self, ctx: &mut QueryContext) -> Result<HookAction, FilterError> {
        let mode = ctx.effective_mode();
        if !mode.is_active() {
            return Ok(HookAction::Continue);
        }

        let name = ctx.answer_name().to_string();
        let have_a = !ctx.authoritative || ctx.message.contains(Section::Answer, &name, RecordType::A);
        let has_aaaa = ctx.message.contains(Section::Answer, &name, RecordType::AAAA);
        let sig_attached = ctx
            .message
            .get(
                Section::Answer,
                &name,
                RecordType::RRSIG,
                Some(RecordType::AAAA),
            )
            .is_some();

        if have_a
            && has_aaaa
            && (!sig_attached || !ctx.want_dnssec || mode == FilterMode::BreakDnssec)
        {
            if let Some(aaaa) = ctx
                .message
                .find(Section::Answer, &name, RecordType::AAAA, None)
            {
                aaaa.suppress();
            }
            if let Some(sig) = ctx.message.find(
                Section::Answer,
                &name,
                RecordType::RRSIG,
                Some(RecordType::AAAA),
            ) {
                sig.suppress();
            }
            debug!(name = %name, "AAAA suppressed from ANY answer");
        }

        Ok(HookAction::Continue)
    }

    /// Final sweep at response-send time: hide coexisting AAAAs from the
    /// additional section, and once anything was filtered from the answer,
    /// hide the authority NS sets that would point at it.
    pub fn query_done_send(&self, ctx: &mut QueryContext) -> Result<HookAction, FilterError> {
        let mode = ctx.effective_mode();
        if !mode.is_active() {
            return Ok(HookAction::Continue);
        }

        for name in ctx.message.names(Section::Additional) {
            if !ctx.message.contains(Section::Additional, &name, RecordType::A) {
                continue;
            }
            if !ctx
                .message
                .contains(Section::Additional, &name, RecordType::AAAA)
            {
                continue;
            }

            let sig_attached = ctx
                .message
                .get(
                    Section::Additional,
                    &name,
                    RecordType::RRSIG,
                    Some(RecordType::AAAA),
                )
                .is_some();
            if sig_attached && ctx.want_dnssec && mode != FilterMode::BreakDnssec {
                continue;
            }

            if let Some(aaaa) =
                ctx.message
                    .find(Section::Additional, &name, RecordType::AAAA, None)
            {
                aaaa.suppress();
            }
            if let Some(sig) = ctx.message.find(
                Section::Additional,
                &name,
                RecordType::RRSIG,
                Some(RecordType::AAAA),
            ) {
                sig.suppress();
            }
        }

        if ctx.was_filtered {
            for set in ctx.message.sets_mut(Section::Authority) {
                if set.rtype == RecordType::NS || set.is_rrsig_covering(RecordType::NS) {
                    set.suppress();
                }
            }
        }

        Ok(HookAction::Continue)
    }

    /// Return the scratch state to the pool. Safe to run more than once.
    pub fn query_destroyed(&self, ctx: &mut QueryContext) -> Result<HookAction, FilterError> {
        if let Some(state) = ctx.filter_state.take() {
            self.pool.release(state);
        }
        Ok(HookAction::Continue)
    }
}
