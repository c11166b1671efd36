use crate::filter_mode::FilterMode;
use crate::message::ResponseMessage;
use crate::record::{normalize_name, RecordSet, RecordType};
use std::net::IpAddr;

/// Sub-lookup state machine for one query.
///
/// `Idle -> AwaitingCoexistenceCheck -> Idle`, at most one round trip per
/// query: while a check is outstanding the query is suspended, so nothing
/// can launch a second one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecursionState {
    #[default]
    Idle,
    AwaitingCoexistenceCheck,
}

/// Pool-recycled per-query scratch state.
///
/// Owned by exactly one query context for its whole lifetime and handed back
/// to the pool when the query is torn down.
#[derive(Debug, Clone, Default)]
pub struct QueryFilterState {
    pub effective_mode: FilterMode,
    pub recursion: RecursionState,
}

impl QueryFilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.effective_mode = FilterMode::Disabled;
        self.recursion = RecursionState::Idle;
    }
}

/// The per-query view handed to every hook point.
///
/// Built by the host when a query context is initialized and carried through
/// response assembly. The filter's own slot is `filter_state`; everything
/// else mirrors what the host already tracks for the query.
#[derive(Debug)]
pub struct QueryContext {
    /// Host-assigned identifier, used to key sub-lookup continuations.
    pub id: u64,
    pub client_addr: IpAddr,
    pub query_name: String,
    pub qtype: RecordType,
    /// Answer comes from zone data this server owns.
    pub authoritative: bool,
    /// The client is allowed to trigger recursion.
    pub recursion_ok: bool,
    /// The client asked for DNSSEC records (DO bit).
    pub want_dnssec: bool,
    pub message: ResponseMessage,
    /// The record set about to be added to the answer section, if response
    /// assembly is between "found" and "committed".
    pub answer: Option<RecordSet>,
    /// Signature set attached to `answer`.
    pub answer_sig: Option<RecordSet>,
    /// Owner name currently being answered when it differs from the query
    /// name (a CNAME was followed).
    pub current_name: Option<String>,
    /// Set once an AAAA has been hidden from this response; never cleared.
    pub was_filtered: bool,
    pub filter_state: Option<Box<QueryFilterState>>,
}

impl QueryContext {
    pub fn new(id: u64, client_addr: IpAddr, query_name: impl AsRef<str>, qtype: RecordType) -> Self {
        Self {
            id,
            client_addr,
            query_name: normalize_name(query_name.as_ref()),
            qtype,
            authoritative: false,
            recursion_ok: false,
            want_dnssec: false,
            message: ResponseMessage::new(),
            answer: None,
            answer_sig: None,
            current_name: None,
            was_filtered: false,
            filter_state: None,
        }
    }

    pub fn with_authoritative(mut self, authoritative: bool) -> Self {
        self.authoritative = authoritative;
        self
    }

    pub fn with_recursion(mut self, recursion_ok: bool) -> Self {
        self.recursion_ok = recursion_ok;
        self
    }

    pub fn with_dnssec(mut self, want_dnssec: bool) -> Self {
        self.want_dnssec = want_dnssec;
        self
    }

    /// The owner name under consideration at the current hook point.
    pub fn answer_name(&self) -> &str {
        self.current_name.as_deref().unwrap_or(&self.query_name)
    }

    pub fn set_current_name(&mut self, name: impl AsRef<str>) {
        self.current_name = Some(normalize_name(name.as_ref()));
    }

    pub fn effective_mode(&self) -> FilterMode {
        self.filter_state
            .as_ref()
            .map(|state| state.effective_mode)
            .unwrap_or(FilterMode::Disabled)
    }

    pub fn recursion_state(&self) -> RecursionState {
        self.filter_state
            .as_ref()
            .map(|state| state.recursion)
            .unwrap_or(RecursionState::Idle)
    }

    pub fn set_recursion_state(&mut self, recursion: RecursionState) {
        if let Some(state) = self.filter_state.as_mut() {
            state.recursion = recursion;
        }
    }

    pub fn mark_filtered(&mut self) {
        self.was_filtered = true;
    }
}
