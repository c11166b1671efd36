use filter_aaaa_domain::RecordType;

/// Outcome of a synchronous record-set probe against the local database or
/// cache. The probe never triggers network resolution by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RrsetLookup {
    /// The record set exists locally.
    Found,
    /// Zone data says the set does not exist. Definitive.
    AuthoritativeMiss,
    /// The name lies below a zone cut; the answer would come from elsewhere.
    ReferralMiss,
    /// Nothing known locally. The set may well exist upstream.
    NotCached,
}

impl RrsetLookup {
    /// A miss that an upstream lookup could still turn into an answer.
    pub fn could_exist_upstream(&self) -> bool {
        matches!(self, RrsetLookup::ReferralMiss | RrsetLookup::NotCached)
    }
}

pub trait RecordDatabase: Send + Sync {
    fn lookup(&self, name: &str, rtype: RecordType) -> RrsetLookup;
}
