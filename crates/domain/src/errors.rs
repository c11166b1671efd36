use crate::config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("filter state pool exhausted")]
    PoolExhausted,
}

/// Failures surfaced by the sub-lookup launch interface. A failed launch is
/// never fatal to the query; the caller falls back to sending the answer
/// unfiltered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecursionError {
    #[error("sub-lookup rejected: {0}")]
    Rejected(String),

    #[error("a sub-lookup is already outstanding for this query")]
    AlreadyOutstanding,

    #[error("resolver resources exhausted")]
    Exhausted,
}
