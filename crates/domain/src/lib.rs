//! Filter-AAAA Domain Layer
pub mod client_scope;
pub mod config;
pub mod errors;
pub mod filter_mode;
pub mod message;
pub mod query_state;
pub mod record;

pub use client_scope::ClientScope;
pub use config::{ConfigError, FilterConfig};
pub use errors::{FilterError, RecursionError};
pub use filter_mode::FilterMode;
pub use message::{ResponseMessage, Section};
pub use query_state::{QueryContext, QueryFilterState, RecursionState};
pub use record::{RecordSet, RecordType};
