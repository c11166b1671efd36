//! Filter-AAAA Infrastructure Layer
pub mod access_list;
pub mod message_codec;
pub mod module;
pub mod pipeline;
pub mod recursion;
pub mod state_pool;

pub use access_list::{AllowAll, CidrAccessList};
pub use message_codec::{render, view_of};
pub use module::{HostServices, RegisteredModule, MODULE_NAME};
pub use pipeline::{PipelineVerdict, ResponsePipeline};
pub use recursion::{SpawnedRecursor, SubLookupOutcome};
pub use state_pool::{PoolStats, StatePool, DEFAULT_FILL_COUNT};
