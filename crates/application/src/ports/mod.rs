mod access_list;
mod completion;
mod record_database;
mod recursion;
mod state_pool;

pub use access_list::AccessList;
pub use completion::QueryCompletion;
pub use record_database::{RecordDatabase, RrsetLookup};
pub use recursion::{AddressResolver, RecursionLauncher, SubLookup};
pub use state_pool::FilterStatePool;
