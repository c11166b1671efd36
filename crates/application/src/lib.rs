//! Filter-AAAA Application Layer
pub mod engine;
pub mod hooks;
pub mod mode;
pub mod ports;

pub use engine::AaaaFilter;
pub use hooks::{
    module_api_version, register_hooks, HookAction, HookPoint, HookTable, MODULE_API_VERSION,
};
pub use mode::resolve_mode;
