//! restgen - a generic REST resource service
//!
//! Register resources once at startup; get index/show/create/update/
//! destroy/count/search for each of them, with parameter whitelisting, a
//! pluggable filter chain, ordering, pagination and fuzzy search over a
//! pluggable store.

pub mod cli;
pub mod config;
pub mod errors;
pub mod filters;
pub mod http;
pub mod naming;
pub mod params;
pub mod query;
pub mod resource;

pub use config::{Config, ExecutionMode, PolicyConfig, ServerConfig, ValueKind};
pub use errors::{Error, RestResult};
pub use filters::{FilterChains, FilterScope, HandlerRegistry};
pub use params::{permit, ParamRegistry};
pub use resource::{
    ApiResponse, ColumnDef, ColumnType, EnvelopeMode, MemoryStore, ResourceSchema,
    ResourceService, ResourceStore, SchemaRegistry,
};
