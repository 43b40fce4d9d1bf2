//! # Resource layer
//!
//! Schemas, the storage seam, the in-memory store, the response envelope,
//! and the generic resource service that ties the policy modules together.

pub mod envelope;
pub mod memory;
pub mod schema;
pub mod service;
pub mod store;

pub use envelope::{ApiResponse, EnvelopeMode};
pub use memory::MemoryStore;
pub use schema::{ColumnDef, ColumnType, ResourceSchema, SchemaRegistry};
pub use service::ResourceService;
pub use store::{ListQuery, ListResult, ResourceStore};
