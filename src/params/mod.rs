//! # Parameter Registry and Permit
//!
//! Declarative per-resource field allow-lists, consulted per request to
//! whitelist user input before it reaches the store.

pub mod permit;
pub mod registry;

pub use permit::permit;
pub use registry::ParamRegistry;
