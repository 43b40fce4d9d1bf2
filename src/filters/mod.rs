//! # Filter Chain Evaluator
//!
//! Ordered post-processing handlers per controller, with only/except/
//! if/unless scoping, evaluated deterministically after each CRUD
//! operation.

pub mod chain;
pub mod scope;

pub use chain::{FilterChains, FilterRule, Handler, HandlerRegistry};
pub use scope::{FilterScope, Predicate};
