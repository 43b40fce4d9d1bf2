//! Storage seam.
//!
//! The policy layer hands the store a fully-resolved query description:
//! permitted equality filters, fuzzy predicates, ordering, pagination.
//! How that becomes data access is the store's business.

use serde_json::{Map, Value};

use crate::errors::RestResult;
use crate::query::{LikePredicate, OrderSpec, Page};

/// A resolved list/count query
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Permitted equality filters (field -> value)
    pub filters: Map<String, Value>,

    /// Fuzzy-search predicates, all of which must match
    pub fuzzy: Vec<LikePredicate>,

    /// Ordering clauses, applied in sequence
    pub order: Vec<OrderSpec>,

    /// Pagination window; `None` means unpaginated (count queries)
    pub page: Option<Page>,
}

/// Result of a list query
#[derive(Debug, Clone)]
pub struct ListResult {
    /// The page of matching records
    pub records: Vec<Value>,

    /// Total matches before pagination
    pub total: u64,
}

/// Store trait for resource operations
pub trait ResourceStore: Send + Sync {
    /// List records matching a query
    fn list(&self, resource: &str, query: &ListQuery) -> RestResult<ListResult>;

    /// Count records matching a query
    fn count(&self, resource: &str, query: &ListQuery) -> RestResult<u64>;

    /// Find a single record by id
    fn find(&self, resource: &str, id: &str) -> RestResult<Option<Value>>;

    /// Insert a record
    fn insert(&self, resource: &str, record: Value) -> RestResult<Value>;

    /// Replace a record by id
    fn replace(&self, resource: &str, id: &str, record: Value) -> RestResult<()>;

    /// Delete a record by id
    fn delete(&self, resource: &str, id: &str) -> RestResult<()>;
}
