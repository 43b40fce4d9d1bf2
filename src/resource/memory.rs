//! In-memory store.
//!
//! Backs the demo server and the test suite. In production deployments a
//! database-backed implementation of `ResourceStore` takes its place.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use crate::errors::{Error, RestResult};
use crate::query::Direction;

use super::store::{ListQuery, ListResult, ResourceStore};

/// In-memory resource store: resource name -> records
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert records directly, bypassing validation. For tests and demos.
    pub fn seed(&self, resource: &str, records: Vec<Value>) -> RestResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|_| Error::Internal("lock poisoned".to_string()))?;
        data.entry(resource.to_string()).or_default().extend(records);
        Ok(())
    }

    fn matching(records: &[Value], query: &ListQuery) -> Vec<Value> {
        records
            .iter()
            .filter(|record| {
                query
                    .filters
                    .iter()
                    .all(|(field, value)| record.get(field) == Some(value))
            })
            .filter(|record| query.fuzzy.iter().all(|predicate| predicate.matches(record)))
            .cloned()
            .collect()
    }

    fn apply_ordering(records: &mut [Value], query: &ListQuery) {
        if query.order.is_empty() {
            return;
        }

        records.sort_by(|a, b| {
            for spec in &query.order {
                let ordering = compare_json_values(a.get(&spec.column), b.get(&spec.column));
                let ordering = match spec.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }

    fn apply_pagination(records: Vec<Value>, query: &ListQuery) -> Vec<Value> {
        match query.page {
            None => records,
            Some(page) => records
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.per_page as usize)
                .collect(),
        }
    }
}

/// Compare two optional JSON values for ordering purposes
fn compare_json_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let a = a.as_f64().unwrap_or(0.0);
            let b = b.as_f64().unwrap_or(0.0);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

/// Whether a record's id field matches the requested id
fn id_matches(record: &Value, id: &str) -> bool {
    match record.get("id") {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

impl ResourceStore for MemoryStore {
    fn list(&self, resource: &str, query: &ListQuery) -> RestResult<ListResult> {
        let data = self
            .data
            .read()
            .map_err(|_| Error::Internal("lock poisoned".to_string()))?;

        let records = data.get(resource).map(Vec::as_slice).unwrap_or_default();
        let mut matching = Self::matching(records, query);
        let total = matching.len() as u64;

        Self::apply_ordering(&mut matching, query);
        let records = Self::apply_pagination(matching, query);

        Ok(ListResult { records, total })
    }

    fn count(&self, resource: &str, query: &ListQuery) -> RestResult<u64> {
        let data = self
            .data
            .read()
            .map_err(|_| Error::Internal("lock poisoned".to_string()))?;

        let records = data.get(resource).map(Vec::as_slice).unwrap_or_default();
        Ok(Self::matching(records, query).len() as u64)
    }

    fn find(&self, resource: &str, id: &str) -> RestResult<Option<Value>> {
        let data = self
            .data
            .read()
            .map_err(|_| Error::Internal("lock poisoned".to_string()))?;

        Ok(data
            .get(resource)
            .and_then(|records| records.iter().find(|r| id_matches(r, id)).cloned()))
    }

    fn insert(&self, resource: &str, record: Value) -> RestResult<Value> {
        let mut data = self
            .data
            .write()
            .map_err(|_| Error::Internal("lock poisoned".to_string()))?;

        data.entry(resource.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    fn replace(&self, resource: &str, id: &str, record: Value) -> RestResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|_| Error::Internal("lock poisoned".to_string()))?;

        if let Some(records) = data.get_mut(resource) {
            if let Some(existing) = records.iter_mut().find(|r| id_matches(r, id)) {
                *existing = record;
            }
        }
        Ok(())
    }

    fn delete(&self, resource: &str, id: &str) -> RestResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|_| Error::Internal("lock poisoned".to_string()))?;

        if let Some(records) = data.get_mut(resource) {
            records.retain(|r| !id_matches(r, id));
        }
        Ok(())
    }
}
