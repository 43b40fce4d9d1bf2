//! Parameter registry
//!
//! Declarative mapping of resource name -> allowed field names, built once
//! at startup and injected by reference everywhere it is consulted. Keys
//! are normalized to singular form so `customers` and `customer` resolve
//! to the same entry.

use std::collections::{BTreeSet, HashMap};

use serde_json::Value;

use crate::errors::{Error, RestResult};
use crate::naming;
use crate::resource::schema::ResourceSchema;

/// Allow-list of fields per resource
#[derive(Debug, Clone, Default)]
pub struct ParamRegistry {
    allowed: HashMap<String, BTreeSet<String>>,
}

impl ParamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register allowed fields for one resource. Registering the same
    /// field twice is idempotent.
    pub fn register_fields<I, S>(&mut self, resource: &str, fields: I) -> RestResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let key = naming::singularize(resource);
        let entry = self.allowed.entry(key).or_default();
        for field in fields {
            let field = field.as_ref();
            if !naming::is_identifier(field) {
                return Err(Error::InvalidRegistration(format!(
                    "field name {field:?} for resource {resource} is not a plain identifier"
                )));
            }
            entry.insert(field.to_string());
        }
        Ok(())
    }

    /// Register from a dynamic JSON shape.
    ///
    /// Accepts an array of field names (applied to `default_resource`) or
    /// an object mapping resource names to arrays of field names. Anything
    /// else is an unsupported shape and fails registration.
    pub fn register_value(&mut self, default_resource: &str, value: &Value) -> RestResult<()> {
        match value {
            Value::Array(entries) => {
                let fields = field_names(default_resource, entries)?;
                self.register_fields(default_resource, fields)
            }
            Value::Object(map) => {
                for (resource, entry) in map {
                    let Value::Array(entries) = entry else {
                        return Err(Error::InvalidRegistration(format!(
                            "expected an array of field names for resource {resource}"
                        )));
                    };
                    let fields = field_names(resource, entries)?;
                    self.register_fields(resource, fields)?;
                }
                Ok(())
            }
            other => Err(Error::InvalidRegistration(format!(
                "unsupported registration shape: {other}"
            ))),
        }
    }

    /// Register every permitable column of a schema
    pub fn register_from_schema(&mut self, schema: &ResourceSchema) -> RestResult<()> {
        self.register_fields(&schema.name, schema.permitable_columns())
    }

    /// The registered field set for a resource, if any.
    ///
    /// Callers must treat `None` as "no fields permitted", never as "all
    /// fields permitted".
    pub fn allowed_fields(&self, resource: &str) -> Option<&BTreeSet<String>> {
        self.allowed.get(&naming::singularize(resource))
    }

    /// Whether any fields are registered for a resource
    pub fn is_registered(&self, resource: &str) -> bool {
        self.allowed.contains_key(&naming::singularize(resource))
    }
}

fn field_names(resource: &str, entries: &[Value]) -> RestResult<Vec<String>> {
    entries
        .iter()
        .map(|entry| match entry {
            Value::String(s) => Ok(s.clone()),
            other => Err(Error::InvalidRegistration(format!(
                "invalid field entry {other} for resource {resource}"
            ))),
        })
        .collect()
}
