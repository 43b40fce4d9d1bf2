//! Resource schemas and domain validation.
//!
//! A schema declares the columns of a resource: the set of legal columns
//! for ordering and fuzzy search, the source for derived parameter
//! registration, and the validation rules applied on create/update.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Column definition in a resource schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name
    pub name: String,

    /// Column type
    #[serde(rename = "type")]
    pub column_type: ColumnType,

    /// Whether this column must be present and non-null on writes
    #[serde(default)]
    pub required: bool,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Column types supported by the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Integer,
    Float,
    Boolean,
    Datetime,
}

impl ColumnType {
    /// Validate a JSON value against this column type
    pub fn validates(&self, value: &Value) -> bool {
        match self {
            ColumnType::String => value.is_string(),
            ColumnType::Integer => value.is_i64() || value.is_u64(),
            ColumnType::Float => value.is_number(),
            ColumnType::Boolean => value.is_boolean(),
            ColumnType::Datetime => value
                .as_str()
                .map(|s| chrono::DateTime::parse_from_rfc3339(s).is_ok())
                .unwrap_or(false),
        }
    }
}

/// Schema definition for a resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSchema {
    /// Singular resource name
    pub name: String,

    /// Column definitions (the implicit `id` column is not listed)
    pub columns: Vec<ColumnDef>,
}

impl ResourceSchema {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Columns legal for ordering and fuzzy search. `id` is always legal.
    pub fn legal_columns(&self) -> Vec<String> {
        let mut columns = vec!["id".to_string()];
        columns.extend(self.columns.iter().map(|c| c.name.clone()));
        columns
    }

    /// Columns eligible for derived parameter registration (`id` excluded)
    pub fn permitable_columns(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Validate a record against this schema.
    ///
    /// Returns human-readable messages; an empty vec means the record is
    /// valid. Required columns that are absent or null read
    /// `<column> can't be blank`; present values of the wrong type read
    /// `<column> is invalid`. Keys outside the schema are ignored here —
    /// keeping them out is the permit layer's job.
    pub fn validate(&self, record: &Value) -> Vec<String> {
        let mut messages = Vec::new();

        let Some(obj) = record.as_object() else {
            return vec!["record must be an object".to_string()];
        };

        for column in &self.columns {
            match obj.get(&column.name) {
                None | Some(Value::Null) => {
                    if column.required {
                        messages.push(format!("{} can't be blank", column.name));
                    }
                }
                Some(value) => {
                    if !column.column_type.validates(value) {
                        messages.push(format!("{} is invalid", column.name));
                    }
                }
            }
        }

        messages
    }
}

/// Registry of schemas, keyed by singular resource name.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, ResourceSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under its singularized name
    pub fn register(&mut self, schema: ResourceSchema) {
        let key = crate::naming::singularize(&schema.name);
        self.schemas.insert(key, schema);
    }

    /// Look up a schema by resource name (any inflection)
    pub fn get(&self, resource: &str) -> Option<&ResourceSchema> {
        self.schemas.get(&crate::naming::singularize(resource))
    }

    /// Names of all registered resources
    pub fn resources(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.keys().cloned().collect();
        names.sort();
        names
    }
}
