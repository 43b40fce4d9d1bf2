//! Fuzzy-search predicates.
//!
//! A fuzzy search entry is a column name plus a plain-string value; the
//! predicate wraps the value in wildcards (`%value%`) and matches LIKE
//! style, case-insensitively in production mode. Invalid entries are
//! discarded with a diagnostic, never a fatal error.

use serde_json::Value;

use crate::config::ExecutionMode;

/// A LIKE-style predicate with a wildcard-wrapped pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikePredicate {
    pub column: String,
    pub pattern: String,
    pub case_insensitive: bool,
}

impl LikePredicate {
    /// The SQL fragment for this predicate, for stores that build SQL
    pub fn to_sql(&self) -> String {
        let operator = if self.case_insensitive { "ILIKE" } else { "LIKE" };
        format!("{} {} ?", self.column, operator)
    }

    /// Evaluate the predicate against a record, for in-memory stores.
    ///
    /// The pattern is always wildcard-wrapped, so this is a substring
    /// check on the column's string value.
    pub fn matches(&self, record: &Value) -> bool {
        let Some(value) = record.get(&self.column).and_then(Value::as_str) else {
            return false;
        };

        let needle = self.pattern.trim_matches('%');
        if self.case_insensitive {
            value.to_lowercase().contains(&needle.to_lowercase())
        } else {
            value.contains(needle)
        }
    }
}

/// Build a predicate for one search entry.
///
/// Accepted only if the column is legal and the value is a plain string;
/// anything else is discarded with a warning.
pub fn build_fuzzy_predicate(
    column: &str,
    value: &Value,
    legal_columns: &[String],
    mode: ExecutionMode,
) -> Option<LikePredicate> {
    let legal = legal_columns.iter().any(|c| c == column);
    let Some(text) = value.as_str().filter(|_| legal) else {
        tracing::warn!("discarding illegal fuzzy search entry: {column} => {value}");
        return None;
    };

    Some(LikePredicate {
        column: column.to_string(),
        pattern: format!("%{text}%"),
        case_insensitive: mode.case_insensitive_search(),
    })
}

/// Build predicates from a search mapping (column -> value).
///
/// A non-object mapping yields no predicates; individual invalid entries
/// are dropped and the rest still apply.
pub fn build_fuzzy_predicates(
    search: &Value,
    legal_columns: &[String],
    mode: ExecutionMode,
) -> Vec<LikePredicate> {
    let Some(entries) = search.as_object() else {
        tracing::warn!("search parameters are not a valid set of key value pairs");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|(column, value)| build_fuzzy_predicate(column, value, legal_columns, mode))
        .collect()
}
