//! Order-spec parsing.
//!
//! Raw input is a comma-separated list of `<column> [asc|desc]` tokens.
//! Tokens naming an unknown column or direction are discarded with a
//! diagnostic; the rest of the spec still applies.

use serde::{Deserialize, Serialize};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "asc" => Some(Direction::Asc),
            "desc" => Some(Direction::Desc),
            _ => None,
        }
    }
}

/// One ordering clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSpec {
    pub column: String,
    pub direction: Direction,
}

impl OrderSpec {
    pub fn new(column: impl Into<String>, direction: Direction) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

/// Parse a raw order parameter against the legal column set.
///
/// Absent input orders by `id` ascending. Within a token the direction
/// defaults to `desc` when omitted.
pub fn parse_order_spec(raw: Option<&str>, legal_columns: &[String]) -> Vec<OrderSpec> {
    let Some(raw) = raw else {
        return vec![OrderSpec::new("id", Direction::Asc)];
    };

    raw.split(',')
        .filter_map(|token| {
            let token = token.trim();
            if token.is_empty() {
                return None;
            }

            let mut parts = token.split_whitespace();
            let column = parts.next()?;
            let direction = match parts.next() {
                Some(raw_direction) => match Direction::parse(raw_direction) {
                    Some(direction) => direction,
                    None => {
                        tracing::warn!("discarding order token with illegal direction: {token}");
                        return None;
                    }
                },
                None => Direction::Desc,
            };

            if !legal_columns.iter().any(|c| c == column) {
                tracing::warn!("discarding order token with illegal column: {token}");
                return None;
            }

            Some(OrderSpec::new(column, direction))
        })
        .collect()
}
