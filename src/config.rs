//! Configuration
//!
//! Everything the service reads at startup: server binding, policy
//! switches, and the resource declarations to register. Loaded from a JSON
//! file by the CLI; constructed directly by library consumers and tests.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Error, RestResult};
use crate::resource::schema::ColumnDef;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub policy: PolicyConfig,

    /// Resources to register at startup
    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
}

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// Config problems are setup-fatal, so they surface as registration
    /// errors.
    pub fn from_file(path: &Path) -> RestResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::InvalidRegistration(format!("cannot read {}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::InvalidRegistration(format!("cannot parse {}: {e}", path.display())))
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 4000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins (empty = permissive, for development)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with the specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Policy switches for the parameter and query layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Strict permit mode: fail with a 422 when the outer resource key is
    /// absent from the request, instead of permitting nothing
    #[serde(default)]
    pub strict_params: bool,

    /// REST-strict envelopes: omit the `error` flag and let the HTTP
    /// status carry success/failure
    #[serde(default)]
    pub restful_api: bool,

    /// Surface the total (pre-pagination) match count on index responses
    #[serde(default)]
    pub provide_count_header: bool,

    /// Execution mode; production enables case-insensitive fuzzy search
    #[serde(default)]
    pub mode: ExecutionMode,

    /// Value types allowed through `permit`
    #[serde(default = "default_approved_types")]
    pub approved_types: Vec<ValueKind>,
}

fn default_approved_types() -> Vec<ValueKind> {
    vec![
        ValueKind::String,
        ValueKind::Array,
        ValueKind::Integer,
        ValueKind::Float,
        ValueKind::Boolean,
    ]
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            strict_params: false,
            restful_api: false,
            provide_count_header: false,
            mode: ExecutionMode::default(),
            approved_types: default_approved_types(),
        }
    }
}

/// Execution mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Development,
    Production,
}

impl ExecutionMode {
    /// Fuzzy search matches case-insensitively only in production
    pub fn case_insensitive_search(&self) -> bool {
        matches!(self, ExecutionMode::Production)
    }
}

/// JSON value kinds that may pass through `permit`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Array,
    Integer,
    Float,
    Boolean,
}

impl ValueKind {
    /// Check whether a JSON value is of this kind
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ValueKind::String => value.is_string(),
            ValueKind::Array => value.is_array(),
            ValueKind::Integer => value.is_i64() || value.is_u64(),
            ValueKind::Float => value.is_f64(),
            ValueKind::Boolean => value.is_boolean(),
        }
    }
}

/// A resource declaration: schema columns plus an optional explicit
/// allow-list. Without `permit`, every column except `id` is permitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Resource name; stored singularized
    pub name: String,

    /// Column definitions
    pub columns: Vec<ColumnDef>,

    /// Explicit allowed fields (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permit: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 4000);
        assert!(!config.policy.strict_params);
        assert!(!config.policy.restful_api);
        assert_eq!(config.policy.approved_types.len(), 5);
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig::with_port(8080);
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_mode_case_sensitivity() {
        assert!(!ExecutionMode::Development.case_insensitive_search());
        assert!(ExecutionMode::Production.case_insensitive_search());
    }

    #[test]
    fn test_value_kind_matches() {
        use serde_json::json;

        assert!(ValueKind::String.matches(&json!("x")));
        assert!(ValueKind::Integer.matches(&json!(3)));
        assert!(ValueKind::Float.matches(&json!(3.5)));
        assert!(ValueKind::Boolean.matches(&json!(true)));
        assert!(ValueKind::Array.matches(&json!([1, 2])));

        assert!(!ValueKind::String.matches(&json!(3)));
        assert!(!ValueKind::Integer.matches(&json!(3.5)));
        assert!(!ValueKind::Integer.matches(&json!({"nested": true})));
    }

    #[test]
    fn test_parse_policy_overrides() {
        let raw = r#"{
            "policy": {
                "strict_params": true,
                "restful_api": true,
                "mode": "production",
                "approved_types": ["string", "integer"]
            }
        }"#;
        let config: Config = serde_json::from_str(raw).unwrap();
        assert!(config.policy.strict_params);
        assert!(config.policy.restful_api);
        assert_eq!(config.policy.mode, ExecutionMode::Production);
        assert_eq!(
            config.policy.approved_types,
            vec![ValueKind::String, ValueKind::Integer]
        );
    }
}
