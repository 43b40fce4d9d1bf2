//! The permit operation: reduce raw request input to the allow-listed
//! subset of fields with approved value types.

use serde_json::{Map, Value};

use crate::config::PolicyConfig;
use crate::errors::{Error, RestResult};

use super::registry::ParamRegistry;

/// Filter the raw request parameters down to the permitted fields of one
/// resource.
///
/// `raw` is the full request parameter object; the resource's input lives
/// under its singular key (e.g. `{"customer": {"name": "x"}}`). Keys not
/// registered for the resource are dropped, as are values whose JSON type
/// is outside the approved set — nested objects and nulls never pass. An
/// unregistered resource permits nothing.
///
/// In strict mode a missing outer key fails the request; in lenient mode
/// it produces an empty result.
pub fn permit(
    registry: &ParamRegistry,
    resource: &str,
    raw: &Value,
    policy: &PolicyConfig,
) -> RestResult<Map<String, Value>> {
    let key = crate::naming::singularize(resource);

    let scoped = match raw.get(&key) {
        Some(value) => value,
        None => {
            if policy.strict_params {
                return Err(Error::MissingRequiredKey(key));
            }
            return Ok(Map::new());
        }
    };

    let Some(input) = scoped.as_object() else {
        tracing::warn!("parameters under {key:?} are not a set of key value pairs");
        return Ok(Map::new());
    };

    tracing::info!("params received for {key}: {scoped}");

    let permitted: Map<String, Value> = match registry.allowed_fields(resource) {
        // Fail closed: nothing registered means nothing permitted
        None => Map::new(),
        Some(allowed) => input
            .iter()
            .filter(|(field, value)| {
                allowed.contains(field.as_str())
                    && policy.approved_types.iter().any(|kind| kind.matches(value))
            })
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect(),
    };

    tracing::info!("params permitted for {key}: {:?}", permitted.keys());

    Ok(permitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> ParamRegistry {
        let mut registry = ParamRegistry::new();
        registry
            .register_fields("customer", ["name", "stuff"])
            .unwrap();
        registry
    }

    #[test]
    fn test_drops_unregistered_keys() {
        let raw = json!({"customer": {"name": "x", "secret": "y"}});
        let permitted = permit(&registry(), "customer", &raw, &PolicyConfig::default()).unwrap();

        assert_eq!(permitted.get("name"), Some(&json!("x")));
        assert!(!permitted.contains_key("secret"));
        assert_eq!(permitted.len(), 1);
    }

    #[test]
    fn test_drops_unapproved_value_types() {
        let raw = json!({"customer": {
            "name": {"nested": "object"},
            "stuff": null
        }});
        let permitted = permit(&registry(), "customer", &raw, &PolicyConfig::default()).unwrap();
        assert!(permitted.is_empty());
    }

    #[test]
    fn test_fail_closed_for_unregistered_resource() {
        let raw = json!({"order": {"total": 3}});
        let permitted = permit(&registry(), "order", &raw, &PolicyConfig::default()).unwrap();
        assert!(permitted.is_empty());
    }

    #[test]
    fn test_lenient_mode_missing_outer_key() {
        let raw = json!({"page": 1});
        let permitted = permit(&registry(), "customer", &raw, &PolicyConfig::default()).unwrap();
        assert!(permitted.is_empty());
    }

    #[test]
    fn test_strict_mode_missing_outer_key() {
        let policy = PolicyConfig {
            strict_params: true,
            ..Default::default()
        };
        let raw = json!({"page": 1});
        let err = permit(&registry(), "customer", &raw, &policy).unwrap_err();
        assert!(matches!(err, Error::MissingRequiredKey(key) if key == "customer"));
    }

    #[test]
    fn test_plural_resource_name_resolves() {
        let raw = json!({"customer": {"name": "x"}});
        let permitted = permit(&registry(), "customers", &raw, &PolicyConfig::default()).unwrap();
        assert_eq!(permitted.len(), 1);
    }

    #[test]
    fn test_scalar_under_outer_key_permits_nothing() {
        let raw = json!({"customer": "not an object"});
        let permitted = permit(&registry(), "customer", &raw, &PolicyConfig::default()).unwrap();
        assert!(permitted.is_empty());
    }

    #[test]
    fn test_restricted_approved_types() {
        let policy = PolicyConfig {
            approved_types: vec![crate::config::ValueKind::String],
            ..Default::default()
        };
        let raw = json!({"customer": {"name": "x", "stuff": 42}});
        let permitted = permit(&registry(), "customer", &raw, &policy).unwrap();

        assert!(permitted.contains_key("name"));
        assert!(!permitted.contains_key("stuff"));
    }
}
