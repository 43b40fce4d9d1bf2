//! The generic resource service.
//!
//! One service instance plays the role of a resource controller: it has a
//! controller id (the filter-chain key), a declared resource, and
//! references to the shared registries built at startup. Every action
//! takes the merged request parameters and produces a rendered response.
//!
//! Resource resolution: an explicit `model` parameter overrides the
//! declared resource, which is what lets a single service serve many
//! resource types by name.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::config::PolicyConfig;
use crate::errors::{Error, RestResult};
use crate::filters::FilterChains;
use crate::naming;
use crate::params::{permit, ParamRegistry};
use crate::query::{build_fuzzy_predicate, build_fuzzy_predicates, parse_order_spec, resolve_pagination};

use super::envelope::{ApiResponse, EnvelopeMode};
use super::schema::{ResourceSchema, SchemaRegistry};
use super::store::{ListQuery, ResourceStore};

/// A resource controller instance
pub struct ResourceService {
    controller: String,
    resource: String,
    registry: Arc<ParamRegistry>,
    chains: Arc<FilterChains>,
    schemas: Arc<SchemaRegistry>,
    store: Arc<dyn ResourceStore>,
    policy: PolicyConfig,
}

impl std::fmt::Debug for ResourceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceService")
            .field("controller", &self.controller)
            .field("resource", &self.resource)
            .finish_non_exhaustive()
    }
}

impl ResourceService {
    pub fn new(
        controller: impl Into<String>,
        resource: impl Into<String>,
        registry: Arc<ParamRegistry>,
        chains: Arc<FilterChains>,
        schemas: Arc<SchemaRegistry>,
        store: Arc<dyn ResourceStore>,
        policy: PolicyConfig,
    ) -> Self {
        Self {
            controller: controller.into(),
            resource: naming::singularize(&resource.into()),
            registry,
            chains,
            schemas,
            store,
            policy,
        }
    }

    /// The declared (default) resource name
    pub fn resource(&self) -> &str {
        &self.resource
    }

    // ==================
    // Actions
    // ==================

    pub fn index(&self, params: &Value) -> ApiResponse {
        self.respond(self.index_core(params))
    }

    pub fn count(&self, params: &Value) -> ApiResponse {
        self.respond(self.count_core(params))
    }

    pub fn show(&self, params: &Value) -> ApiResponse {
        self.respond(self.show_core(params))
    }

    pub fn create(&self, params: &Value) -> ApiResponse {
        self.respond(self.create_core(params))
    }

    pub fn update(&self, params: &Value) -> ApiResponse {
        self.respond(self.update_core(params))
    }

    pub fn destroy(&self, params: &Value) -> ApiResponse {
        self.respond(self.destroy_core(params))
    }

    pub fn search(&self, params: &Value) -> ApiResponse {
        self.respond(self.search_core(params))
    }

    // ==================
    // Cores
    // ==================

    fn index_core(&self, params: &Value) -> RestResult<ApiResponse> {
        let resource = self.resolve_resource(params);
        let schema = self.schema(&resource)?;
        let legal = schema.legal_columns();

        let query = ListQuery {
            filters: permit(&self.registry, &resource, params, &self.policy)?,
            fuzzy: params
                .get("search")
                .map(|search| build_fuzzy_predicates(search, &legal, self.policy.mode))
                .unwrap_or_default(),
            order: parse_order_spec(params.get("order_by").and_then(Value::as_str), &legal),
            page: Some(resolve_pagination(
                param_u64(params, "page"),
                param_u64(params, "per_page"),
            )),
        };

        let result = self.store.list(&resource, &query)?;
        let records = self
            .chains
            .apply(&self.controller, "index", Value::Array(result.records));

        let mut payload = Map::new();
        payload.insert(naming::pluralize(&resource), records);

        let total = self.policy.provide_count_header.then_some(result.total);
        Ok(ApiResponse::processed(self.mode(), payload).with_total(total))
    }

    fn count_core(&self, params: &Value) -> RestResult<ApiResponse> {
        let resource = self.resolve_resource(params);
        let schema = self.schema(&resource)?;
        let legal = schema.legal_columns();

        let query = ListQuery {
            filters: permit(&self.registry, &resource, params, &self.policy)?,
            fuzzy: params
                .get("search")
                .map(|search| build_fuzzy_predicates(search, &legal, self.policy.mode))
                .unwrap_or_default(),
            ..Default::default()
        };

        let count = self.store.count(&resource, &query)?;
        let count = self.chains.apply(&self.controller, "count", json!(count));

        let mut payload = Map::new();
        payload.insert(format!("{}_count", naming::pluralize(&resource)), count);
        Ok(ApiResponse::processed(self.mode(), payload))
    }

    fn show_core(&self, params: &Value) -> RestResult<ApiResponse> {
        let resource = self.resolve_resource(params);
        self.schema(&resource)?;
        let id = required_id(params)?;

        let record = self.find_record(&resource, &id)?;
        let record = self.chains.apply(&self.controller, "show", record);

        let mut payload = Map::new();
        payload.insert(resource, record);
        Ok(ApiResponse::processed(self.mode(), payload))
    }

    fn create_core(&self, params: &Value) -> RestResult<ApiResponse> {
        let resource = self.resolve_resource(params);
        let schema = self.schema(&resource)?;

        let mut record = permit(&self.registry, &resource, params, &self.policy)?;
        if !record.contains_key("id") {
            record.insert("id".to_string(), json!(Uuid::new_v4().to_string()));
        }

        let record = Value::Object(record);
        let messages = schema.validate(&record);
        if !messages.is_empty() {
            return Err(Error::validation(messages));
        }

        let stored = self.store.insert(&resource, record)?;
        let stored = self.chains.apply(&self.controller, "create", stored);

        let mut payload = Map::new();
        payload.insert(resource, stored);
        Ok(ApiResponse::processed(self.mode(), payload))
    }

    fn update_core(&self, params: &Value) -> RestResult<ApiResponse> {
        let resource = self.resolve_resource(params);
        let schema = self.schema(&resource)?;
        let id = required_id(params)?;

        let existing = self.find_record(&resource, &id)?;
        let mut merged = existing.as_object().cloned().unwrap_or_default();
        for (field, value) in permit(&self.registry, &resource, params, &self.policy)? {
            merged.insert(field, value);
        }

        let record = Value::Object(merged);
        let messages = schema.validate(&record);
        if !messages.is_empty() {
            return Err(Error::validation(messages));
        }

        self.store.replace(&resource, &id, record.clone())?;
        let record = self.chains.apply(&self.controller, "update", record);

        let mut payload = Map::new();
        payload.insert(resource, record);
        Ok(ApiResponse::processed(self.mode(), payload))
    }

    fn destroy_core(&self, params: &Value) -> RestResult<ApiResponse> {
        let resource = self.resolve_resource(params);
        self.schema(&resource)?;
        let id = required_id(params)?;

        let record = self.find_record(&resource, &id)?;
        self.store.delete(&resource, &id)?;
        self.chains.apply(&self.controller, "destroy", record);

        let mut payload = Map::new();
        payload.insert(
            "message".to_string(),
            json!(format!("{resource} with id {id} successfully deleted")),
        );
        Ok(ApiResponse::processed(self.mode(), payload))
    }

    fn search_core(&self, params: &Value) -> RestResult<ApiResponse> {
        let resource = self.resolve_resource(params);
        let schema = self.schema(&resource)?;
        let legal = schema.legal_columns();

        let (Some(field), Some(needle)) = (
            param_str(params, "search_field"),
            param_str(params, "search_string"),
        ) else {
            return Err(Error::MissingSearchParams);
        };

        let query = ListQuery {
            filters: permit(&self.registry, &resource, params, &self.policy)?,
            fuzzy: build_fuzzy_predicate(&field, &json!(needle), &legal, self.policy.mode)
                .into_iter()
                .collect(),
            order: parse_order_spec(params.get("order_by").and_then(Value::as_str), &legal),
            page: Some(resolve_pagination(
                param_u64(params, "page"),
                param_u64(params, "per_page"),
            )),
        };

        let result = self.store.list(&resource, &query)?;
        let records = self
            .chains
            .apply(&self.controller, "search", Value::Array(result.records));

        let mut payload = Map::new();
        payload.insert(naming::pluralize(&resource), records);
        Ok(ApiResponse::processed(self.mode(), payload))
    }

    // ==================
    // Internals
    // ==================

    fn respond(&self, result: RestResult<ApiResponse>) -> ApiResponse {
        match result {
            Ok(response) => response,
            Err(err) => {
                tracing::info!("request failed: {err}");
                ApiResponse::from_error(self.mode(), &err)
            }
        }
    }

    fn mode(&self) -> EnvelopeMode {
        if self.policy.restful_api {
            EnvelopeMode::RestStrict
        } else {
            EnvelopeMode::Default
        }
    }

    fn resolve_resource(&self, params: &Value) -> String {
        params
            .get("model")
            .and_then(Value::as_str)
            .map(naming::singularize)
            .unwrap_or_else(|| self.resource.clone())
    }

    fn schema(&self, resource: &str) -> RestResult<&ResourceSchema> {
        self.schemas
            .get(resource)
            .ok_or_else(|| Error::UnknownResource(resource.to_string()))
    }

    fn find_record(&self, resource: &str, id: &str) -> RestResult<Value> {
        self.store
            .find(resource, id)?
            .ok_or_else(|| Error::RecordNotFound {
                resource: resource.to_string(),
                id: id.to_string(),
            })
    }
}

/// Extract a string parameter; numbers are accepted and stringified
fn param_str(params: &Value, key: &str) -> Option<String> {
    match params.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Extract an unsigned integer parameter; numeric strings are accepted
fn param_u64(params: &Value, key: &str) -> Option<u64> {
    match params.get(key) {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    }
}

/// The id parameter is required for member actions
fn required_id(params: &Value) -> RestResult<String> {
    param_str(params, "id").ok_or_else(|| Error::MissingRequiredKey("id".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{FilterScope, HandlerRegistry};
    use crate::resource::memory::MemoryStore;
    use crate::resource::schema::{ColumnDef, ColumnType};

    fn service_with(chains: FilterChains, policy: PolicyConfig) -> ResourceService {
        let mut registry = ParamRegistry::new();
        registry
            .register_fields("customer", ["name", "stuff"])
            .unwrap();

        let mut schemas = SchemaRegistry::new();
        schemas.register(ResourceSchema::new(
            "customer",
            vec![
                ColumnDef::new("name", ColumnType::String).required(),
                ColumnDef::new("stuff", ColumnType::String),
            ],
        ));

        let store = MemoryStore::new();
        store
            .seed(
                "customer",
                vec![
                    json!({"id": "1", "name": "gawreg", "stuff": "aerwgh"}),
                    json!({"id": "2", "name": "other", "stuff": "bits"}),
                ],
            )
            .unwrap();

        ResourceService::new(
            "customers",
            "customer",
            Arc::new(registry),
            Arc::new(chains),
            Arc::new(schemas),
            Arc::new(store),
            policy,
        )
    }

    fn service() -> ResourceService {
        service_with(FilterChains::new(), PolicyConfig::default())
    }

    #[test]
    fn test_index_returns_plural_key() {
        let response = service().index(&json!({}));
        assert_eq!(response.status, axum::http::StatusCode::OK);
        assert_eq!(response.body["customers"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_index_applies_permitted_filter() {
        let response = service().index(&json!({"customer": {"name": "gawreg"}}));
        let records = response.body["customers"].as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["id"], "1");
    }

    #[test]
    fn test_index_ignores_unpermitted_filter() {
        let response = service().index(&json!({"customer": {"secret": "x"}}));
        assert_eq!(response.body["customers"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_count_uses_suffixed_key() {
        let response = service().count(&json!({}));
        assert_eq!(response.body["customers_count"], json!(2));
    }

    #[test]
    fn test_show_unknown_id_is_unprocessable() {
        let response = service().show(&json!({"id": "99"}));
        assert_eq!(response.status, axum::http::StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.body["message"],
            json!("could not find customer with id 99")
        );
    }

    #[test]
    fn test_show_missing_id_is_unprocessable() {
        let response = service().show(&json!({}));
        assert_eq!(response.status, axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_create_validates_required_fields() {
        let response = service().create(&json!({"customer": {"stuff": "aerwgh"}}));
        assert_eq!(response.status, axum::http::StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.body["messages"], json!(["name can't be blank"]));
    }

    #[test]
    fn test_create_assigns_id() {
        let response = service().create(&json!({"customer": {"name": "new"}}));
        assert_eq!(response.status, axum::http::StatusCode::OK);
        assert!(response.body["customer"]["id"].is_string());
    }

    #[test]
    fn test_update_merges_permitted_fields() {
        let service = service();
        let response = service.update(&json!({"id": "1", "customer": {"name": "renamed"}}));
        assert_eq!(response.status, axum::http::StatusCode::OK);
        assert_eq!(response.body["customer"]["name"], "renamed");
        assert_eq!(response.body["customer"]["stuff"], "aerwgh");
    }

    #[test]
    fn test_destroy_reports_message() {
        let response = service().destroy(&json!({"id": "1"}));
        assert_eq!(response.status, axum::http::StatusCode::OK);
        assert_eq!(
            response.body["message"],
            json!("customer with id 1 successfully deleted")
        );
    }

    #[test]
    fn test_search_requires_field_and_string() {
        let response = service().search(&json!({"search_field": "name"}));
        assert_eq!(response.status, axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_search_matches_substring() {
        let response = service().search(&json!({"search_field": "name", "search_string": "gaw"}));
        let records = response.body["customers"].as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], "gawreg");
    }

    #[test]
    fn test_unknown_model_is_unprocessable() {
        let response = service().index(&json!({"model": "ghosts"}));
        assert_eq!(response.status, axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_filter_chain_transforms_index() {
        let mut handlers = HandlerRegistry::new();
        handlers.register("rename_all", |value| match value {
            Value::Array(records) => Value::Array(
                records
                    .into_iter()
                    .map(|mut record| {
                        record["name"] = json!("BLOCK");
                        record
                    })
                    .collect(),
            ),
            other => other,
        });

        let mut chains = FilterChains::new();
        chains
            .add_filter("customers", "rename_all", FilterScope::new().only(["index"]), &handlers)
            .unwrap();

        let service = service_with(chains, PolicyConfig::default());

        let indexed = service.index(&json!({}));
        assert_eq!(indexed.body["customers"][0]["name"], "BLOCK");

        // only: [index] leaves show untouched
        let shown = service.show(&json!({"id": "1"}));
        assert_eq!(shown.body["customer"]["name"], "gawreg");
    }

    #[test]
    fn test_count_header_policy() {
        let policy = PolicyConfig {
            provide_count_header: true,
            ..Default::default()
        };
        let service = service_with(FilterChains::new(), policy);

        let response = service.index(&json!({"page": 1, "per_page": 1}));
        assert_eq!(response.total, Some(2));
        assert_eq!(response.body["customers"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_rest_strict_envelope() {
        let policy = PolicyConfig {
            restful_api: true,
            ..Default::default()
        };
        let service = service_with(FilterChains::new(), policy);

        let response = service.index(&json!({}));
        assert!(response.body.get("error").is_none());
    }
}
