//! Route handlers.
//!
//! Pure glue: each handler merges path, query, and body parameters into a
//! single parameter object and hands it to the resource service. The
//! `model` path segment becomes the explicit resource override.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::{Map, Value};

use crate::resource::{ApiResponse, ResourceService};

/// Shared handler state
pub struct AppState {
    pub service: ResourceService,
}

pub type SharedState = Arc<AppState>;

/// Merge query-string pairs, an optional JSON body, and path segments
/// into one parameter object
fn merge_params(
    model: Option<String>,
    id: Option<String>,
    query: HashMap<String, String>,
    body: Option<Value>,
) -> Value {
    let mut params = match body {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };

    for (key, value) in query {
        params.entry(key).or_insert(Value::String(value));
    }
    if let Some(model) = model {
        params.insert("model".to_string(), Value::String(model));
    }
    if let Some(id) = id {
        params.insert("id".to_string(), Value::String(id));
    }

    Value::Object(params)
}

pub async fn index(
    State(state): State<SharedState>,
    Path(model): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResponse {
    let params = merge_params(Some(model), None, query, None);
    state.service.index(&params)
}

pub async fn query_index(
    State(state): State<SharedState>,
    Path(model): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    body: Option<Json<Value>>,
) -> ApiResponse {
    let params = merge_params(Some(model), None, query, body.map(|Json(v)| v));
    state.service.index(&params)
}

pub async fn count(
    State(state): State<SharedState>,
    Path(model): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResponse {
    let params = merge_params(Some(model), None, query, None);
    state.service.count(&params)
}

pub async fn query_count(
    State(state): State<SharedState>,
    Path(model): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    body: Option<Json<Value>>,
) -> ApiResponse {
    let params = merge_params(Some(model), None, query, body.map(|Json(v)| v));
    state.service.count(&params)
}

pub async fn show(
    State(state): State<SharedState>,
    Path((model, id)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResponse {
    let params = merge_params(Some(model), Some(id), query, None);
    state.service.show(&params)
}

pub async fn create(
    State(state): State<SharedState>,
    Path(model): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    body: Option<Json<Value>>,
) -> ApiResponse {
    let params = merge_params(Some(model), None, query, body.map(|Json(v)| v));
    state.service.create(&params)
}

pub async fn update(
    State(state): State<SharedState>,
    Path((model, id)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    body: Option<Json<Value>>,
) -> ApiResponse {
    let params = merge_params(Some(model), Some(id), query, body.map(|Json(v)| v));
    state.service.update(&params)
}

pub async fn destroy(
    State(state): State<SharedState>,
    Path((model, id)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResponse {
    let params = merge_params(Some(model), Some(id), query, None);
    state.service.destroy(&params)
}

pub async fn search(
    State(state): State<SharedState>,
    Path(model): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    body: Option<Json<Value>>,
) -> ApiResponse {
    let params = merge_params(Some(model), None, query, body.map(|Json(v)| v));
    state.service.search(&params)
}
