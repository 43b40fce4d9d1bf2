//! Response envelopes.
//!
//! Two envelope modes: the default carries an `error` flag merged with the
//! payload; REST-strict mode drops the flag and lets the HTTP status carry
//! success or failure. Either way, success is 200 and recoverable
//! failures are 422.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};

use crate::errors::Error;

/// Envelope rendering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeMode {
    /// `{"error": bool, ...payload}`
    Default,

    /// Payload only; status code carries the outcome
    RestStrict,
}

/// A rendered response: status, JSON body, and an optional total-count
/// hint for the HTTP layer to surface as a header
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
    pub total: Option<u64>,
}

impl ApiResponse {
    /// 200 with payload
    pub fn processed(mode: EnvelopeMode, payload: Map<String, Value>) -> Self {
        Self {
            status: StatusCode::OK,
            body: render(mode, false, payload),
            total: None,
        }
    }

    /// 422 with payload
    pub fn unprocessable(mode: EnvelopeMode, payload: Map<String, Value>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: render(mode, true, payload),
            total: None,
        }
    }

    /// Render an error into its envelope
    pub fn from_error(mode: EnvelopeMode, err: &Error) -> Self {
        let mut payload = Map::new();
        match err {
            Error::ValidationFailed(messages) => {
                payload.insert("messages".to_string(), json!(messages));
            }
            other => {
                payload.insert("message".to_string(), json!(other.to_string()));
            }
        }

        Self {
            status: err.status_code(),
            body: render(mode, true, payload),
            total: None,
        }
    }

    /// Attach a total-count hint
    pub fn with_total(mut self, total: Option<u64>) -> Self {
        self.total = total;
        self
    }
}

fn render(mode: EnvelopeMode, error: bool, payload: Map<String, Value>) -> Value {
    match mode {
        EnvelopeMode::RestStrict => Value::Object(payload),
        EnvelopeMode::Default => {
            let mut body = Map::new();
            body.insert("error".to_string(), json!(error));
            body.extend(payload);
            Value::Object(body)
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        if let Some(total) = self.total {
            if let Ok(value) = axum::http::HeaderValue::from_str(&total.to_string()) {
                response
                    .headers_mut()
                    .insert(axum::http::HeaderName::from_static("x-total-count"), value);
            }
        }
        response
    }
}
