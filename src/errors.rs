//! Error types shared across the crate.
//!
//! Registration errors are fatal at setup time; everything else is
//! recoverable per-request and maps to an HTTP status.

use axum::http::StatusCode;
use thiserror::Error;

/// Result type for restgen operations
pub type RestResult<T> = Result<T, Error>;

/// Errors produced by the policy layer and the resource service
#[derive(Debug, Clone, Error)]
pub enum Error {
    // ==================
    // Setup-time (fatal)
    // ==================
    /// Bad shape passed to parameter or filter registration
    #[error("invalid registration: {0}")]
    InvalidRegistration(String),

    // ==================
    // Per-request (recoverable)
    // ==================
    /// Strict-mode permit called without the expected outer key
    #[error("missing required key: {0}")]
    MissingRequiredKey(String),

    /// No entity for the given identifier
    #[error("could not find {resource} with id {id}")]
    RecordNotFound { resource: String, id: String },

    /// Request named a resource that was never registered
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    /// Entity failed domain validation on create/update
    #[error("validation failed: {}", .0.join(", "))]
    ValidationFailed(Vec<String>),

    /// Search invoked without both search_field and search_string
    #[error("please supply both a search_field and a search_string")]
    MissingSearchParams,

    // ==================
    // Server errors
    // ==================
    /// Lock poisoning and similar internal failures
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidRegistration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::MissingRequiredKey(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::RecordNotFound { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::UnknownResource(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::MissingSearchParams => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Construct a validation failure with duplicate messages removed,
    /// preserving first-occurrence order.
    pub fn validation(messages: Vec<String>) -> Self {
        let mut seen = std::collections::BTreeSet::new();
        let deduped = messages
            .into_iter()
            .filter(|m| seen.insert(m.clone()))
            .collect();
        Error::ValidationFailed(deduped)
    }
}
