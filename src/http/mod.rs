//! # HTTP layer
//!
//! Axum glue around the resource service. No policy decisions live here.

pub mod routes;
pub mod server;

pub use routes::AppState;
pub use server::RestServer;
