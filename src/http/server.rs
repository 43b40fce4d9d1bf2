//! HTTP server.
//!
//! Axum router exposing the generic resource routes. The `model` path
//! segment selects the resource, so one router serves every registered
//! resource.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::resource::ResourceService;

use super::routes::{self, AppState};

/// HTTP server for the generic resource API
pub struct RestServer {
    config: ServerConfig,
    router: Router,
}

impl RestServer {
    /// Create a server with default configuration
    pub fn new(service: ResourceService) -> Self {
        Self::with_config(service, ServerConfig::default())
    }

    /// Create a server with custom configuration
    pub fn with_config(service: ResourceService, config: ServerConfig) -> Self {
        let router = Self::build_router(service, &config);
        Self { config, router }
    }

    fn build_router(service: ResourceService, config: &ServerConfig) -> Router {
        let state = Arc::new(AppState { service });

        let cors = if config.cors_origins.is_empty() {
            // Permissive for development
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            use tower_http::cors::AllowOrigin;
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .route("/:model", get(routes::index).post(routes::create))
            .route("/:model/query", post(routes::query_index))
            .route("/:model/count", get(routes::count))
            .route("/:model/query/count", post(routes::query_count))
            .route("/:model/search", post(routes::search))
            .route(
                "/:model/:id",
                get(routes::show)
                    .patch(routes::update)
                    .put(routes::update)
                    .delete(routes::destroy),
            )
            .with_state(state)
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start serving
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        tracing::info!("listening on {addr}");

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await
    }
}
