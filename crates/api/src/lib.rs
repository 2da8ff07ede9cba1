//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware and role gating
//! - Request extractors
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use adbudget_shared::JwtService;
use adbudget_shared::config::ServerConfig;
use adbudget_shared::types::KeyGranularity;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Key granularity used when a request does not choose one.
    pub granularity: KeyGranularity,
}

/// Transport limits applied to every request.
#[derive(Debug, Clone, Copy)]
pub struct HttpLimits {
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Maximum request body size in bytes.
    pub body_limit: usize,
}

impl Default for HttpLimits {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for HttpLimits {
    fn from(server: &ServerConfig) -> Self {
        Self {
            request_timeout: Duration::from_secs(server.request_timeout_secs),
            body_limit: server.body_limit_bytes,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState, limits: HttpLimits) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(limits.body_limit))
        .layer(TimeoutLayer::new(limits.request_timeout))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
