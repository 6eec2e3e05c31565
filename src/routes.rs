//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`  - Storage health check (public)
//! - `/api/*`        - REST API (Bearer token when configured)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on `/api`, optional
//! - **Authentication** - Bearer token on `/api`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `rate_limit` - apply the per-IP limiter to `/api`; it needs peer
///   addresses, which in-process test servers do not provide
pub fn app_router(state: AppState, rate_limit: bool) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state, rate_limit))
}

/// [`app_router`] without trailing slash normalization.
pub fn build_router(state: AppState, rate_limit: bool) -> Router {
    let mut api_router = api::routes::api_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
    if rate_limit {
        api_router = api_router.layer(rate_limit::layer());
    }

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer())
}
