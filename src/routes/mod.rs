//! HTTP routes for Sketchgen
//!
//! This module defines all HTTP endpoints exposed by the server.

pub mod config_check;
pub mod generate;
pub mod health;
pub mod metrics;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{docs, AppState};

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Generation API; bodies may carry a base64 image
    let api_routes = Router::new()
        .route("/api/generate", post(generate::generate))
        .route("/api/config/check", get(config_check::config_check))
        .route("/api/openapi.json", get(docs::openapi_json))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes));

    // Public routes (health checks, metrics)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(metrics::prometheus_metrics));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Global middleware (applied to all routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
