//! Liveness routes

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::logging_middleware;

/// Creates and returns the liveness router
///
/// # Routes
/// - `GET /` - static "running" body, always 200
pub fn health_routes() -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .layer(middleware::from_fn(logging_middleware::log_request))
        .layer(TraceLayer::new_for_http())
}
