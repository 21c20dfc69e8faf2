//! # Routes
//!
//! Axum router configuration for the CHIP integration.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the main application router
///
/// Routes (prefix from `AppConfig::route_prefix`, default `/chipin`):
///   - GET  /health - Health check
///   - GET  {prefix}/success - Payment success page
///   - GET  {prefix}/failed - Payment failed page
///   - POST {prefix}/callback - CHIP payment callback
///   - POST {prefix}/checkout - Create purchase, redirect to CHIP
pub fn create_router(state: AppState) -> Router {
    // Same-origin only: checkout spends the merchant's API key
    let chip_routes = Router::new()
        .route("/success", get(handlers::success))
        .route("/failed", get(handlers::failed))
        .route("/callback", post(handlers::callback))
        .route("/checkout", post(handlers::create_checkout));

    let router = Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health));

    let prefix = state.config.route_prefix.clone();
    let router = if prefix.is_empty() {
        router.merge(chip_routes)
    } else {
        router.nest(&prefix, chip_routes)
    };

    router
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
