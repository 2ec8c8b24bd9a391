//! Axum router — maps all URL paths to handlers.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{api_predict, api_target_info, api_targets, health};
use crate::state::SharedState;

/// Build and return the full axum router.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/targets", get(api_targets))
        .route("/api/target-info", get(api_target_info))
        .route("/api/predict", post(api_predict))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
