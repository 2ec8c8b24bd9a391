//! Shared application state for the web server.

use std::sync::Arc;

use dti_engine::PredictionService;

/// Shared state injected into every axum handler. The service is fully
/// immutable after startup, so a plain `Arc` is all the sharing needed.
pub type SharedState = Arc<PredictionService>;
