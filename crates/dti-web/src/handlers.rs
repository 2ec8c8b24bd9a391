//! API handlers.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use dti_common::{PredictionQuery, PredictionResponse, TargetInfo};

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Serialize)]
pub struct TargetsResponse {
    pub targets: Vec<String>,
}

#[derive(Serialize)]
pub struct TargetInfoResponse {
    pub targets: Vec<TargetInfo>,
}

/// `GET /api/targets` — bare identifier listing.
pub async fn api_targets(State(state): State<SharedState>) -> Json<TargetsResponse> {
    Json(TargetsResponse {
        targets: state.targets(),
    })
}

/// `GET /api/target-info` — identifiers with human-readable descriptions.
pub async fn api_target_info(State(state): State<SharedState>) -> Json<TargetInfoResponse> {
    Json(TargetInfoResponse {
        targets: state.target_info(),
    })
}

/// `POST /api/predict` — run (or recall) one prediction with explanation.
pub async fn api_predict(
    State(state): State<SharedState>,
    Json(query): Json<PredictionQuery>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let response = state.handle_query(&query).await?;
    Ok(Json(response))
}

/// `GET /health` — liveness probe.
pub async fn health() -> &'static str {
    "ok"
}
