//! Error-to-response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use dti_common::{DtiError, ErrorKind};

/// Error wrapper so handlers can use `?` on engine results.
pub struct ApiError(pub DtiError);

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
    kind: ErrorKind,
}

impl From<DtiError> for ApiError {
    fn from(e: DtiError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = match kind {
            ErrorKind::BadInput | ErrorKind::UnknownTarget => StatusCode::BAD_REQUEST,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let detail = self.0.to_string();
        match kind {
            ErrorKind::Internal => error!(%detail, "request failed"),
            _ => warn!(%detail, "request rejected"),
        }
        (status, Json(ErrorBody { detail, kind })).into_response()
    }
}
