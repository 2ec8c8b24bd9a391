//! dti-web — HTTP surface for the DTI prediction service.
//!
//! Thin axum layer over [`dti_engine::PredictionService`]: request
//! deserialization, error-to-status mapping, CORS and request tracing.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
