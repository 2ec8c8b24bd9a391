use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DtiError {
    #[error("Invalid molecule descriptor: {0}")]
    InvalidInput(String),

    #[error("Unknown target ID: {0}")]
    UnknownTarget(String),

    #[error("Model input has {actual} features, expected {expected}")]
    ModelInputShape { expected: usize, actual: usize },

    #[error("Unexpected attribution output shape: {shape:?} (expected one of (2N,), (2,N), (1,N), (N,), (1,N,2) for N = {n_features})")]
    UnexpectedAttributionShape { shape: Vec<usize>, n_features: usize },

    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Caller-facing error classification, carried on error responses so the
/// transport layer can pick a status code without inspecting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    BadInput,
    UnknownTarget,
    Internal,
}

impl DtiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DtiError::InvalidInput(_) => ErrorKind::BadInput,
            DtiError::UnknownTarget(_) => ErrorKind::UnknownTarget,
            _ => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, DtiError>;
