//! dti-common — Shared types, errors, and tables used across all DTI crates.

pub mod amino;
pub mod entities;
pub mod error;

pub use entities::{ExplanationEntry, FeatureKind, PredictionQuery, PredictionResponse, TargetInfo};
pub use error::{DtiError, ErrorKind, Result};
