//! dti-model — classifier inference and model-agnostic attribution.
//!
//! Wraps the trained MLP (candle) behind a probability API, runs the
//! seeded sampling attribution procedure against a fixed background, and
//! normalizes the attribution output's historically unstable shapes into
//! one canonical per-feature vector.

pub mod attribution;
pub mod classifier;
pub mod manifest;
pub mod normalize;

pub use attribution::{AttributionOutput, KernelAttributor};
pub use classifier::MlpClassifier;
pub use manifest::ModelManifest;
pub use normalize::normalize_attribution;
