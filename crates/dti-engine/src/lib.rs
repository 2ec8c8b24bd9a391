//! dti-engine — the prediction-and-explanation serving pipeline.
//!
//! Loads the trained artifacts once at startup (classifier, motif
//! vocabulary, bit-explanation table, target registry, attribution
//! background), then serves queries: encode → predict → attribute →
//! normalize → rank → resolve, memoized per (molecule, target) pair.

pub mod bits;
pub mod cache;
pub mod config;
pub mod features;
pub mod registry;
pub mod resolver;
pub mod service;
pub mod vocab;

pub use config::ServiceConfig;
pub use service::PredictionService;
