//! Model manifest: the training-time constants every query shares.

use std::path::Path;

use serde::{Deserialize, Serialize};

use dti_common::{DtiError, Result};

fn default_samples() -> usize {
    100
}

fn default_seed() -> u64 {
    42
}

fn default_lambda() -> f64 {
    1e-3
}

/// Written by the offline training stage next to `model.safetensors`.
///
/// `fp_bits` (B) and the vocabulary length (K, from `vocab.json`) fix the
/// combined feature-vector length for the life of the process; a mismatch
/// against the stored weights is a fatal configuration error at load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelManifest {
    /// Fingerprint length B.
    pub fp_bits: usize,
    /// Hidden layer widths of the MLP, input to output.
    pub hidden: Vec<usize>,
    /// Attribution sampling seed. Fixed, never re-randomized per call.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Number of coalition samples per attribution call.
    #[serde(default = "default_samples")]
    pub attribution_samples: usize,
    /// Ridge regularizer for the attribution regression.
    #[serde(default = "default_lambda")]
    pub ridge_lambda: f64,
}

impl ModelManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let manifest: ModelManifest = serde_json::from_str(&raw)?;
        if manifest.fp_bits == 0 {
            return Err(DtiError::Artifact("manifest fp_bits must be > 0".into()));
        }
        if manifest.attribution_samples == 0 {
            return Err(DtiError::Artifact(
                "manifest attribution_samples must be > 0".into(),
            ));
        }
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_with_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"fp_bits": 2048, "hidden": [512, 256]}}"#).unwrap();
        let m = ModelManifest::load(f.path()).unwrap();
        assert_eq!(m.fp_bits, 2048);
        assert_eq!(m.hidden, vec![512, 256]);
        assert_eq!(m.seed, 42);
        assert_eq!(m.attribution_samples, 100);
    }

    #[test]
    fn rejects_zero_bits() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"fp_bits": 0, "hidden": []}}"#).unwrap();
        assert!(ModelManifest::load(f.path()).is_err());
    }
}
