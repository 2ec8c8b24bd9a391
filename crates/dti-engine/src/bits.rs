//! Bit-explanation table: fingerprint bit → exemplar fragment pattern.
//!
//! Persisted by the offline feature-generation stage as a JSON object
//! keyed by the bit index. The stored pattern is the *first* exemplar
//! observed to set that bit during training; fingerprint bits are lossy
//! hash buckets, so a later query molecule sharing the bit is not
//! guaranteed to contain this exemplar. That approximation is inherited
//! from the offline stage and deliberately preserved.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use dti_common::{DtiError, Result};

#[derive(Debug, Clone, Default)]
pub struct BitExplanationTable {
    patterns: HashMap<usize, String>,
}

impl BitExplanationTable {
    pub fn load(path: &Path, fp_bits: usize) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let keyed: HashMap<String, String> = serde_json::from_str(&raw)?;
        let mut patterns = HashMap::with_capacity(keyed.len());
        for (key, pattern) in keyed {
            let bit: usize = key
                .parse()
                .map_err(|_| DtiError::Artifact(format!("bad bit index '{key}'")))?;
            if bit >= fp_bits {
                return Err(DtiError::Artifact(format!(
                    "bit index {bit} out of range for {fp_bits} fingerprint bits"
                )));
            }
            patterns.insert(bit, pattern);
        }
        info!(explained_bits = patterns.len(), "bit-explanation table loaded");
        Ok(Self { patterns })
    }

    pub fn from_map(patterns: HashMap<usize, String>) -> Self {
        Self { patterns }
    }

    /// Exemplar pattern for a bit, if one was ever observed.
    pub fn pattern(&self, bit: usize) -> Option<&str> {
        self.patterns.get(&bit).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
