//! Motif vocabulary and protein sequence encoding.
//!
//! The vocabulary is the ordered list of the K most frequent 3-residue
//! motifs from the training corpus; its order is load-bearing — position
//! in the list *is* the feature offset within the combined vector.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use dti_common::{DtiError, Result};

#[derive(Debug, Clone)]
pub struct MotifVocabulary {
    motifs: Vec<String>,
    index: HashMap<String, usize>,
}

impl MotifVocabulary {
    /// Load from a JSON array of motif strings.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let motifs: Vec<String> = serde_json::from_str(&raw)?;
        let vocab = Self::new(motifs)?;
        info!(motifs = vocab.len(), "motif vocabulary loaded");
        Ok(vocab)
    }

    pub fn new(motifs: Vec<String>) -> Result<Self> {
        if motifs.is_empty() {
            return Err(DtiError::Artifact("motif vocabulary is empty".into()));
        }
        if let Some(bad) = motifs.iter().find(|m| m.chars().count() != 3) {
            return Err(DtiError::Artifact(format!(
                "motif '{bad}' is not 3 residues long"
            )));
        }
        let index = motifs
            .iter()
            .enumerate()
            .map(|(i, m)| (m.clone(), i))
            .collect();
        Ok(Self { motifs, index })
    }

    pub fn len(&self) -> usize {
        self.motifs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motifs.is_empty()
    }

    /// Motif at feature offset `i` (offset within the motif block, not
    /// the combined vector).
    pub fn motif(&self, i: usize) -> Option<&str> {
        self.motifs.get(i).map(String::as_str)
    }

    /// Count vocabulary motif occurrences across a length-3 sliding
    /// window (step 1). Sequences shorter than 3 residues yield the
    /// all-zero vector — that is a degenerate input, not an error.
    pub fn encode(&self, sequence: &str) -> Vec<u32> {
        let mut counts = vec![0u32; self.motifs.len()];
        let chars: Vec<char> = sequence.chars().collect();
        if chars.len() < 3 {
            return counts;
        }
        let mut window = String::with_capacity(3);
        for w in chars.windows(3) {
            window.clear();
            window.extend(w);
            if let Some(&i) = self.index.get(window.as_str()) {
                counts[i] += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> MotifVocabulary {
        MotifVocabulary::new(vec![
            "MKT".to_string(),
            "KTA".to_string(),
            "AAA".to_string(),
        ])
        .unwrap()
    }

    #[test]
    fn counts_sliding_windows() {
        let v = vocab();
        assert_eq!(v.encode("MKTA"), vec![1, 1, 0]);
        assert_eq!(v.encode("AAAAA"), vec![0, 0, 3]);
    }

    #[test]
    fn short_sequence_is_all_zero() {
        let v = vocab();
        assert_eq!(v.encode("MK"), vec![0, 0, 0]);
        assert_eq!(v.encode(""), vec![0, 0, 0]);
    }

    #[test]
    fn unknown_motifs_ignored() {
        let v = vocab();
        assert_eq!(v.encode("GGGGG"), vec![0, 0, 0]);
    }

    #[test]
    fn round_trip_against_direct_count() {
        // Re-deriving counts from the encoded vector must agree with a
        // direct scan for every vocabulary motif.
        let v = vocab();
        let seq = "MKTAAAMKTAA";
        let encoded = v.encode(seq);
        for (i, motif) in ["MKT", "KTA", "AAA"].iter().enumerate() {
            let direct = (0..seq.len().saturating_sub(2))
                .filter(|&j| &seq[j..j + 3] == *motif)
                .count() as u32;
            assert_eq!(encoded[i], direct, "motif {motif}");
        }
    }

    #[test]
    fn rejects_bad_vocab() {
        assert!(MotifVocabulary::new(vec![]).is_err());
        assert!(MotifVocabulary::new(vec!["AB".to_string()]).is_err());
    }
}
