//! Wire types shared between the engine and the transport layer.

use serde::{Deserialize, Serialize};

/// Incoming prediction query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionQuery {
    /// SMILES descriptor of the compound.
    pub smiles: String,
    /// Target accession (e.g. a UniProt ID).
    pub target: String,
}

/// Which half of the combined feature vector an explanation entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Chemical,
    Protein,
}

/// One ranked explanation entry.
///
/// Chemical entries carry the exemplar fragment pattern (when the bit has
/// one) plus best-effort SVG renderings; protein entries carry the raw
/// 3-residue motif. Renderings may be empty strings — "no depiction
/// available" is a valid outcome, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "feature_type", rename_all = "snake_case")]
pub enum ExplanationEntry {
    Chemical {
        pattern: Option<String>,
        label: String,
        fragment_svg: String,
        molecule_svg: String,
        impact: f64,
    },
    Protein {
        motif: String,
        label: String,
        impact: f64,
    },
}

impl ExplanationEntry {
    pub fn kind(&self) -> FeatureKind {
        match self {
            ExplanationEntry::Chemical { .. } => FeatureKind::Chemical,
            ExplanationEntry::Protein { .. } => FeatureKind::Protein,
        }
    }

    pub fn impact(&self) -> f64 {
        match self {
            ExplanationEntry::Chemical { impact, .. } => *impact,
            ExplanationEntry::Protein { impact, .. } => *impact,
        }
    }
}

/// Successful prediction response. Cached verbatim per (smiles, target).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub probability: f64,
    pub explanation: Vec<ExplanationEntry>,
}

/// Target listing entry with a human-readable description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetInfo {
    pub id: String,
    pub name: String,
}
