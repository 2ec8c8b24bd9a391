//! Explanation resolution: attribution vector → ranked, human-readable
//! entries.
//!
//! The ten features with the largest absolute attribution are resolved
//! against the feature layout: fingerprint-bit indices become chemical
//! entries (exemplar fragment, named-group label, SVG depictions),
//! motif indices become protein entries (3-residue motif rendered with
//! 3-letter codes). Every resolution step is best-effort — a bit without
//! an exemplar, an unparsable exemplar, or a fragment absent from the
//! query molecule each degrade the entry rather than fail the request.

use tracing::debug;

use dti_chem::depict::{draw_fragment, draw_with_highlight};
use dti_chem::groups::fragment_label;
use dti_chem::{find_first_match, Molecule};
use dti_common::{amino, ExplanationEntry};

use crate::bits::BitExplanationTable;
use crate::vocab::MotifVocabulary;

const TOP_FEATURES: usize = 10;
const FRAGMENT_SVG_SIZE: u32 = 150;
const MOLECULE_SVG_SIZE: u32 = 300;

/// Indices of the `TOP_FEATURES` largest-magnitude attributions,
/// descending; ties break toward the lower feature index.
fn rank(attribution: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..attribution.len()).collect();
    order.sort_by(|&a, &b| {
        attribution[b]
            .abs()
            .total_cmp(&attribution[a].abs())
            .then(a.cmp(&b))
    });
    order.truncate(TOP_FEATURES);
    order
}

pub fn resolve_explanations(
    attribution: &[f64],
    fp_bits: usize,
    table: &BitExplanationTable,
    vocab: &MotifVocabulary,
    query: &Molecule,
) -> Vec<ExplanationEntry> {
    rank(attribution)
        .into_iter()
        .map(|i| {
            let impact = attribution[i];
            if i < fp_bits {
                resolve_chemical(i, impact, table, query)
            } else {
                resolve_protein(i - fp_bits, impact, vocab)
            }
        })
        .collect()
}

fn resolve_chemical(
    bit: usize,
    impact: f64,
    table: &BitExplanationTable,
    query: &Molecule,
) -> ExplanationEntry {
    let Some(pattern) = table.pattern(bit) else {
        // No exemplar was ever recorded for this bit.
        return ExplanationEntry::Chemical {
            pattern: None,
            label: format!("FP_bit_{bit}"),
            fragment_svg: String::new(),
            molecule_svg: String::new(),
            impact,
        };
    };

    match Molecule::from_smiles(pattern) {
        Ok(fragment) => {
            let molecule_svg = match find_first_match(query, &fragment) {
                Some(atoms) => draw_with_highlight(query, &atoms, MOLECULE_SVG_SIZE),
                None => String::new(),
            };
            ExplanationEntry::Chemical {
                pattern: Some(pattern.to_string()),
                label: fragment_label(&fragment),
                fragment_svg: draw_fragment(&fragment, FRAGMENT_SVG_SIZE),
                molecule_svg,
                impact,
            }
        }
        Err(e) => {
            debug!(bit, pattern, error = %e, "exemplar fragment did not parse");
            ExplanationEntry::Chemical {
                pattern: Some(pattern.to_string()),
                label: pattern.to_string(),
                fragment_svg: String::new(),
                molecule_svg: String::new(),
                impact,
            }
        }
    }
}

fn resolve_protein(offset: usize, impact: f64, vocab: &MotifVocabulary) -> ExplanationEntry {
    let motif = vocab.motif(offset).unwrap_or("???").to_string();
    let label = amino::render_motif(&motif);
    ExplanationEntry::Protein {
        motif,
        label,
        impact,
    }
}
