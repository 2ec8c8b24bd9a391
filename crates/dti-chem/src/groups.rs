//! Named functional-group classification and generic fragment summaries.
//!
//! Exemplar fragments get a human label in two steps: first match against
//! a fixed, ordered table of named group patterns (first hit wins — this
//! is a heuristic family label, not exact identity, and several patterns
//! can claim the same fragment); otherwise fall back to a composition
//! summary of the fragment itself.

use std::sync::OnceLock;

use crate::graph::Molecule;
use crate::pattern::has_match;

/// Ordered (name, pattern) table. Order matters: earlier entries win, and
/// the order is part of the documented labeling behavior — e.g. a
/// carboxylic-acid exemplar is claimed by "alcohol" first because the
/// hydroxyl pattern precedes it. Do not re-sort.
const NAMED_GROUPS: [(&str, &str); 23] = [
    ("alcohol", "[OH]"),
    ("primary amine", "[NH2]"),
    ("secondary amine", "[NH]"),
    ("tertiary amine", "N(C)(C)C"),
    ("carbonyl (ketone)", "CC(=O)C"),
    ("aldehyde", "[CH]=O"),
    ("carboxylic acid", "C(=O)[OH]"),
    ("ester", "C(=O)OC"),
    ("amide", "NC=O"),
    ("aromatic ring (benzene)", "c1ccccc1"),
    ("heterocycle (pyridine)", "c1ccncc1"),
    ("five-membered heterocycle (thiophene)", "c1ccsc1"),
    ("thiol", "[SH]"),
    ("ether", "COC"),
    ("thioether", "CSC"),
    ("fluoro", "F"),
    ("chloro", "Cl"),
    ("bromo", "Br"),
    ("iodo", "I"),
    ("nitro", "N(=O)=O"),
    ("phosphate", "P(=O)(O)O"),
    ("alkyne", "C#C"),
    ("alkene", "C=C"),
];

fn compiled_groups() -> &'static Vec<(&'static str, Molecule)> {
    static GROUPS: OnceLock<Vec<(&'static str, Molecule)>> = OnceLock::new();
    GROUPS.get_or_init(|| {
        NAMED_GROUPS
            .iter()
            .map(|(name, smiles)| {
                let mol = Molecule::from_smiles(smiles)
                    .unwrap_or_else(|e| panic!("bad builtin group pattern {smiles}: {e}"));
                (*name, mol)
            })
            .collect()
    })
}

/// First named group present in the fragment, if any.
pub fn classify_fragment(fragment: &Molecule) -> Option<&'static str> {
    compiled_groups()
        .iter()
        .find(|(_, pattern)| has_match(fragment, pattern))
        .map(|(name, _)| *name)
}

/// Human label for a fragment: `"<name>-like fragment"` for named groups,
/// otherwise the generic composition summary.
pub fn fragment_label(fragment: &Molecule) -> String {
    match classify_fragment(fragment) {
        Some(name) => format!("{name}-like fragment"),
        None => composition_summary(fragment),
    }
}

/// Composition summary, e.g. `"2×C 1×O (double & single bonds)"`:
/// per-element counts in first-appearance order, then the sorted set of
/// distinct bond kinds.
pub fn composition_summary(fragment: &Molecule) -> String {
    let mut order: Vec<&'static str> = Vec::new();
    let mut counts: Vec<usize> = Vec::new();
    for atom in &fragment.atoms {
        let sym = atom.element.symbol();
        match order.iter().position(|&s| s == sym) {
            Some(i) => counts[i] += 1,
            None => {
                order.push(sym);
                counts.push(1);
            }
        }
    }
    let atom_part = order
        .iter()
        .zip(&counts)
        .map(|(sym, n)| format!("{n}×{sym}"))
        .collect::<Vec<_>>()
        .join(" ");

    let mut kinds: Vec<&'static str> = fragment.bonds.iter().map(|b| b.order.label()).collect();
    kinds.sort_unstable();
    kinds.dedup();
    if kinds.is_empty() {
        format!("{atom_part} (no bonds)")
    } else {
        format!("{atom_part} ({} bonds)", kinds.join(" & "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Molecule;

    fn mol(s: &str) -> Molecule {
        Molecule::from_smiles(s).unwrap()
    }

    #[test]
    fn all_builtin_patterns_parse() {
        assert_eq!(compiled_groups().len(), 23);
    }

    #[test]
    fn hydroxyl_claims_alcohol_first() {
        // Contains both a hydroxyl and a carboxylic acid; table order says
        // the alcohol label wins. Documented behavior, not a bug.
        assert_eq!(classify_fragment(&mol("CC(=O)O")), Some("alcohol"));
    }

    #[test]
    fn amine_variants_ordered() {
        assert_eq!(classify_fragment(&mol("CN")), Some("primary amine"));
        assert_eq!(classify_fragment(&mol("CNC")), Some("secondary amine"));
        assert_eq!(classify_fragment(&mol("CN(C)C")), Some("tertiary amine"));
    }

    #[test]
    fn rings_classified() {
        assert_eq!(
            classify_fragment(&mol("c1ccccc1")),
            Some("aromatic ring (benzene)")
        );
        assert_eq!(
            classify_fragment(&mol("c1ccncc1")),
            Some("heterocycle (pyridine)")
        );
        assert_eq!(
            classify_fragment(&mol("c1ccsc1")),
            Some("five-membered heterocycle (thiophene)")
        );
    }

    #[test]
    fn halogens_and_multiple_bonds() {
        assert_eq!(classify_fragment(&mol("CCl")), Some("chloro"));
        assert_eq!(classify_fragment(&mol("C#C")), Some("alkyne"));
        assert_eq!(classify_fragment(&mol("C=CC")), Some("alkene"));
    }

    #[test]
    fn label_formats() {
        assert_eq!(fragment_label(&mol("CCl")), "chloro-like fragment");
    }

    #[test]
    fn generic_summary_for_unnamed_fragment() {
        // Plain alkane chain matches no named group.
        assert_eq!(classify_fragment(&mol("CCC")), None);
        assert_eq!(composition_summary(&mol("CCC")), "3×C (single bonds)");
        assert_eq!(composition_summary(&mol("C=CO")), "2×C 1×O (double & single bonds)");
    }

    #[test]
    fn single_atom_summary() {
        assert_eq!(composition_summary(&mol("O")), "1×O (no bonds)");
    }
}
