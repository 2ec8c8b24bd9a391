//! dti-chem — molecular graph layer for the DTI service.
//!
//! Parses SMILES descriptors into sanitized molecular graphs and provides
//! everything the explanation pipeline needs from the chemistry side:
//! circular substructure fingerprints, subgraph matching for exemplar
//! fragments, named functional-group classification, and best-effort 2D
//! SVG depiction.

pub mod depict;
pub mod element;
pub mod fingerprint;
pub mod graph;
pub mod groups;
pub mod pattern;

pub use element::Element;
pub use fingerprint::Fingerprinter;
pub use graph::{Atom, Bond, BondOrder, Molecule};
pub use pattern::find_first_match;
