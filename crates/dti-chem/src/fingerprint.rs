//! Circular substructure-presence fingerprint.
//!
//! Radius-2 neighborhood invariants folded into a fixed bit range, the
//! same scheme the offline feature-generation stage uses. The hash is a
//! fixed FNV-style mix so the encoding is a pure function of the graph —
//! identical descriptors always produce identical vectors.

use crate::graph::{BondOrder, Molecule};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn mix(h: u64, v: u64) -> u64 {
    let mut h = h;
    for byte in v.to_le_bytes() {
        h ^= byte as u64;
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

fn bond_code(order: BondOrder) -> u64 {
    match order {
        BondOrder::Single => 1,
        BondOrder::Double => 2,
        BondOrder::Triple => 3,
        BondOrder::Aromatic => 4,
    }
}

/// Encodes molecules into fixed-length substructure-presence bit vectors.
#[derive(Debug, Clone)]
pub struct Fingerprinter {
    n_bits: usize,
    radius: usize,
}

impl Fingerprinter {
    pub fn new(n_bits: usize) -> Self {
        Self { n_bits, radius: 2 }
    }

    pub fn n_bits(&self) -> usize {
        self.n_bits
    }

    /// Compute the presence bit vector (0/1 per bit) for a molecule.
    pub fn encode(&self, mol: &Molecule) -> Vec<u8> {
        let mut bits = vec![0u8; self.n_bits];
        for inv in self.environment_hashes(mol) {
            bits[(inv % self.n_bits as u64) as usize] = 1;
        }
        bits
    }

    /// One hash per (atom, radius 0..=2) neighborhood environment.
    fn environment_hashes(&self, mol: &Molecule) -> Vec<u64> {
        let n = mol.atom_count();

        // Round 0: local atom invariants.
        let mut inv: Vec<u64> = (0..n)
            .map(|i| {
                let a = &mol.atoms[i];
                let mut h = FNV_OFFSET;
                h = mix(h, a.element.atomic_number() as u64);
                h = mix(h, mol.degree(i) as u64);
                h = mix(h, a.h_count as u64);
                h = mix(h, (a.charge as i64 + 8) as u64);
                h = mix(h, a.aromatic as u64);
                h
            })
            .collect();

        let mut out = inv.clone();

        // Rounds 1..=radius: fold in sorted neighbor environments so the
        // hash is independent of neighbor enumeration order.
        for _ in 0..self.radius {
            let mut next = vec![0u64; n];
            for i in 0..n {
                let mut neigh: Vec<(u64, u64)> = mol.adjacency[i]
                    .iter()
                    .map(|&j| {
                        let order = mol
                            .bond_between(i, j)
                            .map(|b| b.order)
                            .unwrap_or(BondOrder::Single);
                        (bond_code(order), inv[j])
                    })
                    .collect();
                neigh.sort_unstable();

                let mut h = mix(FNV_OFFSET, inv[i]);
                for (code, ninv) in neigh {
                    h = mix(h, code);
                    h = mix(h, ninv);
                }
                next[i] = h;
            }
            inv = next;
            out.extend_from_slice(&inv);
        }

        out
    }
}
