//! Subgraph matching of fragment patterns against molecules.
//!
//! Patterns are ordinary parsed fragments (see [`crate::graph`]); a
//! bracket H-count on a pattern atom (`[OH]`, `[NH2]`) acts as an exact
//! hydrogen-count constraint, everything else matches on element and
//! aromaticity. Pattern bonds must exist in the target with the same
//! order; extra target bonds between matched atoms are allowed (this is
//! substructure containment, not induced-subgraph isomorphism).

use crate::graph::Molecule;

/// Find the first embedding of `pattern` in `target`.
///
/// Returns `map` with `map[i]` = target atom index matched to pattern atom
/// `i`, or `None` when no embedding exists. The search tries candidate
/// target atoms in ascending index order, so the result is deterministic
/// and "first" is well-defined for highlight rendering.
pub fn find_first_match(target: &Molecule, pattern: &Molecule) -> Option<Vec<usize>> {
    if pattern.atom_count() == 0 || pattern.atom_count() > target.atom_count() {
        return None;
    }

    let order = traversal_order(pattern);
    let mut map = vec![usize::MAX; pattern.atom_count()];
    let mut used = vec![false; target.atom_count()];

    if extend(target, pattern, &order, 0, &mut map, &mut used) {
        Some(map)
    } else {
        None
    }
}

/// True when `pattern` occurs anywhere in `target`.
pub fn has_match(target: &Molecule, pattern: &Molecule) -> bool {
    find_first_match(target, pattern).is_some()
}

/// Pattern atom visit order: depth-first so each atom after the first has
/// at least one already-mapped neighbor (when connected), which lets the
/// matcher prune through bond constraints instead of trying every target
/// atom. Disconnected pattern components are appended as fresh roots.
fn traversal_order(pattern: &Molecule) -> Vec<usize> {
    let n = pattern.atom_count();
    let mut order = Vec::with_capacity(n);
    let mut seen = vec![false; n];

    for root in 0..n {
        if seen[root] {
            continue;
        }
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            if seen[i] {
                continue;
            }
            seen[i] = true;
            order.push(i);
            for &j in &pattern.adjacency[i] {
                if !seen[j] {
                    stack.push(j);
                }
            }
        }
    }
    order
}

fn atoms_compatible(target: &Molecule, t: usize, pattern: &Molecule, p: usize) -> bool {
    let ta = &target.atoms[t];
    let pa = &pattern.atoms[p];
    if ta.element != pa.element || ta.aromatic != pa.aromatic {
        return false;
    }
    // Bracket pattern atoms pin the hydrogen count exactly.
    if let Some(h) = pa.explicit_h {
        if ta.h_count != h {
            return false;
        }
    }
    true
}

fn extend(
    target: &Molecule,
    pattern: &Molecule,
    order: &[usize],
    depth: usize,
    map: &mut Vec<usize>,
    used: &mut Vec<bool>,
) -> bool {
    if depth == order.len() {
        return true;
    }
    let p = order[depth];

    // Candidate targets: neighbors of an already-mapped pattern neighbor
    // when one exists, otherwise every free atom.
    let anchor = pattern.adjacency[p]
        .iter()
        .find(|&&q| map[q] != usize::MAX)
        .copied();

    let candidates: Vec<usize> = match anchor {
        Some(q) => {
            let mut c: Vec<usize> = target.adjacency[map[q]].clone();
            c.sort_unstable();
            c
        }
        None => (0..target.atom_count()).collect(),
    };

    for t in candidates {
        if used[t] || !atoms_compatible(target, t, pattern, p) {
            continue;
        }
        // Every mapped pattern neighbor must be bonded in the target with
        // the same bond order.
        let bonds_ok = pattern.adjacency[p].iter().all(|&q| {
            if map[q] == usize::MAX {
                return true;
            }
            match pattern.bond_between(p, q) {
                Some(pb) => {
                    matches!(target.bond_between(t, map[q]), Some(b) if b.order == pb.order)
                }
                None => false,
            }
        });
        if !bonds_ok {
            continue;
        }

        map[p] = t;
        used[t] = true;
        if extend(target, pattern, order, depth + 1, map, used) {
            return true;
        }
        map[p] = usize::MAX;
        used[t] = false;
    }
    false
}
