//! Best-effort 2D depiction.
//!
//! Coordinates come from a BFS angular placement (zig-zag chains, ±60°
//! child fan-out); ring-closure partners are already placed when the BFS
//! reaches them, so rings come out strained but connected. That is fine
//! for explanation thumbnails — the renderer is explicitly best-effort,
//! and "no rendering" is a valid outcome upstream.

use std::collections::VecDeque;
use std::fmt::Write as _;

use crate::graph::{BondOrder, Molecule};

const BOND_LEN: f64 = 1.0;
const HIGHLIGHT: &str = "#d62728";

/// 2D coordinates for every atom, one connected component after another
/// along the x axis.
pub fn layout_2d(mol: &Molecule) -> Vec<(f64, f64)> {
    let n = mol.atom_count();
    let mut pos = vec![(0.0_f64, 0.0_f64); n];
    let mut placed = vec![false; n];
    // Direction (radians) of the bond that reached each atom.
    let mut heading = vec![0.0_f64; n];
    let mut component_x = 0.0;

    let mut queue: VecDeque<usize> = VecDeque::new();

    for root in 0..n {
        if placed[root] {
            continue;
        }
        pos[root] = (component_x, 0.0);
        placed[root] = true;
        heading[root] = 0.0;
        queue.push_back(root);

        let mut max_x = component_x;
        while let Some(u) = queue.pop_front() {
            let unplaced: Vec<usize> = mol.adjacency[u]
                .iter()
                .copied()
                .filter(|&v| !placed[v])
                .collect();

            // Fan the children around the incoming heading: straight-ish
            // continuation first, alternating above/below the chain.
            let offsets: [f64; 5] = [
                60f64.to_radians(),
                -60f64.to_radians(),
                180f64.to_radians(),
                120f64.to_radians(),
                -120f64.to_radians(),
            ];
            for (k, &v) in unplaced.iter().enumerate() {
                let angle = heading[u] + offsets[k.min(offsets.len() - 1)];
                let (ux, uy) = pos[u];
                pos[v] = (ux + BOND_LEN * angle.cos(), uy + BOND_LEN * angle.sin());
                heading[v] = angle;
                placed[v] = true;
                queue.push_back(v);
                max_x = max_x.max(pos[v].0);
            }
            max_x = max_x.max(pos[u].0);
        }
        component_x = max_x + 2.0 * BOND_LEN;
    }

    pos
}

/// SVG of the fragment alone (used for exemplar thumbnails).
pub fn draw_fragment(mol: &Molecule, size: u32) -> String {
    draw(mol, size, &[])
}

/// SVG of the whole molecule with `atoms` (and the bonds strictly between
/// them) marked in the highlight color.
pub fn draw_with_highlight(mol: &Molecule, atoms: &[usize], size: u32) -> String {
    draw(mol, size, atoms)
}

fn draw(mol: &Molecule, size: u32, highlight_atoms: &[usize]) -> String {
    if mol.atom_count() == 0 {
        return String::new();
    }
    let pos = layout_2d(mol);

    // Fit into the canvas with uniform scale and padding.
    let pad = size as f64 * 0.12;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
    for &(x, y) in &pos {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    let extent = (max_x - min_x).max(max_y - min_y).max(1e-6);
    let scale = (size as f64 - 2.0 * pad) / extent;
    let sx = |x: f64| (x - min_x) * scale + pad + (size as f64 - 2.0 * pad - (max_x - min_x) * scale) / 2.0;
    // SVG y grows downward.
    let sy = |y: f64| (max_y - y) * scale + pad + (size as f64 - 2.0 * pad - (max_y - min_y) * scale) / 2.0;

    let is_hl = |i: usize| highlight_atoms.contains(&i);

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
    );

    // Highlight layer first, underneath the structure.
    for b in &mol.bonds {
        if is_hl(b.a) && is_hl(b.b) {
            let (x1, y1) = (sx(pos[b.a].0), sy(pos[b.a].1));
            let (x2, y2) = (sx(pos[b.b].0), sy(pos[b.b].1));
            let _ = write!(
                svg,
                r#"<line x1="{x1:.1}" y1="{y1:.1}" x2="{x2:.1}" y2="{y2:.1}" stroke="{HIGHLIGHT}" stroke-width="7" stroke-opacity="0.45"/>"#
            );
        }
    }
    for &i in highlight_atoms {
        if i < pos.len() {
            let (cx, cy) = (sx(pos[i].0), sy(pos[i].1));
            let _ = write!(
                svg,
                r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="9" fill="{HIGHLIGHT}" fill-opacity="0.45"/>"#
            );
        }
    }

    // Bonds.
    for b in &mol.bonds {
        let (x1, y1) = (sx(pos[b.a].0), sy(pos[b.a].1));
        let (x2, y2) = (sx(pos[b.b].0), sy(pos[b.b].1));
        // Unit perpendicular for multi-line bonds, in screen space.
        let (dx, dy) = (x2 - x1, y2 - y1);
        let len = (dx * dx + dy * dy).sqrt().max(1e-6);
        let (px, py) = (-dy / len * 2.5, dx / len * 2.5);

        let mut line = |ox: f64, oy: f64, dashed: bool| {
            let dash = if dashed { r#" stroke-dasharray="3 3""# } else { "" };
            let _ = write!(
                svg,
                r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#222" stroke-width="1.5"{dash}/>"##,
                x1 + ox,
                y1 + oy,
                x2 + ox,
                y2 + oy,
            );
        };
        match b.order {
            BondOrder::Single => line(0.0, 0.0, false),
            BondOrder::Double => {
                line(px, py, false);
                line(-px, -py, false);
            }
            BondOrder::Triple => {
                line(0.0, 0.0, false);
                line(2.0 * px, 2.0 * py, false);
                line(-2.0 * px, -2.0 * py, false);
            }
            BondOrder::Aromatic => {
                line(0.0, 0.0, false);
                line(px, py, true);
            }
        }
    }

    // Atom labels: heteroatoms and charged atoms only, carbon stays bare.
    for (i, atom) in mol.atoms.iter().enumerate() {
        let charged = atom.charge != 0;
        if atom.element == crate::element::Element::Carbon && !charged {
            continue;
        }
        let (cx, cy) = (sx(pos[i].0), sy(pos[i].1));
        let mut label = atom.element.symbol().to_string();
        match atom.charge {
            0 => {}
            1 => label.push('+'),
            -1 => label.push('-'),
            c if c > 0 => {
                let _ = write!(label, "{c}+");
            }
            c => {
                let _ = write!(label, "{}-", -c);
            }
        }
        let _ = write!(
            svg,
            r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="7" fill="white"/><text x="{cx:.1}" y="{cy:.1}" font-size="10" font-family="sans-serif" text-anchor="middle" dominant-baseline="central">{label}</text>"#
        );
    }

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Molecule;

    fn mol(s: &str) -> Molecule {
        Molecule::from_smiles(s).unwrap()
    }

    #[test]
    fn layout_places_every_atom() {
        let m = mol("CC(=O)Oc1ccccc1C(=O)O");
        let pos = layout_2d(&m);
        assert_eq!(pos.len(), m.atom_count());
        // No two bonded atoms collapse onto the same point.
        for b in &m.bonds {
            let (x1, y1) = pos[b.a];
            let (x2, y2) = pos[b.b];
            assert!((x1 - x2).abs() + (y1 - y2).abs() > 1e-9);
        }
    }

    #[test]
    fn fragment_svg_well_formed() {
        let svg = draw_fragment(&mol("C=CO"), 150);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"width="150""#));
        // Heteroatom label present, carbon bare.
        assert!(svg.contains(">O</text>"));
    }

    #[test]
    fn highlight_marks_atoms_and_inner_bonds() {
        let m = mol("CCO");
        let svg = draw_with_highlight(&m, &[0, 1], 300);
        assert!(svg.contains(HIGHLIGHT));
        // Two highlighted atoms, one highlighted bond between them.
        assert_eq!(svg.matches("<circle").count() - 1, 2); // one circle is the O label
    }

    #[test]
    fn single_atom_renders() {
        let svg = draw_fragment(&mol("O"), 150);
        assert!(svg.contains(">O</text>"));
    }
}
