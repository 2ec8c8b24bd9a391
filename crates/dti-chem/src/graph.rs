//! Molecular graph and SMILES parsing.
//!
//! The parser accepts the organic subset plus bracket atoms. Bracket
//! H-counts and charges are retained on the atom (explicit H-counts double
//! as match constraints for fragment patterns, see [`crate::pattern`]).
//! Stereo markers, isotopes, and atom maps are consumed and discarded —
//! none of the downstream feature code is stereo-aware.

use std::collections::HashMap;

use dti_common::{DtiError, Result};

use crate::element::Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Contribution to the valence sum used for implicit-H inference.
    /// Aromatic bonds count 1.5 (two of them saturate three valences).
    pub fn valence_units(&self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Aromatic => 1.5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BondOrder::Single => "single",
            BondOrder::Double => "double",
            BondOrder::Triple => "triple",
            BondOrder::Aromatic => "aromatic",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Atom {
    pub element: Element,
    pub aromatic: bool,
    pub charge: i8,
    /// H-count written explicitly in a bracket atom (`[NH2]` → `Some(2)`).
    /// `None` for organic-subset atoms, whose H-count is inferred.
    pub explicit_h: Option<u8>,
    /// Inferred or explicit hydrogen count, filled in by sanitization.
    pub h_count: u8,
}

#[derive(Debug, Clone, Copy)]
pub struct Bond {
    pub a: usize,
    pub b: usize,
    pub order: BondOrder,
}

/// Sanitized molecular graph. Indices into `atoms` are stable and used
/// throughout matching, fingerprinting, and depiction.
#[derive(Debug, Clone)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    pub adjacency: Vec<Vec<usize>>,
}

impl Molecule {
    /// Parse a SMILES string into a sanitized molecule.
    ///
    /// Fails with [`DtiError::InvalidInput`] on syntax errors, unknown
    /// elements, unclosed rings/branches, or valence violations.
    pub fn from_smiles(smiles: &str) -> Result<Self> {
        let smiles = smiles.trim();
        if smiles.is_empty() {
            return Err(invalid("empty SMILES string"));
        }

        let mut atoms: Vec<Atom> = Vec::new();
        let mut bonds: Vec<Bond> = Vec::new();
        let mut adjacency: Vec<Vec<usize>> = Vec::new();

        let mut current: Option<usize> = None;
        // Two consecutive aromatic (lowercase) atoms share an implicit
        // aromatic bond; any other pair gets an implicit single bond.
        let mut pending_bond: Option<BondOrder> = None;
        let mut branch_stack: Vec<Option<usize>> = Vec::new();
        // ring digit -> (open atom, explicit bond at open)
        let mut ring_map: HashMap<u32, (usize, Option<BondOrder>)> = HashMap::new();

        let mut chars = smiles.chars().peekable();

        while let Some(&ch) = chars.peek() {
            match ch {
                '-' => {
                    pending_bond = Some(BondOrder::Single);
                    chars.next();
                }
                '=' => {
                    pending_bond = Some(BondOrder::Double);
                    chars.next();
                }
                '#' => {
                    pending_bond = Some(BondOrder::Triple);
                    chars.next();
                }
                ':' => {
                    pending_bond = Some(BondOrder::Aromatic);
                    chars.next();
                }
                // Stereo bonds: single for connectivity purposes.
                '/' | '\\' => {
                    pending_bond = Some(BondOrder::Single);
                    chars.next();
                }
                '(' => {
                    branch_stack.push(current);
                    chars.next();
                }
                ')' => {
                    current = branch_stack
                        .pop()
                        .ok_or_else(|| invalid("unmatched ')'"))?;
                    pending_bond = None;
                    chars.next();
                }
                '.' => {
                    current = None;
                    pending_bond = None;
                    chars.next();
                }
                '%' => {
                    chars.next();
                    let d1 = consume_digit(&mut chars)?;
                    let d2 = consume_digit(&mut chars)?;
                    close_or_open_ring(
                        d1 * 10 + d2,
                        current,
                        pending_bond.take(),
                        &mut ring_map,
                        &atoms,
                        &mut bonds,
                        &mut adjacency,
                    )?;
                }
                '0'..='9' => {
                    chars.next();
                    close_or_open_ring(
                        ch as u32 - '0' as u32,
                        current,
                        pending_bond.take(),
                        &mut ring_map,
                        &atoms,
                        &mut bonds,
                        &mut adjacency,
                    )?;
                }
                '[' => {
                    let atom = parse_bracket_atom(&mut chars)?;
                    current = Some(append_atom(
                        atom,
                        current,
                        pending_bond.take(),
                        &mut atoms,
                        &mut bonds,
                        &mut adjacency,
                    ));
                }
                _ => {
                    let atom = parse_organic_atom(&mut chars)?;
                    current = Some(append_atom(
                        atom,
                        current,
                        pending_bond.take(),
                        &mut atoms,
                        &mut bonds,
                        &mut adjacency,
                    ));
                }
            }
        }

        if !ring_map.is_empty() {
            return Err(invalid("unclosed ring closure"));
        }
        if !branch_stack.is_empty() {
            return Err(invalid("unclosed '(' branch"));
        }
        if pending_bond.is_some() {
            return Err(invalid("dangling bond symbol"));
        }

        let mut mol = Molecule {
            atoms,
            bonds,
            adjacency,
        };
        mol.sanitize()?;
        Ok(mol)
    }

    /// Infer hydrogen counts and reject valence violations.
    fn sanitize(&mut self) -> Result<()> {
        for i in 0..self.atoms.len() {
            let order_sum: f64 = self
                .bonds
                .iter()
                .filter(|b| b.a == i || b.b == i)
                .map(|b| b.order.valence_units())
                .sum();
            let atom = &mut self.atoms[i];

            if let Some(h) = atom.explicit_h {
                // Bracket atoms state their own H-count; trust it.
                atom.h_count = h;
                continue;
            }

            let used = order_sum.ceil() as i32;
            let allowed = atom.element.allowed_valences();
            if allowed.is_empty() {
                // Metals: no implicit H, any coordination accepted.
                atom.h_count = 0;
                continue;
            }
            // Smallest allowed valence state that accommodates the bonds.
            let valence = allowed
                .iter()
                .map(|&v| v as i32 + atom.charge as i32)
                .find(|&v| v >= used)
                .ok_or_else(|| {
                    invalid(format!(
                        "valence of {} exceeded ({} bonds)",
                        atom.element.symbol(),
                        used
                    ))
                })?;
            atom.h_count = (valence - used).max(0) as u8;
        }
        Ok(())
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Heavy-atom degree of atom `i`.
    pub fn degree(&self, i: usize) -> usize {
        self.adjacency[i].len()
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<&Bond> {
        self.bonds
            .iter()
            .find(|bond| (bond.a == a && bond.b == b) || (bond.a == b && bond.b == a))
    }
}

fn invalid(msg: impl Into<String>) -> DtiError {
    DtiError::InvalidInput(msg.into())
}

fn append_atom(
    atom: Atom,
    prev: Option<usize>,
    pending: Option<BondOrder>,
    atoms: &mut Vec<Atom>,
    bonds: &mut Vec<Bond>,
    adjacency: &mut Vec<Vec<usize>>,
) -> usize {
    let idx = atoms.len();
    let aromatic = atom.aromatic;
    atoms.push(atom);
    adjacency.push(Vec::new());

    if let Some(p) = prev {
        let order =
            pending.unwrap_or_else(|| implicit_order(atoms[p].aromatic, aromatic));
        add_bond(p, idx, order, bonds, adjacency);
    }
    idx
}

/// Implicit bond between adjacent atoms: aromatic if both were written
/// lowercase, single otherwise.
fn implicit_order(prev_aromatic: bool, new_aromatic: bool) -> BondOrder {
    if prev_aromatic && new_aromatic {
        BondOrder::Aromatic
    } else {
        BondOrder::Single
    }
}

fn add_bond(
    a: usize,
    b: usize,
    order: BondOrder,
    bonds: &mut Vec<Bond>,
    adjacency: &mut [Vec<usize>],
) {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    bonds.push(Bond { a: lo, b: hi, order });
    adjacency[a].push(b);
    adjacency[b].push(a);
}

fn close_or_open_ring(
    digit: u32,
    current: Option<usize>,
    explicit: Option<BondOrder>,
    ring_map: &mut HashMap<u32, (usize, Option<BondOrder>)>,
    atoms: &[Atom],
    bonds: &mut Vec<Bond>,
    adjacency: &mut [Vec<usize>],
) -> Result<()> {
    let cur = current.ok_or_else(|| invalid("ring closure digit before any atom"))?;

    match ring_map.remove(&digit) {
        Some((other, open_order)) => {
            if other == cur {
                return Err(invalid("ring closure bonds an atom to itself"));
            }
            // Explicit bond at either end wins; otherwise aromatic iff both
            // ring atoms are aromatic.
            let order = explicit.or(open_order).unwrap_or_else(|| {
                implicit_order(atoms[other].aromatic, atoms[cur].aromatic)
            });
            add_bond(cur, other, order, bonds, adjacency);
        }
        None => {
            ring_map.insert(digit, (cur, explicit));
        }
    }
    Ok(())
}

fn consume_digit(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Result<u32> {
    match chars.next() {
        Some(c) if c.is_ascii_digit() => Ok(c as u32 - '0' as u32),
        Some(c) => Err(invalid(format!("expected ring digit, found '{c}'"))),
        None => Err(invalid("expected ring digit, found end of input")),
    }
}

/// Parse `[isotope? symbol chirality? Hcount? charge? :map?]`.
fn parse_bracket_atom(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Result<Atom> {
    chars.next(); // '['

    // Isotope prefix: digits before the symbol, ignored.
    while chars.peek().is_some_and(|c| c.is_ascii_digit()) {
        chars.next();
    }

    let first = chars
        .next()
        .ok_or_else(|| invalid("unterminated bracket atom"))?;
    if !first.is_ascii_alphabetic() {
        return Err(invalid(format!("bad element symbol start '{first}'")));
    }
    let aromatic = first.is_ascii_lowercase();
    let mut sym = String::from(first.to_ascii_uppercase());
    // Second letter of two-letter symbols is always lowercase; but a
    // lowercase 'h' here is the H-count marker, not part of the symbol.
    if let Some(&c) = chars.peek() {
        if c.is_ascii_lowercase() && Element::from_symbol(&format!("{sym}{c}")).is_some() {
            sym.push(c);
            chars.next();
        }
    }
    let element = Element::from_symbol(&sym)
        .ok_or_else(|| invalid(format!("unknown element '{sym}'")))?;

    // Chirality markers, ignored.
    while chars.peek() == Some(&'@') {
        chars.next();
    }

    // Explicit hydrogen count.
    let mut explicit_h: u8 = 0;
    let mut saw_h = false;
    if chars.peek() == Some(&'H') {
        chars.next();
        saw_h = true;
        explicit_h = 1;
        if let Some(d) = chars.next_if(|c| c.is_ascii_digit()) {
            explicit_h = d as u8 - b'0';
        }
    }

    // Charge: +, -, ++, +2, etc.
    let mut charge: i8 = 0;
    if let Some(&sign) = chars.peek() {
        if sign == '+' || sign == '-' {
            chars.next();
            let unit: i8 = if sign == '+' { 1 } else { -1 };
            charge = unit;
            if let Some(d) = chars.next_if(|c| c.is_ascii_digit()) {
                charge = unit * (d as i8 - b'0' as i8);
            } else {
                while chars.peek() == Some(&sign) {
                    chars.next();
                    charge += unit;
                }
            }
        }
    }

    // Atom map, ignored.
    if chars.peek() == Some(&':') {
        chars.next();
        while chars.peek().is_some_and(|c| c.is_ascii_digit()) {
            chars.next();
        }
    }

    match chars.next() {
        Some(']') => {}
        other => return Err(invalid(format!("expected ']', found {other:?}"))),
    }

    Ok(Atom {
        element,
        aromatic,
        charge,
        explicit_h: if saw_h { Some(explicit_h) } else { Some(0) },
        h_count: 0,
    })
}

/// Parse a bare organic-subset atom. Errors on anything unrecognized —
/// this is where `"not_a_molecule"` style inputs get rejected.
fn parse_organic_atom(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Result<Atom> {
    let ch = chars
        .next()
        .ok_or_else(|| invalid("unexpected end of input"))?;

    let (element, aromatic) = match ch {
        'C' => {
            if chars.peek() == Some(&'l') {
                chars.next();
                (Element::Chlorine, false)
            } else {
                (Element::Carbon, false)
            }
        }
        'B' => {
            if chars.peek() == Some(&'r') {
                chars.next();
                (Element::Bromine, false)
            } else {
                (Element::Boron, false)
            }
        }
        'N' => (Element::Nitrogen, false),
        'O' => (Element::Oxygen, false),
        'P' => (Element::Phosphorus, false),
        'S' => (Element::Sulfur, false),
        'F' => (Element::Fluorine, false),
        'I' => (Element::Iodine, false),
        'c' => (Element::Carbon, true),
        'n' => (Element::Nitrogen, true),
        'o' => (Element::Oxygen, true),
        's' => (Element::Sulfur, true),
        'p' => (Element::Phosphorus, true),
        other => {
            return Err(invalid(format!(
                "unrecognized SMILES character '{other}'"
            )))
        }
    };

    Ok(Atom {
        element,
        aromatic,
        charge: 0,
        explicit_h: None,
        h_count: 0,
    })
}
