//! Amino-acid symbol tables and motif rendering.

/// Standard 20-symbol table mapping 1-letter codes to 3-letter codes.
const AA_3LETTER: [(char, &str); 20] = [
    ('A', "Ala"),
    ('R', "Arg"),
    ('N', "Asn"),
    ('D', "Asp"),
    ('C', "Cys"),
    ('E', "Glu"),
    ('Q', "Gln"),
    ('G', "Gly"),
    ('H', "His"),
    ('I', "Ile"),
    ('L', "Leu"),
    ('K', "Lys"),
    ('M', "Met"),
    ('F', "Phe"),
    ('P', "Pro"),
    ('S', "Ser"),
    ('T', "Thr"),
    ('W', "Trp"),
    ('Y', "Tyr"),
    ('V', "Val"),
];

/// 3-letter code for a residue symbol, or `None` outside the standard 20.
pub fn three_letter(symbol: char) -> Option<&'static str> {
    AA_3LETTER
        .iter()
        .find(|(c, _)| *c == symbol)
        .map(|(_, name)| *name)
}

/// Render a residue motif as hyphen-joined 3-letter codes.
///
/// Symbols outside the standard table pass through unchanged as
/// single-letter placeholders (e.g. `"AXV"` → `"Ala-X-Val"`).
pub fn render_motif(motif: &str) -> String {
    motif
        .chars()
        .map(|c| three_letter(c).map(str::to_string).unwrap_or_else(|| c.to_string()))
        .collect::<Vec<_>>()
        .join("-")
}
