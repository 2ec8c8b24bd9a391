//! Combined feature-vector assembly.
//!
//! Layout is fixed for the life of a trained model: fingerprint bits
//! first (offsets `0..B`), motif counts second (offsets `B..B+K`). The
//! resolver relies on this split to decide which half an attribution
//! index belongs to.

/// Concatenate fingerprint bits and motif counts into one `f32` row.
pub fn combine(bits: &[u8], counts: &[u32]) -> Vec<f32> {
    let mut out = Vec::with_capacity(bits.len() + counts.len());
    out.extend(bits.iter().map(|&b| b as f32));
    out.extend(counts.iter().map(|&c| c as f32));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_precede_counts() {
        let v = combine(&[1, 0, 1], &[5, 0]);
        assert_eq!(v, vec![1.0, 0.0, 1.0, 5.0, 0.0]);
    }

    #[test]
    fn empty_halves() {
        assert_eq!(combine(&[], &[2]), vec![2.0]);
        assert_eq!(combine(&[1], &[]), vec![1.0]);
        assert!(combine(&[], &[]).is_empty());
    }
}
