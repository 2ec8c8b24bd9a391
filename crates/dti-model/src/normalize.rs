//! Attribution-shape normalization.
//!
//! The attribution stage's output layout has not been stable across
//! versions of the underlying procedure: per-class matrices, flattened
//! two-class arrays, single rows, and a trailing class axis have all been
//! observed. Each recognized layout is decoded explicitly; anything else
//! is a fatal error carrying the offending shape. Guessing a plausible
//! slice here would silently corrupt every explanation that follows, so
//! there is deliberately no catch-all.

use dti_common::{DtiError, Result};

use crate::attribution::AttributionOutput;

/// Extract the positive-class per-feature scores as one canonical vector
/// of length `n_features`.
///
/// Recognized shapes, for `n = n_features`:
/// - `(2n,)` — flattened two-class array, classes concatenated
/// - `(2, n)` — per-class rows
/// - `(1, n)` — single-class row
/// - `(n,)` — already canonical
/// - `(1, n, 2)` — row with a trailing class axis
pub fn normalize_attribution(out: &AttributionOutput, n_features: usize) -> Result<Vec<f64>> {
    let n = n_features;
    let expected_len: usize = out.shape.iter().product();
    if out.values.len() != expected_len {
        return Err(DtiError::Inference(format!(
            "attribution buffer has {} values but shape {:?} implies {}",
            out.values.len(),
            out.shape,
            expected_len
        )));
    }

    let vals = &out.values;
    match out.shape.as_slice() {
        [len] if *len == 2 * n => Ok(vals[n..].to_vec()),
        [2, cols] if *cols == n => Ok(vals[n..].to_vec()),
        [1, cols] if *cols == n => Ok(vals.to_vec()),
        [len] if *len == n => Ok(vals.to_vec()),
        [1, rows, 2] if *rows == n => Ok((0..n).map(|i| vals[i * 2 + 1]).collect()),
        _ => Err(DtiError::UnexpectedAttributionShape {
            shape: out.shape.clone(),
            n_features: n,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: usize = 4;

    fn pos() -> Vec<f64> {
        vec![0.1, -0.2, 0.3, -0.4]
    }

    fn neg() -> Vec<f64> {
        pos().iter().map(|v| -v).collect()
    }

    #[test]
    fn flattened_two_class() {
        let mut values = neg();
        values.extend(pos());
        let out = AttributionOutput {
            shape: vec![2 * N],
            values,
        };
        assert_eq!(normalize_attribution(&out, N).unwrap(), pos());
    }

    #[test]
    fn two_row_matrix() {
        let mut values = neg();
        values.extend(pos());
        let out = AttributionOutput {
            shape: vec![2, N],
            values,
        };
        assert_eq!(normalize_attribution(&out, N).unwrap(), pos());
    }

    #[test]
    fn single_row_matrix() {
        let out = AttributionOutput {
            shape: vec![1, N],
            values: pos(),
        };
        assert_eq!(normalize_attribution(&out, N).unwrap(), pos());
    }

    #[test]
    fn bare_vector() {
        let out = AttributionOutput {
            shape: vec![N],
            values: pos(),
        };
        assert_eq!(normalize_attribution(&out, N).unwrap(), pos());
    }

    #[test]
    fn trailing_class_axis() {
        let mut values = Vec::new();
        for (a, b) in neg().into_iter().zip(pos()) {
            values.push(a);
            values.push(b);
        }
        let out = AttributionOutput {
            shape: vec![1, N, 2],
            values,
        };
        assert_eq!(normalize_attribution(&out, N).unwrap(), pos());
    }

    #[test]
    fn unrecognized_shape_is_fatal() {
        let out = AttributionOutput {
            shape: vec![3, N],
            values: vec![0.0; 3 * N],
        };
        let err = normalize_attribution(&out, N).unwrap_err();
        match err {
            DtiError::UnexpectedAttributionShape { shape, n_features } => {
                assert_eq!(shape, vec![3, N]);
                assert_eq!(n_features, N);
            }
            other => panic!("wrong error: {other}"),
        }
    }

    #[test]
    fn length_mismatch_is_fatal() {
        let out = AttributionOutput {
            shape: vec![2, N],
            values: vec![0.0; 3],
        };
        assert!(normalize_attribution(&out, N).is_err());
    }

    #[test]
    fn ambiguous_two_feature_case_prefers_two_class_read() {
        // With n = 2 a (2, 2) buffer reads as per-class rows, and a (4,)
        // buffer reads as the flattened two-class form. Both take the
        // second half, so the two interpretations agree.
        let out = AttributionOutput {
            shape: vec![4],
            values: vec![-0.5, 0.5, 0.5, -0.5],
        };
        assert_eq!(normalize_attribution(&out, 2).unwrap(), vec![0.5, -0.5]);
    }
}
