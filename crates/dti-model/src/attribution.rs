//! Sampling-based, model-agnostic feature attribution.
//!
//! For one query vector we draw coalition masks (seeded, so two runs on
//! the same input agree exactly), replace masked-out features with values
//! from a fixed background sample, evaluate the classifier in batch, and
//! fit the coalition game with a kernel-weighted ridge regression solved
//! in the dual — an `n_samples × n_samples` system, so the cost of the
//! solve is independent of feature count. Coalition sizes are drawn from
//! the Shapley kernel distribution (∝ 1/(k·(M−k))), which makes uniform
//! regression weights correct.
//!
//! The raw result is shape-tagged rather than a flat vector on purpose:
//! historically this stage emitted several layouts, and the decode step
//! in [`crate::normalize`] dispatches on shape explicitly.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use dti_common::{DtiError, Result};

use crate::classifier::MlpClassifier;

/// Raw attribution buffer, row-major in `shape` order.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributionOutput {
    pub shape: Vec<usize>,
    pub values: Vec<f64>,
}

/// Attribution engine bound to a fixed background sample.
pub struct KernelAttributor {
    /// Background rows, each `n_features` long.
    background: Vec<Vec<f32>>,
    n_features: usize,
    n_samples: usize,
    seed: u64,
    lambda: f64,
}

impl KernelAttributor {
    pub fn new(
        background: Vec<Vec<f32>>,
        n_samples: usize,
        seed: u64,
        lambda: f64,
    ) -> Result<Self> {
        let n_features = background
            .first()
            .map(|r| r.len())
            .ok_or_else(|| DtiError::Artifact("attribution background is empty".into()))?;
        if background.iter().any(|r| r.len() != n_features) {
            return Err(DtiError::Artifact(
                "attribution background rows have inconsistent lengths".into(),
            ));
        }
        if n_features < 2 {
            return Err(DtiError::Artifact(
                "attribution needs at least 2 features".into(),
            ));
        }
        Ok(Self {
            background,
            n_features,
            n_samples,
            seed,
            lambda,
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Per-feature attribution of `x` toward each class, relative to the
    /// background distribution. Emits a `(2, n_features)` buffer: row 0 is
    /// the negative class, row 1 the positive class.
    pub fn attribute(&self, clf: &MlpClassifier, x: &[f32]) -> Result<AttributionOutput> {
        let m = self.n_features;
        if x.len() != m {
            return Err(DtiError::ModelInputShape {
                expected: m,
                actual: x.len(),
            });
        }
        if clf.n_features() != m {
            return Err(DtiError::ModelInputShape {
                expected: m,
                actual: clf.n_features(),
            });
        }

        // The seed is fixed at load time, not re-randomized per call:
        // cache consistency requires two computations of the same key to
        // be bit-identical.
        let mut rng = StdRng::seed_from_u64(self.seed);
        let n_bg = self.background.len();

        // Base value: expected probability over the background alone.
        let mut bg_flat = Vec::with_capacity(n_bg * m);
        for row in &self.background {
            bg_flat.extend_from_slice(row);
        }
        let base = mean(&clf.predict_rows(&bg_flat, n_bg)?);

        // Coalition size distribution ∝ 1/(k(M-k)), k in 1..M.
        let size_weights: Vec<f64> = (1..m).map(|k| 1.0 / (k * (m - k)) as f64).collect();
        let total_w: f64 = size_weights.iter().sum();

        let mut masks: Vec<Vec<bool>> = Vec::with_capacity(self.n_samples);
        let mut game_values: Vec<f64> = Vec::with_capacity(self.n_samples);
        let mut indices: Vec<usize> = (0..m).collect();
        let mut batch = vec![0.0_f32; n_bg * m];

        for _ in 0..self.n_samples {
            let k = sample_size(&mut rng, &size_weights, total_w);
            indices.shuffle(&mut rng);
            let mut mask = vec![false; m];
            for &i in indices.iter().take(k) {
                mask[i] = true;
            }

            // Masked-out features take their value from each background
            // row; the game value is the mean model output.
            for (r, row) in self.background.iter().enumerate() {
                for i in 0..m {
                    batch[r * m + i] = if mask[i] { x[i] } else { row[i] };
                }
            }
            let probs = clf.predict_rows(&batch, n_bg)?;
            game_values.push(mean(&probs) - base);
            masks.push(mask);
        }

        // Dual ridge solve: phi = Z^T (Z Z^T + lambda I)^-1 y.
        let s = self.n_samples;
        let mut gram = vec![vec![0.0_f64; s]; s];
        for a in 0..s {
            for b in a..s {
                let dot = masks[a]
                    .iter()
                    .zip(&masks[b])
                    .filter(|(&x, &y)| x && y)
                    .count() as f64;
                gram[a][b] = dot;
                gram[b][a] = dot;
            }
            gram[a][a] += self.lambda;
        }
        let alpha = solve(gram, game_values)?;

        let mut phi = vec![0.0_f64; m];
        for (a, mask) in masks.iter().enumerate() {
            for i in 0..m {
                if mask[i] {
                    phi[i] += alpha[a];
                }
            }
        }

        debug!(
            n_features = m,
            n_samples = s,
            base,
            "attribution computed"
        );

        // Per-class rows: the negative class mirrors the positive one for
        // a binary sigmoid output.
        let mut values = Vec::with_capacity(2 * m);
        values.extend(phi.iter().map(|v| -v));
        values.extend(phi.iter().copied());
        Ok(AttributionOutput {
            shape: vec![2, m],
            values,
        })
    }
}

fn mean(v: &[f64]) -> f64 {
    if v.is_empty() {
        0.0
    } else {
        v.iter().sum::<f64>() / v.len() as f64
    }
}

fn sample_size(rng: &mut StdRng, weights: &[f64], total: f64) -> usize {
    let mut t = rng.gen::<f64>() * total;
    for (i, w) in weights.iter().enumerate() {
        t -= w;
        if t <= 0.0 {
            return i + 1;
        }
    }
    weights.len()
}

/// Gaussian elimination with partial pivoting. The system is ridge-
/// regularized so a singular matrix indicates a real defect upstream.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < 1e-12 {
            return Err(DtiError::Inference(
                "singular system in attribution solve".into(),
            ));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut acc = b[row];
        for k in (row + 1)..n {
            acc -= a[row][k] * x[k];
        }
        x[row] = acc / a[row][row];
    }
    Ok(x)
}
