//! Trained binary classifier: dense MLP with ReLU hidden layers and a
//! sigmoid output, loaded once from safetensors at startup.

use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use tracing::info;

use dti_common::{DtiError, Result};

fn inference(e: candle_core::Error) -> DtiError {
    DtiError::Inference(e.to_string())
}

fn sigmoid(t: &Tensor) -> candle_core::Result<Tensor> {
    ((t.neg()?.exp()? + 1.0)?).recip()
}

/// MLP wrapper. Weights are immutable after load; forward passes are
/// deterministic, so repeated calls on the same vector agree exactly.
pub struct MlpClassifier {
    layers: Vec<Linear>,
    n_features: usize,
    device: Device,
}

impl MlpClassifier {
    /// Load weights from a safetensors file written by the training stage.
    ///
    /// Expects tensors named `layers.<i>.weight` of shape `(out, in)` and
    /// `layers.<i>.bias` of shape `(out,)`, with hidden widths from the
    /// manifest and a single-unit output layer.
    pub fn load(path: &Path, n_features: usize, hidden: &[usize]) -> Result<Self> {
        let device = Device::Cpu;
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[path.to_path_buf()], DType::F32, &device)
                .map_err(|e| DtiError::Artifact(format!("model load: {e}")))?
        };

        let mut dims = Vec::with_capacity(hidden.len() + 1);
        let mut in_dim = n_features;
        for &h in hidden {
            dims.push((in_dim, h));
            in_dim = h;
        }
        dims.push((in_dim, 1));

        let mut layers = Vec::with_capacity(dims.len());
        for (i, &(d_in, d_out)) in dims.iter().enumerate() {
            let prefix = vb.pp(format!("layers.{i}"));
            let weight = prefix
                .get((d_out, d_in), "weight")
                .map_err(|e| DtiError::Artifact(format!("layers.{i}.weight: {e}")))?;
            let bias = prefix
                .get(d_out, "bias")
                .map_err(|e| DtiError::Artifact(format!("layers.{i}.bias: {e}")))?;
            layers.push(Linear::new(weight, Some(bias)));
        }

        info!(n_features, n_layers = layers.len(), "classifier loaded");
        Ok(Self {
            layers,
            n_features,
            device,
        })
    }

    /// Build directly from layers (tests and tooling).
    pub fn from_layers(layers: Vec<Linear>, n_features: usize) -> Self {
        Self {
            layers,
            n_features,
            device: Device::Cpu,
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Positive-class probability for one combined feature vector.
    pub fn predict_probability(&self, vector: &[f32]) -> Result<f64> {
        if vector.len() != self.n_features {
            return Err(DtiError::ModelInputShape {
                expected: self.n_features,
                actual: vector.len(),
            });
        }
        let x = Tensor::from_slice(vector, (1, self.n_features), &self.device)
            .map_err(inference)?;
        let probs = self.forward(&x)?;
        Ok(probs[0])
    }

    /// Positive-class probabilities for a batch of row vectors laid out
    /// contiguously (`rows.len() == n_rows * n_features`).
    pub fn predict_rows(&self, rows: &[f32], n_rows: usize) -> Result<Vec<f64>> {
        if rows.len() != n_rows * self.n_features {
            return Err(DtiError::ModelInputShape {
                expected: n_rows * self.n_features,
                actual: rows.len(),
            });
        }
        if n_rows == 0 {
            return Ok(Vec::new());
        }
        let x = Tensor::from_slice(rows, (n_rows, self.n_features), &self.device)
            .map_err(inference)?;
        self.forward(&x)
    }

    fn forward(&self, x: &Tensor) -> Result<Vec<f64>> {
        let mut h = x.clone();
        let last = self.layers.len() - 1;
        for (i, layer) in self.layers.iter().enumerate() {
            h = layer.forward(&h).map_err(inference)?;
            if i < last {
                h = h.relu().map_err(inference)?;
            }
        }
        let p = sigmoid(&h).map_err(inference)?;
        let flat: Vec<f32> = p
            .flatten_all()
            .and_then(|t| t.to_vec1())
            .map_err(inference)?;
        Ok(flat.into_iter().map(|v| v as f64).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Single linear layer: logistic regression on 3 features.
    fn linear_clf(w: &[f32], b: f32) -> MlpClassifier {
        let n = w.len();
        let weight = Tensor::from_slice(w, (1, n), &Device::Cpu).unwrap();
        let bias = Tensor::from_slice(&[b], 1, &Device::Cpu).unwrap();
        MlpClassifier::from_layers(vec![Linear::new(weight, Some(bias))], n)
    }

    #[test]
    fn probability_in_unit_interval() {
        let clf = linear_clf(&[1.0, -2.0, 0.5], 0.1);
        let p = clf.predict_probability(&[1.0, 1.0, 1.0]).unwrap();
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn zero_logit_is_half() {
        let clf = linear_clf(&[0.0, 0.0], 0.0);
        let p = clf.predict_probability(&[5.0, -3.0]).unwrap();
        assert!((p - 0.5).abs() < 1e-6);
    }

    #[test]
    fn deterministic() {
        let clf = linear_clf(&[0.3, 0.7, -0.1], -0.2);
        let x = [0.5, 1.5, 2.0];
        assert_eq!(
            clf.predict_probability(&x).unwrap(),
            clf.predict_probability(&x).unwrap()
        );
    }

    #[test]
    fn wrong_length_rejected() {
        let clf = linear_clf(&[1.0, 1.0], 0.0);
        let err = clf.predict_probability(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            DtiError::ModelInputShape {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn batch_matches_single() {
        let clf = linear_clf(&[0.4, -0.9], 0.05);
        let rows = [1.0_f32, 2.0, -1.0, 0.5];
        let batch = clf.predict_rows(&rows, 2).unwrap();
        let a = clf.predict_probability(&rows[0..2]).unwrap();
        let b = clf.predict_probability(&rows[2..4]).unwrap();
        assert!((batch[0] - a).abs() < 1e-6);
        assert!((batch[1] - b).abs() < 1e-6);
    }

    #[test]
    fn hidden_layer_forward() {
        // 2 -> 2 -> 1 with hand-set weights; just has to run and bound.
        let w1 = Tensor::from_slice(&[1.0_f32, 0.0, 0.0, 1.0], (2, 2), &Device::Cpu).unwrap();
        let b1 = Tensor::from_slice(&[0.0_f32, 0.0], 2, &Device::Cpu).unwrap();
        let w2 = Tensor::from_slice(&[1.0_f32, -1.0], (1, 2), &Device::Cpu).unwrap();
        let b2 = Tensor::from_slice(&[0.0_f32], 1, &Device::Cpu).unwrap();
        let clf = MlpClassifier::from_layers(
            vec![Linear::new(w1, Some(b1)), Linear::new(w2, Some(b2))],
            2,
        );
        let p = clf.predict_probability(&[2.0, 1.0]).unwrap();
        // relu passes both through; logit = 2 - 1 = 1.
        let expected = 1.0 / (1.0 + (-1.0_f64).exp());
        assert!((p - expected).abs() < 1e-5);
    }
}
