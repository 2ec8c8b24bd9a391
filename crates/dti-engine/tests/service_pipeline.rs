//! End-to-end pipeline tests against a tiny hand-built model.

use std::collections::HashMap;
use std::sync::Arc;

use candle_core::{Device, Tensor};
use candle_nn::Linear;

use dti_common::{DtiError, ExplanationEntry, PredictionQuery};
use dti_engine::bits::BitExplanationTable;
use dti_engine::registry::TargetRegistry;
use dti_engine::service::PredictionService;
use dti_engine::vocab::MotifVocabulary;
use dti_model::{KernelAttributor, MlpClassifier, ModelManifest};

const FP_BITS: usize = 8;
const MOTIFS: usize = 3;
const N_FEATURES: usize = FP_BITS + MOTIFS;

const FASTA: &str = "\
>sp|P12345|KIN_HUMAN Tyrosine kinase receptor
MKTAAAMKTAA
>sp|Q99999|ORP_HUMAN
GAVLIMGAVLIM
";

fn manifest() -> ModelManifest {
    ModelManifest {
        fp_bits: FP_BITS,
        hidden: vec![],
        seed: 42,
        attribution_samples: 64,
        ridge_lambda: 1e-3,
    }
}

fn classifier() -> MlpClassifier {
    // Logistic regression over the 11 combined features.
    let w: Vec<f32> = (0..N_FEATURES).map(|i| 0.1 * (i as f32) - 0.4).collect();
    let weight = Tensor::from_slice(&w, (1, N_FEATURES), &Device::Cpu).unwrap();
    let bias = Tensor::from_slice(&[0.05_f32], 1, &Device::Cpu).unwrap();
    MlpClassifier::from_layers(vec![Linear::new(weight, Some(bias))], N_FEATURES)
}

fn build_service() -> Arc<PredictionService> {
    let vocab = MotifVocabulary::new(vec![
        "MKT".to_string(),
        "KTA".to_string(),
        "AAA".to_string(),
    ])
    .unwrap();
    let background = vec![vec![0.0_f32; N_FEATURES], vec![1.0_f32; N_FEATURES]];
    let attributor = KernelAttributor::new(background, 64, 42, 1e-3).unwrap();
    let mut patterns = HashMap::new();
    for bit in 0..FP_BITS {
        patterns.insert(bit, "CCO".to_string());
    }
    let bits = BitExplanationTable::from_map(patterns);
    let registry = TargetRegistry::parse_fasta(FASTA).unwrap();
    Arc::new(PredictionService::from_parts(
        manifest(),
        classifier(),
        attributor,
        vocab,
        bits,
        registry,
        8,
    ))
}

fn query(smiles: &str, target: &str) -> PredictionQuery {
    PredictionQuery {
        smiles: smiles.to_string(),
        target: target.to_string(),
    }
}

#[tokio::test]
async fn predicts_and_explains_known_pair() {
    let service = build_service();
    let response = service
        .handle_query(&query("CC(=O)Oc1ccccc1C(=O)O", "P12345"))
        .await
        .unwrap();

    assert!((0.0..=1.0).contains(&response.probability));
    assert_eq!(response.explanation.len(), 10);
    for entry in &response.explanation {
        assert!(entry.impact().is_finite());
    }
    // 8 chemical + 3 protein features, top 10 must include both kinds.
    assert!(response
        .explanation
        .iter()
        .any(|e| matches!(e, ExplanationEntry::Chemical { .. })));
    assert!(response
        .explanation
        .iter()
        .any(|e| matches!(e, ExplanationEntry::Protein { .. })));
}

#[tokio::test]
async fn unknown_target_rejected() {
    let service = build_service();
    let err = service
        .handle_query(&query("CCO", "ZZZZZZ"))
        .await
        .unwrap_err();
    assert!(matches!(err, DtiError::UnknownTarget(id) if id == "ZZZZZZ"));
}

#[tokio::test]
async fn malformed_descriptor_rejected_and_not_cached() {
    let service = build_service();
    let err = service
        .handle_query(&query("not_a_molecule", "P12345"))
        .await
        .unwrap_err();
    assert!(matches!(err, DtiError::InvalidInput(_)));
    assert_eq!(service.computed_count(), 0);
}

#[tokio::test]
async fn memoizes_on_trimmed_key() {
    let service = build_service();
    let first = service.handle_query(&query("CCO", "P12345")).await.unwrap();
    let second = service
        .handle_query(&query("  CCO  ", " P12345 "))
        .await
        .unwrap();

    assert_eq!(service.computed_count(), 1);
    assert_eq!(first.probability, second.probability);
    assert_eq!(first.explanation.len(), second.explanation.len());
}

#[tokio::test]
async fn identical_services_agree_exactly() {
    let a = build_service();
    let b = build_service();
    let q = query("c1ccccc1O", "Q99999");
    let ra = a.handle_query(&q).await.unwrap();
    let rb = b.handle_query(&q).await.unwrap();

    assert_eq!(ra.probability, rb.probability);
    let impacts_a: Vec<f64> = ra.explanation.iter().map(|e| e.impact()).collect();
    let impacts_b: Vec<f64> = rb.explanation.iter().map(|e| e.impact()).collect();
    assert_eq!(impacts_a, impacts_b);
}

#[tokio::test]
async fn loads_artifacts_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path();

    std::fs::write(
        path.join("manifest.json"),
        format!(
            r#"{{"fp_bits": {FP_BITS}, "hidden": [], "seed": 42, "attribution_samples": 64, "ridge_lambda": 0.001}}"#
        ),
    )
    .unwrap();
    std::fs::write(path.join("vocab.json"), r#"["MKT", "KTA", "AAA"]"#).unwrap();
    std::fs::write(path.join("bit_explanations.json"), r#"{"0": "CCO"}"#).unwrap();
    std::fs::write(path.join("protein.fasta"), FASTA).unwrap();

    let background: Vec<Vec<f32>> = vec![vec![0.0; N_FEATURES], vec![1.0; N_FEATURES]];
    std::fs::write(
        path.join("background.json"),
        serde_json::to_string(&background).unwrap(),
    )
    .unwrap();

    let w: Vec<f32> = (0..N_FEATURES).map(|i| 0.1 * (i as f32) - 0.4).collect();
    let mut tensors = HashMap::new();
    tensors.insert(
        "layers.0.weight".to_string(),
        Tensor::from_slice(&w, (1, N_FEATURES), &Device::Cpu).unwrap(),
    );
    tensors.insert(
        "layers.0.bias".to_string(),
        Tensor::from_slice(&[0.05_f32], 1, &Device::Cpu).unwrap(),
    );
    candle_core::safetensors::save(&tensors, path.join("model.safetensors")).unwrap();

    let service = Arc::new(PredictionService::load(path, 8).unwrap());
    let response = service.handle_query(&query("CCO", "P12345")).await.unwrap();
    assert!((0.0..=1.0).contains(&response.probability));
    assert_eq!(response.explanation.len(), 10);
}
