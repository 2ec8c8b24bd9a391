//! The prediction service: artifact loading plus the per-query pipeline.
//!
//! All artifacts load once at startup and stay immutable; the service is
//! shared behind an `Arc` and every query runs encode → predict →
//! attribute → normalize → rank → resolve. Results are memoized per
//! trimmed (smiles, target) pair; errors are never cached.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use dti_chem::{Fingerprinter, Molecule};
use dti_common::{DtiError, PredictionQuery, PredictionResponse, Result, TargetInfo};
use dti_model::{normalize_attribution, KernelAttributor, MlpClassifier, ModelManifest};

use crate::bits::BitExplanationTable;
use crate::cache::ResponseCache;
use crate::features;
use crate::registry::TargetRegistry;
use crate::resolver;
use crate::vocab::MotifVocabulary;

/// Classifier + attributor, bundled so the blocking attribution task can
/// hold them past the request borrow.
struct InferenceCore {
    classifier: MlpClassifier,
    attributor: KernelAttributor,
}

pub struct PredictionService {
    manifest: ModelManifest,
    fingerprinter: Fingerprinter,
    core: Arc<InferenceCore>,
    vocab: MotifVocabulary,
    bits: BitExplanationTable,
    registry: TargetRegistry,
    cache: ResponseCache,
    computed: AtomicU64,
}

impl PredictionService {
    /// Load every artifact from `dir`. Any missing or inconsistent
    /// artifact is fatal here rather than at query time.
    pub fn load(dir: &Path, cache_capacity: usize) -> Result<Self> {
        let manifest = ModelManifest::load(&dir.join("manifest.json"))?;
        let vocab = MotifVocabulary::load(&dir.join("vocab.json"))?;
        let n_features = manifest.fp_bits + vocab.len();

        let classifier = MlpClassifier::load(
            &dir.join("model.safetensors"),
            n_features,
            &manifest.hidden,
        )?;
        let bits = BitExplanationTable::load(&dir.join("bit_explanations.json"), manifest.fp_bits)?;
        let registry = TargetRegistry::load_fasta(&dir.join("protein.fasta"))?;

        let raw = std::fs::read_to_string(dir.join("background.json"))?;
        let background: Vec<Vec<f32>> = serde_json::from_str(&raw)?;
        let attributor = KernelAttributor::new(
            background,
            manifest.attribution_samples,
            manifest.seed,
            manifest.ridge_lambda,
        )?;
        if attributor.n_features() != n_features {
            return Err(DtiError::Artifact(format!(
                "attribution background has {} features, model expects {n_features}",
                attributor.n_features()
            )));
        }

        info!(
            fp_bits = manifest.fp_bits,
            motifs = vocab.len(),
            targets = registry.len(),
            cache_capacity,
            "prediction service ready"
        );
        Ok(Self {
            fingerprinter: Fingerprinter::new(manifest.fp_bits),
            manifest,
            core: Arc::new(InferenceCore {
                classifier,
                attributor,
            }),
            vocab,
            bits,
            registry,
            cache: ResponseCache::new(cache_capacity),
            computed: AtomicU64::new(0),
        })
    }

    /// Assemble a service from already-built parts. Test seam; `load` is
    /// the production path.
    pub fn from_parts(
        manifest: ModelManifest,
        classifier: MlpClassifier,
        attributor: KernelAttributor,
        vocab: MotifVocabulary,
        bits: BitExplanationTable,
        registry: TargetRegistry,
        cache_capacity: usize,
    ) -> Self {
        Self {
            fingerprinter: Fingerprinter::new(manifest.fp_bits),
            manifest,
            core: Arc::new(InferenceCore {
                classifier,
                attributor,
            }),
            vocab,
            bits,
            registry,
            cache: ResponseCache::new(cache_capacity),
            computed: AtomicU64::new(0),
        }
    }

    /// Number of queries that went through the full pipeline (cache
    /// misses). Exposed so memoization is observable.
    pub fn computed_count(&self) -> u64 {
        self.computed.load(Ordering::Relaxed)
    }

    pub fn targets(&self) -> Vec<String> {
        self.registry.ids()
    }

    pub fn target_info(&self) -> Vec<TargetInfo> {
        self.registry.infos()
    }

    /// Run one query end to end, returning the memoized response when the
    /// trimmed (smiles, target) pair was seen before.
    pub async fn handle_query(&self, query: &PredictionQuery) -> Result<PredictionResponse> {
        let smiles = query.smiles.trim();
        let target = query.target.trim();

        if let Some(hit) = self.cache.get(smiles, target) {
            debug!(smiles, target, "cache hit");
            return Ok(hit);
        }

        let sequence = self.registry.sequence(target)?;
        let molecule = Molecule::from_smiles(smiles)?;

        let fp = self.fingerprinter.encode(&molecule);
        let counts = self.vocab.encode(sequence);
        let x = features::combine(&fp, &counts);

        let probability = self.core.classifier.predict_probability(&x)?;

        let n_features = self.manifest.fp_bits + self.vocab.len();
        let attribution = {
            let core = Arc::clone(&self.core);
            let row = x;
            tokio::task::spawn_blocking(move || {
                let raw = core.attributor.attribute(&core.classifier, &row)?;
                normalize_attribution(&raw, n_features)
            })
            .await
            .map_err(|e| DtiError::Inference(format!("attribution task failed: {e}")))??
        };

        let explanation = resolver::resolve_explanations(
            &attribution,
            self.manifest.fp_bits,
            &self.bits,
            &self.vocab,
            &molecule,
        );

        let response = PredictionResponse {
            probability,
            explanation,
        };
        self.computed.fetch_add(1, Ordering::Relaxed);
        self.cache.insert(smiles, target, response.clone());
        debug!(smiles, target, probability, "query computed");
        Ok(response)
    }
}
