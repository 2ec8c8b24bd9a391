//! Bounded response cache keyed by the trimmed (smiles, target) pair.
//!
//! Least-recently-used eviction with a fixed capacity, so a long-running
//! process with a diverse query stream cannot grow without bound. Only
//! successful responses are stored; errors are recomputed on retry.

use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

use dti_common::PredictionResponse;

pub const DEFAULT_CAPACITY: usize = 1024;

pub struct ResponseCache {
    inner: Mutex<LruCache<(String, String), PredictionResponse>>,
}

impl ResponseCache {
    /// A capacity of zero is clamped to one rather than rejected.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<(String, String), PredictionResponse>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Lookup, promoting the entry to most-recently-used on a hit.
    pub fn get(&self, smiles: &str, target: &str) -> Option<PredictionResponse> {
        self.lock()
            .get(&(smiles.to_string(), target.to_string()))
            .cloned()
    }

    pub fn insert(&self, smiles: &str, target: &str, response: PredictionResponse) {
        self.lock()
            .put((smiles.to_string(), target.to_string()), response);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(p: f64) -> PredictionResponse {
        PredictionResponse {
            probability: p,
            explanation: Vec::new(),
        }
    }

    #[test]
    fn hit_and_miss() {
        let cache = ResponseCache::new(4);
        assert!(cache.get("CCO", "P12345").is_none());
        cache.insert("CCO", "P12345", response(0.7));
        let hit = cache.get("CCO", "P12345").unwrap();
        assert_eq!(hit.probability, 0.7);
        assert!(cache.get("CCO", "Q99999").is_none());
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = ResponseCache::new(2);
        cache.insert("A", "T", response(0.1));
        cache.insert("B", "T", response(0.2));
        // Touch A so B becomes the eviction candidate.
        assert!(cache.get("A", "T").is_some());
        cache.insert("C", "T", response(0.3));
        assert!(cache.get("A", "T").is_some());
        assert!(cache.get("B", "T").is_none());
        assert!(cache.get("C", "T").is_some());
    }

    #[test]
    fn zero_capacity_clamped() {
        let cache = ResponseCache::new(0);
        cache.insert("A", "T", response(0.1));
        assert_eq!(cache.len(), 1);
    }
}
