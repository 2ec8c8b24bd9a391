//! Service configuration: TOML file with environment overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use dti_common::{DtiError, Result};

use crate::cache;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Directory holding the trained artifacts (model, manifest, vocab,
    /// bit-explanation table, target FASTA, attribution background).
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: PathBuf,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Maximum number of memoized responses held at once.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("artifacts")
}
fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}
fn default_cache_capacity() -> usize {
    cache::DEFAULT_CAPACITY
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: default_artifacts_dir(),
            bind_addr: default_bind_addr(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from dti.toml.
    /// Checks DTI_CONFIG env var first, then the current directory; a
    /// missing file means defaults. Individual env vars override fields
    /// afterwards: DTI_ARTIFACTS_DIR, DTI_BIND_ADDR, DTI_CACHE_CAPACITY.
    pub fn load() -> Result<Self> {
        let path = std::env::var("DTI_CONFIG").unwrap_or_else(|_| "dti.toml".to_string());
        let mut config = if Path::new(&path).exists() {
            let content = std::fs::read_to_string(&path)?;
            info!(%path, "configuration file loaded");
            toml::from_str(&content)
                .map_err(|e| DtiError::Artifact(format!("bad config {path}: {e}")))?
        } else {
            Self::default()
        };
        config.apply_env()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(dir) = std::env::var("DTI_ARTIFACTS_DIR") {
            self.artifacts_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var("DTI_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Ok(cap) = std::env::var("DTI_CACHE_CAPACITY") {
            self.cache_capacity = cap
                .parse()
                .map_err(|_| DtiError::Artifact(format!("bad DTI_CACHE_CAPACITY '{cap}'")))?;
        }
        Ok(())
    }
}
