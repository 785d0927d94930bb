//! Model file caching.
//!
//! Sentence-transformer weights are fetched once from HuggingFace Hub and
//! kept under the user cache directory.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::EmbeddingError;

/// Default model repository on HuggingFace
pub const DEFAULT_MODEL_REPO: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Files a BERT sentence model needs
pub const MODEL_FILES: &[&str] = &["config.json", "tokenizer.json", "model.safetensors"];

/// Where model files live on disk.
#[derive(Debug, Clone)]
pub struct ModelCache {
    pub cache_dir: PathBuf,
    pub repo_id: String,
}

impl Default for ModelCache {
    fn default() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("review-trends")
            .join("models");

        Self {
            cache_dir,
            repo_id: DEFAULT_MODEL_REPO.to_string(),
        }
    }
}

impl ModelCache {
    pub fn new(cache_dir: impl Into<PathBuf>, repo_id: impl Into<String>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            repo_id: repo_id.into(),
        }
    }

    /// Directory holding this repo's files; `/` in the repo id is flattened.
    pub fn model_dir(&self) -> PathBuf {
        self.cache_dir.join(self.repo_id.replace('/', "_"))
    }

    pub fn is_cached(&self) -> bool {
        let model_dir = self.model_dir();
        MODEL_FILES.iter().all(|f| model_dir.join(f).exists())
    }

    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.model_dir().join(filename)
    }

    pub fn paths(&self) -> ModelPaths {
        ModelPaths {
            config: self.file_path("config.json"),
            tokenizer: self.file_path("tokenizer.json"),
            weights: self.file_path("model.safetensors"),
        }
    }
}

/// Paths to the three model files.
#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: PathBuf,
}

/// Somewhere model files can be fetched from.
pub trait ModelSource {
    /// Fetch `filename` from `repo_id` and return a local path to it.
    fn fetch(&self, repo_id: &str, filename: &str) -> Result<PathBuf, EmbeddingError>;
}

/// HuggingFace Hub, through hf-hub's blocking client.
#[cfg(feature = "candle")]
pub struct HubSource {
    api: hf_hub::api::sync::Api,
}

#[cfg(feature = "candle")]
impl HubSource {
    pub fn new() -> Result<Self, EmbeddingError> {
        let api = hf_hub::api::sync::Api::new().map_err(|e| EmbeddingError::Download(e.to_string()))?;
        Ok(Self { api })
    }
}

#[cfg(feature = "candle")]
impl ModelSource for HubSource {
    fn fetch(&self, repo_id: &str, filename: &str) -> Result<PathBuf, EmbeddingError> {
        self.api
            .model(repo_id.to_string())
            .get(filename)
            .map_err(|e| EmbeddingError::Download(format!("{}: {}", filename, e)))
    }
}

/// Return the cached model paths, fetching only the files that are
/// missing from the cache.
pub fn get_or_download_model(
    cache: &ModelCache,
    source: &dyn ModelSource,
) -> Result<ModelPaths, EmbeddingError> {
    if cache.is_cached() {
        debug!(path = ?cache.model_dir(), "Using cached model");
        return Ok(cache.paths());
    }

    info!(repo = %cache.repo_id, "Downloading model files...");
    std::fs::create_dir_all(cache.model_dir())?;

    for filename in MODEL_FILES {
        let dest = cache.file_path(filename);
        if dest.exists() {
            continue;
        }
        let fetched = source.fetch(&cache.repo_id, filename)?;
        std::fs::copy(&fetched, &dest)?;
        debug!(file = filename, dest = ?dest, "Downloaded");
    }

    Ok(cache.paths())
}
