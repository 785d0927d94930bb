//! Vectorizer configuration and construction.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cache::{ModelCache, DEFAULT_MODEL_REPO};
use crate::error::EmbeddingError;
use crate::hashing::{HashingVectorizer, DEFAULT_HASHING_DIM};
use crate::model::Vectorizer;

/// Which vectorizer to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorizerKind {
    /// Feature hashing, offline and deterministic (default)
    #[default]
    Hashing,
    /// all-MiniLM-L6-v2 via Candle; needs the `candle` feature
    Candle,
}

/// Embedding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    #[serde(default)]
    pub kind: VectorizerKind,

    /// Output dimension for the hashing vectorizer
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// HuggingFace repository for the Candle model
    #[serde(default = "default_model_repo")]
    pub model_repo: String,

    /// Model cache directory (defaults to the user cache dir)
    #[serde(default)]
    pub cache_dir: Option<String>,
}

fn default_dimension() -> usize {
    DEFAULT_HASHING_DIM
}

fn default_model_repo() -> String {
    DEFAULT_MODEL_REPO.to_string()
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            kind: VectorizerKind::default(),
            dimension: default_dimension(),
            model_repo: default_model_repo(),
            cache_dir: None,
        }
    }
}

impl EmbeddingsConfig {
    /// Model cache derived from `cache_dir` and `model_repo`.
    pub fn model_cache(&self) -> ModelCache {
        match &self.cache_dir {
            Some(dir) => ModelCache::new(dir, self.model_repo.clone()),
            None => ModelCache {
                repo_id: self.model_repo.clone(),
                ..ModelCache::default()
            },
        }
    }
}

/// Build the configured vectorizer.
pub fn load_vectorizer(config: &EmbeddingsConfig) -> Result<Arc<dyn Vectorizer>, EmbeddingError> {
    let vectorizer: Arc<dyn Vectorizer> = match config.kind {
        VectorizerKind::Hashing => Arc::new(HashingVectorizer::new(config.dimension)?),
        VectorizerKind::Candle => load_candle(config)?,
    };
    info!(
        name = %vectorizer.info().name,
        dim = vectorizer.info().dimension,
        "Vectorizer ready"
    );
    Ok(vectorizer)
}

#[cfg(feature = "candle")]
fn load_candle(config: &EmbeddingsConfig) -> Result<Arc<dyn Vectorizer>, EmbeddingError> {
    let vectorizer = crate::candle::CandleVectorizer::load(&config.model_cache())?;
    Ok(Arc::new(vectorizer))
}

#[cfg(not(feature = "candle"))]
fn load_candle(_config: &EmbeddingsConfig) -> Result<Arc<dyn Vectorizer>, EmbeddingError> {
    Err(EmbeddingError::Unavailable("candle".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EmbeddingsConfig::default();
        assert_eq!(config.kind, VectorizerKind::Hashing);
        assert_eq!(config.dimension, DEFAULT_HASHING_DIM);
        assert_eq!(config.model_repo, DEFAULT_MODEL_REPO);
    }

    #[test]
    fn test_kind_deserializes_snake_case() {
        let config: EmbeddingsConfig = serde_json::from_str(r#"{"kind":"candle"}"#).unwrap();
        assert_eq!(config.kind, VectorizerKind::Candle);
        assert_eq!(config.dimension, DEFAULT_HASHING_DIM);
    }

    #[test]
    fn test_load_hashing() {
        let config = EmbeddingsConfig {
            dimension: 32,
            ..Default::default()
        };
        let v = load_vectorizer(&config).unwrap();
        assert_eq!(v.info().dimension, 32);
    }

    #[test]
    fn test_model_cache_respects_cache_dir() {
        let config = EmbeddingsConfig {
            cache_dir: Some("/tmp/review-models".to_string()),
            ..Default::default()
        };
        let cache = config.model_cache();
        assert_eq!(cache.cache_dir, std::path::PathBuf::from("/tmp/review-models"));
    }

    #[cfg(not(feature = "candle"))]
    #[test]
    fn test_candle_unavailable_without_feature() {
        let config = EmbeddingsConfig {
            kind: VectorizerKind::Candle,
            ..Default::default()
        };
        assert!(matches!(
            load_vectorizer(&config),
            Err(EmbeddingError::Unavailable(_))
        ));
    }
}
