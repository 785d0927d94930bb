//! all-MiniLM-L6-v2 sentence embeddings through Candle.
//!
//! Token embeddings are mean-pooled over the attention mask, which is how
//! sentence-transformers produces its sentence vectors for this model.

use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::{Encoding, Tokenizer};
use tracing::{debug, info};

use crate::cache::{get_or_download_model, HubSource, ModelCache};
use crate::error::EmbeddingError;
use crate::model::{Embedding, ModelInfo, Vectorizer};

/// Output dimension of all-MiniLM-L6-v2
pub const MINILM_DIM: usize = 384;

/// Token limit per text; longer reviews are truncated
pub const MAX_SEQ_LENGTH: usize = 256;

/// CPU sentence vectorizer.
pub struct CandleVectorizer {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    info: ModelInfo,
}

impl CandleVectorizer {
    /// Load from the cache, downloading on first use.
    pub fn load(cache: &ModelCache) -> Result<Self, EmbeddingError> {
        let paths = get_or_download_model(cache, &HubSource::new()?)?;
        Self::load_from_paths(&paths.config, &paths.tokenizer, &paths.weights)
    }

    pub fn load_from_paths(
        config_path: &Path,
        tokenizer_path: &Path,
        weights_path: &Path,
    ) -> Result<Self, EmbeddingError> {
        info!(weights = ?weights_path, "Loading sentence model");
        let device = Device::Cpu;

        let config_str = std::fs::read_to_string(config_path)?;
        let config: BertConfig = serde_json::from_str(&config_str)
            .map_err(|e| EmbeddingError::ModelNotFound(format!("Invalid config: {}", e)))?;

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;

        // SAFETY: the weights file is owned by the model cache and not
        // modified while mapped.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path.to_path_buf()], DType::F32, &device)?
        };
        let model = BertModel::load(vb, &config)?;

        Ok(Self {
            model,
            tokenizer,
            device,
            info: ModelInfo {
                name: "all-MiniLM-L6-v2".to_string(),
                dimension: MINILM_DIM,
            },
        })
    }

    /// Pad or truncate every encoding to the longest one (capped at
    /// `MAX_SEQ_LENGTH`) and build id and mask tensors.
    fn batch_tensors(&self, encodings: &[Encoding]) -> Result<(Tensor, Tensor), EmbeddingError> {
        let seq_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0)
            .min(MAX_SEQ_LENGTH);

        let mut ids = Vec::with_capacity(encodings.len() * seq_len);
        let mut mask = Vec::with_capacity(encodings.len() * seq_len);
        for encoding in encodings {
            let take = encoding.get_ids().len().min(seq_len);
            ids.extend_from_slice(&encoding.get_ids()[..take]);
            mask.extend_from_slice(&encoding.get_attention_mask()[..take]);
            ids.resize(ids.len() + seq_len - take, 0);
            mask.resize(mask.len() + seq_len - take, 0);
        }

        let shape = (encodings.len(), seq_len);
        Ok((
            Tensor::from_vec(ids, shape, &self.device)?,
            Tensor::from_vec(mask, shape, &self.device)?,
        ))
    }
}

/// Average token vectors, ignoring padding positions.
fn mean_pool(tokens: &Tensor, attention_mask: &Tensor) -> Result<Tensor, EmbeddingError> {
    let mask = attention_mask
        .unsqueeze(2)?
        .broadcast_as(tokens.shape())?
        .to_dtype(DType::F32)?;
    let summed = tokens.broadcast_mul(&mask)?.sum(1)?;
    let counts = mask.sum(1)?.clamp(1e-9, f64::MAX)?;
    Ok(summed.broadcast_div(&counts)?)
}

impl Vectorizer for CandleVectorizer {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;
        let (input_ids, attention_mask) = self.batch_tensors(&encodings)?;
        let token_type_ids = input_ids.zeros_like()?;

        let output = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled: Vec<Vec<f32>> = mean_pool(&output, &attention_mask)?.to_vec2()?;

        debug!(count = pooled.len(), dim = MINILM_DIM, "Embedded batch");
        Ok(pooled.into_iter().map(Embedding::new).collect())
    }
}
