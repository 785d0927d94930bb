//! # review-embeddings
//!
//! Text vectorizers for review topic clustering.
//!
//! The topic extractor only depends on the [`Vectorizer`] trait; this crate
//! ships two implementations:
//! - [`HashingVectorizer`]: deterministic feature hashing over a small review
//!   concept lexicon, no model files
//! - `CandleVectorizer` (feature `candle`): local all-MiniLM-L6-v2 inference
//!   with 384-dimensional sentence embeddings
//!
//! Use [`load_vectorizer`] to build whichever one the configuration names.

pub mod cache;
#[cfg(feature = "candle")]
pub mod candle;
pub mod config;
pub mod error;
pub mod hashing;
pub mod model;

pub use cache::{
    get_or_download_model, ModelCache, ModelPaths, ModelSource, DEFAULT_MODEL_REPO, MODEL_FILES,
};
#[cfg(feature = "candle")]
pub use crate::candle::CandleVectorizer;
pub use config::{load_vectorizer, EmbeddingsConfig, VectorizerKind};
pub use error::EmbeddingError;
pub use hashing::HashingVectorizer;
pub use model::{Embedding, ModelInfo, Vectorizer};
