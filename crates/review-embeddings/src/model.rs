//! Vectorizer trait and embedding types.

use crate::error::EmbeddingError;

/// A text embedding, normalized to unit length on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub values: Vec<f32>,
}

impl Embedding {
    /// Create an embedding, scaling the vector to unit length.
    /// The zero vector is kept as is.
    pub fn new(values: Vec<f32>) -> Self {
        let norm: f32 = values.iter().map(|x| x * x).sum::<f32>().sqrt();
        let values = if norm > 0.0 {
            values.iter().map(|x| x / norm).collect()
        } else {
            values
        };
        Self { values }
    }

    /// Wrap a vector that is already normalized.
    pub fn from_normalized(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// Dot product, which equals cosine similarity for unit vectors.
    /// Returns 0.0 when dimensions differ.
    pub fn cosine_similarity(&self, other: &Embedding) -> f32 {
        if self.values.len() != other.values.len() {
            return 0.0;
        }
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.values
    }
}

/// Vectorizer metadata.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// Model name (e.g., "all-MiniLM-L6-v2")
    pub name: String,
    /// Output dimension
    pub dimension: usize,
}

/// Maps texts to fixed-dimension vectors.
///
/// Implementations must be deterministic for a fixed model and return one
/// embedding per input text, all of dimension `info().dimension`.
pub trait Vectorizer: Send + Sync {
    fn info(&self) -> &ModelInfo;

    /// Embed a batch of texts.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError>;

    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        self.embed_batch(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InvalidInput("vectorizer returned no output".into()))
    }

    /// Embed owned strings.
    fn embed_texts(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        let refs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();
        self.embed_batch(&refs)
    }
}
