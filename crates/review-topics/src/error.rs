//! Topic error types.

use thiserror::Error;

/// Errors that can occur during topic operations.
#[derive(Debug, Error)]
pub enum TopicsError {
    /// Catalog file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Vectorizer failure
    #[error("Embedding error: {0}")]
    Embedding(#[from] review_embeddings::EmbeddingError),

    /// Clustering error
    #[error("Clustering error: {0}")]
    Clustering(String),

    /// Vectors of different dimension met in one comparison
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
