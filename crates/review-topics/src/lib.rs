//! # review-topics
//!
//! Topic memory lifecycle for daily review batches.
//!
//! A batch of texts is clustered into candidate topics, labels are
//! canonicalized by rule, candidates are reconciled against the persistent
//! catalog, and unmatched candidates are registered as new topics.
//!
//! ## Components
//! - [`TopicExtractor`]: average-linkage clustering under a distance threshold
//! - [`SemanticNormalizer`]: ordered trigger rules mapping labels to canonical ones
//! - [`Deduplicator`]: best-match cosine similarity against the catalog
//! - [`EvolutionRegister`]: append-only catalog growth
//! - [`CatalogStore`]: JSON snapshot of the catalog

pub mod catalog;
pub mod clustering;
pub mod config;
pub mod dedup;
pub mod error;
pub mod evolution;
pub mod extraction;
pub mod normalizer;
pub mod similarity;

pub use catalog::{CatalogStore, TopicMemory};
pub use clustering::agglomerative_average;
pub use config::{DedupConfig, ExtractionConfig, NormalizerConfig, TopicsConfig};
pub use dedup::{DedupOutcome, Deduplicator, MemoryMatch};
pub use error::TopicsError;
pub use evolution::EvolutionRegister;
pub use extraction::TopicExtractor;
pub use normalizer::{default_rules, SemanticNormalizer, SemanticRule};
pub use similarity::{calculate_centroid, cosine_similarity};
