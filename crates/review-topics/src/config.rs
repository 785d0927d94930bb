//! Topic configuration.

use serde::{Deserialize, Serialize};

use crate::error::TopicsError;
use crate::normalizer::{default_rules, SemanticRule, SemanticNormalizer};

/// Master configuration for the topic lifecycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicsConfig {
    /// Clustering settings
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Catalog matching settings
    #[serde(default)]
    pub dedup: DedupConfig,

    /// Label rewrite rules
    #[serde(default)]
    pub normalizer: NormalizerConfig,
}

impl TopicsConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), TopicsError> {
        self.extraction.validate()?;
        self.dedup.validate()?;
        SemanticNormalizer::validate(&self.normalizer.rules)
    }
}

/// Topic extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Average-linkage distance at or above which clusters stay apart.
    /// Lower = more granular topics, higher = broader topics.
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            distance_threshold: default_distance_threshold(),
        }
    }
}

impl ExtractionConfig {
    pub fn validate(&self) -> Result<(), TopicsError> {
        if !(self.distance_threshold.is_finite() && self.distance_threshold > 0.0) {
            return Err(TopicsError::InvalidConfig(format!(
                "distance_threshold must be > 0, got {}",
                self.distance_threshold
            )));
        }
        Ok(())
    }
}

fn default_distance_threshold() -> f64 {
    0.5
}

/// Deduplication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Minimum cosine similarity for a candidate to take a catalog label
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

impl DedupConfig {
    pub fn validate(&self) -> Result<(), TopicsError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(TopicsError::InvalidConfig(format!(
                "similarity_threshold must be 0.0-1.0, got {}",
                self.similarity_threshold
            )));
        }
        Ok(())
    }
}

fn default_similarity_threshold() -> f32 {
    0.85
}

/// Normalizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Rules in priority order; the first rule that matches wins
    #[serde(default = "default_rules")]
    pub rules: Vec<SemanticRule>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}
