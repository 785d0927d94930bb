//! Candidate topics produced from a single day's batch.

use serde::{Deserialize, Serialize};

/// A topic discovered in one batch, before reconciliation with the catalog.
///
/// Created by the extractor with `is_new = None`. The normalizer may rewrite
/// `label`; the deduplicator rewrites `label` on a match and decides
/// `is_new`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateTopic {
    /// Current label (exemplar text until normalized or matched)
    pub label: String,
    /// Number of texts in the cluster
    pub member_count: usize,
    /// Member texts in batch order
    pub member_texts: Vec<String>,
    /// Mean of the normalized member vectors
    pub centroid: Vec<f32>,
    /// Whether the topic is absent from the catalog; `None` until decided
    #[serde(default)]
    pub is_new: Option<bool>,
}

impl CandidateTopic {
    /// Create a candidate from its member texts. `member_count` follows the
    /// number of texts.
    pub fn new(label: impl Into<String>, member_texts: Vec<String>, centroid: Vec<f32>) -> Self {
        Self {
            label: label.into(),
            member_count: member_texts.len(),
            member_texts,
            centroid,
            is_new: None,
        }
    }

    /// First member text, used as the catalog exemplar.
    pub fn first_member(&self) -> Option<&str> {
        self.member_texts.first().map(String::as_str)
    }

    /// Project to the (label, count) pair recorded in the trend table.
    pub fn topic_count(&self) -> TopicCount {
        TopicCount::new(self.label.clone(), self.member_count as u64)
    }

    /// Dimension of the centroid vector.
    pub fn dimension(&self) -> usize {
        self.centroid.len()
    }
}

/// A labelled count, one trend row before it is dated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCount {
    pub label: String,
    pub count: u64,
}

impl TopicCount {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

impl From<&CandidateTopic> for TopicCount {
    fn from(topic: &CandidateTopic) -> Self {
        topic.topic_count()
    }
}
