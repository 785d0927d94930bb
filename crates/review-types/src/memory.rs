//! Registered topics stored in the catalog.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A topic registered in the catalog.
///
/// Immutable once written: the centroid is the raw cluster centroid from the
/// day the topic was first seen and is never re-estimated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Canonical label
    pub label: String,
    /// Cluster centroid at registration
    pub embedding: Vec<f32>,
    /// Date of the batch that introduced the topic
    pub first_seen: NaiveDate,
    /// First member text of the registering cluster, or empty
    #[serde(default)]
    pub exemplar: String,
}

impl MemoryEntry {
    pub fn new(
        label: impl Into<String>,
        embedding: Vec<f32>,
        first_seen: NaiveDate,
        exemplar: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            embedding,
            first_seen,
            exemplar: exemplar.into(),
        }
    }

    /// Dimension of the stored centroid.
    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}
