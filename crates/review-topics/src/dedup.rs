//! Reconciles candidate topics against the catalog.
//!
//! Each candidate is compared with every catalog entry by cosine similarity
//! of centroids. The single best entry wins (ties go to the earliest entry);
//! if its similarity reaches the threshold the candidate takes the entry's
//! canonical label, otherwise the candidate is new. This is a full scan:
//! cost grows with candidates × catalog size.

use tracing::{debug, info, instrument};

use review_types::CandidateTopic;

use crate::catalog::TopicMemory;
use crate::config::DedupConfig;
use crate::error::TopicsError;
use crate::similarity::cosine_similarity;

/// Best catalog entry for a centroid.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryMatch {
    /// Position in the catalog
    pub index: usize,
    /// Canonical label of the entry
    pub label: String,
    pub similarity: f32,
}

/// Candidates split by whether the catalog already knows them.
#[derive(Debug, Clone, Default)]
pub struct DedupOutcome {
    /// Candidates relabelled with a catalog label
    pub matched: Vec<CandidateTopic>,
    /// Candidates with no entry at or above the threshold
    pub new: Vec<CandidateTopic>,
}

/// Similarity-threshold deduplicator. Read-only against the catalog.
#[derive(Debug, Clone)]
pub struct Deduplicator {
    similarity_threshold: f32,
}

impl Deduplicator {
    pub fn new(similarity_threshold: f32) -> Self {
        Self {
            similarity_threshold,
        }
    }

    pub fn from_config(config: &DedupConfig) -> Result<Self, TopicsError> {
        config.validate()?;
        Ok(Self::new(config.similarity_threshold))
    }

    pub fn similarity_threshold(&self) -> f32 {
        self.similarity_threshold
    }

    /// Highest-similarity catalog entry for `centroid`, or `None` for an
    /// empty catalog. Any entry with a different dimension is an error.
    pub fn best_match(
        &self,
        centroid: &[f32],
        memory: &TopicMemory,
    ) -> Result<Option<MemoryMatch>, TopicsError> {
        let mut best: Option<(usize, f32)> = None;
        for (index, entry) in memory.iter().enumerate() {
            if entry.dimension() != centroid.len() {
                return Err(TopicsError::DimensionMismatch {
                    expected: centroid.len(),
                    actual: entry.dimension(),
                });
            }
            let similarity = cosine_similarity(centroid, &entry.embedding);
            if best.map_or(true, |(_, s)| similarity > s) {
                best = Some((index, similarity));
            }
        }

        Ok(best.map(|(index, similarity)| MemoryMatch {
            index,
            label: memory.entries()[index].label.clone(),
            similarity,
        }))
    }

    /// Split candidates into matched and new.
    ///
    /// With an empty catalog every candidate is new and no similarity is
    /// computed. Matched candidates take the canonical label; new ones keep
    /// theirs. Output order follows input order within each side.
    #[instrument(skip_all, fields(candidates = candidates.len(), catalog = memory.len()))]
    pub fn deduplicate(
        &self,
        candidates: Vec<CandidateTopic>,
        memory: &TopicMemory,
    ) -> Result<DedupOutcome, TopicsError> {
        let mut outcome = DedupOutcome::default();

        if memory.is_empty() {
            debug!("Empty catalog, all candidates are new");
            outcome.new = candidates
                .into_iter()
                .map(|mut c| {
                    c.is_new = Some(true);
                    c
                })
                .collect();
            return Ok(outcome);
        }

        for mut candidate in candidates {
            let best = self.best_match(&candidate.centroid, memory)?;
            let max_similarity = best.as_ref().map_or(0.0, |m| m.similarity);
            match best {
                Some(m) if m.similarity >= self.similarity_threshold => {
                    info!(
                        from = %candidate.label,
                        to = %m.label,
                        similarity = format!("{:.2}", m.similarity),
                        "Merged into existing topic"
                    );
                    candidate.label = m.label;
                    candidate.is_new = Some(false);
                    outcome.matched.push(candidate);
                }
                _ => {
                    info!(
                        label = %candidate.label,
                        max_similarity = format!("{:.2}", max_similarity),
                        "New candidate"
                    );
                    candidate.is_new = Some(true);
                    outcome.new.push(candidate);
                }
            }
        }

        Ok(outcome)
    }
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new(DedupConfig::default().similarity_threshold)
    }
}
