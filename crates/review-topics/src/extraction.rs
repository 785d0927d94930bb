//! Topic extraction from a batch of texts.
//!
//! Texts are vectorized, L2-normalized (so Euclidean distance tracks cosine
//! distance) and clustered with average linkage under a fixed distance
//! threshold. Every cluster becomes one candidate topic labelled with its
//! exemplar: the member closest to the cluster centroid.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use review_embeddings::Vectorizer;
use review_types::CandidateTopic;

use crate::clustering::agglomerative_average;
use crate::config::ExtractionConfig;
use crate::error::TopicsError;
use crate::similarity::{calculate_centroid, cosine_similarity, normalize};

/// Clusters one day's texts into candidate topics.
pub struct TopicExtractor {
    vectorizer: Arc<dyn Vectorizer>,
    config: ExtractionConfig,
}

impl TopicExtractor {
    pub fn new(vectorizer: Arc<dyn Vectorizer>, config: ExtractionConfig) -> Result<Self, TopicsError> {
        config.validate()?;
        Ok(Self { vectorizer, config })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn vectorizer(&self) -> &Arc<dyn Vectorizer> {
        &self.vectorizer
    }

    /// Extract candidate topics from a batch.
    ///
    /// Empty input yields no topics and does not touch the vectorizer.
    /// Candidates come out ordered by the batch position of their first
    /// member, with `is_new` unset.
    #[instrument(skip(self, texts), fields(count = texts.len()))]
    pub fn extract(&self, texts: &[String]) -> Result<Vec<CandidateTopic>, TopicsError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Encoding reviews");
        let vectors = self.embed_normalized(texts)?;

        let groups = agglomerative_average(&vectors, self.config.distance_threshold);
        info!(
            reviews = texts.len(),
            clusters = groups.len(),
            threshold = self.config.distance_threshold,
            "Clustered reviews"
        );

        Ok(groups
            .iter()
            .map(|group| build_candidate(group, texts, &vectors))
            .collect())
    }

    fn embed_normalized(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, TopicsError> {
        let embeddings = self.vectorizer.embed_texts(texts)?;
        if embeddings.len() != texts.len() {
            return Err(TopicsError::Clustering(format!(
                "vectorizer returned {} vectors for {} texts",
                embeddings.len(),
                texts.len()
            )));
        }

        let dim = embeddings[0].dimension();
        embeddings
            .into_iter()
            .map(|embedding| {
                if embedding.dimension() != dim {
                    return Err(TopicsError::DimensionMismatch {
                        expected: dim,
                        actual: embedding.dimension(),
                    });
                }
                let mut values = embedding.into_vec();
                normalize(&mut values);
                Ok(values)
            })
            .collect()
    }
}

/// Centroid, exemplar and member list for one cluster.
fn build_candidate(group: &[usize], texts: &[String], vectors: &[Vec<f32>]) -> CandidateTopic {
    let member_vectors: Vec<&[f32]> = group.iter().map(|&i| vectors[i].as_slice()).collect();
    let centroid = calculate_centroid(&member_vectors);

    // First member wins ties
    let mut exemplar = group[0];
    let mut best = f32::NEG_INFINITY;
    for &i in group {
        let sim = cosine_similarity(&centroid, &vectors[i]);
        if sim > best {
            best = sim;
            exemplar = i;
        }
    }

    let member_texts = group.iter().map(|&i| texts[i].clone()).collect();
    CandidateTopic::new(texts[exemplar].clone(), member_texts, centroid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_embeddings::{Embedding, EmbeddingError, HashingVectorizer, ModelInfo};

    /// Maps each text to a fixed direction chosen by keyword.
    struct TableVectorizer {
        info: ModelInfo,
    }

    impl TableVectorizer {
        fn new() -> Self {
            Self {
                info: ModelInfo {
                    name: "table".to_string(),
                    dimension: 3,
                },
            }
        }
    }

    impl Vectorizer for TableVectorizer {
        fn info(&self) -> &ModelInfo {
            &self.info
        }

        fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
            Ok(texts
                .iter()
                .map(|t| {
                    let t = t.to_lowercase();
                    if t.contains("login") {
                        Embedding::new(vec![1.0, 0.1 * t.len() as f32 / 30.0, 0.0])
                    } else if t.contains("cold") {
                        Embedding::new(vec![0.0, 1.0, 0.05])
                    } else {
                        Embedding::new(vec![0.0, 0.0, 1.0])
                    }
                })
                .collect())
        }
    }

    struct BrokenVectorizer {
        info: ModelInfo,
        drop_one: bool,
    }

    impl Vectorizer for BrokenVectorizer {
        fn info(&self) -> &ModelInfo {
            &self.info
        }

        fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
            if self.drop_one {
                return Ok(texts.iter().skip(1).map(|_| Embedding::new(vec![1.0])).collect());
            }
            Ok(texts
                .iter()
                .enumerate()
                .map(|(i, _)| Embedding::new(vec![1.0; i + 1]))
                .collect())
        }
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn extractor(threshold: f64) -> TopicExtractor {
        TopicExtractor::new(
            Arc::new(TableVectorizer::new()),
            ExtractionConfig {
                distance_threshold: threshold,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_empty_batch() {
        let topics = extractor(0.5).extract(&[]).unwrap();
        assert!(topics.is_empty());
    }

    #[test]
    fn test_groups_by_similarity() {
        let batch = texts(&[
            "App crashes on login.",
            "Pizza was cold.",
            "Cannot login to my account.",
            "Food came cold.",
            "Driver was polite.",
        ]);
        let topics = extractor(0.5).extract(&batch).unwrap();

        assert_eq!(topics.len(), 3);
        assert_eq!(
            topics[0].member_texts,
            texts(&["App crashes on login.", "Cannot login to my account."])
        );
        assert_eq!(topics[0].member_count, 2);
        assert_eq!(topics[1].member_texts, texts(&["Pizza was cold.", "Food came cold."]));
        assert_eq!(topics[2].member_texts, texts(&["Driver was polite."]));
        assert!(topics.iter().all(|t| t.is_new.is_none()));
    }

    #[test]
    fn test_label_is_a_member_text() {
        let batch = texts(&["App crashes on login.", "Cannot login to my account."]);
        let topics = extractor(0.5).extract(&batch).unwrap();
        assert_eq!(topics.len(), 1);
        assert!(topics[0].member_texts.contains(&topics[0].label));
    }

    #[test]
    fn test_identical_members_pick_first_exemplar() {
        let batch = texts(&["Pizza was cold.", "Pizza was cold."]);
        let topics = extractor(0.5).extract(&batch).unwrap();
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].label, "Pizza was cold.");
    }

    #[test]
    fn test_singleton_centroid_is_own_vector() {
        let batch = texts(&["Driver was polite."]);
        let topics = extractor(0.5).extract(&batch).unwrap();
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].centroid, vec![0.0, 0.0, 1.0]);
        assert_eq!(topics[0].label, "Driver was polite.");
    }

    #[test]
    fn test_threshold_controls_granularity() {
        let batch = texts(&["App crashes on login.", "Pizza was cold.", "Driver was polite."]);
        assert_eq!(extractor(0.5).extract(&batch).unwrap().len(), 3);
        assert_eq!(extractor(2.0).extract(&batch).unwrap().len(), 1);
    }

    #[test]
    fn test_deterministic_with_hashing_vectorizer() {
        let extractor = TopicExtractor::new(
            Arc::new(HashingVectorizer::default()),
            ExtractionConfig {
                distance_threshold: 1.2,
            },
        )
        .unwrap();
        let batch = texts(&[
            "Food was great.",
            "Delivery was fast.",
            "Tasty food.",
            "Pizza was cold.",
            "Cold biryani sent.",
            "Driver was polite.",
        ]);
        let first = extractor.extract(&batch).unwrap();
        let second = extractor.extract(&batch).unwrap();
        assert_eq!(first, second);
        let members: usize = first.iter().map(|t| t.member_count).sum();
        assert_eq!(members, batch.len());
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let result = TopicExtractor::new(
            Arc::new(TableVectorizer::new()),
            ExtractionConfig {
                distance_threshold: -1.0,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_vector_count_mismatch_is_error() {
        let extractor = TopicExtractor::new(
            Arc::new(BrokenVectorizer {
                info: ModelInfo {
                    name: "broken".to_string(),
                    dimension: 1,
                },
                drop_one: true,
            }),
            ExtractionConfig::default(),
        )
        .unwrap();
        let err = extractor.extract(&texts(&["a", "b"])).unwrap_err();
        assert!(matches!(err, TopicsError::Clustering(_)));
    }

    #[test]
    fn test_mixed_dimensions_is_error() {
        let extractor = TopicExtractor::new(
            Arc::new(BrokenVectorizer {
                info: ModelInfo {
                    name: "broken".to_string(),
                    dimension: 1,
                },
                drop_one: false,
            }),
            ExtractionConfig::default(),
        )
        .unwrap();
        let err = extractor.extract(&texts(&["a", "b"])).unwrap_err();
        assert!(matches!(err, TopicsError::DimensionMismatch { expected: 1, actual: 2 }));
    }
}
