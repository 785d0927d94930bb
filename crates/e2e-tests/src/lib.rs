//! End-to-end test infrastructure for review-trends.
//!
//! Provides a shared TestHarness, a deterministic keyword vectorizer and a
//! seeded synthetic review generator for E2E tests and the bench binary.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::Rng;

use review_embeddings::{Embedding, EmbeddingError, ModelInfo, Vectorizer};
use review_topics::{CatalogStore, TopicMemory, TopicsConfig};
use review_trends::{DailyPipeline, DayReport, TrendStore};
use review_types::TrendRecord;

/// Keyword groups, one vector axis each.
const CONCEPTS: &[&[&str]] = &[
    &["login", "log in", "sign in", "password", "account"],
    &["love", "great", "awesome", "excellent"],
    &["cold", "pizza", "burger", "food", "soggy"],
    &["driver", "late", "delivery", "courier"],
    &["expensive", "price", "charges", "fee"],
];

/// Weight of the shared baseline axis every text carries.
const BASELINE: f32 = 0.2;

/// Vectorizer with hand-picked semantics: each keyword group is one axis
/// and a text scores one per keyword it contains. Texts about the same
/// group land close together regardless of wording; texts with no keyword
/// all collapse onto the baseline axis.
pub struct KeywordVectorizer {
    info: ModelInfo,
}

impl KeywordVectorizer {
    pub fn new() -> Self {
        Self {
            info: ModelInfo {
                name: "keyword-test".to_string(),
                dimension: CONCEPTS.len() + 1,
            },
        }
    }

    fn vector(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        let mut values: Vec<f32> = CONCEPTS
            .iter()
            .map(|keywords| keywords.iter().filter(|k| lower.contains(*k)).count() as f32)
            .collect();
        values.push(BASELINE);
        values
    }
}

impl Default for KeywordVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Vectorizer for KeywordVectorizer {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        Ok(texts.iter().map(|t| Embedding::new(Self::vector(t))).collect())
    }
}

/// Shared test harness for E2E tests.
///
/// Owns a temp directory holding the catalog and trend table, and a
/// pipeline wired to them.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    pub catalog_path: PathBuf,
    pub trend_path: PathBuf,
    pub pipeline: DailyPipeline,
}

impl TestHarness {
    /// Harness with the keyword vectorizer and default thresholds.
    pub fn new() -> Self {
        Self::with_config(Arc::new(KeywordVectorizer::new()), TopicsConfig::default())
    }

    pub fn with_config(vectorizer: Arc<dyn Vectorizer>, config: TopicsConfig) -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let catalog_path = temp_dir.path().join("topic_memory.json");
        let trend_path = temp_dir.path().join("trend_data.csv");
        let pipeline = DailyPipeline::new(
            vectorizer,
            &config,
            CatalogStore::new(&catalog_path),
            TrendStore::new(&trend_path),
        )
        .expect("Failed to build pipeline");

        Self {
            _temp_dir: temp_dir,
            catalog_path,
            trend_path,
            pipeline,
        }
    }

    pub fn run_day(&mut self, date: NaiveDate, reviews: &[&str]) -> DayReport {
        self.pipeline
            .run_day(date, &texts(reviews))
            .expect("Failed to run day")
    }

    pub fn catalog(&self) -> TopicMemory {
        CatalogStore::new(&self.catalog_path)
            .load()
            .expect("Failed to load catalog")
    }

    pub fn trend_rows(&self) -> Vec<TrendRecord> {
        TrendStore::new(&self.trend_path)
            .records()
            .expect("Failed to load trend table")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// 2024-06-`n`.
pub fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, n).expect("valid day")
}

pub fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Phrasings per complaint kind used by the synthetic generator.
pub const REVIEW_TEMPLATES: &[&[&str]] = &[
    &[
        "App crashes on login.",
        "Cannot login to my account.",
        "Login failed, please fix.",
        "I can't log in since the update.",
        "Password reset never arrives.",
    ],
    &[
        "I love this app.",
        "Great service, thanks!",
        "Awesome experience overall.",
    ],
    &[
        "Pizza arrived cold.",
        "The burger was soggy.",
        "Food was cold again.",
    ],
    &[
        "Driver was late by an hour.",
        "Delivery took forever.",
        "The courier was rude.",
    ],
    &[
        "Delivery fee is too expensive.",
        "Charges are high for short trips.",
    ],
];

/// `size` reviews drawn from [`REVIEW_TEMPLATES`]; reproducible for a
/// given rng seed.
pub fn synthetic_batch(rng: &mut StdRng, size: usize) -> Vec<String> {
    (0..size)
        .map(|_| {
            let kind = REVIEW_TEMPLATES[rng.random_range(0..REVIEW_TEMPLATES.len())];
            kind[rng.random_range(0..kind.len())].to_string()
        })
        .collect()
}
