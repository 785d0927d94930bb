//! Feature-hashing vectorizer.
//!
//! Maps each text to a signed bag of hashed features: lowercased word
//! tokens (stop words removed) at full weight and their padded character
//! trigrams at half weight. Words listed in the concept lexicon also add a
//! heavily weighted concept feature, so different phrasings of a common
//! review complaint ("cannot login", "sign in fails", "password reset")
//! share one dominant direction. Deterministic across runs and platforms and
//! needs no model files.

use tracing::debug;

use crate::error::EmbeddingError;
use crate::model::{Embedding, ModelInfo, Vectorizer};

/// Default output dimension.
pub const DEFAULT_HASHING_DIM: usize = 256;

const WORD_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.5;
const CONCEPT_WEIGHT: f32 = 8.0;

/// Review vocabulary grouped by concept. Matched against whole tokens.
const CONCEPTS: &[(&str, &[&str])] = &[
    (
        "access",
        &[
            "login", "logins", "log", "logged", "logging", "signin", "sign", "password",
            "passwords", "account", "accounts", "authentication", "otp", "locked",
        ],
    ),
    (
        "praise",
        &["love", "loved", "great", "awesome", "excellent", "amazing", "fantastic", "best"],
    ),
    (
        "food",
        &["food", "cold", "pizza", "burger", "soggy", "stale", "taste", "meal"],
    ),
    (
        "delivery",
        &["delivery", "driver", "late", "courier", "delayed", "shipping", "forever"],
    ),
    (
        "price",
        &[
            "expensive", "price", "prices", "pricey", "charges", "fee", "fees", "cost",
            "overpriced",
        ],
    ),
];

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Deterministic bag-of-features vectorizer.
pub struct HashingVectorizer {
    info: ModelInfo,
}

impl HashingVectorizer {
    /// Create a vectorizer with the given output dimension.
    pub fn new(dimension: usize) -> Result<Self, EmbeddingError> {
        if dimension == 0 {
            return Err(EmbeddingError::InvalidInput(
                "hashing dimension must be > 0".to_string(),
            ));
        }
        Ok(Self {
            info: ModelInfo {
                name: format!("hashing-{}", dimension),
                dimension,
            },
        })
    }

    fn vectorize(&self, text: &str) -> Embedding {
        let dim = self.info.dimension;
        let mut values = vec![0.0f32; dim];

        for word in tokenize(text) {
            add_feature(&mut values, word.as_bytes(), WORD_WEIGHT);

            let padded: Vec<char> = format!("#{}#", word).chars().collect();
            for window in padded.windows(3) {
                let trigram: String = window.iter().collect();
                add_feature(&mut values, trigram.as_bytes(), TRIGRAM_WEIGHT);
            }

            if let Some(concept) = concept_of(&word) {
                let feature = format!("concept:{}", concept);
                add_feature(&mut values, feature.as_bytes(), CONCEPT_WEIGHT);
            }
        }

        Embedding::new(values)
    }
}

impl Default for HashingVectorizer {
    fn default() -> Self {
        Self {
            info: ModelInfo {
                name: format!("hashing-{}", DEFAULT_HASHING_DIM),
                dimension: DEFAULT_HASHING_DIM,
            },
        }
    }
}

impl Vectorizer for HashingVectorizer {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        debug!(count = texts.len(), dim = self.info.dimension, "Hashing batch");
        Ok(texts.iter().map(|text| self.vectorize(text)).collect())
    }
}

/// Signed feature hashing: the top bit of the hash picks the sign so that
/// collisions cancel out on average instead of accumulating.
fn add_feature(values: &mut [f32], feature: &[u8], weight: f32) {
    let hash = fnv1a(feature);
    let index = (hash % values.len() as u64) as usize;
    let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
    values[index] += sign * weight;
}

fn concept_of(word: &str) -> Option<&'static str> {
    CONCEPTS
        .iter()
        .find(|(_, words)| words.contains(&word))
        .map(|(concept, _)| *concept)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

/// Tokenize text into lowercase words.
///
/// Filters out:
/// - Stop words (common English words)
/// - Single character tokens
/// - Numbers
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| s.len() > 1)
        .filter(|s| !is_stop_word(s))
        .filter(|s| !s.chars().all(|c| c.is_numeric()))
        .map(String::from)
        .collect()
}

fn is_stop_word(word: &str) -> bool {
    const STOP_WORDS: &[&str] = &[
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is",
        "it", "its", "of", "on", "or", "that", "the", "to", "was", "were", "will", "with", "this",
        "they", "but", "have", "had", "what", "when", "where", "who", "which", "how", "all",
        "so", "than", "too", "very", "just", "should", "now", "also", "been", "being", "do",
        "does", "did", "would", "could", "about", "again", "am", "any", "into", "then", "there",
        "if", "we", "you", "your", "our", "their", "me", "my", "i", "im", "please",
    ];

    STOP_WORDS.contains(&word)
}
