//! One day of processing, end to end.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, instrument};

use review_embeddings::Vectorizer;
use review_topics::{
    CatalogStore, Deduplicator, EvolutionRegister, SemanticNormalizer, TopicExtractor,
    TopicsConfig,
};
use review_types::{format_date, TopicCount};

use crate::error::TrendError;
use crate::store::TrendStore;

/// Topic counts produced for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayReport {
    pub date: NaiveDate,
    /// Candidates that took an existing catalog label
    pub matched: Vec<TopicCount>,
    /// Candidates registered as new catalog topics
    pub registered: Vec<TopicCount>,
}

impl DayReport {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            matched: Vec::new(),
            registered: Vec::new(),
        }
    }

    /// Rows in the order they are written to the trend table.
    pub fn rows(&self) -> impl Iterator<Item = &TopicCount> {
        self.matched.iter().chain(&self.registered)
    }

    pub fn total_reviews(&self) -> u64 {
        self.rows().map(|t| t.count).sum()
    }
}

/// Extract → normalize → dedup → evolve → record.
///
/// Days must be fed in chronological order; the same date may be repeated,
/// which adds rows to the trend table rather than replacing them.
pub struct DailyPipeline {
    extractor: TopicExtractor,
    normalizer: SemanticNormalizer,
    deduplicator: Deduplicator,
    register: EvolutionRegister,
    trends: TrendStore,
    last_date: Option<NaiveDate>,
}

impl DailyPipeline {
    pub fn new(
        vectorizer: Arc<dyn Vectorizer>,
        config: &TopicsConfig,
        catalog: CatalogStore,
        trends: TrendStore,
    ) -> Result<Self, TrendError> {
        config.validate()?;
        Ok(Self {
            extractor: TopicExtractor::new(vectorizer, config.extraction.clone())?,
            normalizer: SemanticNormalizer::new(config.normalizer.rules.clone())?,
            deduplicator: Deduplicator::from_config(&config.dedup)?,
            register: EvolutionRegister::new(catalog),
            trends,
            last_date: None,
        })
    }

    pub fn catalog(&self) -> &CatalogStore {
        self.register.store()
    }

    pub fn trends(&self) -> &TrendStore {
        &self.trends
    }

    /// Process one day's batch.
    ///
    /// Only a successful run advances the date watermark, so a failed day
    /// can be retried.
    #[instrument(skip(self, texts), fields(date = %format_date(date), reviews = texts.len()))]
    pub fn run_day(&mut self, date: NaiveDate, texts: &[String]) -> Result<DayReport, TrendError> {
        if let Some(last) = self.last_date {
            if date < last {
                return Err(TrendError::OutOfOrder { date, last });
            }
        }

        if texts.is_empty() {
            info!("Empty batch, nothing to do");
            self.last_date = Some(date);
            return Ok(DayReport::empty(date));
        }

        let mut candidates = self.extractor.extract(texts)?;
        let renamed = self.normalizer.normalize_all(&mut candidates);

        let memory = self.catalog().load()?;
        let outcome = self.deduplicator.deduplicate(candidates, &memory)?;
        let registered = self.register.evolve(outcome.new, date)?;

        let report = DayReport {
            date,
            matched: outcome.matched.iter().map(TopicCount::from).collect(),
            registered: registered.iter().map(TopicCount::from).collect(),
        };
        let rows: Vec<TopicCount> = report.rows().cloned().collect();
        self.trends.record(date, &rows)?;
        self.last_date = Some(date);

        info!(
            renamed,
            matched = report.matched.len(),
            registered = report.registered.len(),
            "Day processed"
        );
        Ok(report)
    }
}
