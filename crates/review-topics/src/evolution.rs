//! Append-only registration of new topics into the catalog.

use chrono::NaiveDate;
use tracing::{info, instrument};

use review_types::{format_date, CandidateTopic, MemoryEntry};

use crate::catalog::{CatalogStore, TopicMemory};
use crate::error::TopicsError;

/// Registers every candidate it is given. There is no frequency or
/// confidence gate: a one-off cluster becomes a permanent topic.
#[derive(Debug, Clone)]
pub struct EvolutionRegister {
    store: CatalogStore,
}

impl EvolutionRegister {
    pub fn new(store: CatalogStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Append one entry per candidate, stamped with `date`, and persist the
    /// catalog. Returns the candidates unchanged.
    ///
    /// The catalog is reloaded from storage first so the write never
    /// discards entries registered since the caller's snapshot. An empty
    /// input does not touch storage.
    #[instrument(skip(self, candidates), fields(count = candidates.len(), date = %format_date(date)))]
    pub fn evolve(
        &self,
        candidates: Vec<CandidateTopic>,
        date: NaiveDate,
    ) -> Result<Vec<CandidateTopic>, TopicsError> {
        if candidates.is_empty() {
            return Ok(candidates);
        }

        let mut memory = self.store.load()?;
        let before = memory.len();
        for candidate in &candidates {
            memory.register(entry_for(candidate, date));
            info!(label = %candidate.label, "Registered new topic");
        }
        self.store.save(&memory)?;

        info!(before, after = memory.len(), "Catalog evolved");
        Ok(candidates)
    }

    /// Current catalog snapshot.
    pub fn memory(&self) -> Result<TopicMemory, TopicsError> {
        self.store.load()
    }
}

fn entry_for(candidate: &CandidateTopic, date: NaiveDate) -> MemoryEntry {
    MemoryEntry::new(
        candidate.label.clone(),
        candidate.centroid.clone(),
        date,
        candidate.first_member().unwrap_or_default(),
    )
}
