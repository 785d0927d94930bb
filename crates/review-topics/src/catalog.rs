//! Topic memory: the persistent catalog of registered topics.
//!
//! The catalog is a JSON array of [`MemoryEntry`] in discovery order. It is
//! always read and written as a whole snapshot: callers load it at the start
//! of an operation and persist it at the end, never holding a copy across
//! operations.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use review_types::{remove_snapshot, write_snapshot, MemoryEntry};

use crate::error::TopicsError;

/// Ordered, append-only list of registered topics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicMemory {
    entries: Vec<MemoryEntry>,
}

impl TopicMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<MemoryEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[MemoryEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a newly registered topic. Existing entries are never touched.
    pub fn register(&mut self, entry: MemoryEntry) {
        self.entries.push(entry);
    }

    /// First entry carrying `label`.
    pub fn find(&self, label: &str) -> Option<&MemoryEntry> {
        self.entries.iter().find(|e| e.label == label)
    }

    /// Labels in discovery order.
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    pub fn into_entries(self) -> Vec<MemoryEntry> {
        self.entries
    }
}

/// File-backed catalog snapshot.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full catalog. A missing file is an empty catalog; an
    /// unreadable or malformed one is an error.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<TopicMemory, TopicsError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No catalog file, starting empty");
                return Ok(TopicMemory::new());
            }
            Err(e) => return Err(e.into()),
        };
        let entries: Vec<MemoryEntry> = serde_json::from_slice(&bytes)?;
        debug!(entries = entries.len(), "Loaded catalog");
        Ok(TopicMemory::from_entries(entries))
    }

    /// Persist the full catalog, replacing the previous snapshot.
    #[instrument(skip(self, memory), fields(path = %self.path.display(), entries = memory.len()))]
    pub fn save(&self, memory: &TopicMemory) -> Result<(), TopicsError> {
        let json = serde_json::to_vec_pretty(memory.entries())?;
        write_snapshot(&self.path, &json)?;
        debug!("Saved catalog");
        Ok(())
    }

    /// Delete the catalog file. Returns whether one existed.
    pub fn clear(&self) -> Result<bool, TopicsError> {
        let removed = remove_snapshot(&self.path)?;
        if removed {
            info!(path = %self.path.display(), "Removed catalog");
        }
        Ok(removed)
    }
}
