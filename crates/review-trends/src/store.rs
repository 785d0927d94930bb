//! CSV-backed trend fact table.
//!
//! The table is a CSV file with header `Date,Topic,Count`. Like the catalog
//! it is read and rewritten whole on every operation. Loading is lenient: a
//! missing file is an empty table, a table without the expected header is
//! treated as empty, rows with an unreadable date or the wrong number of
//! fields are skipped, and counts that are not numbers read as 0. Every
//! fallback logs a warning.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use review_types::{format_date, parse_date, remove_snapshot, write_snapshot, TopicCount, TrendRecord};

use crate::error::TrendError;
use crate::matrix::TrendMatrix;

const DATE_COLUMN: &str = "Date";
const TOPIC_COLUMN: &str = "Topic";
const COUNT_COLUMN: &str = "Count";

/// File-backed, append-only trend table.
#[derive(Debug, Clone)]
pub struct TrendStore {
    path: PathBuf,
}

impl TrendStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All rows in file order.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn records(&self) -> Result<Vec<TrendRecord>, TrendError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        match parse_table(&bytes) {
            Ok(records) => {
                debug!(rows = records.len(), "Loaded trend table");
                Ok(records)
            }
            Err(reason) => {
                warn!(%reason, "Malformed trend table, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Append one row per topic for `date` and persist the table.
    ///
    /// An empty `topics` slice leaves storage untouched.
    #[instrument(skip(self, topics), fields(date = %format_date(date), topics = topics.len()))]
    pub fn record(&self, date: NaiveDate, topics: &[TopicCount]) -> Result<(), TrendError> {
        if topics.is_empty() {
            return Ok(());
        }

        let mut records = self.records()?;
        records.extend(
            topics
                .iter()
                .map(|t| TrendRecord::new(date, t.label.clone(), t.count)),
        );
        self.save(&records)?;
        info!(rows = records.len(), "Recorded trend rows");
        Ok(())
    }

    /// Pivot the rows whose date falls in `[start, end]` (either bound
    /// optional, both inclusive).
    pub fn matrix(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<TrendMatrix, TrendError> {
        let records = self.records()?;
        Ok(TrendMatrix::from_records(
            records.iter().filter(|r| {
                start.map_or(true, |s| r.date >= s) && end.map_or(true, |e| r.date <= e)
            }),
        ))
    }

    /// Drop every row and remove the backing file. Returns whether a file
    /// existed.
    pub fn clear(&self) -> Result<bool, TrendError> {
        let removed = remove_snapshot(&self.path)?;
        if removed {
            info!(path = %self.path.display(), "Removed trend table");
        }
        Ok(removed)
    }

    fn save(&self, records: &[TrendRecord]) -> Result<(), TrendError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([DATE_COLUMN, TOPIC_COLUMN, COUNT_COLUMN])?;
        for record in records {
            let count = record.count.to_string();
            writer.write_record([format_date(record.date).as_str(), record.topic.as_str(), count.as_str()])?;
        }
        let bytes = writer.into_inner().map_err(|e| TrendError::Io(e.into_error()))?;
        write_snapshot(&self.path, &bytes)?;
        Ok(())
    }
}

/// Parse the table, skipping unreadable rows. Fails only when the header
/// is unusable.
fn parse_table(bytes: &[u8]) -> Result<Vec<TrendRecord>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader.headers().map_err(|e| e.to_string())?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| format!("missing column {}", name))
    };
    let (date_idx, topic_idx, count_idx) =
        (column(DATE_COLUMN)?, column(TOPIC_COLUMN)?, column(COUNT_COLUMN)?);

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        // Header is line 1
        let line = index + 2;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(line, error = %e, "Skipping unreadable trend row");
                continue;
            }
        };
        let field = |i: usize| row.get(i).unwrap_or_default();
        let date = match parse_date(field(date_idx)) {
            Ok(date) => date,
            Err(e) => {
                warn!(line, error = %e, "Skipping trend row with bad date");
                continue;
            }
        };
        records.push(TrendRecord::new(date, field(topic_idx), coerce_count(field(count_idx))));
    }
    Ok(records)
}

/// Numeric coercion for the Count column: anything that is not a
/// non-negative number counts as 0.
fn coerce_count(raw: &str) -> u64 {
    if let Ok(n) = raw.parse::<u64>() {
        return n;
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 => f.round() as u64,
        _ => 0,
    }
}
