//! Topic × date pivot of the trend table.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;

use review_types::{format_date, TrendRecord};

/// Counts for one topic, aligned with [`TrendMatrix::dates`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendRow {
    pub topic: String,
    pub counts: Vec<u64>,
}

impl TrendRow {
    pub fn total(&self) -> u64 {
        self.counts.iter().fold(0u64, |sum, c| sum.saturating_add(*c))
    }
}

/// Dense topic × date grid.
///
/// Dates are ascending and include every date that has a row in the window.
/// Rows are sorted by topic label; topics whose counts sum to zero are
/// dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrendMatrix {
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<TrendRow>,
}

impl TrendMatrix {
    /// Pivot records, summing duplicate (topic, date) rows.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a TrendRecord>) -> Self {
        let mut dates = BTreeSet::new();
        let mut cells: BTreeMap<&str, BTreeMap<NaiveDate, u64>> = BTreeMap::new();
        for record in records {
            dates.insert(record.date);
            let cell = cells
                .entry(record.topic.as_str())
                .or_default()
                .entry(record.date)
                .or_default();
            *cell = cell.saturating_add(record.count);
        }

        let dates: Vec<NaiveDate> = dates.into_iter().collect();
        let rows = cells
            .into_iter()
            .map(|(topic, by_date)| TrendRow {
                topic: topic.to_string(),
                counts: dates
                    .iter()
                    .map(|d| by_date.get(d).copied().unwrap_or(0))
                    .collect(),
            })
            .filter(|row| row.total() > 0)
            .collect();

        Self { dates, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep only the `n` most recent date columns. Topics with nothing in
    /// those columns are dropped.
    pub fn last_dates(&self, n: usize) -> Self {
        let skip = self.dates.len().saturating_sub(n);
        let rows = self
            .rows
            .iter()
            .map(|row| TrendRow {
                topic: row.topic.clone(),
                counts: row.counts[skip..].to_vec(),
            })
            .filter(|row| row.total() > 0)
            .collect();
        Self {
            dates: self.dates[skip..].to_vec(),
            rows,
        }
    }

    pub fn row(&self, topic: &str) -> Option<&TrendRow> {
        self.rows.iter().find(|r| r.topic == topic)
    }

    /// Count for one cell; 0 for unknown topics or dates.
    pub fn count(&self, topic: &str, date: NaiveDate) -> u64 {
        let Some(col) = self.dates.iter().position(|d| *d == date) else {
            return 0;
        };
        self.row(topic).map_or(0, |r| r.counts[col])
    }

    /// Window total for one topic; 0 when absent.
    pub fn total_for(&self, topic: &str) -> u64 {
        self.row(topic).map_or(0, TrendRow::total)
    }

    pub fn topics(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.topic.as_str()).collect()
    }
}

impl fmt::Display for TrendMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const TOPIC_HEADER: &str = "Topic";
        let labels: Vec<String> = self.dates.iter().map(|d| format_date(*d)).collect();
        let topic_width = self
            .rows
            .iter()
            .map(|r| r.topic.chars().count())
            .chain(std::iter::once(TOPIC_HEADER.len()))
            .max()
            .unwrap_or(0);
        // Count columns are at least as wide as the date header
        let widths: Vec<usize> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                self.rows
                    .iter()
                    .map(|r| r.counts[i].to_string().len())
                    .chain(std::iter::once(label.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:<topic_width$}", TOPIC_HEADER)?;
        for (label, width) in labels.iter().zip(&widths) {
            write!(f, "  {:>width$}", label)?;
        }
        writeln!(f)?;

        for row in &self.rows {
            write!(f, "{:<topic_width$}", row.topic)?;
            for (count, width) in row.counts.iter().zip(&widths) {
                write!(f, "  {:>width$}", count)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
