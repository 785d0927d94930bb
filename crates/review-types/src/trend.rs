//! Trend fact rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One (date, topic, count) fact. Rows are append-only and (date, topic) is
/// not unique: repeated runs for a date add rows that aggregation sums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Topic")]
    pub topic: String,
    #[serde(rename = "Count")]
    pub count: u64,
}

impl TrendRecord {
    pub fn new(date: NaiveDate, topic: impl Into<String>, count: u64) -> Self {
        Self {
            date,
            topic: topic.into(),
            count,
        }
    }
}
