//! Trend and pipeline error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors from the trend table and the daily pipeline.
#[derive(Debug, Error)]
pub enum TrendError {
    /// Trend table could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Topic lifecycle failure
    #[error("Topic error: {0}")]
    Topics(#[from] review_topics::TopicsError),

    /// A batch dated before the last processed one
    #[error("Batch for {date} is older than last processed date {last}")]
    OutOfOrder { date: NaiveDate, last: NaiveDate },
}
