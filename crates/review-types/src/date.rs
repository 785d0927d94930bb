//! Calendar date helpers.
//!
//! All persisted dates use the ISO `YYYY-MM-DD` form so that lexical and
//! chronological order agree.

use chrono::NaiveDate;

use crate::error::ReviewError;

/// Format used for every persisted date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date string.
pub fn parse_date(value: &str) -> Result<NaiveDate, ReviewError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| ReviewError::InvalidDate {
        value: value.to_string(),
    })
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
