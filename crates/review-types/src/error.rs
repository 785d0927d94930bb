//! Error types shared across the review trend crates.

use thiserror::Error;

/// Errors raised while handling shared domain types.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Date could not be parsed
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },
}
