//! # review-trends
//!
//! Daily topic trend tracking.
//!
//! [`TrendStore`] keeps the append-only (date, topic, count) fact table and
//! pivots it into a [`TrendMatrix`]. [`DailyPipeline`] runs one day's batch
//! through extraction, normalization, deduplication and catalog evolution,
//! then records the resulting topic counts.

pub mod error;
pub mod matrix;
pub mod pipeline;
pub mod store;

pub use error::TrendError;
pub use matrix::{TrendMatrix, TrendRow};
pub use pipeline::{DailyPipeline, DayReport};
pub use store::TrendStore;
