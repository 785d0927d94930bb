//! # review-types
//!
//! Shared domain types for the review trend system.
//!
//! This crate defines the data structures that flow between the stages of
//! the daily pipeline:
//! - Candidate topics: transient clusters produced from one day's batch
//! - Memory entries: registered topics persisted in the catalog
//! - Trend records: append-only (date, topic, count) facts
//!
//! ## Usage
//!
//! ```rust
//! use review_types::{CandidateTopic, TopicCount};
//!
//! let topic = CandidateTopic::new(
//!     "Login issues",
//!     vec!["Cannot login.".to_string()],
//!     vec![1.0, 0.0],
//! );
//! assert_eq!(topic.topic_count(), TopicCount::new("Login issues", 1));
//! ```

pub mod date;
pub mod error;
pub mod fs;
pub mod memory;
pub mod topic;
pub mod trend;

pub use date::{format_date, parse_date, DATE_FORMAT};
pub use error::ReviewError;
pub use fs::{remove_snapshot, write_snapshot};
pub use memory::MemoryEntry;
pub use topic::{CandidateTopic, TopicCount};
pub use trend::TrendRecord;
