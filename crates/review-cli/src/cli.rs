//! CLI argument parsing for the review trend tool.
//!
//! CLI flags override all other config sources.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use review_types::parse_date;

/// Review Trends
///
/// Clusters daily customer reviews into topics, keeps a persistent topic
/// catalog, and tracks per-topic counts over time.
#[derive(Parser, Debug)]
#[command(name = "review-trends")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/review-trends/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process one day's reviews
    Ingest {
        /// Batch date (YYYY-MM-DD)
        #[arg(short, long, value_parser = parse_date)]
        date: NaiveDate,

        /// Reviews file, one review per line (default: stdin)
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Show the topic × date trend table
    Report {
        /// First date to include (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,

        /// Last date to include (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,

        /// Only show the most recent N dates
        #[arg(long)]
        last: Option<usize>,
    },

    /// List registered topics
    Topics,

    /// Delete the topic catalog and trend table
    Reset {
        /// Delete without asking (otherwise only lists what would go)
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the effective configuration
    Config,
}
