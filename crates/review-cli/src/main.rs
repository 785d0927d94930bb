//! Review Trends
//!
//! Turns daily batches of customer reviews into a stable topic catalog and
//! a per-day topic count table.
//!
//! # Usage
//!
//! ```bash
//! review-trends ingest --date 2024-06-01 --file reviews.txt
//! review-trends report --last 7
//! review-trends topics
//! review-trends reset --yes
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/review-trends/config.toml)
//! 3. `--config` file
//! 4. Environment variables (REVIEW_TRENDS_*)
//! 5. CLI flags

use anyhow::Result;
use clap::Parser;

use review_cli::{
    handle_config, handle_ingest, handle_report, handle_reset, handle_topics, init_logging,
    load_settings, Cli, Commands,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref(), cli.log_level.as_deref())?;
    init_logging(&settings.log_level)?;

    match cli.command {
        Commands::Ingest { date, file } => {
            handle_ingest(&settings, date, file.as_deref())?;
        }
        Commands::Report { from, to, last } => {
            handle_report(&settings, from, to, last)?;
        }
        Commands::Topics => {
            handle_topics(&settings)?;
        }
        Commands::Reset { yes } => {
            handle_reset(&settings, yes)?;
        }
        Commands::Config => {
            handle_config(&settings)?;
        }
    }

    Ok(())
}
