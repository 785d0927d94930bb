//! Review trends CLI library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `settings`: Layered configuration
//! - `commands`: Command implementations (ingest, report, topics, reset, config)

pub mod cli;
pub mod commands;
pub mod settings;

pub use cli::{Cli, Commands};
pub use commands::{
    build_pipeline, build_report, handle_config, handle_ingest, handle_report, handle_reset,
    handle_topics, init_logging, load_settings, read_reviews, reset, run_ingest,
};
pub use settings::Settings;
