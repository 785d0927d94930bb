//! Command implementations.
//!
//! Each handler loads what it needs from disk, does its work, and persists
//! before returning. Nothing is kept between invocations.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, BufRead, BufReader};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info};

use review_embeddings::load_vectorizer;
use review_topics::{CatalogStore, TopicMemory};
use review_trends::{DailyPipeline, DayReport, TrendMatrix, TrendStore};
use review_types::format_date;

use crate::settings::Settings;

/// Load settings and apply CLI overrides (highest precedence).
pub fn load_settings(config_path: Option<&str>, log_level_override: Option<&str>) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;
    if let Some(log_level) = log_level_override {
        settings.log_level = log_level.to_string();
    }
    Ok(settings)
}

/// Install the global tracing subscriber. `RUST_LOG` wins over the
/// configured level.
pub fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// One review per non-blank line, trimmed.
pub fn read_reviews(reader: impl BufRead) -> Result<Vec<String>> {
    let mut reviews = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read reviews")?;
        let line = line.trim();
        if !line.is_empty() {
            reviews.push(line.to_string());
        }
    }
    Ok(reviews)
}

/// Build the daily pipeline from settings.
pub fn build_pipeline(settings: &Settings) -> Result<DailyPipeline> {
    let vectorizer = load_vectorizer(&settings.embeddings).context("Failed to load vectorizer")?;
    let pipeline = DailyPipeline::new(
        vectorizer,
        &settings.topics,
        CatalogStore::new(settings.catalog_path()),
        TrendStore::new(settings.trend_path()),
    )?;
    Ok(pipeline)
}

/// Run one day's batch through the pipeline.
pub fn run_ingest(settings: &Settings, date: NaiveDate, reviews: &[String]) -> Result<DayReport> {
    let mut pipeline = build_pipeline(settings)?;
    let report = pipeline
        .run_day(date, reviews)
        .with_context(|| format!("Failed to process batch for {}", format_date(date)))?;
    Ok(report)
}

pub fn handle_ingest(settings: &Settings, date: NaiveDate, file: Option<&str>) -> Result<()> {
    let reviews = match file {
        Some(path) => {
            let f = fs::File::open(path).with_context(|| format!("Failed to open {}", path))?;
            read_reviews(BufReader::new(f))?
        }
        None => read_reviews(io::stdin().lock())?,
    };
    info!(count = reviews.len(), date = %format_date(date), "Ingesting reviews");

    let report = run_ingest(settings, date, &reviews)?;
    print!("{}", format_day_report(&report));
    Ok(())
}

pub fn format_day_report(report: &DayReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Date: {}", format_date(report.date));
    if report.matched.is_empty() && report.registered.is_empty() {
        let _ = writeln!(out, "No reviews.");
        return out;
    }
    let _ = writeln!(out, "Existing topics: {}", report.matched.len());
    for topic in &report.matched {
        let _ = writeln!(out, "  {:>4}  {}", topic.count, topic.label);
    }
    let _ = writeln!(out, "New topics: {}", report.registered.len());
    for topic in &report.registered {
        let _ = writeln!(out, "  {:>4}  {}", topic.count, topic.label);
    }
    out
}

/// Load the trend table and pivot it for the requested window.
pub fn build_report(
    settings: &Settings,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    last: Option<usize>,
) -> Result<TrendMatrix> {
    let store = TrendStore::new(settings.trend_path());
    let matrix = store.matrix(from, to).context("Failed to read trend table")?;
    Ok(match last {
        Some(n) => matrix.last_dates(n),
        None => matrix,
    })
}

pub fn handle_report(
    settings: &Settings,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    last: Option<usize>,
) -> Result<()> {
    let matrix = build_report(settings, from, to, last)?;
    if matrix.is_empty() {
        println!("No trend data.");
    } else {
        print!("{}", matrix);
    }
    Ok(())
}

pub fn format_topics(memory: &TopicMemory) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Topics: {}", memory.len());
    for (i, entry) in memory.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>4}. {}  (first seen {})",
            i + 1,
            entry.label,
            format_date(entry.first_seen)
        );
        if !entry.exemplar.is_empty() && entry.exemplar != entry.label {
            let _ = writeln!(out, "      e.g. \"{}\"", entry.exemplar);
        }
    }
    out
}

pub fn handle_topics(settings: &Settings) -> Result<()> {
    let memory = CatalogStore::new(settings.catalog_path())
        .load()
        .context("Failed to load topic catalog")?;
    print!("{}", format_topics(&memory));
    Ok(())
}

/// Remove the catalog and trend table. Returns (catalog removed, table
/// removed).
pub fn reset(settings: &Settings) -> Result<(bool, bool)> {
    let catalog = CatalogStore::new(settings.catalog_path())
        .clear()
        .context("Failed to remove topic catalog")?;
    let trends = TrendStore::new(settings.trend_path())
        .clear()
        .context("Failed to remove trend table")?;
    Ok((catalog, trends))
}

pub fn handle_reset(settings: &Settings, yes: bool) -> Result<()> {
    if !yes {
        println!("This would delete:");
        println!("  {}", settings.catalog_path().display());
        println!("  {}", settings.trend_path().display());
        println!("Re-run with --yes to proceed.");
        return Ok(());
    }
    let (catalog, trends) = reset(settings)?;
    debug!(catalog, trends, "Reset complete");
    println!(
        "Catalog: {}. Trend table: {}.",
        if catalog { "removed" } else { "not present" },
        if trends { "removed" } else { "not present" }
    );
    Ok(())
}

pub fn handle_config(settings: &Settings) -> Result<()> {
    let rendered = toml::to_string_pretty(settings).context("Failed to render settings")?;
    print!("{}", rendered);
    Ok(())
}
