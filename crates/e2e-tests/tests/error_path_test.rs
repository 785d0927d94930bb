//! Failure and degraded-storage behaviour of the daily pipeline.

use std::fs;
use std::sync::Arc;

use pretty_assertions::assert_eq;

use e2e_tests::{day, texts, TestHarness};
use review_embeddings::HashingVectorizer;
use review_topics::{CatalogStore, TopicsConfig, TopicsError};
use review_trends::{DailyPipeline, TrendError, TrendStore};
use review_types::TrendRecord;

#[test]
fn test_malformed_catalog_is_fatal() {
    let mut harness = TestHarness::new();
    fs::write(&harness.catalog_path, "{ this is not a catalog").unwrap();

    let err = harness
        .pipeline
        .run_day(day(1), &texts(&["Pizza arrived cold."]))
        .unwrap_err();
    assert!(matches!(
        err,
        TrendError::Topics(TopicsError::Serialization(_))
    ));
    // Nothing recorded for the failed day
    assert!(!harness.trend_path.exists());
}

#[test]
fn test_unreadable_trend_rows_are_dropped() {
    let mut harness = TestHarness::new();
    fs::write(
        &harness.trend_path,
        "Date,Topic,Count\n2024-05-31,Old topic,4\nnot-a-date,X,1\n",
    )
    .unwrap();

    harness.run_day(day(1), &["Pizza arrived cold."]);

    let old = chrono::NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
    assert_eq!(
        harness.trend_rows(),
        vec![
            TrendRecord::new(old, "Old topic", 4),
            TrendRecord::new(day(1), "Pizza arrived cold.", 1),
        ]
    );
}

#[test]
fn test_trend_table_with_wrong_header_is_replaced() {
    let mut harness = TestHarness::new();
    fs::write(&harness.trend_path, "When,What\n2024-05-31,X\n").unwrap();

    harness.run_day(day(1), &["Pizza arrived cold."]);

    assert_eq!(
        harness.trend_rows(),
        vec![TrendRecord::new(day(1), "Pizza arrived cold.", 1)]
    );
}

#[test]
fn test_catalog_from_other_vectorizer_is_rejected() {
    let mut harness = TestHarness::new();
    harness.run_day(day(1), &["Pizza arrived cold."]);

    let mut hashing = DailyPipeline::new(
        Arc::new(HashingVectorizer::default()),
        &TopicsConfig::default(),
        CatalogStore::new(&harness.catalog_path),
        TrendStore::new(&harness.trend_path),
    )
    .unwrap();
    let err = hashing
        .run_day(day(2), &texts(&["Pizza arrived cold."]))
        .unwrap_err();

    assert!(matches!(
        err,
        TrendError::Topics(TopicsError::DimensionMismatch {
            expected: 256,
            actual: 6
        })
    ));
    assert_eq!(harness.catalog().len(), 1);
}

#[test]
fn test_days_must_not_go_backwards() {
    let mut harness = TestHarness::new();
    harness.run_day(day(5), &["Pizza arrived cold."]);

    let err = harness
        .pipeline
        .run_day(day(4), &texts(&["Pizza arrived cold."]))
        .unwrap_err();
    match err {
        TrendError::OutOfOrder { date, last } => {
            assert_eq!(date, day(4));
            assert_eq!(last, day(5));
        }
        other => panic!("Expected OutOfOrder, got {other:?}"),
    }
    assert_eq!(harness.trend_rows().len(), 1);
}

#[test]
fn test_empty_batch_touches_nothing() {
    let mut harness = TestHarness::new();
    let report = harness.run_day(day(1), &[]);

    assert!(report.matched.is_empty());
    assert!(report.registered.is_empty());
    assert!(!harness.catalog_path.exists());
    assert!(!harness.trend_path.exists());
}

#[test]
fn test_empty_batch_after_data_keeps_state() {
    let mut harness = TestHarness::new();
    harness.run_day(day(1), &["Pizza arrived cold."]);
    let catalog = fs::read(&harness.catalog_path).unwrap();
    let trends = fs::read(&harness.trend_path).unwrap();

    harness.run_day(day(2), &[]);

    assert_eq!(fs::read(&harness.catalog_path).unwrap(), catalog);
    assert_eq!(fs::read(&harness.trend_path).unwrap(), trends);
}
