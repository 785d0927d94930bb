//! End-to-end topic lifecycle tests.
//!
//! Batch → extraction → normalization → dedup → evolution → trend rows,
//! across consecutive days against the same catalog.

use pretty_assertions::assert_eq;

use e2e_tests::{day, TestHarness};
use review_embeddings::{load_vectorizer, EmbeddingsConfig};
use review_topics::{NormalizerConfig, TopicsConfig};
use review_types::{TopicCount, TrendRecord};

const DAY_ONE: &[&str] = &[
    "App crashes on login.",
    "Cannot login to my account.",
    "I love this app.",
];

/// Login complaints cluster together, normalize to one canonical label and
/// are registered once, with a trend row counting both.
#[test]
fn test_login_complaints_register_one_topic() {
    let mut harness = TestHarness::new();

    let report = harness.run_day(day(1), DAY_ONE);

    assert!(report.matched.is_empty());
    assert_eq!(
        report.registered,
        vec![
            TopicCount::new("Login issues", 2),
            TopicCount::new("I love this app.", 1),
        ]
    );

    let catalog = harness.catalog();
    assert_eq!(catalog.labels(), vec!["Login issues", "I love this app."]);
    let login = catalog.find("Login issues").unwrap();
    assert_eq!(login.first_seen, day(1));
    assert_eq!(login.exemplar, "App crashes on login.");

    assert_eq!(
        harness.trend_rows(),
        vec![
            TrendRecord::new(day(1), "Login issues", 2),
            TrendRecord::new(day(1), "I love this app.", 1),
        ]
    );
}

/// A new phrasing of a known complaint on a later day reuses the catalog
/// label instead of registering a new topic.
#[test]
fn test_resubmission_matches_existing_topic() {
    let mut harness = TestHarness::new();
    harness.run_day(day(1), DAY_ONE);

    let report = harness.run_day(day(2), &["Login failed, please fix."]);

    assert_eq!(report.matched, vec![TopicCount::new("Login issues", 1)]);
    assert!(report.registered.is_empty());
    assert_eq!(harness.catalog().len(), 2);
    assert_eq!(
        harness.trend_rows().last(),
        Some(&TrendRecord::new(day(2), "Login issues", 1))
    );
}

/// The shipped vectorizer and thresholds handle the login scenario on their
/// own, without the keyword test vectorizer.
#[test]
fn test_login_scenario_with_default_vectorizer() {
    let vectorizer = load_vectorizer(&EmbeddingsConfig::default()).unwrap();
    let mut harness = TestHarness::with_config(vectorizer, TopicsConfig::default());

    let first = harness.run_day(day(1), DAY_ONE);
    assert_eq!(
        first.registered,
        vec![
            TopicCount::new("Login issues", 2),
            TopicCount::new("I love this app.", 1),
        ]
    );
    assert_eq!(harness.catalog().labels(), vec!["Login issues", "I love this app."]);

    let second = harness.run_day(day(2), &["Login failed, please fix."]);
    assert_eq!(second.matched, vec![TopicCount::new("Login issues", 1)]);
    assert!(second.registered.is_empty());
    assert_eq!(harness.catalog().len(), 2);
    assert_eq!(
        harness.trend_rows(),
        vec![
            TrendRecord::new(day(1), "Login issues", 2),
            TrendRecord::new(day(1), "I love this app.", 1),
            TrendRecord::new(day(2), "Login issues", 1),
        ]
    );
}

/// Without normalizer rules the catalog label still wins: similarity alone
/// maps the candidate onto the stored topic.
#[test]
fn test_dedup_assigns_catalog_label() {
    let config = TopicsConfig {
        normalizer: NormalizerConfig { rules: Vec::new() },
        ..TopicsConfig::default()
    };
    let mut harness =
        TestHarness::with_config(std::sync::Arc::new(e2e_tests::KeywordVectorizer::new()), config);

    harness.run_day(day(1), &["Cannot login to my account."]);
    let report = harness.run_day(day(2), &["Password reset never arrives."]);

    assert_eq!(
        report.matched,
        vec![TopicCount::new("Cannot login to my account.", 1)]
    );
    assert_eq!(harness.catalog().len(), 1);
}

/// Mixed day: one known topic, one unseen topic.
#[test]
fn test_mixed_day_splits_matched_and_registered() {
    let mut harness = TestHarness::new();
    harness.run_day(day(1), DAY_ONE);

    let report = harness.run_day(
        day(2),
        &["I can't log in since the update.", "Pizza arrived cold.", "Food was cold again."],
    );

    assert_eq!(report.matched, vec![TopicCount::new("Login issues", 1)]);
    assert_eq!(report.registered.len(), 1);
    assert_eq!(report.registered[0].count, 2);

    // Matched rows are written before registered ones
    let rows = harness.trend_rows();
    let day_two: Vec<&str> = rows
        .iter()
        .filter(|r| r.date == day(2))
        .map(|r| r.topic.as_str())
        .collect();
    assert_eq!(day_two[0], "Login issues");
    assert_eq!(day_two.len(), 2);

    let catalog = harness.catalog();
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.entries()[2].first_seen, day(2));
}

/// Re-running a date appends rows; the pivot sums them.
#[test]
fn test_repeated_date_accumulates() {
    let mut harness = TestHarness::new();
    harness.run_day(day(1), DAY_ONE);
    harness.run_day(day(1), DAY_ONE);

    assert_eq!(harness.catalog().len(), 2);
    assert_eq!(harness.trend_rows().len(), 4);

    let matrix = harness.pipeline.trends().matrix(None, None).unwrap();
    assert_eq!(matrix.dates, vec![day(1)]);
    assert_eq!(matrix.count("Login issues", day(1)), 4);
    assert_eq!(matrix.count("I love this app.", day(1)), 2);
}

#[test]
fn test_weekly_report_window() {
    let mut harness = TestHarness::new();
    for n in 1..=9 {
        harness.run_day(day(n), &["Login failed, please fix."]);
    }

    let week = harness
        .pipeline
        .trends()
        .matrix(None, None)
        .unwrap()
        .last_dates(7);
    assert_eq!(week.dates.first(), Some(&day(3)));
    assert_eq!(week.dates.len(), 7);
    assert_eq!(week.topics(), vec!["Login issues"]);
    assert_eq!(week.total_for("Login issues"), 7);
}
