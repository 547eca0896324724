//! Integration tests for reputation scoring and subject comparison.

use chrono::{DateTime, Duration, TimeZone, Utc};
use subject_metrics::reputation::{ANCIENT_DAYS, STALE_DAYS};
use subject_metrics::{
    compute_reputation, rank, InMemoryRatingStore, InMemorySubjectStore, MetricsEngine, Quality,
    Rating, ReputationResult, Trend,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn seed(store: &InMemoryRatingStore, subject: &str, values: &[u8], verified: usize) {
    for (i, value) in values.iter().enumerate() {
        store
            .insert(
                Rating::new(format!("{subject}-{i}"), subject, *value)
                    .created_at(now() - Duration::days(i as i64 * 10))
                    .verified(i < verified),
            )
            .unwrap();
    }
}

#[test]
fn single_fresh_verified_review() {
    let rating = Rating::new("r1", "s1", 5)
        .created_at(now())
        .verified(true)
        .with_text("a".repeat(150));

    let result = compute_reputation(&[rating], now());

    assert_eq!(result.score, 80);
    assert_eq!(result.quality, Quality::Low);
}

#[test]
fn ratings_past_the_ancient_cutoff_weigh_as_stale() {
    let fresh = Rating::new("fresh", "s1", 5).created_at(now());
    let older_than = |days: f64| {
        Rating::new("old", "s1", 1).created_at(now() - Duration::days(days as i64 + 10))
    };

    let past_stale = compute_reputation(&[fresh.clone(), older_than(STALE_DAYS)], now());
    let past_ancient = compute_reputation(&[fresh, older_than(ANCIENT_DAYS)], now());

    assert_eq!(past_stale, past_ancient);
}

#[test]
fn unrated_subject() {
    assert_eq!(
        compute_reputation(&[], now()),
        ReputationResult {
            score: 0,
            trend: Trend::Stable,
            quality: Quality::Low,
        }
    );
}

#[test]
fn reputation_ignores_hidden_ratings() {
    let ratings = InMemoryRatingStore::new();
    seed(&ratings, "s1", &[5, 5, 5, 5, 5], 5);
    ratings
        .insert(Rating::new("spam", "s1", 1).hidden(true))
        .unwrap();
    let engine = MetricsEngine::new(ratings, InMemorySubjectStore::new());

    let result = engine.reputation("s1", now()).unwrap();

    assert_eq!(result.score, 90);
    assert_eq!(result.quality, Quality::High);
}

#[test]
fn compare_names_the_leader() {
    let ratings = InMemoryRatingStore::new();
    seed(&ratings, "good", &[5, 5, 4, 5, 5, 4, 5, 5, 5, 5], 4);
    seed(&ratings, "poor", &[2, 1, 2, 3, 2], 0);
    let engine = MetricsEngine::new(ratings, InMemorySubjectStore::new());

    let comparison = engine.compare("good", "poor", now()).unwrap();

    assert_eq!(comparison.leader.as_deref(), Some("good"));
    assert_eq!(comparison.first.0, "good");
    assert_eq!(comparison.first.1.quality, Quality::High);
    assert_eq!(comparison.second.1.quality, Quality::Average);
    assert!(comparison.first.1.score > comparison.second.1.score);
}

#[test]
fn compare_tie_has_no_leader() {
    let ratings = InMemoryRatingStore::new();
    seed(&ratings, "a", &[4, 4, 4], 0);
    seed(&ratings, "b", &[4, 4, 4], 0);
    let engine = MetricsEngine::new(ratings, InMemorySubjectStore::new());

    let comparison = engine.compare("a", "b", now()).unwrap();

    assert_eq!(comparison.leader, None);
    assert_eq!(comparison.first.1, comparison.second.1);
}

#[test]
fn rank_subjects() {
    let ratings = InMemoryRatingStore::new();
    seed(&ratings, "mid", &[3, 3, 3, 3, 3], 0);
    seed(&ratings, "top", &[5, 5, 5, 5, 5], 0);
    seed(&ratings, "low", &[1, 1, 1, 1, 1], 0);
    let engine = MetricsEngine::new(ratings, InMemorySubjectStore::new());

    let mut results: Vec<_> = ["mid", "top", "low"]
        .into_iter()
        .map(|id| (id, engine.reputation(id, now()).unwrap()))
        .collect();
    rank(&mut results);

    let order: Vec<_> = results.iter().map(|(id, _)| *id).collect();
    assert_eq!(order, vec!["top", "mid", "low"]);
}
