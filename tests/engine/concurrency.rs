use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;

use subject_metrics::{EngineConfig, EngineError, Rating};

use crate::support::{day, engine, engine_with, FaultyStore};

#[test]
fn concurrent_mutations_of_one_subject_are_not_lost() {
    let (ratings, _, engine) = engine();
    engine.register_subject("s1").unwrap();
    let engine = Arc::new(engine);

    let handles: Vec<_> = (0..15)
        .map(|i| {
            let engine = Arc::clone(&engine);
            let ratings = ratings.clone();
            thread::spawn(move || {
                ratings
                    .insert(Rating::new(format!("r{i}"), "s1", (i % 5 + 1) as u8))
                    .unwrap();
                engine.recompute_metrics("s1").unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let doc = engine.metrics("s1").unwrap().unwrap();
    assert_eq!(doc.snapshot.total_count, 15);
    assert!((doc.snapshot.average_rating - 3.0).abs() < 1e-9);
}

#[test]
fn different_subjects_recompute_in_parallel() {
    let (ratings, _, engine) = engine();
    let engine = Arc::new(engine);
    for s in 0..4 {
        engine.register_subject(&format!("s{s}")).unwrap();
    }

    let handles: Vec<_> = (0..4)
        .map(|s| {
            let engine = Arc::clone(&engine);
            let ratings = ratings.clone();
            thread::spawn(move || {
                let subject = format!("s{s}");
                for i in 0..10 {
                    ratings
                        .insert(Rating::new(format!("{subject}-r{i}"), subject.as_str(), 4))
                        .unwrap();
                    engine.recompute_metrics(&subject).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for s in 0..4 {
        let doc = engine.metrics(&format!("s{s}")).unwrap().unwrap();
        assert_eq!(doc.snapshot.total_count, 10);
    }
}

#[test]
fn conflicts_are_retried() {
    let store = FaultyStore::default();
    let (ratings, _, engine) = engine_with(store.clone());
    engine.register_subject("s1").unwrap();
    ratings.insert(Rating::new("a", "s1", 4)).unwrap();

    store.conflict_next(2);
    let snapshot = engine.recompute_metrics("s1").unwrap().unwrap();

    assert_eq!(snapshot.total_count, 1);
    assert_eq!(store.update_calls.load(Ordering::SeqCst), 3);
}

#[test]
fn persistent_conflict_reaches_the_caller() {
    let store = FaultyStore::default();
    let (ratings, _, engine) = engine_with(store.clone());
    let engine = engine
        .with_config(EngineConfig {
            max_conflict_retries: 1,
            ..EngineConfig::default()
        })
        .unwrap();
    engine.register_subject("s1").unwrap();
    ratings.insert(Rating::new("a", "s1", 4)).unwrap();

    store.conflict_next(5);
    let err = engine.recompute_metrics("s1").unwrap_err();

    assert!(matches!(err, EngineError::ConcurrencyConflict { .. }));
    assert_eq!(store.update_calls.load(Ordering::SeqCst), 2);
    assert_eq!(engine.metrics("s1").unwrap().unwrap().snapshot.total_count, 0);
}

#[test]
fn failed_write_leaves_prior_state_untouched() {
    let store = FaultyStore::default();
    let (ratings, clock, engine) = engine_with(store.clone());
    engine.register_subject("s1").unwrap();
    ratings.insert(Rating::new("a", "s1", 5).created_at(day(0.0))).unwrap();
    clock.set(day(1.0));
    engine.recompute_metrics("s1").unwrap();
    let before = engine.metrics("s1").unwrap().unwrap();

    let removed = ratings.remove("a").unwrap().unwrap();
    store.fail_writes(true);
    let err = engine
        .recompute_metrics_after_removal("s1", &removed)
        .unwrap_err();

    assert_eq!(err, EngineError::Storage("backend unavailable".into()));
    assert_eq!(engine.metrics("s1").unwrap().unwrap(), before);

    // The lock was released: the retry after recovery goes through.
    store.fail_writes(false);
    let snapshot = engine
        .recompute_metrics_after_removal("s1", &removed)
        .unwrap()
        .unwrap();
    assert!(snapshot.is_empty());
}
