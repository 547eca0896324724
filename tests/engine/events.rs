use std::sync::mpsc;
use std::sync::Mutex;
use std::time::Duration;

use subject_metrics::Rating;

use crate::support::engine;

#[test]
fn listeners_hear_about_recomputations() {
    let (ratings, _, engine) = engine();
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    engine
        .on_recomputed(move |event| {
            let _ = tx.lock().unwrap().send(event);
        })
        .unwrap();

    engine.register_subject("s1").unwrap();
    ratings.insert(Rating::new("a", "s1", 4)).unwrap();
    ratings.insert(Rating::new("b", "s1", 2)).unwrap();
    engine.recompute_metrics("s1").unwrap();

    let event = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(event.subject_id, "s1");
    assert_eq!(event.total_count, 2);
    assert_eq!(event.average_rating, 3.0);
    assert_eq!(event.timeline_len, 1);
}

#[test]
fn missing_subject_emits_nothing() {
    let (_, _, engine) = engine();
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    engine
        .on_recomputed(move |event| {
            let _ = tx.lock().unwrap().send(event);
        })
        .unwrap();

    assert!(engine.recompute_metrics("ghost").unwrap().is_none());
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
}
