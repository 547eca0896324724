use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use subject_metrics::{
    Clock, EngineError, InMemoryLockManager, InMemoryRatingStore, InMemorySubjectStore,
    MetricsEngine, SubjectMetrics, SubjectStore, Versioned,
};

pub type TestEngine<S = InMemorySubjectStore> =
    MetricsEngine<InMemoryRatingStore, S, InMemoryLockManager, TestClock>;

pub fn day(n: f64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes((n * 1440.0) as i64)
}

/// A clock the test moves by hand. Clones share the same time.
#[derive(Clone)]
pub struct TestClock(Arc<Mutex<DateTime<Utc>>>);

impl TestClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        TestClock(Arc::new(Mutex::new(now)))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.0.lock().unwrap() = now;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Route engine logs to the test harness; `RUST_LOG=subject_metrics=debug` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn engine_with<S: SubjectStore>(subjects: S) -> (InMemoryRatingStore, TestClock, TestEngine<S>) {
    init_tracing();
    let ratings = InMemoryRatingStore::new();
    let clock = TestClock::at(day(0.0));
    let engine = MetricsEngine::new(ratings.clone(), subjects).with_clock(clock.clone());
    (ratings, clock, engine)
}

pub fn engine() -> (InMemoryRatingStore, TestClock, TestEngine) {
    engine_with(InMemorySubjectStore::new())
}

/// Subject store whose writes can be made to fail or to conflict.
#[derive(Clone, Default)]
pub struct FaultyStore {
    pub inner: InMemorySubjectStore,
    fail_writes: Arc<AtomicBool>,
    conflicts_left: Arc<AtomicU32>,
    pub update_calls: Arc<AtomicU32>,
}

impl FaultyStore {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn conflict_next(&self, count: u32) {
        self.conflicts_left.store(count, Ordering::SeqCst);
    }
}

impl SubjectStore for FaultyStore {
    fn get(&self, subject_id: &str) -> Result<Option<Versioned<SubjectMetrics>>, EngineError> {
        self.inner.get(subject_id)
    }

    fn insert(&self, metrics: &SubjectMetrics) -> Result<Versioned<SubjectMetrics>, EngineError> {
        self.inner.insert(metrics)
    }

    fn update(
        &self,
        metrics: &SubjectMetrics,
        expected_version: u64,
    ) -> Result<Versioned<SubjectMetrics>, EngineError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(EngineError::Storage("backend unavailable".into()));
        }
        let pending = self.conflicts_left.load(Ordering::SeqCst);
        if pending > 0 {
            self.conflicts_left.store(pending - 1, Ordering::SeqCst);
            return Err(EngineError::ConcurrencyConflict {
                subject_id: metrics.subject_id.clone(),
                expected: expected_version,
                actual: expected_version + 1,
            });
        }
        self.inner.update(metrics, expected_version)
    }

    fn delete(&self, subject_id: &str) -> Result<bool, EngineError> {
        self.inner.delete(subject_id)
    }
}
