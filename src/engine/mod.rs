//! MetricsEngine - the operations the rating handlers call.
//!
//! A recomputation takes the subject's lock, reads its document and visible
//! ratings, runs the pure pipeline on [`SubjectMetrics`], and writes the whole
//! document back with a version check. Any failure leaves the stored document
//! as it was.
//!
//! ## Example
//!
//! ```ignore
//! let engine = MetricsEngine::new(ratings.clone(), InMemorySubjectStore::new());
//! engine.register_subject("subject-1")?;
//!
//! ratings.insert(rating)?;
//! engine.recompute_metrics("subject-1")?;
//!
//! let removed = ratings.remove("rating-1")?.unwrap();
//! engine.recompute_metrics_after_removal("subject-1", &removed)?;
//! ```

mod change;
mod clock;
mod events;

#[cfg(feature = "emitter")]
use std::sync::Mutex;

use chrono::{DateTime, Utc};
#[cfg(feature = "emitter")]
use event_emitter_rs::EventEmitter;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::lock::{InMemoryLockManager, LockGuard, LockManager};
use crate::metrics::MetricsSnapshot;
use crate::rating::{Rating, RatingStore};
use crate::reputation::{self, ReputationResult};
use crate::store::SubjectStore;
use crate::subject::SubjectMetrics;

pub use change::{ChangeOutcome, RatingChange};
pub use clock::{Clock, SystemClock};
pub use events::{MetricsRecomputed, METRICS_RECOMPUTED};

/// Extra inputs to a recomputation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecomputeOptions<'a> {
    /// The rating that was just deleted or hidden, as it was before the change.
    pub deleted_rating: Option<&'a Rating>,
}

/// Reputation of two subjects side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectComparison {
    pub first: (String, ReputationResult),
    pub second: (String, ReputationResult),
    /// Id of the higher-scoring subject; `None` on equal scores.
    pub leader: Option<String>,
}

pub struct MetricsEngine<R, S, L = InMemoryLockManager, C = SystemClock> {
    ratings: R,
    subjects: S,
    locks: L,
    clock: C,
    config: EngineConfig,
    #[cfg(feature = "emitter")]
    emitter: Mutex<EventEmitter>,
}

impl<R, S> MetricsEngine<R, S>
where
    R: RatingStore,
    S: SubjectStore,
{
    /// Engine with in-process locks, the system clock and default configuration.
    pub fn new(ratings: R, subjects: S) -> Self {
        MetricsEngine {
            ratings,
            subjects,
            locks: InMemoryLockManager::new(),
            clock: SystemClock,
            config: EngineConfig::default(),
            #[cfg(feature = "emitter")]
            emitter: Mutex::new(EventEmitter::new()),
        }
    }
}

impl<R, S, L, C> MetricsEngine<R, S, L, C>
where
    R: RatingStore,
    S: SubjectStore,
    L: LockManager,
    C: Clock,
{
    pub fn with_config(mut self, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Swap the lock manager, e.g. for one backed by a shared database.
    pub fn with_locks<L2: LockManager>(self, locks: L2) -> MetricsEngine<R, S, L2, C> {
        MetricsEngine {
            ratings: self.ratings,
            subjects: self.subjects,
            locks,
            clock: self.clock,
            config: self.config,
            #[cfg(feature = "emitter")]
            emitter: self.emitter,
        }
    }

    pub fn with_clock<C2: Clock>(self, clock: C2) -> MetricsEngine<R, S, L, C2> {
        MetricsEngine {
            ratings: self.ratings,
            subjects: self.subjects,
            locks: self.locks,
            clock,
            config: self.config,
            #[cfg(feature = "emitter")]
            emitter: self.emitter,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn locks(&self) -> &L {
        &self.locks
    }

    /// Create the zero-state document for a new subject.
    /// Returns false if the subject already had one.
    pub fn register_subject(&self, subject_id: &str) -> Result<bool, EngineError> {
        match self.subjects.insert(&SubjectMetrics::new(subject_id)) {
            Ok(_) => {
                debug!(subject_id, "registered subject");
                Ok(true)
            }
            Err(EngineError::AlreadyExists(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// The stored document of a subject.
    pub fn metrics(&self, subject_id: &str) -> Result<Option<SubjectMetrics>, EngineError> {
        Ok(self.subjects.get(subject_id)?.map(|versioned| versioned.data))
    }

    /// Recompute after a rating was created or edited.
    ///
    /// Returns `Ok(None)` when the subject does not exist.
    pub fn recompute_metrics(
        &self,
        subject_id: &str,
    ) -> Result<Option<MetricsSnapshot>, EngineError> {
        self.recompute(subject_id, RecomputeOptions::default())
    }

    /// Recompute after `deleted` was deleted or hidden, correcting the timeline.
    ///
    /// `deleted` is the record as it was before the change. If it was already
    /// hidden its contribution is gone from history and only the snapshot is
    /// recomputed.
    pub fn recompute_metrics_after_removal(
        &self,
        subject_id: &str,
        deleted: &Rating,
    ) -> Result<Option<MetricsSnapshot>, EngineError> {
        self.recompute(
            subject_id,
            RecomputeOptions {
                deleted_rating: Some(deleted),
            },
        )
    }

    pub fn recompute(
        &self,
        subject_id: &str,
        options: RecomputeOptions<'_>,
    ) -> Result<Option<MetricsSnapshot>, EngineError> {
        if let Some(deleted) = options.deleted_rating {
            deleted.validate()?;
            if deleted.subject_id != subject_id {
                return Err(EngineError::invalid_rating(
                    &deleted.id,
                    format!(
                        "belongs to subject {}, not {subject_id}",
                        deleted.subject_id
                    ),
                ));
            }
        }

        let deleted = match options.deleted_rating {
            Some(rating) if rating.hidden => {
                debug!(
                    subject_id,
                    rating_id = %rating.id,
                    "rating was already hidden, timeline left uncorrected"
                );
                None
            }
            other => other,
        };

        let _guard = LockGuard::acquire(&self.locks, subject_id)?;

        let mut retries = 0;
        loop {
            match self.recompute_locked(subject_id, deleted) {
                Err(EngineError::ConcurrencyConflict {
                    expected, actual, ..
                }) if retries < self.config.max_conflict_retries => {
                    retries += 1;
                    warn!(
                        subject_id,
                        expected, actual, retries, "metrics write conflicted, retrying"
                    );
                }
                result => return result,
            }
        }
    }

    fn recompute_locked(
        &self,
        subject_id: &str,
        deleted: Option<&Rating>,
    ) -> Result<Option<MetricsSnapshot>, EngineError> {
        let Some(current) = self.subjects.get(subject_id)? else {
            info!(subject_id, "subject not found, skipping metrics recomputation");
            return Ok(None);
        };

        let ratings = self.ratings.visible_ratings(subject_id)?;
        for rating in &ratings {
            rating.validate()?;
        }

        let outcome = current.data.apply_mutation(
            &ratings,
            deleted,
            self.clock.now(),
            self.config.growth_factor,
        );
        let saved = self.subjects.update(&outcome.metrics, current.version)?;

        debug!(
            subject_id,
            total_count = saved.data.snapshot.total_count,
            average_rating = saved.data.snapshot.average_rating,
            recorded = outcome.recorded,
            corrected = outcome.correction.adjusted,
            dropped = outcome.correction.dropped,
            version = saved.version,
            "metrics recomputed"
        );
        self.notify(&saved.data);

        Ok(Some(saved.data.snapshot))
    }

    /// Dispatch a rating mutation to the matching recomputation.
    pub fn handle(&self, change: RatingChange) -> Result<ChangeOutcome, EngineError> {
        if let RatingChange::AutoHidden(rating) = &change {
            if !self.config.recompute_on_auto_hide {
                info!(
                    subject_id = %rating.subject_id,
                    rating_id = %rating.id,
                    "automated hide left metrics stale"
                );
                return Ok(ChangeOutcome::Skipped);
            }
        }

        let options = RecomputeOptions {
            deleted_rating: change.removed_rating(),
        };
        Ok(match self.recompute(change.subject_id(), options)? {
            Some(snapshot) => ChangeOutcome::Recomputed(snapshot),
            None => ChangeOutcome::SubjectNotFound,
        })
    }

    /// Score `ratings` for `subject_id`. Read-only.
    pub fn compute_reputation(
        &self,
        subject_id: &str,
        ratings: &[Rating],
        now: DateTime<Utc>,
    ) -> ReputationResult {
        let result = reputation::compute_reputation(ratings, now);
        debug!(subject_id, score = result.score, trend = ?result.trend, quality = ?result.quality, "reputation computed");
        result
    }

    /// Score a subject from its currently visible ratings.
    pub fn reputation(
        &self,
        subject_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ReputationResult, EngineError> {
        let ratings = self.ratings.visible_ratings(subject_id)?;
        for rating in &ratings {
            rating.validate()?;
        }
        Ok(self.compute_reputation(subject_id, &ratings, now))
    }

    pub fn compare(
        &self,
        first: &str,
        second: &str,
        now: DateTime<Utc>,
    ) -> Result<SubjectComparison, EngineError> {
        let a = self.reputation(first, now)?;
        let b = self.reputation(second, now)?;
        let leader = match a.score.cmp(&b.score) {
            std::cmp::Ordering::Greater => Some(first.to_string()),
            std::cmp::Ordering::Less => Some(second.to_string()),
            std::cmp::Ordering::Equal => None,
        };
        Ok(SubjectComparison {
            first: (first.to_string(), a),
            second: (second.to_string(), b),
            leader,
        })
    }

    /// Subscribe to [`METRICS_RECOMPUTED`]. Listeners run on their own thread.
    /// Returns the listener id.
    #[cfg(feature = "emitter")]
    pub fn on_recomputed<F>(&self, listener: F) -> Result<String, EngineError>
    where
        F: Fn(MetricsRecomputed) + Send + Sync + 'static,
    {
        let mut emitter = self
            .emitter
            .lock()
            .map_err(|_| EngineError::Storage("event emitter poisoned".into()))?;
        Ok(emitter.on(METRICS_RECOMPUTED, move |payload: String| {
            match serde_json::from_str::<MetricsRecomputed>(&payload) {
                Ok(event) => listener(event),
                Err(err) => warn!(error = %err, "undecodable metrics event"),
            }
        }))
    }

    #[cfg(feature = "emitter")]
    fn notify(&self, metrics: &SubjectMetrics) {
        let payload = match serde_json::to_string(&MetricsRecomputed::from(metrics)) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(subject_id = %metrics.subject_id, error = %err, "failed to encode metrics event");
                return;
            }
        };
        match self.emitter.lock() {
            Ok(mut emitter) => {
                emitter.emit(METRICS_RECOMPUTED, payload);
            }
            Err(_) => warn!(subject_id = %metrics.subject_id, "event emitter poisoned"),
        }
    }

    #[cfg(not(feature = "emitter"))]
    fn notify(&self, _metrics: &SubjectMetrics) {}
}
