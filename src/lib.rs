//! Reputation and metrics aggregation for rated subjects.
//!
//! Turns a subject's mutable set of ratings into a current snapshot, a
//! growth-sampled timeline that is corrected retroactively when a rating is
//! removed, and an on-demand 0-100 reputation score.

pub mod config;
pub mod engine;
mod error;
pub mod lock;
pub mod metrics;
pub mod rating;
pub mod reputation;
pub mod store;
pub mod subject;
pub mod timeline;

pub use config::EngineConfig;
pub use engine::{
    ChangeOutcome, Clock, MetricsEngine, MetricsRecomputed, RatingChange, RecomputeOptions,
    SubjectComparison, SystemClock, METRICS_RECOMPUTED,
};
pub use error::EngineError;
pub use lock::{InMemoryLock, InMemoryLockManager, LockError, LockGuard, LockManager, SubjectLock};
pub use metrics::{aggregate, DimensionAverages, MetricsSnapshot};
pub use rating::{Dimension, InMemoryRatingStore, Rating, RatingStore, SubDimensions};
pub use reputation::{compute_reputation, rank, Quality, ReputationResult, Trend};
pub use store::{InMemorySubjectStore, SubjectStore, Versioned};
pub use subject::{MutationOutcome, SubjectMetrics};
pub use timeline::{correct, growth_checkpoint, record, CorrectionReport, Timeline, TimelineEntry};

// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
