//! Subject document storage with optimistic concurrency.
//!
//! The snapshot and timeline of a subject are written by a single `update`
//! guarded by the version read beforehand. A failed write leaves the previous
//! document in place.

mod in_memory;

use crate::error::EngineError;
use crate::subject::SubjectMetrics;

pub use in_memory::InMemorySubjectStore;

/// A versioned wrapper around stored data for optimistic concurrency control.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

/// Persistent home of subject documents.
pub trait SubjectStore: Send + Sync {
    /// Load a subject's document. `None` means the subject does not exist.
    fn get(&self, subject_id: &str) -> Result<Option<Versioned<SubjectMetrics>>, EngineError>;

    /// Create a document. Fails with `AlreadyExists` if one is present.
    fn insert(&self, metrics: &SubjectMetrics) -> Result<Versioned<SubjectMetrics>, EngineError>;

    /// Replace a document if its stored version still equals `expected_version`.
    fn update(
        &self,
        metrics: &SubjectMetrics,
        expected_version: u64,
    ) -> Result<Versioned<SubjectMetrics>, EngineError>;

    /// Delete a document. Returns true if it existed.
    fn delete(&self, subject_id: &str) -> Result<bool, EngineError>;
}

impl<T: SubjectStore + ?Sized> SubjectStore for std::sync::Arc<T> {
    fn get(&self, subject_id: &str) -> Result<Option<Versioned<SubjectMetrics>>, EngineError> {
        (**self).get(subject_id)
    }

    fn insert(&self, metrics: &SubjectMetrics) -> Result<Versioned<SubjectMetrics>, EngineError> {
        (**self).insert(metrics)
    }

    fn update(
        &self,
        metrics: &SubjectMetrics,
        expected_version: u64,
    ) -> Result<Versioned<SubjectMetrics>, EngineError> {
        (**self).update(metrics, expected_version)
    }

    fn delete(&self, subject_id: &str) -> Result<bool, EngineError> {
        (**self).delete(subject_id)
    }
}
