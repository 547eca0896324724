//! InMemorySubjectStore - HashMap-backed subject store for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::EngineError;
use crate::subject::SubjectMetrics;

use super::{SubjectStore, Versioned};

struct StoredDocument {
    bytes: Vec<u8>,
    version: u64,
}

/// In-memory subject store. Documents are kept bitcode-encoded, the way a
/// real backend would hold them as an opaque blob. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemorySubjectStore {
    storage: Arc<RwLock<HashMap<String, StoredDocument>>>,
}

impl InMemorySubjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn decode(stored: &StoredDocument) -> Result<Versioned<SubjectMetrics>, EngineError> {
        let data: SubjectMetrics = bitcode::deserialize(&stored.bytes)?;
        Ok(Versioned {
            data,
            version: stored.version,
        })
    }
}

impl SubjectStore for InMemorySubjectStore {
    fn get(&self, subject_id: &str) -> Result<Option<Versioned<SubjectMetrics>>, EngineError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| EngineError::Storage("subject store poisoned".into()))?;
        storage.get(subject_id).map(Self::decode).transpose()
    }

    fn insert(&self, metrics: &SubjectMetrics) -> Result<Versioned<SubjectMetrics>, EngineError> {
        let bytes = bitcode::serialize(metrics)?;
        let mut storage = self
            .storage
            .write()
            .map_err(|_| EngineError::Storage("subject store poisoned".into()))?;

        if storage.contains_key(&metrics.subject_id) {
            return Err(EngineError::AlreadyExists(metrics.subject_id.clone()));
        }
        storage.insert(
            metrics.subject_id.clone(),
            StoredDocument { bytes, version: 1 },
        );

        Ok(Versioned {
            data: metrics.clone(),
            version: 1,
        })
    }

    fn update(
        &self,
        metrics: &SubjectMetrics,
        expected_version: u64,
    ) -> Result<Versioned<SubjectMetrics>, EngineError> {
        let bytes = bitcode::serialize(metrics)?;
        let mut storage = self
            .storage
            .write()
            .map_err(|_| EngineError::Storage("subject store poisoned".into()))?;

        // A document deleted underneath the writer reports actual version 0.
        let actual = storage
            .get(&metrics.subject_id)
            .map(|stored| stored.version)
            .unwrap_or(0);
        if actual == 0 || actual != expected_version {
            return Err(EngineError::ConcurrencyConflict {
                subject_id: metrics.subject_id.clone(),
                expected: expected_version,
                actual,
            });
        }

        let version = actual + 1;
        storage.insert(
            metrics.subject_id.clone(),
            StoredDocument { bytes, version },
        );

        Ok(Versioned {
            data: metrics.clone(),
            version,
        })
    }

    fn delete(&self, subject_id: &str) -> Result<bool, EngineError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| EngineError::Storage("subject store poisoned".into()))?;
        Ok(storage.remove(subject_id).is_some())
    }
}
