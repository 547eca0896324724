//! Process-local subject locks.
//!
//! The manager only holds weak references: a subject's lock lives as long as
//! some recomputation holds or waits on it, and its table entry is pruned once
//! the last one finishes. Subjects that are idle, or that never existed, cost
//! nothing between calls.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, Weak};

use tracing::trace;

use super::{LockError, LockManager, SubjectLock};

/// One subject's lock: a held flag plus a condvar for waiting writers.
pub struct InMemoryLock {
    subject_id: String,
    held: Mutex<bool>,
    released: Condvar,
}

impl InMemoryLock {
    pub fn new(subject_id: impl Into<String>) -> Self {
        InMemoryLock {
            subject_id: subject_id.into(),
            held: Mutex::new(false),
            released: Condvar::new(),
        }
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    fn poisoned(&self) -> LockError {
        LockError::Poisoned(format!("lock for subject {}", self.subject_id))
    }
}

impl SubjectLock for InMemoryLock {
    fn lock(&self) -> Result<(), LockError> {
        let mut held = self.held.lock().map_err(|_| self.poisoned())?;
        if *held {
            trace!(subject_id = %self.subject_id, "waiting for subject lock");
        }
        while *held {
            held = self.released.wait(held).map_err(|_| self.poisoned())?;
        }
        *held = true;
        Ok(())
    }

    fn try_lock(&self) -> Result<bool, LockError> {
        let mut held = self.held.lock().map_err(|_| self.poisoned())?;
        Ok(!std::mem::replace(&mut *held, true))
    }

    fn unlock(&self) -> Result<(), LockError> {
        let mut held = self.held.lock().map_err(|_| self.poisoned())?;
        if std::mem::replace(&mut *held, false) {
            self.released.notify_one();
        }
        Ok(())
    }
}

type LockTable = HashMap<String, Weak<InMemoryLock>>;

/// Hands out per-subject [`InMemoryLock`]s.
///
/// Callers that ask for the same subject while a previous `Arc` is still alive
/// get that same lock. Once every `Arc` is dropped the entry is forgotten.
#[derive(Default)]
pub struct InMemoryLockManager {
    locks: Mutex<LockTable>,
}

impl InMemoryLockManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of subjects whose lock is currently held or awaited.
    pub fn tracked_subjects(&self) -> Result<usize, LockError> {
        let mut locks = self.table()?;
        prune(&mut locks);
        Ok(locks.len())
    }

    fn table(&self) -> Result<MutexGuard<'_, LockTable>, LockError> {
        self.locks
            .lock()
            .map_err(|_| LockError::Poisoned("subject lock table".into()))
    }
}

fn prune(locks: &mut LockTable) {
    locks.retain(|_, lock| lock.strong_count() > 0);
}

impl LockManager for InMemoryLockManager {
    type Lock = InMemoryLock;

    fn get_lock(&self, subject_id: &str) -> Result<Arc<InMemoryLock>, LockError> {
        let mut locks = self.table()?;
        if let Some(lock) = locks.get(subject_id).and_then(Weak::upgrade) {
            return Ok(lock);
        }
        prune(&mut locks);
        let lock = Arc::new(InMemoryLock::new(subject_id));
        locks.insert(subject_id.to_string(), Arc::downgrade(&lock));
        Ok(lock)
    }
}
