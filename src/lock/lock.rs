use std::sync::Arc;

use tracing::warn;

use super::LockError;

/// A single subject's lock.
///
/// In-memory locks use `Mutex` + `Condvar`; a multi-process deployment would
/// back this with an advisory lock or lease in the shared database.
pub trait SubjectLock: Send + Sync {
    /// Acquire the lock, blocking until it becomes available.
    fn lock(&self) -> Result<(), LockError>;

    /// Try to acquire the lock without blocking.
    /// Returns `Ok(true)` if acquired, `Ok(false)` if already held.
    fn try_lock(&self) -> Result<bool, LockError>;

    fn unlock(&self) -> Result<(), LockError>;
}

/// Hands out one lock per subject id.
pub trait LockManager: Send + Sync {
    type Lock: SubjectLock;

    /// Get (or create) the lock for `subject_id`.
    ///
    /// Repeated calls with the same id must return the same logical lock.
    fn get_lock(&self, subject_id: &str) -> Result<Arc<Self::Lock>, LockError>;
}

/// Holds a subject lock and releases it on drop, including on early return
/// through `?` and on panic unwinding.
pub struct LockGuard<L: SubjectLock> {
    lock: Arc<L>,
    subject_id: String,
}

impl<L: SubjectLock> LockGuard<L> {
    /// Block until the subject's lock is held.
    pub fn acquire<M>(manager: &M, subject_id: &str) -> Result<Self, LockError>
    where
        M: LockManager<Lock = L>,
    {
        let lock = manager.get_lock(subject_id)?;
        lock.lock()?;
        Ok(LockGuard {
            lock,
            subject_id: subject_id.to_string(),
        })
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }
}

impl<L: SubjectLock> Drop for LockGuard<L> {
    fn drop(&mut self) {
        if let Err(err) = self.lock.unlock() {
            warn!(subject_id = %self.subject_id, error = %err, "failed to release subject lock");
        }
    }
}
