//! Per-subject write serialization.
//!
//! Every recomputation of a subject's metrics is a read-modify-write of one
//! document. Two recomputations of the same subject must not interleave, so
//! the engine takes the subject's lock for the whole read-compute-write cycle.
//! Different subjects map to different locks and never contend.

mod error;
mod in_memory;
mod lock;

pub use error::LockError;
pub use in_memory::{InMemoryLock, InMemoryLockManager};
pub use lock::{LockGuard, LockManager, SubjectLock};
