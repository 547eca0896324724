//! RatingStore - the read contract the engine needs from the Rating Store.

use crate::error::EngineError;

use super::Rating;

/// Source of ground-truth ratings for a subject.
pub trait RatingStore: Send + Sync {
    /// All non-hidden ratings for the subject, in any order.
    fn visible_ratings(&self, subject_id: &str) -> Result<Vec<Rating>, EngineError>;
}

impl<T: RatingStore + ?Sized> RatingStore for std::sync::Arc<T> {
    fn visible_ratings(&self, subject_id: &str) -> Result<Vec<Rating>, EngineError> {
        (**self).visible_ratings(subject_id)
    }
}
