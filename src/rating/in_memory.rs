//! InMemoryRatingStore - HashMap-backed rating store for tests and demos.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::EngineError;

use super::{Rating, RatingStore};

/// In-memory rating store keyed by rating id. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryRatingStore {
    ratings: Arc<RwLock<HashMap<String, Rating>>>,
}

impl InMemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a rating.
    pub fn insert(&self, rating: Rating) -> Result<(), EngineError> {
        let mut ratings = self
            .ratings
            .write()
            .map_err(|_| EngineError::Storage("rating store poisoned".into()))?;
        ratings.insert(rating.id.clone(), rating);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Option<Rating>, EngineError> {
        let ratings = self
            .ratings
            .read()
            .map_err(|_| EngineError::Storage("rating store poisoned".into()))?;
        Ok(ratings.get(id).cloned())
    }

    /// Remove a rating, returning the record so it can be handed to the engine.
    pub fn remove(&self, id: &str) -> Result<Option<Rating>, EngineError> {
        let mut ratings = self
            .ratings
            .write()
            .map_err(|_| EngineError::Storage("rating store poisoned".into()))?;
        Ok(ratings.remove(id))
    }

    /// Set the hidden flag, returning the record as it was before.
    pub fn set_hidden(&self, id: &str, hidden: bool) -> Result<Option<Rating>, EngineError> {
        let mut ratings = self
            .ratings
            .write()
            .map_err(|_| EngineError::Storage("rating store poisoned".into()))?;
        Ok(ratings.get_mut(id).map(|rating| {
            let previous = rating.clone();
            rating.hidden = hidden;
            previous
        }))
    }
}

impl RatingStore for InMemoryRatingStore {
    fn visible_ratings(&self, subject_id: &str) -> Result<Vec<Rating>, EngineError> {
        let ratings = self
            .ratings
            .read()
            .map_err(|_| EngineError::Storage("rating store poisoned".into()))?;
        let mut visible: Vec<Rating> = ratings
            .values()
            .filter(|r| r.subject_id == subject_id && !r.hidden)
            .cloned()
            .collect();
        // HashMap order is random; keep aggregation input deterministic.
        visible.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(visible)
    }
}
