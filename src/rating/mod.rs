//! Rating records as read from the external Rating Store.
//!
//! The engine never authors or edits ratings. It reads the visible set for a
//! subject, and it is handed the full record of a rating that was just deleted
//! or hidden so the timeline can be corrected after the record is gone.

mod in_memory;
mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub use in_memory::InMemoryRatingStore;
pub use store::RatingStore;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

/// The optional per-dimension scores of a rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubDimensions {
    pub trust: Option<u8>,
    pub value: Option<u8>,
    pub authenticity: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Trust,
    Value,
    Authenticity,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Trust, Dimension::Value, Dimension::Authenticity];
}

impl SubDimensions {
    pub fn get(&self, dimension: Dimension) -> Option<u8> {
        match dimension {
            Dimension::Trust => self.trust,
            Dimension::Value => self.value,
            Dimension::Authenticity => self.authenticity,
        }
    }
}

/// One user's scored opinion of a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: String,
    pub subject_id: String,
    pub value: u8,
    #[serde(default)]
    pub sub_dimensions: SubDimensions,
    pub created_at: DateTime<Utc>,
    /// Purchase confirmed.
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub hidden: bool,
}

impl Rating {
    /// A visible, unverified rating without text or sub-dimensions, created now.
    pub fn new(id: impl Into<String>, subject_id: impl Into<String>, value: u8) -> Self {
        Rating {
            id: id.into(),
            subject_id: subject_id.into(),
            value,
            sub_dimensions: SubDimensions::default(),
            created_at: Utc::now(),
            verified: false,
            text: String::new(),
            hidden: false,
        }
    }

    pub fn with_sub_dimensions(mut self, sub_dimensions: SubDimensions) -> Self {
        self.sub_dimensions = sub_dimensions;
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn verified(mut self, verified: bool) -> Self {
        self.verified = verified;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Check that the overall score and every present sub-dimension lie in `[1, 5]`.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&self.value) {
            return Err(EngineError::invalid_rating(
                &self.id,
                format!("value {} outside [{MIN_SCORE}, {MAX_SCORE}]", self.value),
            ));
        }
        for dimension in Dimension::ALL {
            if let Some(score) = self.sub_dimensions.get(dimension) {
                if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
                    return Err(EngineError::invalid_rating(
                        &self.id,
                        format!("{dimension:?} score {score} outside [{MIN_SCORE}, {MAX_SCORE}]"),
                    ));
                }
            }
        }
        Ok(())
    }
}
