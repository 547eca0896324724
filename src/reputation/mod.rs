//! Weighted 0-100 reputation score over a subject's ratings.
//!
//! Pure and stateless: the caller supplies the ratings (already filtered for
//! visibility) and the reference time. Nothing here touches storage.

mod scorer;

use serde::{Deserialize, Serialize};

pub use scorer::{
    compute_reputation, rank, ANCIENT_DAYS, FRESH_DAYS, LONG_TEXT_UNITS, STALE_DAYS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    High,
    Average,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationResult {
    pub score: u8,
    pub trend: Trend,
    pub quality: Quality,
}

impl ReputationResult {
    /// The result for a subject nobody has rated.
    pub const UNRATED: ReputationResult = ReputationResult {
        score: 0,
        trend: Trend::Stable,
        quality: Quality::Low,
    };
}
