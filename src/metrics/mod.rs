//! The current aggregate of a subject's visible ratings.

mod aggregate;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rating::Dimension;

pub use aggregate::aggregate;

/// Mean score per sub-dimension; `0.0` where no rating carried the dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionAverages {
    pub trust: f64,
    pub value: f64,
    pub authenticity: f64,
}

impl DimensionAverages {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Trust => self.trust,
            Dimension::Value => self.value,
            Dimension::Authenticity => self.authenticity,
        }
    }

    pub fn set(&mut self, dimension: Dimension, average: f64) {
        match dimension {
            Dimension::Trust => self.trust = average,
            Dimension::Value => self.value = average,
            Dimension::Authenticity => self.authenticity = average,
        }
    }
}

/// Snapshot of a subject's metrics as of the last aggregation.
///
/// `total_count` is the number of visible ratings; `average_rating` is `0.0`
/// exactly when `total_count` is zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub average_rating: f64,
    pub total_count: u64,
    pub per_dimension: DimensionAverages,
    /// Count per star value. Empty when there are no ratings, otherwise keyed 1..=5.
    pub rating_distribution: BTreeMap<u8, u64>,
}

impl MetricsSnapshot {
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }
}
