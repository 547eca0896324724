use std::collections::BTreeMap;

use crate::rating::{Dimension, Rating, MAX_SCORE, MIN_SCORE};

use super::{DimensionAverages, MetricsSnapshot};

/// Recompute a snapshot from the full set of visible ratings.
///
/// Always a full recomputation, never incremental, so any drift in a stored
/// snapshot is overwritten by ground truth.
pub fn aggregate(ratings: &[Rating]) -> MetricsSnapshot {
    if ratings.is_empty() {
        return MetricsSnapshot::default();
    }

    let total = ratings.len() as u64;
    let sum: u64 = ratings.iter().map(|r| u64::from(r.value)).sum();

    let mut per_dimension = DimensionAverages::default();
    for dimension in Dimension::ALL {
        let (dim_sum, dim_count) = ratings
            .iter()
            .filter_map(|r| r.sub_dimensions.get(dimension))
            .fold((0u64, 0u64), |(s, c), score| (s + u64::from(score), c + 1));
        if dim_count > 0 {
            per_dimension.set(dimension, dim_sum as f64 / dim_count as f64);
        }
    }

    let mut rating_distribution: BTreeMap<u8, u64> =
        (MIN_SCORE..=MAX_SCORE).map(|star| (star, 0)).collect();
    for rating in ratings {
        *rating_distribution.entry(rating.value).or_insert(0) += 1;
    }

    MetricsSnapshot {
        average_rating: sum as f64 / total as f64,
        total_count: total,
        per_dimension,
        rating_distribution,
    }
}
