use crate::rating::{Dimension, Rating};

use super::Timeline;

/// What a correction pass did to the timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrectionReport {
    pub adjusted: usize,
    pub dropped: usize,
}

impl CorrectionReport {
    pub fn is_noop(&self) -> bool {
        self.adjusted == 0 && self.dropped == 0
    }
}

/// Remove a deleted or hidden rating's contribution from every entry recorded
/// after the rating was created.
///
/// Entries with a count of one or less are dropped rather than divided by zero.
/// Sub-dimension averages are only adjusted for dimensions the removed rating
/// carried; the others keep their value even though the count shrinks.
pub fn correct(timeline: &mut Timeline, removed: &Rating) -> CorrectionReport {
    let mut report = CorrectionReport::default();
    let value = f64::from(removed.value);

    timeline.entries_mut().retain_mut(|entry| {
        if entry.date <= removed.created_at {
            return true;
        }
        if entry.total_count <= 1 {
            report.dropped += 1;
            return false;
        }

        let old_total = entry.total_count as f64;
        let new_total = entry.total_count - 1;
        entry.average_rating = (entry.average_rating * old_total - value) / new_total as f64;

        for dimension in Dimension::ALL {
            if let Some(score) = removed.sub_dimensions.get(dimension) {
                let current = entry.per_dimension.get(dimension);
                entry.per_dimension.set(
                    dimension,
                    (current * old_total - f64::from(score)) / new_total as f64,
                );
            }
        }

        entry.total_count = new_total;
        report.adjusted += 1;
        true
    });

    report
}
