use crate::metrics::MetricsSnapshot;
use crate::rating::Rating;

/// A mutation of a subject's rating set, as reported by the rating handlers.
///
/// Removals carry the record as it was before the change: the timeline
/// correction needs its score and creation time after the rating is gone
/// from the store, and its `hidden` flag tells whether the rating still
/// counted in history. Deleting an already hidden rating, or hiding it a
/// second time, recomputes without correcting.
#[derive(Debug, Clone, PartialEq)]
pub enum RatingChange {
    Created { subject_id: String },
    Edited { subject_id: String },
    /// A hidden rating made visible again.
    Shown { subject_id: String },
    Deleted(Rating),
    /// Hidden by a moderator.
    Hidden(Rating),
    /// Hidden automatically after crossing the report threshold.
    AutoHidden(Rating),
}

impl RatingChange {
    pub fn subject_id(&self) -> &str {
        match self {
            RatingChange::Created { subject_id }
            | RatingChange::Edited { subject_id }
            | RatingChange::Shown { subject_id } => subject_id,
            RatingChange::Deleted(rating)
            | RatingChange::Hidden(rating)
            | RatingChange::AutoHidden(rating) => &rating.subject_id,
        }
    }

    /// The rating whose contribution must be removed from history. `None`
    /// when nothing was removed or the rating was already hidden.
    pub fn removed_rating(&self) -> Option<&Rating> {
        match self {
            RatingChange::Deleted(rating)
            | RatingChange::Hidden(rating)
            | RatingChange::AutoHidden(rating)
                if !rating.hidden =>
            {
                Some(rating)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChangeOutcome {
    Recomputed(MetricsSnapshot),
    /// The subject has no metrics document; nothing was written.
    SubjectNotFound,
    /// Automated hide with `recompute_on_auto_hide` disabled.
    Skipped,
}
