//! The per-subject metrics document.
//!
//! A subject's current snapshot and its timeline live in one value that is
//! transformed by pure functions and persisted as a single unit, so a reader
//! never observes a snapshot from one recomputation next to a timeline from
//! another.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::{aggregate, MetricsSnapshot};
use crate::rating::Rating;
use crate::timeline::{correct, record, CorrectionReport, Timeline};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectMetrics {
    pub subject_id: String,
    pub snapshot: MetricsSnapshot,
    pub timeline: Timeline,
}

/// Result of running the full pipeline on a document.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome {
    pub metrics: SubjectMetrics,
    /// Whether the recorder appended an entry.
    pub recorded: bool,
    pub correction: CorrectionReport,
}

impl SubjectMetrics {
    /// A subject with no ratings and no history.
    pub fn new(subject_id: impl Into<String>) -> Self {
        SubjectMetrics {
            subject_id: subject_id.into(),
            snapshot: MetricsSnapshot::default(),
            timeline: Timeline::new(),
        }
    }

    /// Replace the snapshot with a full aggregation of `ratings` and offer it to
    /// the timeline. An empty rating set resets the subject, history included.
    pub fn apply_aggregation(
        &self,
        ratings: &[Rating],
        now: DateTime<Utc>,
        growth_factor: f64,
    ) -> (SubjectMetrics, bool) {
        let snapshot = aggregate(ratings);
        let mut timeline = self.timeline.clone();

        let recorded = if snapshot.is_empty() {
            timeline.clear();
            false
        } else {
            record(&mut timeline, &snapshot, now, growth_factor)
        };

        let next = SubjectMetrics {
            subject_id: self.subject_id.clone(),
            snapshot,
            timeline,
        };
        (next, recorded)
    }

    /// Remove `removed` from the first `existing` timeline entries.
    ///
    /// Entries past `existing` were recorded from a rating set that already
    /// excluded `removed` and are kept as they are. The snapshot is not touched.
    pub fn apply_correction(
        &self,
        removed: &Rating,
        existing: usize,
    ) -> (SubjectMetrics, CorrectionReport) {
        let entries = self.timeline.entries();
        let split = existing.min(entries.len());

        let mut history = Timeline::from(entries[..split].to_vec());
        let report = correct(&mut history, removed);
        for entry in &entries[split..] {
            history.push(entry.clone());
        }

        let next = SubjectMetrics {
            subject_id: self.subject_id.clone(),
            snapshot: self.snapshot.clone(),
            timeline: history,
        };
        (next, report)
    }

    /// Aggregate, record, then correct for `removed` if a rating was deleted or hidden.
    pub fn apply_mutation(
        &self,
        ratings: &[Rating],
        removed: Option<&Rating>,
        now: DateTime<Utc>,
        growth_factor: f64,
    ) -> MutationOutcome {
        let existing = self.timeline.len();
        let (aggregated, recorded) = self.apply_aggregation(ratings, now, growth_factor);

        match removed {
            Some(rating) => {
                let (metrics, correction) = aggregated.apply_correction(rating, existing);
                MutationOutcome {
                    metrics,
                    recorded,
                    correction,
                }
            }
            None => MutationOutcome {
                metrics: aggregated,
                recorded,
                correction: CorrectionReport::default(),
            },
        }
    }
}
