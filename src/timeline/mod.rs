//! Historical timeline of a subject's metrics.
//!
//! Entries are sampled on relative growth (see [`record`]) and are only ever
//! rewritten by [`correct`] when a rating that contributed to them is removed.
//! Entries stay in non-decreasing `date` order.

mod corrector;
mod recorder;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::{DimensionAverages, MetricsSnapshot};

pub use corrector::{correct, CorrectionReport};
pub use recorder::{growth_checkpoint, record, DEFAULT_GROWTH_FACTOR};

/// What the aggregate looked like as of `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub date: DateTime<Utc>,
    pub total_count: u64,
    pub average_rating: f64,
    pub per_dimension: DimensionAverages,
}

impl TimelineEntry {
    pub fn from_snapshot(snapshot: &MetricsSnapshot, date: DateTime<Utc>) -> Self {
        TimelineEntry {
            date,
            total_count: snapshot.total_count,
            average_rating: snapshot.average_rating,
            per_dimension: snapshot.per_dimension,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeline(Vec<TimelineEntry>);

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.0
    }

    pub fn last(&self) -> Option<&TimelineEntry> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub(crate) fn push(&mut self, entry: TimelineEntry) {
        self.0.push(entry);
    }

    pub(crate) fn entries_mut(&mut self) -> &mut Vec<TimelineEntry> {
        &mut self.0
    }
}

impl From<Vec<TimelineEntry>> for Timeline {
    fn from(entries: Vec<TimelineEntry>) -> Self {
        Timeline(entries)
    }
}
