use serde::{Deserialize, Serialize};

use crate::subject::SubjectMetrics;

/// Event name emitted after a subject's metrics were written.
pub const METRICS_RECOMPUTED: &str = "MetricsRecomputed";

/// Payload of [`METRICS_RECOMPUTED`], carried as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecomputed {
    pub subject_id: String,
    pub total_count: u64,
    pub average_rating: f64,
    pub timeline_len: usize,
}

impl From<&SubjectMetrics> for MetricsRecomputed {
    fn from(metrics: &SubjectMetrics) -> Self {
        MetricsRecomputed {
            subject_id: metrics.subject_id.clone(),
            total_count: metrics.snapshot.total_count,
            average_rating: metrics.snapshot.average_rating,
            timeline_len: metrics.timeline.len(),
        }
    }
}
