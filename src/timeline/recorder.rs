use chrono::{DateTime, Utc};

use crate::metrics::MetricsSnapshot;

use super::{Timeline, TimelineEntry};

/// A new entry needs at least 10% more ratings than the last one.
pub const DEFAULT_GROWTH_FACTOR: f64 = 1.1;

/// Minimum `total_count` that earns a new entry after one holding `last_total`.
///
/// Evaluated in `f64` as written, so `growth_checkpoint(50, 1.1)` is 56:
/// `50.0 * 1.1` lands slightly above 55 in binary floating point.
pub fn growth_checkpoint(last_total: u64, growth_factor: f64) -> u64 {
    (last_total as f64 * growth_factor).ceil() as u64
}

/// Append the snapshot as of `now` if the timeline is empty or the count grew
/// past the checkpoint. Returns whether an entry was appended.
pub fn record(
    timeline: &mut Timeline,
    snapshot: &MetricsSnapshot,
    now: DateTime<Utc>,
    growth_factor: f64,
) -> bool {
    let due = match timeline.last() {
        None => true,
        Some(last) => snapshot.total_count >= growth_checkpoint(last.total_count, growth_factor),
    };
    if due {
        timeline.push(TimelineEntry::from_snapshot(snapshot, now));
    }
    due
}
