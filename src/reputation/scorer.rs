use chrono::{DateTime, Utc};

use crate::rating::Rating;

use super::{Quality, ReputationResult, Trend};

pub const FRESH_DAYS: f64 = 30.0;
pub const STALE_DAYS: f64 = 90.0;
/// Never reached: the stale branch is checked first and already matches
/// anything older than a year, so such ratings weigh 0.8, not 0.5.
pub const ANCIENT_DAYS: f64 = 365.0;
/// Review length, in UTF-16 code units, above which a rating counts as
/// detailed. Clients submit text measured that way, so an emoji counts twice.
pub const LONG_TEXT_UNITS: usize = 100;

const TREND_THRESHOLD: f64 = 0.5;
const HIGH_QUALITY_VERIFIED_SHARE: f64 = 0.3;
const MIN_RATINGS_FOR_QUALITY: usize = 5;
const MIN_RATINGS_FOR_FULL_SCORE: usize = 10;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Score a subject's ratings as of `now`.
pub fn compute_reputation(ratings: &[Rating], now: DateTime<Utc>) -> ReputationResult {
    if ratings.is_empty() {
        return ReputationResult::UNRATED;
    }
    let n = ratings.len();

    let mut newest_first: Vec<&Rating> = ratings.iter().collect();
    newest_first.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let (recent, older) = newest_first.split_at(n.div_ceil(2));
    let trend = trend(mean_value(recent), mean_value(older));

    let (weighted_sum, weight_total) = ratings.iter().fold((0.0, 0.0), |(sum, total), rating| {
        let weight = weight(rating, now);
        (sum + f64::from(rating.value) * weight, total + weight)
    });
    let weighted_average = weighted_sum / weight_total;
    let mut raw_score = weighted_average / 5.0 * 100.0;

    if n < MIN_RATINGS_FOR_QUALITY {
        raw_score *= 0.8;
    } else if n < MIN_RATINGS_FOR_FULL_SCORE {
        raw_score *= 0.9;
    }
    let score = raw_score.round().clamp(0.0, 100.0) as u8;

    let verified = ratings.iter().filter(|r| r.verified).count();
    let mut quality = Quality::Average;
    if verified as f64 > n as f64 * HIGH_QUALITY_VERIFIED_SHARE {
        quality = Quality::High;
    }
    if n < MIN_RATINGS_FOR_QUALITY {
        quality = Quality::Low;
    }

    ReputationResult {
        score,
        trend,
        quality,
    }
}

/// Order results best first; ties break on id so the ranking is stable.
pub fn rank<I: Ord>(results: &mut [(I, ReputationResult)]) {
    results.sort_by(|(a_id, a), (b_id, b)| b.score.cmp(&a.score).then_with(|| a_id.cmp(b_id)));
}

fn mean_value(ratings: &[&Rating]) -> f64 {
    if ratings.is_empty() {
        // An empty older half counts as 0, so a single burst of ratings reads as rising.
        return 0.0;
    }
    let sum: u64 = ratings.iter().map(|r| u64::from(r.value)).sum();
    sum as f64 / ratings.len() as f64
}

fn trend(recent: f64, older: f64) -> Trend {
    if recent - older > TREND_THRESHOLD {
        Trend::Rising
    } else if older - recent > TREND_THRESHOLD {
        Trend::Falling
    } else {
        Trend::Stable
    }
}

fn weight(rating: &Rating, now: DateTime<Utc>) -> f64 {
    let days_old = (now - rating.created_at).num_milliseconds() as f64 / MILLIS_PER_DAY;

    let mut weight = 1.0;
    if days_old < FRESH_DAYS {
        weight *= 1.5;
    } else if days_old > STALE_DAYS {
        weight *= 0.8;
    } else if days_old > ANCIENT_DAYS {
        weight *= 0.5;
    }
    if rating.verified {
        weight *= 2.0;
    }
    if rating.text.encode_utf16().count() > LONG_TEXT_UNITS {
        weight *= 1.2;
    }
    weight
}
