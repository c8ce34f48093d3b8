//! Relevance scoring: item + context -> score in [0, 1] with explanations.
//!
//! ```text
//! raw   = novelty·w_n + time·w_t + place·w_p + device·w_d
//!       + recency·w_r + frequency·w_f + (pin active ? w_pin : 0)
//! score = clamp(raw × (1 - decay) × (quiet active ? 0.1 : 1), 0, 1)
//! ```
//!
//! Reasons are appended in evaluation order whenever a raw sub-score crosses
//! its display threshold.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::models::{OrbitContext, OrbitItem};

const MS_PER_HOUR: f64 = 60.0 * 60.0 * 1000.0;
const HOURS_PER_DAY: f64 = 24.0;

/// Hour-of-day share of the time factor; day-of-week gets the rest.
const HOUR_SHARE: f64 = 0.7;

/// Place affinity needs at least this many observations to count.
const MIN_PLACE_EVIDENCE: f64 = 3.0;

const STREAK_DECAY_STEP: f64 = 0.1;
const MAX_STREAK_DECAY: f64 = 0.5;
const AGE_DECAY_DAYS: f64 = 30.0;
const MAX_AGE_DECAY: f64 = 0.8;

const QUIET_MULTIPLIER: f64 = 0.1;

/// Result of one relevance computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relevance {
    pub score: f64,
    pub reasons: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

/// Raw (unweighted) sub-scores behind a relevance value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub novelty: f64,
    pub time: f64,
    pub place: f64,
    pub device: f64,
    pub recency: f64,
    pub frequency: f64,
    pub pinned: bool,
    pub decay: f64,
    pub quieted: bool,
    /// Weighted sum before decay and quiet suppression
    pub raw: f64,
}

/// Score with the default weights and limits.
pub fn compute_relevance(item: &OrbitItem, ctx: &OrbitContext) -> Relevance {
    compute_relevance_with(item, ctx, &EngineConfig::default())
}

pub fn compute_relevance_with(
    item: &OrbitItem,
    ctx: &OrbitContext,
    config: &EngineConfig,
) -> Relevance {
    let weights = &config.weights;
    let mut reasons = Vec::new();
    let mut score = 0.0;

    let novelty = score_novelty(item, ctx, config);
    score += novelty * weights.novelty;
    if novelty > 0.5 {
        reasons.push("newly added".to_string());
    }

    let time = score_time(item, ctx);
    score += time * weights.time;
    if time > 0.5 {
        reasons.push("matches your usual time".to_string());
    }

    let place = score_place(item, ctx);
    score += place * weights.place;
    if place > 0.6 {
        reasons.push(format!("often seen at {}", ctx.place));
    }

    let device = score_device(item, ctx);
    score += device * weights.device;
    if device > 0.6 {
        reasons.push(format!("fits {} context", ctx.device));
    }

    let recency = score_recency(item, ctx, config);
    score += recency * weights.recency;
    // Novelty already explains a fresh item; don't repeat it as recency.
    if recency > 0.7 && novelty < 0.8 {
        reasons.push("recently on your mind".to_string());
    }

    let frequency = score_frequency(item);
    score += frequency * weights.frequency;
    if frequency > 0.6 {
        reasons.push("frequently accessed".to_string());
    }

    let pinned = item.signals.pin_active(ctx.now);
    if pinned {
        score += weights.pinned;
        reasons.push("kept close".to_string());
    }

    let raw = score;

    let decay = compute_decay(item, ctx);
    score *= 1.0 - decay;
    if decay > 0.4 {
        reasons.push("fading from focus".to_string());
    }

    let quieted = item.signals.quiet_active(ctx.now);
    if quieted {
        score *= QUIET_MULTIPLIER;
        reasons.push("resting".to_string());
    }

    Relevance {
        score: clamp_score(score),
        reasons,
        breakdown: ScoreBreakdown {
            novelty,
            time,
            place,
            device,
            recency,
            frequency,
            pinned,
            decay,
            quieted,
            raw,
        },
    }
}

/// Inverse of the score, used as orbit distance.
pub fn score_to_distance(score: f64) -> f64 {
    1.0 - score
}

/// Fraction of the item's lifetime-decay budget currently applied.
///
/// Never-seen items decay by age alone (up to 80% over 30 days); engaged
/// items decay by consecutive dismissals (10% each, up to 50%).
pub fn compute_decay(item: &OrbitItem, ctx: &OrbitContext) -> f64 {
    let signals = &item.signals;
    match signals.last_seen_at {
        None => {
            let age_days = elapsed_hours(signals.created_at, ctx.now) / HOURS_PER_DAY;
            (age_days / AGE_DECAY_DAYS).min(MAX_AGE_DECAY)
        }
        Some(_) => (signals.ignored_streak as f64 * STREAK_DECAY_STEP).min(MAX_STREAK_DECAY),
    }
}

/// Full boost inside the novelty window, then a linear fade.
fn score_novelty(item: &OrbitItem, ctx: &OrbitContext, config: &EngineConfig) -> f64 {
    let age_hours = elapsed_hours(item.signals.created_at, ctx.now);
    let fade_end = config.novelty_hours + config.novelty_fade_hours;

    if age_hours < config.novelty_hours {
        1.0
    } else if age_hours < fade_end {
        1.0 - (age_hours - config.novelty_hours) / config.novelty_fade_hours
    } else {
        0.0
    }
}

/// Hour-of-day and day-of-week affinity, hour weighted higher.
fn score_time(item: &OrbitItem, ctx: &OrbitContext) -> f64 {
    let hour = item.signals.hour_histogram.affinity(&ctx.hour);
    let day = item.signals.day_histogram.affinity(&ctx.day);
    hour * HOUR_SHARE + day * (1.0 - HOUR_SHARE)
}

fn score_place(item: &OrbitItem, ctx: &OrbitContext) -> f64 {
    let histogram = &item.signals.place_histogram;
    // Don't claim affinity from one or two sightings.
    if histogram.total() < MIN_PLACE_EVIDENCE {
        return 0.0;
    }
    histogram.affinity(ctx.place.as_str())
}

fn score_device(item: &OrbitItem, ctx: &OrbitContext) -> f64 {
    item.signals.device_histogram.affinity(ctx.device.as_str())
}

/// Exponential falloff from the last positive engagement.
fn score_recency(item: &OrbitItem, ctx: &OrbitContext, config: &EngineConfig) -> f64 {
    let Some(last_seen) = item.signals.last_seen_at else {
        return 0.0;
    };

    let age_days = elapsed_hours(last_seen, ctx.now) / HOURS_PER_DAY;
    (-age_days / config.recency_decay_days).exp()
}

/// Log-scaled interaction count; opens count double. Saturates around 100.
fn score_frequency(item: &OrbitItem) -> f64 {
    let signals = &item.signals;
    let interactions = signals.seen_count as f64 + 2.0 * signals.opened_count as f64;
    ((interactions + 1.0).log10() / 2.0).min(1.0)
}

/// Hours from `from` to `to`, clamped at zero for clocks that run backwards.
fn elapsed_hours(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds().max(0) as f64 / MS_PER_HOUR
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}
