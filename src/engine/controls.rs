//! Explicit user overrides: pin, unpin and "quiet for now".

use chrono::{DateTime, TimeDelta, Utc};

use crate::models::{OrbitContext, OrbitItem};

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Longest accepted offset, about 114 years. Larger (or infinite) requests saturate here.
const MAX_OFFSET_HOURS: f64 = 1_000_000.0;

/// Pin an item, optionally until `until`. `None` pins it permanently.
pub fn pin_item(item: &OrbitItem, until: Option<DateTime<Utc>>) -> OrbitItem {
    let mut next = item.clone();
    next.signals.is_pinned = true;
    next.signals.pin_until = until;
    next
}

pub fn unpin_item(item: &OrbitItem) -> OrbitItem {
    let mut next = item.clone();
    next.signals.is_pinned = false;
    next.signals.pin_until = None;
    next
}

/// Suppress an item for `hours` from `ctx.now`.
///
/// Quieting also counts as a dismissal for learning, but does not extend the
/// ignored streak.
pub fn quiet_item(item: &OrbitItem, hours: f64, ctx: &OrbitContext) -> OrbitItem {
    let mut next = item.clone();
    next.signals.quiet_until = Some(offset_by_hours(ctx.now, hours));
    next.signals.dismissed_count = next.signals.dismissed_count.saturating_add(1);
    next
}

/// `now` shifted by `hours`, never panicking.
///
/// Offsets saturate at `MAX_OFFSET_HOURS` in either direction and NaN counts as zero.
pub(crate) fn offset_by_hours(now: DateTime<Utc>, hours: f64) -> DateTime<Utc> {
    let hours = if hours.is_nan() {
        0.0
    } else {
        hours.clamp(-MAX_OFFSET_HOURS, MAX_OFFSET_HOURS)
    };
    let limit = if hours < 0.0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    };

    TimeDelta::try_milliseconds((hours * MS_PER_HOUR).round() as i64)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(limit)
}
