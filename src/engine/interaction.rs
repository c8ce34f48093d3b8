use crate::models::{InteractionType, OrbitContext, OrbitItem};

/// Record a user interaction and return the updated item.
///
/// Seen/opened are positive engagement: they bump their counter, refresh
/// `last_seen_at` and clear the ignored streak. A dismissal bumps the
/// dismissed counter and the streak but leaves `last_seen_at` alone.
/// Every interaction, dismissals included, feeds the hour, day, place and
/// device histograms.
pub fn record_interaction(
    item: &OrbitItem,
    action: InteractionType,
    ctx: &OrbitContext,
) -> OrbitItem {
    let mut next = item.clone();
    let signals = &mut next.signals;

    match action {
        InteractionType::Seen => {
            signals.seen_count = signals.seen_count.saturating_add(1);
            signals.last_seen_at = Some(ctx.now);
            signals.ignored_streak = 0;
        }
        InteractionType::Opened => {
            signals.opened_count = signals.opened_count.saturating_add(1);
            signals.last_seen_at = Some(ctx.now);
            signals.ignored_streak = 0;
        }
        InteractionType::Dismissed => {
            signals.dismissed_count = signals.dismissed_count.saturating_add(1);
            signals.ignored_streak = signals.ignored_streak.saturating_add(1);
        }
    }

    signals.hour_histogram.record(ctx.hour, 1.0);
    signals.day_histogram.record(ctx.day, 1.0);
    signals.place_histogram.record(ctx.place.clone(), 1.0);
    signals
        .device_histogram
        .record(ctx.device.as_str().to_string(), 1.0);

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::factory::create_item_at;
    use crate::models::DeviceType;
    use chrono::{Duration, TimeZone, Utc};

    fn ctx() -> OrbitContext {
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap();
        OrbitContext::new(now, DeviceType::Mobile, "work")
    }

    #[test]
    fn seen_resets_streak_and_stamps_last_seen() {
        let ctx = ctx();
        let mut item = create_item_at("a", None, None, ctx.now - Duration::days(2));
        item.signals.ignored_streak = 7;

        let next = record_interaction(&item, InteractionType::Seen, &ctx);
        assert_eq!(next.signals.seen_count, 1);
        assert_eq!(next.signals.ignored_streak, 0);
        assert_eq!(next.signals.last_seen_at, Some(ctx.now));
        // The input is not modified.
        assert_eq!(item.signals.ignored_streak, 7);
    }

    #[test]
    fn opened_counts_separately() {
        let ctx = ctx();
        let item = create_item_at("a", None, None, ctx.now);
        let next = record_interaction(&item, InteractionType::Opened, &ctx);
        assert_eq!(next.signals.opened_count, 1);
        assert_eq!(next.signals.seen_count, 0);
        assert_eq!(next.signals.last_seen_at, Some(ctx.now));
    }

    #[test]
    fn dismissal_grows_streak_without_touching_recency() {
        let ctx = ctx();
        let earlier = ctx.now - Duration::hours(5);
        let mut item = create_item_at("a", None, None, ctx.now - Duration::days(1));
        item.signals.last_seen_at = Some(earlier);
        item.signals.ignored_streak = 2;

        let next = record_interaction(&item, InteractionType::Dismissed, &ctx);
        assert_eq!(next.signals.dismissed_count, item.signals.dismissed_count + 1);
        assert_eq!(next.signals.ignored_streak, 3);
        assert_eq!(next.signals.last_seen_at, Some(earlier));
    }

    #[test]
    fn every_action_feeds_the_histograms() {
        let ctx = ctx();
        let mut item = create_item_at("a", None, None, ctx.now);
        for action in [InteractionType::Seen, InteractionType::Opened, InteractionType::Dismissed] {
            item = record_interaction(&item, action, &ctx);
        }

        let signals = &item.signals;
        assert_eq!(signals.hour_histogram.get(&ctx.hour), 3.0);
        assert_eq!(signals.day_histogram.get(&ctx.day), 3.0);
        assert_eq!(signals.place_histogram.get("work"), 3.0);
        assert_eq!(signals.device_histogram.get("mobile"), 3.0);
        assert_eq!(signals.place_histogram.len(), 1);
    }
}
