//! End-to-end behavior of the pure engine over simulated days of use.

use chrono::{DateTime, Duration, TimeZone, Utc};
use orbit_lib::engine::create_item_at;
use orbit_lib::{
    classify, compute_relevance, pin_item, quiet_item, rank_items, record_interaction,
    unpin_item, DeviceType, EngineConfig, InteractionType, ItemState, OrbitContext,
};

fn t0() -> DateTime<Utc> {
    // Monday 09:00
    Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap()
}

fn ctx(now: DateTime<Utc>, place: &str) -> OrbitContext {
    OrbitContext::new(now, DeviceType::Desktop, place)
}

#[test]
fn new_item_learns_its_place() {
    let t0 = t0();
    let item = create_item_at("Renew passport", None, None, t0);

    let t1 = t0 + Duration::hours(1);
    let ranking = rank_items(vec![item], &ctx(t1, "home"), 5);
    let ranked = &ranking.visible()[0];
    assert_eq!(ranked.computed.reasons, vec!["newly added".to_string()]);
    assert!((ranked.computed.score - 0.05).abs() < 1e-3);

    let mut item = ranked.clone();
    for minutes in [5, 10, 15] {
        item = record_interaction(&item, InteractionType::Seen, &ctx(t1 + Duration::minutes(minutes), "home"));
    }
    assert_eq!(item.signals.seen_count, 3);

    let ranking = rank_items(vec![item], &ctx(t1 + Duration::minutes(20), "home"), 5);
    let reasons = &ranking.visible()[0].computed.reasons;
    assert!(reasons.contains(&"often seen at home".to_string()), "{reasons:?}");
    assert!(reasons.contains(&"matches your usual time".to_string()), "{reasons:?}");
    assert!(reasons.contains(&"fits desktop context".to_string()), "{reasons:?}");
    assert!(!reasons.contains(&"recently on your mind".to_string()));
}

#[test]
fn place_affinity_is_context_specific() {
    let t0 = t0();
    let mut item = create_item_at("Water plants", None, None, t0 - Duration::days(5));
    for day in 0..4 {
        item = record_interaction(&item, InteractionType::Seen, &ctx(t0 - Duration::days(day), "home"));
    }

    let at_home = compute_relevance(&item, &ctx(t0, "home"));
    let at_work = compute_relevance(&item, &ctx(t0, "work"));
    assert!(at_home.score > at_work.score);
    assert!(!at_work.reasons.iter().any(|r| r.starts_with("often seen at")));
}

#[test]
fn pinned_item_outranks_its_twin() {
    let t0 = t0();
    let plain = create_item_at("plain", None, None, t0 - Duration::days(3));
    let mut pinned = create_item_at("pinned", None, None, t0 - Duration::days(3));
    pinned = pin_item(&pinned, None);

    let ranking = rank_items(vec![plain, pinned], &ctx(t0, "home"), 1);
    assert_eq!(ranking.visible()[0].title, "pinned");
    assert!(ranking.visible()[0].computed.reasons.contains(&"kept close".to_string()));

    let unpinned = unpin_item(&ranking.visible()[0]);
    let relevance = compute_relevance(&unpinned, &ctx(t0, "home"));
    assert!(!relevance.reasons.contains(&"kept close".to_string()));
}

#[test]
fn timed_pin_lapses() {
    let t0 = t0();
    let item = create_item_at("deadline", None, None, t0 - Duration::days(3));
    let pinned = pin_item(&item, Some(t0 + Duration::hours(2)));

    assert!(compute_relevance(&pinned, &ctx(t0 + Duration::hours(1), "home")).breakdown.pinned);
    assert!(!compute_relevance(&pinned, &ctx(t0 + Duration::hours(3), "home")).breakdown.pinned);
}

#[test]
fn quiet_rests_then_recovers() {
    let t0 = t0();
    let mut item = create_item_at("Inbox zero", None, None, t0 - Duration::days(2));
    item = record_interaction(&item, InteractionType::Opened, &ctx(t0 - Duration::hours(1), "work"));

    let before = compute_relevance(&item, &ctx(t0, "work"));
    let quiet = quiet_item(&item, 4.0, &ctx(t0, "work"));
    assert_eq!(quiet.signals.quiet_until, Some(t0 + Duration::hours(4)));

    let during = compute_relevance(&quiet, &ctx(t0, "work"));
    assert!((during.score - before.score * 0.1).abs() < 1e-12);
    assert_eq!(during.reasons.last().map(String::as_str), Some("resting"));

    let config = EngineConfig::default();
    assert_eq!(classify(&quiet, &ctx(t0, "work"), false, &config), ItemState::Quieted);

    let after = compute_relevance(&quiet, &ctx(t0 + Duration::hours(4), "work"));
    assert!(!after.breakdown.quieted);
    assert!(after.score > during.score);
}

#[test]
fn ignored_items_fade() {
    let t0 = t0();
    let mut item = create_item_at("Call dentist", None, None, t0 - Duration::days(10));
    item = record_interaction(&item, InteractionType::Seen, &ctx(t0 - Duration::days(9), "home"));

    for hours in 1..=5 {
        item = record_interaction(&item, InteractionType::Dismissed, &ctx(t0 + Duration::hours(hours), "home"));
    }
    assert_eq!(item.signals.ignored_streak, 5);

    let relevance = compute_relevance(&item, &ctx(t0 + Duration::hours(6), "home"));
    assert!((relevance.breakdown.decay - 0.5).abs() < 1e-12);
    assert!(relevance.reasons.contains(&"fading from focus".to_string()));

    let item = record_interaction(&item, InteractionType::Seen, &ctx(t0 + Duration::hours(7), "home"));
    assert_eq!(item.signals.ignored_streak, 0);
    assert_eq!(compute_relevance(&item, &ctx(t0 + Duration::hours(8), "home")).breakdown.decay, 0.0);
}

#[test]
fn forgotten_item_drifts_away() {
    let t0 = t0();
    let item = create_item_at("Someday maybe", None, None, t0);
    let config = EngineConfig::default();

    let later = ctx(t0 + Duration::days(30), "home");
    let relevance = compute_relevance(&item, &later);
    assert!((relevance.breakdown.decay - 0.8).abs() < 1e-12);
    assert_eq!(relevance.score, 0.0);
    assert_eq!(classify(&item, &later, false, &config), ItemState::Decaying);
}
