use chrono::Duration;

use crate::config::EngineConfig;
use crate::engine::scoring::compute_decay;
use crate::models::{ItemState, OrbitContext, OrbitItem};

/// Decay above this marks an item as drifting away.
const DECAYING_THRESHOLD: f64 = 0.4;

/// Lifecycle bucket of an item at `ctx.now`.
///
/// Archival is owned by the store, so the caller says whether the item is archived.
pub fn classify(item: &OrbitItem, ctx: &OrbitContext, archived: bool, config: &EngineConfig) -> ItemState {
    if archived {
        return ItemState::Archived;
    }
    if item.signals.quiet_active(ctx.now) {
        return ItemState::Quieted;
    }
    if compute_decay(item, ctx) > DECAYING_THRESHOLD {
        return ItemState::Decaying;
    }

    let novelty_window = Duration::milliseconds((config.novelty_hours * 3_600_000.0) as i64);
    if ctx.now - item.signals.created_at < novelty_window {
        ItemState::New
    } else {
        ItemState::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::factory::create_item_at;
    use crate::models::DeviceType;
    use chrono::{TimeZone, Utc};

    #[test]
    fn lifecycle_buckets() {
        let config = EngineConfig::default();
        let t0 = Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap();
        let ctx_at = |days: i64| OrbitContext::new(t0 + Duration::days(days), DeviceType::Desktop, "home");
        let mut item = create_item_at("a", None, None, t0);

        assert_eq!(classify(&item, &ctx_at(0), false, &config), ItemState::New);
        assert_eq!(classify(&item, &ctx_at(0), true, &config), ItemState::Archived);
        assert_eq!(classify(&item, &ctx_at(3), false, &config), ItemState::Active);
        // 15 days unseen: age decay 0.5
        assert_eq!(classify(&item, &ctx_at(15), false, &config), ItemState::Decaying);

        item.signals.quiet_until = Some(t0 + Duration::days(16));
        assert_eq!(classify(&item, &ctx_at(15), false, &config), ItemState::Quieted);

        item.signals.last_seen_at = Some(t0 + Duration::days(14));
        assert_eq!(classify(&item, &ctx_at(17), false, &config), ItemState::Active);
    }
}
