use rayon::prelude::*;

use crate::config::EngineConfig;
use crate::engine::scoring::{compute_relevance_with, score_to_distance};
use crate::models::{OrbitContext, OrbitItem, OrbitItemComputed};

// Set to true to trace every ranking pass
const ENABLE_LOGS: bool = false;

use crate::log_debug;

/// Re-scored items in rank order plus the size of the visible prefix.
#[derive(Debug, Clone)]
pub struct Ranking {
    all: Vec<OrbitItem>,
    visible_len: usize,
}

impl Ranking {
    /// Every item, highest score first.
    pub fn all(&self) -> &[OrbitItem] {
        &self.all
    }

    /// The first `max_visible` items of `all`.
    pub fn visible(&self) -> &[OrbitItem] {
        &self.all[..self.visible_len]
    }
}

/// Rank with the default engine configuration.
pub fn rank_items(items: Vec<OrbitItem>, ctx: &OrbitContext, max_visible: usize) -> Ranking {
    rank_items_with(items, ctx, max_visible, &EngineConfig::default())
}

/// Score every item, stamp its computed block, and sort descending by score.
///
/// Sorting is stable: equal scores keep their input order.
pub fn rank_items_with(
    items: Vec<OrbitItem>,
    ctx: &OrbitContext,
    max_visible: usize,
    config: &EngineConfig,
) -> Ranking {
    // Items are independent; the indexed collect keeps input order for the stable sort.
    let mut scored: Vec<OrbitItem> = items
        .into_par_iter()
        .map(|mut item| {
            let relevance = compute_relevance_with(&item, ctx, config);
            item.computed = OrbitItemComputed {
                score: relevance.score,
                distance: score_to_distance(relevance.score),
                reasons: relevance.reasons,
                updated_at: Some(ctx.now),
            };
            item
        })
        .collect();

    scored.sort_by(|a, b| b.computed.score.total_cmp(&a.computed.score));

    let visible_len = max_visible.min(scored.len());
    log_debug!(
        "ranked {} items at {} ({}), {} visible",
        scored.len(),
        ctx.place,
        ctx.device,
        visible_len
    );

    Ranking {
        all: scored,
        visible_len,
    }
}
