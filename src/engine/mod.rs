pub mod controls;
pub mod factory;
pub mod interaction;
pub mod ranking;
pub mod scoring;
pub mod state;

pub use controls::{pin_item, quiet_item, unpin_item};
pub use factory::{create_item, create_item_at};
pub use interaction::record_interaction;
pub use ranking::{rank_items, rank_items_with, Ranking};
pub use scoring::{
    compute_decay, compute_relevance, compute_relevance_with, score_to_distance, Relevance,
    ScoreBreakdown,
};
pub use state::classify;
