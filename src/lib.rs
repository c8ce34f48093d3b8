pub mod commands;
pub mod config;
pub mod db;
pub mod engine;
pub mod models;
pub mod settings;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;

pub use config::{EngineConfig, ScoringWeights};
pub use db::Database;
pub use engine::{
    classify, compute_relevance, compute_relevance_with, create_item, pin_item, quiet_item,
    rank_items, rank_items_with, record_interaction, score_to_distance, unpin_item, Ranking,
    Relevance, ScoreBreakdown,
};
pub use models::{
    DeviceType, Histogram, InteractionType, ItemState, OrbitContext, OrbitItem,
    OrbitItemComputed, OrbitItemSignals,
};
pub use settings::{SettingsStore, UserSettings};

pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = commands::Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(commands::execute(cli))
}
