use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use crate::config::EngineConfig;
use crate::db::Database;
use crate::engine::controls::offset_by_hours;
use crate::engine::{
    classify, create_item, pin_item, quiet_item, rank_items_with, record_interaction, unpin_item,
    Ranking,
};
use crate::models::{DeviceType, InteractionType, OrbitContext, OrbitItem};
use crate::settings::SettingsStore;

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

const DB_FILE: &str = "orbit.sqlite3";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Parser)]
#[command(name = "orbit")]
#[command(about = "Context-aware ranking of the things on your mind", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Place label for this invocation (defaults to the saved place)
    #[arg(long, global = true)]
    pub place: Option<String>,

    /// Device class: desktop, mobile, tablet or any custom label
    #[arg(long, global = true)]
    pub device: Option<String>,

    /// Directory holding the item store and settings
    #[arg(long, global = true, env = "ORBIT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Track a new item
    Add {
        title: String,

        #[arg(long)]
        detail: Option<String>,

        #[arg(long)]
        url: Option<String>,
    },

    /// Re-score every item and show the visible set
    Rank {
        /// Size of the visible set (defaults to the saved setting)
        #[arg(long)]
        max: Option<usize>,

        /// Print the visible items as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record that an item was seen
    Seen { id: String },

    /// Record that an item was opened
    Open { id: String },

    /// Record that an item was dismissed
    Dismiss { id: String },

    /// Keep an item close, optionally for a limited time
    Pin {
        id: String,

        #[arg(long)]
        hours: Option<f64>,
    },

    /// Remove a pin
    Unpin { id: String },

    /// Push an item out of focus for a while
    Quiet {
        id: String,

        #[arg(long)]
        hours: Option<f64>,
    },

    /// Remove an item from the active orbit
    Archive { id: String },

    /// Permanently delete an item, archived or not
    Delete { id: String },

    /// Show or set the current place label
    Place { label: Option<String> },
}

/// Resolve the data directory from the flag/env value or the platform default.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir),
        None => dirs::data_dir()
            .map(|dir| dir.join("orbit"))
            .ok_or_else(|| anyhow!("could not determine a data directory; pass --data-dir")),
    }
}

pub struct AppState {
    pub db: Database,
    pub settings: SettingsStore,
}

impl AppState {
    pub fn open(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let db = Database::new(data_dir.join(DB_FILE))?;
        let settings = SettingsStore::new(data_dir.join(SETTINGS_FILE))?;

        Ok(Self { db, settings })
    }

    pub fn engine_config(&self) -> EngineConfig {
        self.settings.engine_config()
    }

    /// Context for "now", with per-invocation overrides taking precedence over saved settings.
    pub fn context(&self, place: Option<String>, device: Option<String>) -> OrbitContext {
        let saved = self.settings.snapshot();
        let place = place.unwrap_or(saved.place);
        let device = device
            .map(DeviceType::from)
            .or(saved.device)
            .unwrap_or_default();
        OrbitContext::local_now(device, place)
    }

    async fn load_item(&self, id: &str) -> Result<OrbitItem> {
        self.db
            .get_item(id)
            .await?
            .ok_or_else(|| anyhow!("Item {id} not found"))
    }

    pub async fn add_item(
        &self,
        title: String,
        detail: Option<String>,
        url: Option<String>,
    ) -> Result<OrbitItem> {
        let item = create_item(title, detail, url);
        self.db.insert_item(&item, &self.engine_config()).await?;
        log_info!("Added item {}", item.id);
        Ok(item)
    }

    /// Rank all active items and persist their new scores.
    pub async fn rank(&self, ctx: &OrbitContext, max_visible: Option<usize>) -> Result<Ranking> {
        let config = self.engine_config();
        let max_visible = max_visible.unwrap_or(config.max_visible);

        let items = self.db.get_active_items().await?;
        let ranking = rank_items_with(items, ctx, max_visible, &config);
        self.db.save_computed(ranking.all().to_vec()).await?;

        Ok(ranking)
    }

    pub async fn interact(
        &self,
        id: &str,
        action: InteractionType,
        ctx: &OrbitContext,
    ) -> Result<OrbitItem> {
        let item = self.load_item(id).await?;
        let updated = record_interaction(&item, action, ctx);
        self.db.update_item(&updated).await?;
        Ok(updated)
    }

    pub async fn pin(&self, id: &str, hours: Option<f64>, ctx: &OrbitContext) -> Result<OrbitItem> {
        let item = self.load_item(id).await?;
        let until = hours.map(|h| offset_by_hours(ctx.now, h));
        let updated = pin_item(&item, until);
        self.db.update_item(&updated).await?;
        Ok(updated)
    }

    pub async fn unpin(&self, id: &str) -> Result<OrbitItem> {
        let item = self.load_item(id).await?;
        let updated = unpin_item(&item);
        self.db.update_item(&updated).await?;
        Ok(updated)
    }

    pub async fn quiet(&self, id: &str, hours: Option<f64>, ctx: &OrbitContext) -> Result<OrbitItem> {
        let item = self.load_item(id).await?;
        let hours = hours.unwrap_or(self.engine_config().quiet_hours_default);
        let updated = quiet_item(&item, hours, ctx);
        self.db.update_item(&updated).await?;
        Ok(updated)
    }

    pub async fn archive(&self, id: &str) -> Result<()> {
        self.db.archive_item(id).await?;
        log_info!("Archived item {id}");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.db.delete_item(id).await? {
            return Err(anyhow!("Item {id} not found"));
        }
        log_info!("Deleted item {id}");
        Ok(())
    }
}

/// Run one CLI invocation to completion.
pub async fn execute(cli: Cli) -> Result<()> {
    let data_dir = resolve_data_dir(cli.data_dir)?;
    let state = AppState::open(data_dir)?;
    let ctx = state.context(cli.place, cli.device);

    match cli.command {
        Command::Add { title, detail, url } => {
            let item = state.add_item(title, detail, url).await?;
            println!("{}", item.id);
        }
        Command::Rank { max, json } => {
            let ranking = state.rank(&ctx, max).await?;
            if json {
                let rendered = serde_json::to_string_pretty(ranking.visible())
                    .context("failed to encode ranking")?;
                println!("{rendered}");
            } else {
                print_ranking(&ranking, &ctx, &state.engine_config());
            }
        }
        Command::Seen { id } => report(state.interact(&id, InteractionType::Seen, &ctx).await?),
        Command::Open { id } => {
            let item = state.interact(&id, InteractionType::Opened, &ctx).await?;
            if let Some(url) = item.url.as_deref() {
                println!("{url}");
            } else {
                report(item);
            }
        }
        Command::Dismiss { id } => {
            report(state.interact(&id, InteractionType::Dismissed, &ctx).await?)
        }
        Command::Pin { id, hours } => report(state.pin(&id, hours, &ctx).await?),
        Command::Unpin { id } => report(state.unpin(&id).await?),
        Command::Quiet { id, hours } => report(state.quiet(&id, hours, &ctx).await?),
        Command::Archive { id } => {
            state.archive(&id).await?;
            println!("archived {id}");
        }
        Command::Delete { id } => {
            state.delete(&id).await?;
            println!("deleted {id}");
        }
        Command::Place { label } => match label {
            Some(label) => {
                let label = label.trim().to_string();
                if label.is_empty() {
                    log_warn!("Ignoring empty place label");
                } else {
                    state.settings.set_place(label.as_str())?;
                }
                println!("{}", state.settings.place());
            }
            None => println!("{}", state.settings.place()),
        },
    }

    Ok(())
}

fn report(item: OrbitItem) {
    println!("{}  {}", item.id, item.title);
}

fn print_ranking(ranking: &Ranking, ctx: &OrbitContext, config: &EngineConfig) {
    if ranking.all().is_empty() {
        println!("Nothing in orbit.");
        return;
    }

    for item in ranking.visible() {
        let state = classify(item, ctx, false, config);
        let reasons = if item.computed.reasons.is_empty() {
            String::new()
        } else {
            format!("  ({})", item.computed.reasons.join(", "))
        };
        println!(
            "{:.2}  {:<8}  {}{}  [{}]",
            item.computed.score,
            state.as_str(),
            item.title,
            reasons,
            item.id
        );
    }

    let hidden = ranking.all().len() - ranking.visible().len();
    if hidden > 0 {
        println!("... {hidden} more further out");
    }
}
