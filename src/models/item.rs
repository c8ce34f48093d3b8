//! Tracked item data models.
//!
//! An item owns its behavioral signals exclusively; the computed block is
//! derived state rewritten on every ranking pass.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::histogram::{DayHistogram, DeviceHistogram, HourHistogram, PlaceHistogram};

/// Score given to an item that has never been ranked.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// User action fed back into learning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum InteractionType {
    Seen,
    Opened,
    Dismissed,
}

impl InteractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::Seen => "seen",
            InteractionType::Opened => "opened",
            InteractionType::Dismissed => "dismissed",
        }
    }
}

impl FromStr for InteractionType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "seen" => Ok(InteractionType::Seen),
            "opened" => Ok(InteractionType::Opened),
            "dismissed" => Ok(InteractionType::Dismissed),
            other => Err(anyhow!("unknown interaction '{other}'")),
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse lifecycle bucket for display and housekeeping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ItemState {
    /// Just created, within the novelty period
    New,
    /// Normal state, being scored
    Active,
    /// Temporarily suppressed
    Quieted,
    /// Score dropping due to inactivity
    Decaying,
    /// Removed from the active orbit
    Archived,
}

impl ItemState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemState::New => "new",
            ItemState::Active => "active",
            ItemState::Quieted => "quieted",
            ItemState::Decaying => "decaying",
            ItemState::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbitItemSignals {
    pub created_at: DateTime<Utc>,
    /// Last positive engagement (seen or opened); dismissals don't count.
    pub last_seen_at: Option<DateTime<Utc>>,
    pub seen_count: u32,
    pub opened_count: u32,
    pub dismissed_count: u32,
    pub hour_histogram: HourHistogram,
    pub day_histogram: DayHistogram,
    pub place_histogram: PlaceHistogram,
    pub device_histogram: DeviceHistogram,
    /// Consecutive dismissals since the last seen/opened
    pub ignored_streak: u32,
    pub is_pinned: bool,
    /// `None` with `is_pinned` set means the pin never expires.
    pub pin_until: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiet_until: Option<DateTime<Utc>>,
}

impl OrbitItemSignals {
    /// Zeroed signal state for an item created at `created_at`.
    pub fn fresh(created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            last_seen_at: None,
            seen_count: 0,
            opened_count: 0,
            dismissed_count: 0,
            hour_histogram: HourHistogram::new(),
            day_histogram: DayHistogram::new(),
            place_histogram: PlaceHistogram::new(),
            device_histogram: DeviceHistogram::new(),
            ignored_streak: 0,
            is_pinned: false,
            pin_until: None,
            quiet_until: None,
        }
    }

    pub fn pin_active(&self, now: DateTime<Utc>) -> bool {
        self.is_pinned && self.pin_until.map_or(true, |until| until > now)
    }

    pub fn quiet_active(&self, now: DateTime<Utc>) -> bool {
        self.quiet_until.is_some_and(|until| now < until)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbitItemComputed {
    pub score: f64,
    /// `1 - score`: how far the item sits from the center of the orbit
    pub distance: f64,
    /// Short explanations in evaluation order
    pub reasons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for OrbitItemComputed {
    fn default() -> Self {
        Self {
            score: NEUTRAL_SCORE,
            distance: 1.0 - NEUTRAL_SCORE,
            reasons: Vec::new(),
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbitItem {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub signals: OrbitItemSignals,
    pub computed: OrbitItemComputed,
}

/// Input validation for user-supplied item fields
pub mod validation {
    use anyhow::{bail, Result};

    pub fn validate_title(title: &str, max_len: usize) -> Result<()> {
        if title.trim().is_empty() {
            bail!("Item title must not be empty");
        }

        let len = title.chars().count();
        if len > max_len {
            bail!("Item title too long ({len} chars, max {max_len})");
        }

        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Ok(());
        }

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!("Invalid URL. Must start with http:// or https://");
        }

        Ok(())
    }
}
