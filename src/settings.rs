use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::config::EngineConfig;
use crate::models::{DeviceType, UNKNOWN_PLACE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserSettings {
    /// Manually set place label ("home", "work", ...)
    pub place: String,
    /// Overrides the default device class when set
    pub device: Option<DeviceType>,
    pub max_visible: usize,
    pub quiet_hours: f64,
}

impl Default for UserSettings {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            place: UNKNOWN_PLACE.into(),
            device: None,
            max_visible: engine.max_visible,
            quiet_hours: engine.quiet_hours_default,
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(
                    "Ignoring unreadable settings at {}: {err}",
                    path.display()
                );
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn snapshot(&self) -> UserSettings {
        self.read().clone()
    }

    pub fn place(&self) -> String {
        self.read().place.clone()
    }

    pub fn set_place(&self, place: impl Into<String>) -> Result<()> {
        let place = place.into();
        self.update(|settings| settings.place = place)
    }

    /// Engine defaults with the user's visible cap and quiet period applied.
    pub fn engine_config(&self) -> EngineConfig {
        let settings = self.read();
        EngineConfig {
            max_visible: settings.max_visible,
            quiet_hours_default: settings.quiet_hours,
            ..EngineConfig::default()
        }
    }

    /// Apply `change` and write the result to disk before releasing the lock.
    pub fn update<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut UserSettings),
    {
        let mut guard = self.write();
        change(&mut guard);
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
