//! Context snapshot describing "now" for a scoring pass.

use std::fmt;

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Device class the user is currently on.
///
/// Unknown labels are kept verbatim so they still learn their own affinity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceType {
    Desktop,
    Mobile,
    Tablet,
    Other(String),
}

impl DeviceType {
    pub fn as_str(&self) -> &str {
        match self {
            DeviceType::Desktop => "desktop",
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::Other(label) => label.as_str(),
        }
    }

    /// Best-effort device detection from a browser user agent.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();
        let handheld = ["mobile", "android", "iphone", "ipad"]
            .iter()
            .any(|needle| ua.contains(needle));
        if !handheld {
            return DeviceType::Desktop;
        }

        if ua.contains("ipad") || ua.contains("tablet") {
            DeviceType::Tablet
        } else {
            DeviceType::Mobile
        }
    }
}

impl Default for DeviceType {
    fn default() -> Self {
        DeviceType::Desktop
    }
}

impl From<&str> for DeviceType {
    fn from(value: &str) -> Self {
        match value {
            "desktop" => DeviceType::Desktop,
            "mobile" => DeviceType::Mobile,
            "tablet" => DeviceType::Tablet,
            other => DeviceType::Other(other.to_string()),
        }
    }
}

impl From<String> for DeviceType {
    fn from(value: String) -> Self {
        DeviceType::from(value.as_str())
    }
}

impl From<DeviceType> for String {
    fn from(value: DeviceType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const UNKNOWN_PLACE: &str = "unknown";

/// Immutable snapshot of the user's situation, built once per ranking pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbitContext {
    pub now: DateTime<Utc>,
    /// Hour of day (0-23) in the user's timezone
    pub hour: u8,
    /// Day of week (0-6, Sunday = 0) in the user's timezone
    pub day: u8,
    pub device: DeviceType,
    pub place: String,
    /// Groups interactions for external consumers; never read by scoring.
    pub session_id: String,
}

impl OrbitContext {
    /// Build a context from an instant seen through the user's timezone.
    /// `hour` and `day` come from that local view; `now` is stored in UTC.
    pub fn new<Tz: TimeZone>(now: DateTime<Tz>, device: DeviceType, place: impl Into<String>) -> Self {
        Self {
            hour: now.hour() as u8,
            day: now.weekday().num_days_from_sunday() as u8,
            now: now.with_timezone(&Utc),
            device,
            place: place.into(),
            session_id: Uuid::new_v4().to_string(),
        }
    }

    /// Context for the current instant in the system's local timezone.
    pub fn local_now(device: DeviceType, place: impl Into<String>) -> Self {
        Self::new(Local::now(), device, place)
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }
}
