use std::convert::TryFrom;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

pub fn to_i64(value: u32) -> i64 {
    i64::from(value)
}

pub fn to_u32(value: i64, field: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| anyhow!("{field} contains out-of-range value {value}"))
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_optional_datetime(
    value: Option<String>,
    field: &str,
) -> Result<Option<DateTime<Utc>>> {
    match value {
        Some(raw) => parse_datetime(&raw, field).map(Some),
        None => Ok(None),
    }
}

pub fn format_optional_datetime(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(|dt| dt.to_rfc3339())
}

/// Serialize a histogram or reason list into its TEXT column.
pub fn to_json_column<T: Serialize>(value: &T, field: &str) -> Result<String> {
    serde_json::to_string(value).with_context(|| format!("failed to encode {field}"))
}

pub fn parse_json_column<T: DeserializeOwned>(value: &str, field: &str) -> Result<T> {
    serde_json::from_str(value).with_context(|| format!("failed to parse {field}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_reject_negative_values() {
        assert_eq!(to_u32(7, "seen_count").unwrap(), 7);
        assert!(to_u32(-1, "seen_count").is_err());
        assert!(to_u32(i64::from(u32::MAX) + 1, "seen_count").is_err());
    }

    #[test]
    fn datetimes_keep_subsecond_precision() {
        let now = Utc::now();
        let raw = format_optional_datetime(Some(now));
        assert_eq!(parse_optional_datetime(raw, "t").unwrap(), Some(now));
        assert_eq!(parse_optional_datetime(None, "t").unwrap(), None);
        assert!(parse_datetime("yesterday", "t").is_err());
    }
}
