use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::config::EngineConfig;
use crate::db::{
    connection::Database,
    helpers::{
        format_optional_datetime, parse_datetime, parse_json_column, parse_optional_datetime,
        to_i64, to_json_column, to_u32,
    },
};
use crate::models::{
    validation::{validate_title, validate_url},
    OrbitItem, OrbitItemComputed, OrbitItemSignals,
};

const ITEM_COLUMNS: &str = "id, title, detail, url, created_at, last_seen_at, seen_count, \
     opened_count, dismissed_count, hour_histogram, day_histogram, place_histogram, \
     device_histogram, ignored_streak, is_pinned, pin_until, quiet_until, score, distance, \
     reasons, computed_at";

fn row_to_item(row: &Row) -> Result<OrbitItem> {
    let created_at: String = row.get("created_at")?;
    let last_seen_at: Option<String> = row.get("last_seen_at")?;
    let pin_until: Option<String> = row.get("pin_until")?;
    let quiet_until: Option<String> = row.get("quiet_until")?;
    let computed_at: Option<String> = row.get("computed_at")?;
    let hour_histogram: String = row.get("hour_histogram")?;
    let day_histogram: String = row.get("day_histogram")?;
    let place_histogram: String = row.get("place_histogram")?;
    let device_histogram: String = row.get("device_histogram")?;
    let reasons: String = row.get("reasons")?;
    let is_pinned: i64 = row.get("is_pinned")?;

    Ok(OrbitItem {
        id: row.get("id")?,
        title: row.get("title")?,
        detail: row.get("detail")?,
        url: row.get("url")?,
        signals: OrbitItemSignals {
            created_at: parse_datetime(&created_at, "created_at")?,
            last_seen_at: parse_optional_datetime(last_seen_at, "last_seen_at")?,
            seen_count: to_u32(row.get("seen_count")?, "seen_count")?,
            opened_count: to_u32(row.get("opened_count")?, "opened_count")?,
            dismissed_count: to_u32(row.get("dismissed_count")?, "dismissed_count")?,
            hour_histogram: parse_json_column(&hour_histogram, "hour_histogram")?,
            day_histogram: parse_json_column(&day_histogram, "day_histogram")?,
            place_histogram: parse_json_column(&place_histogram, "place_histogram")?,
            device_histogram: parse_json_column(&device_histogram, "device_histogram")?,
            ignored_streak: to_u32(row.get("ignored_streak")?, "ignored_streak")?,
            is_pinned: is_pinned != 0,
            pin_until: parse_optional_datetime(pin_until, "pin_until")?,
            quiet_until: parse_optional_datetime(quiet_until, "quiet_until")?,
        },
        computed: OrbitItemComputed {
            score: row.get("score")?,
            distance: row.get("distance")?,
            reasons: parse_json_column(&reasons, "reasons")?,
            updated_at: parse_optional_datetime(computed_at, "computed_at")?,
        },
    })
}

fn insert_row(conn: &Connection, item: &OrbitItem) -> Result<()> {
    let signals = &item.signals;
    let computed = &item.computed;

    conn.execute(
        &format!(
            "INSERT INTO items ({ITEM_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)"
        ),
        params![
            item.id,
            item.title,
            item.detail,
            item.url,
            signals.created_at.to_rfc3339(),
            format_optional_datetime(signals.last_seen_at),
            to_i64(signals.seen_count),
            to_i64(signals.opened_count),
            to_i64(signals.dismissed_count),
            to_json_column(&signals.hour_histogram, "hour_histogram")?,
            to_json_column(&signals.day_histogram, "day_histogram")?,
            to_json_column(&signals.place_histogram, "place_histogram")?,
            to_json_column(&signals.device_histogram, "device_histogram")?,
            to_i64(signals.ignored_streak),
            signals.is_pinned,
            format_optional_datetime(signals.pin_until),
            format_optional_datetime(signals.quiet_until),
            computed.score,
            computed.distance,
            to_json_column(&computed.reasons, "reasons")?,
            format_optional_datetime(computed.updated_at),
        ],
    )?;
    Ok(())
}

fn item_exists(conn: &Connection, id: &str) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT 1 FROM items WHERE id = ?1", params![id], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

impl Database {
    /// Store a newly created item.
    /// Fails on an invalid title or URL, a duplicate id, or when `max_items` active items exist.
    pub async fn insert_item(&self, item: &OrbitItem, config: &EngineConfig) -> Result<()> {
        validate_title(&item.title, config.max_title_length)?;
        if let Some(url) = item.url.as_deref() {
            validate_url(url)?;
        }

        let record = item.clone();
        let max_items = config.max_items;
        self.execute(move |conn| {
            // Count and insert within one task so concurrent adds can't overshoot.
            let active: i64 = conn.query_row(
                "SELECT COUNT(*) FROM items WHERE archived_at IS NULL",
                [],
                |row| row.get(0),
            )?;
            if usize::try_from(active).unwrap_or(usize::MAX) >= max_items {
                bail!("Maximum of {} items reached", max_items);
            }

            if item_exists(conn, &record.id)? {
                bail!("Item {} already exists", record.id);
            }

            insert_row(conn, &record)
        })
        .await
    }

    /// Fetch an item by id, archived or not.
    pub async fn get_item(&self, id: &str) -> Result<Option<OrbitItem>> {
        let id = id.to_string();
        self.execute(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"))?;
            let mut rows = stmt.query(params![id])?;
            let item = match rows.next()? {
                Some(row) => Some(row_to_item(row)?),
                None => None,
            };
            Ok(item)
        })
        .await
    }

    /// All non-archived items, oldest first.
    pub async fn get_active_items(&self) -> Result<Vec<OrbitItem>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ITEM_COLUMNS} FROM items
                 WHERE archived_at IS NULL
                 ORDER BY created_at ASC, rowid ASC"
            ))?;

            let mut rows = stmt.query([])?;
            let mut items = Vec::new();
            while let Some(row) = rows.next()? {
                items.push(row_to_item(row)?);
            }

            Ok(items)
        })
        .await
    }

    /// Overwrite every mutable field of an existing item.
    pub async fn update_item(&self, item: &OrbitItem) -> Result<()> {
        let record = item.clone();
        self.execute(move |conn| {
            let signals = &record.signals;
            let computed = &record.computed;

            let rows_affected = conn.execute(
                "UPDATE items SET
                    title = ?2, detail = ?3, url = ?4, created_at = ?5, last_seen_at = ?6,
                    seen_count = ?7, opened_count = ?8, dismissed_count = ?9,
                    hour_histogram = ?10, day_histogram = ?11, place_histogram = ?12,
                    device_histogram = ?13, ignored_streak = ?14, is_pinned = ?15,
                    pin_until = ?16, quiet_until = ?17, score = ?18, distance = ?19,
                    reasons = ?20, computed_at = ?21
                 WHERE id = ?1",
                params![
                    record.id,
                    record.title,
                    record.detail,
                    record.url,
                    signals.created_at.to_rfc3339(),
                    format_optional_datetime(signals.last_seen_at),
                    to_i64(signals.seen_count),
                    to_i64(signals.opened_count),
                    to_i64(signals.dismissed_count),
                    to_json_column(&signals.hour_histogram, "hour_histogram")?,
                    to_json_column(&signals.day_histogram, "day_histogram")?,
                    to_json_column(&signals.place_histogram, "place_histogram")?,
                    to_json_column(&signals.device_histogram, "device_histogram")?,
                    to_i64(signals.ignored_streak),
                    signals.is_pinned,
                    format_optional_datetime(signals.pin_until),
                    format_optional_datetime(signals.quiet_until),
                    computed.score,
                    computed.distance,
                    to_json_column(&computed.reasons, "reasons")?,
                    format_optional_datetime(computed.updated_at),
                ],
            )?;

            if rows_affected == 0 {
                return Err(anyhow!("Item {} not found", record.id));
            }
            Ok(())
        })
        .await
    }

    /// Swap the whole active set for `items` in one transaction.
    /// Archived rows are left alone.
    pub async fn replace_all_items(&self, items: Vec<OrbitItem>) -> Result<()> {
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM items WHERE archived_at IS NULL", [])?;
            for item in &items {
                insert_row(&tx, item)?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
    }

    /// Write back only the computed block of each ranked item.
    ///
    /// Signals, titles and rows added since the ranking snapshot are left alone;
    /// items removed in the meantime are skipped. Returns the number of rows updated.
    pub async fn save_computed(&self, items: Vec<OrbitItem>) -> Result<usize> {
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            let mut updated = 0;
            {
                let mut stmt = tx.prepare(
                    "UPDATE items SET score = ?2, distance = ?3, reasons = ?4, computed_at = ?5
                     WHERE id = ?1",
                )?;
                for item in &items {
                    let computed = &item.computed;
                    updated += stmt.execute(params![
                        item.id,
                        computed.score,
                        computed.distance,
                        to_json_column(&computed.reasons, "reasons")?,
                        format_optional_datetime(computed.updated_at),
                    ])?;
                }
            }
            tx.commit()?;
            Ok(updated)
        })
        .await
    }

    /// Soft delete: the row stays but drops out of `get_active_items`.
    pub async fn archive_item(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "UPDATE items SET archived_at = ?1 WHERE id = ?2 AND archived_at IS NULL",
                params![Utc::now().to_rfc3339(), id],
            )?;

            if rows_affected == 0 {
                return Err(anyhow!("Item {id} not found or already archived"));
            }
            Ok(())
        })
        .await
    }

    /// Permanently remove an item. Returns whether a row was deleted.
    pub async fn delete_item(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute("DELETE FROM items WHERE id = ?1", params![id])?;
            Ok(rows_affected > 0)
        })
        .await
    }
}
