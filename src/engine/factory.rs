use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{OrbitItem, OrbitItemComputed, OrbitItemSignals};

/// Create a new item with zeroed signals and the neutral default score.
pub fn create_item(title: impl Into<String>, detail: Option<String>, url: Option<String>) -> OrbitItem {
    create_item_at(title, detail, url, Utc::now())
}

/// Same as `create_item` with an explicit creation instant.
pub fn create_item_at(
    title: impl Into<String>,
    detail: Option<String>,
    url: Option<String>,
    created_at: DateTime<Utc>,
) -> OrbitItem {
    OrbitItem {
        id: Uuid::new_v4().to_string(),
        title: title.into(),
        detail: detail.filter(|d| !d.is_empty()),
        url: url.filter(|u| !u.is_empty()),
        signals: OrbitItemSignals::fresh(created_at),
        computed: OrbitItemComputed::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_items_start_neutral() {
        let item = create_item("Call the dentist", Some(String::new()), None);
        assert_eq!(item.computed.score, 0.5);
        assert_eq!(item.computed.distance, 0.5);
        assert!(item.computed.reasons.is_empty());
        assert!(item.detail.is_none());
        assert_eq!(item.signals.seen_count, 0);
        assert!(item.signals.last_seen_at.is_none());
        assert!(item.signals.hour_histogram.is_empty());
        assert!(!item.signals.is_pinned);
    }

    #[test]
    fn ids_are_unique() {
        let a = create_item("a", None, None);
        let b = create_item("a", None, None);
        assert_ne!(a.id, b.id);
    }
}
