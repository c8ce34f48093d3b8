//! Behavioral histograms.
//!
//! A histogram maps a discrete bucket (hour, day, place label, device label)
//! to an accumulated non-negative weight. Every operation is pure and returns
//! a new histogram, except `record`, which updates a privately owned copy.
//!
//! Buckets live in a `BTreeMap`, so iteration runs in ascending key order and
//! `peak` resolves ties to the smallest key.

use std::borrow::Borrow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-step multiplier applied by `decay` when no factor is given.
pub const DEFAULT_DECAY_FACTOR: f64 = 0.95;

/// Buckets whose weight falls below this after decay are dropped.
pub const PRUNE_THRESHOLD: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "K: Ord + Serialize",
    deserialize = "K: Ord + Deserialize<'de>"
))]
pub struct Histogram<K: Ord> {
    buckets: BTreeMap<K, f64>,
}

/// Hour of day (0-23).
pub type HourHistogram = Histogram<u8>;
/// Day of week (0-6, Sunday = 0).
pub type DayHistogram = Histogram<u8>;
/// Free-form place label.
pub type PlaceHistogram = Histogram<String>;
/// Device class label.
pub type DeviceHistogram = Histogram<String>;

impl<K: Ord> Default for Histogram<K> {
    fn default() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone> FromIterator<(K, f64)> for Histogram<K> {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut histogram = Self::default();
        for (key, value) in iter {
            histogram.record(key, value);
        }
        histogram
    }
}

impl<K: Ord + Clone> Histogram<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<Q>(&self, key: &Q) -> f64
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.buckets.get(key).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> {
        self.buckets.iter().map(|(k, v)| (k, *v))
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.buckets.contains_key(key)
    }

    /// Increase `key` by `amount` in place. Weights never drop below zero.
    pub fn record(&mut self, key: K, amount: f64) {
        let slot = self.buckets.entry(key).or_insert(0.0);
        *slot = (*slot + amount).max(0.0);
    }

    /// Copy of `self` with `key` increased by `amount`. Unseen keys start at 0.
    pub fn add(&self, key: K, amount: f64) -> Self {
        let mut next = self.clone();
        next.record(key, amount);
        next
    }

    /// Sum of all weights; 0 for an empty histogram.
    pub fn total(&self) -> f64 {
        self.buckets.values().sum()
    }

    /// Rescale so the weights sum to 1. A zero-total histogram comes back unchanged.
    pub fn normalize(&self) -> Self {
        let total = self.total();
        if total == 0.0 {
            return self.clone();
        }

        Self {
            buckets: self
                .buckets
                .iter()
                .map(|(k, v)| (k.clone(), v / total))
                .collect(),
        }
    }

    /// Multiply every weight by `factor`, dropping buckets that fall below
    /// `PRUNE_THRESHOLD`.
    pub fn decay(&self, factor: f64) -> Self {
        Self {
            buckets: self
                .buckets
                .iter()
                .map(|(k, v)| (k.clone(), v * factor))
                .filter(|(_, v)| *v >= PRUNE_THRESHOLD)
                .collect(),
        }
    }

    /// Key-wise sum of two histograms.
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        for (key, value) in other.iter() {
            merged.record(key.clone(), value);
        }
        merged
    }

    /// Observe one event and compact storage: decay by the default factor,
    /// add 1 to `observation` if given, then round every weight to two decimals.
    pub fn compress(&self, observation: Option<K>) -> Self {
        let mut compressed = self.decay(DEFAULT_DECAY_FACTOR);
        if let Some(key) = observation {
            compressed.record(key, 1.0);
        }

        for value in compressed.buckets.values_mut() {
            *value = (*value * 100.0).round() / 100.0;
        }
        compressed
    }

    /// Key with the strictly largest weight. Ties keep the first key in
    /// ascending order; an empty (or all-zero) histogram has no peak.
    pub fn peak(&self) -> Option<&K> {
        let mut best: Option<(&K, f64)> = None;
        for (key, value) in self.iter() {
            let current_max = best.map(|(_, v)| v).unwrap_or(0.0);
            if value > current_max {
                best = Some((key, value));
            }
        }
        best.map(|(key, _)| key)
    }

    /// Share of the total weight held by `key`; 0 when the key is absent or
    /// the histogram is empty.
    pub fn affinity<Q>(&self, key: &Q) -> f64
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let total = self.total();
        if total > 0.0 {
            self.get(key) / total
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn places(entries: &[(&str, f64)]) -> PlaceHistogram {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn add_starts_unseen_keys_at_zero() {
        let h = HourHistogram::new().add(9, 1.0).add(9, 2.0).add(14, 1.0);
        assert_eq!(h.get(&9), 3.0);
        assert_eq!(h.get(&14), 1.0);
        assert_eq!(h.get(&3), 0.0);
    }

    #[test]
    fn add_leaves_the_input_untouched() {
        let original = HourHistogram::new().add(9, 1.0);
        let _ = original.add(9, 5.0);
        assert_eq!(original.get(&9), 1.0);
    }

    #[test]
    fn empty_histogram_has_zero_total_and_no_peak() {
        let h = PlaceHistogram::new();
        assert_eq!(h.total(), 0.0);
        assert_eq!(h.peak(), None);
        assert_eq!(h.affinity("home"), 0.0);
        assert_eq!(h.normalize(), h);
    }

    #[test]
    fn normalize_sums_to_one() {
        let h = places(&[("home", 3.0), ("work", 1.0)]).normalize();
        assert!((h.total() - 1.0).abs() < 1e-12);
        assert!((h.get("home") - 0.75).abs() < 1e-12);
    }

    #[test]
    fn decay_prunes_small_weights() {
        let h = places(&[("home", 1.0), ("work", 0.0105)]).decay(0.95);
        assert!((h.get("home") - 0.95).abs() < 1e-12);
        assert!(!h.contains_key("work"));
    }

    #[test]
    fn merge_sums_shared_keys_and_keeps_the_rest() {
        let a = places(&[("home", 2.0), ("work", 1.0)]);
        let b = places(&[("home", 1.5), ("cafe", 4.0)]);
        let merged = a.merge(&b);
        assert_eq!(merged.get("home"), 3.5);
        assert_eq!(merged.get("work"), 1.0);
        assert_eq!(merged.get("cafe"), 4.0);
    }

    #[test]
    fn compress_decays_observes_and_rounds() {
        let h = HourHistogram::new().add(9, 1.0).add(10, 0.333);
        let compressed = h.compress(Some(10));
        assert_eq!(compressed.get(&9), 0.95);
        // 0.333 * 0.95 = 0.31635 -> +1 -> 1.31635 -> 1.32
        assert_eq!(compressed.get(&10), 1.32);

        let untouched = h.compress(None);
        assert_eq!(untouched.get(&10), 0.32);
    }

    #[test]
    fn peak_prefers_the_smallest_key_on_ties() {
        let h = HourHistogram::new().add(17, 2.0).add(8, 2.0).add(12, 1.0);
        assert_eq!(h.peak(), Some(&8));

        let h = h.add(12, 5.0);
        assert_eq!(h.peak(), Some(&12));
    }

    #[test]
    fn affinity_is_share_of_total() {
        let h = places(&[("home", 3.0), ("work", 1.0)]);
        assert_eq!(h.affinity("home"), 0.75);
        assert_eq!(h.affinity("gym"), 0.0);
    }

    #[test]
    fn weights_never_go_negative() {
        let h = HourHistogram::new().add(9, 1.0).add(9, -4.0);
        assert_eq!(h.get(&9), 0.0);
    }

    #[test]
    fn integer_keys_survive_json() {
        let h = DayHistogram::new().add(0, 2.0).add(6, 1.0);
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, r#"{"0":2.0,"6":1.0}"#);
        let back: DayHistogram = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn collecting_sums_repeated_keys() {
        let h: DayHistogram = [(1u8, 1.0), (3, 2.0), (1, 0.5)].into_iter().collect();
        assert_eq!(h.len(), 2);
        assert_eq!(h.get(&1), 1.5);
        assert_eq!(h.peak(), Some(&3));
    }
}
