use serde::{Deserialize, Serialize};

/// Relevance weights for the additive scoring factors.
///
/// The five context factors (time, place, device, recency, frequency) plus
/// novelty sum to 0.90; the pin weight is added on top for active pins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Hour-of-day and day-of-week pattern matching
    pub time: f64,
    /// Place label (home/work/...)
    pub place: f64,
    /// Device class
    pub device: f64,
    /// How recently the item was seen or opened
    pub recency: f64,
    /// How often the item was seen or opened
    pub frequency: f64,
    /// Active user pin
    pub pinned: f64,
    /// Boost for freshly created items
    pub novelty: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            time: 0.20,
            place: 0.15,
            device: 0.10,
            recency: 0.25,
            frequency: 0.15,
            pinned: 0.10,
            novelty: 0.05,
        }
    }
}

/// Engine configuration with tunable limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub weights: ScoringWeights,

    /// Maximum items in the visible set
    pub max_visible: usize,

    /// Time constant (days) of the exponential recency curve
    pub recency_decay_days: f64,

    /// Quiet period used when the caller doesn't pick one
    pub quiet_hours_default: f64,

    /// Novelty: full boost for this long after creation...
    pub novelty_hours: f64,
    /// ...then a linear fade to zero over this many hours
    pub novelty_fade_hours: f64,

    /// Item store limits
    pub max_title_length: usize,
    pub max_items: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            max_visible: 5,
            recency_decay_days: 7.0,
            quiet_hours_default: 4.0,
            novelty_hours: 24.0,
            novelty_fade_hours: 48.0,
            max_title_length: 200,
            max_items: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_leave_room_for_the_pin() {
        let w = ScoringWeights::default();
        let additive = w.time + w.place + w.device + w.recency + w.frequency + w.novelty;
        assert!((additive - 0.90).abs() < 1e-9);
        assert!((additive + w.pinned - 1.0).abs() < 1e-9);
    }
}
