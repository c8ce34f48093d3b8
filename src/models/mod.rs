pub mod context;
pub mod histogram;
pub mod item;

pub use context::{DeviceType, OrbitContext, UNKNOWN_PLACE};
pub use histogram::{
    DayHistogram, DeviceHistogram, Histogram, HourHistogram, PlaceHistogram,
    DEFAULT_DECAY_FACTOR, PRUNE_THRESHOLD,
};
pub use item::validation;
pub use item::{
    InteractionType, ItemState, OrbitItem, OrbitItemComputed, OrbitItemSignals, NEUTRAL_SCORE,
};
