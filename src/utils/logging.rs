//! Opt-in logging macros gated by a module-level `ENABLE_LOGS` const.
//!
//! The engine is hot and pure, so its modules keep their trace output off by
//! default and flip the flag while debugging:
//!
//! ```rust,ignore
//! const ENABLE_LOGS: bool = false;
//!
//! use crate::log_debug;
//!
//! log_debug!("ranked {} items", n);
//! ```
//!
//! The arguments are always type-checked; the `log` call is compiled out
//! when the flag is false.

/// Debug-level log, emitted only when the calling module sets `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

/// Info-level log, emitted only when the calling module sets `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Warn-level log, emitted only when the calling module sets `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}
