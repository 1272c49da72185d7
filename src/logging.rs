//! Unified logging macro for the board firmware.
//!
//! Selects between `log::` (USB serial logger) and `defmt::` (RTT) based on
//! the active feature flags, so the same call sites work with either probe
//! setup.
//!
//! # Usage
//!
//! ```rust,ignore
//! board_log!(info, "Joined {}", ssid);
//! board_log!(warn, "Join failed, retrying in {}s", 5);
//! ```
//!
//! # Feature Flags
//!
//! - `usb-logger` - Uses `log::` crate (for USB serial debugging)
//! - No feature - Uses `defmt::` (default, more efficient for embedded)

/// Logging macro that forwards to `log::` or `defmt::`.
///
/// Format strings must stay within the subset both backends accept:
/// plain `{}` and `{:?}` placeholders.
#[macro_export]
#[cfg(feature = "usb-logger")]
macro_rules! board_log {
    (info, $($arg:tt)*) => { log::info!($($arg)*) };
    (debug, $($arg:tt)*) => { log::debug!($($arg)*) };
    (warn, $($arg:tt)*) => { log::warn!($($arg)*) };
    (error, $($arg:tt)*) => { log::error!($($arg)*) };
    (trace, $($arg:tt)*) => { log::trace!($($arg)*) };
}

#[macro_export]
#[cfg(not(feature = "usb-logger"))]
macro_rules! board_log {
    (info, $($arg:tt)*) => { defmt::info!($($arg)*) };
    (debug, $($arg:tt)*) => { defmt::debug!($($arg)*) };
    (warn, $($arg:tt)*) => { defmt::warn!($($arg)*) };
    (error, $($arg:tt)*) => { defmt::error!($($arg)*) };
    (trace, $($arg:tt)*) => { defmt::trace!($($arg)*) };
}
