//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (wall clock in ms)
//! - Input events (keyboard keys and touch buttons)

pub mod input;

pub use input::{Action, Key};

/// Wall-clock time in milliseconds since the unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Wall-clock time in milliseconds since the unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
