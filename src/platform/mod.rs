//! Platform abstraction layer
//!
//! Wall-clock time differs between the browser and native builds. Only used to
//! report how long a synchronous generation took; simulations never read it.

/// Milliseconds from an arbitrary epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds from an arbitrary epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
