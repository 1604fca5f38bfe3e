//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logging setup
//! - Run seeds
//! - The browser-facing game handle (`web`)

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Seed for a fresh run taken from the wall clock
#[cfg(target_arch = "wasm32")]
pub fn clock_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Seed for a fresh run taken from the wall clock
#[cfg(not(target_arch = "wasm32"))]
pub fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Route `log` output to the browser console
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}

/// Route `log` output to stderr, filtered by `RUST_LOG` (default `info`)
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_seed_is_nonzero() {
        assert!(clock_seed() > 0);
    }
}
