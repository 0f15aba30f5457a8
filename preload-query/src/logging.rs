//! Logging setup controlled by environment variables.
//!
//! - `PRELOAD_DEBUG=true|1|yes` - enable debug logging
//! - `PRELOAD_LOG_LEVEL=trace|debug|info|warn|error` - set a specific level
//!
//! Within the engine, the standard `tracing` macros are used:
//!
//! ```rust,ignore
//! debug!(sql = %query.to_sql(), "issuing associated query");
//! ```
//!
//! `init` installs a `tracing-subscriber` formatter and is only available
//! with the `tracing-subscriber` feature; without it the host application
//! owns subscriber setup.

use std::env;

/// Check if debug logging is enabled via the `PRELOAD_DEBUG` environment
/// variable.
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("PRELOAD_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Get the configured log level from `PRELOAD_LOG_LEVEL`.
///
/// Defaults to "debug" when `PRELOAD_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    if let Ok(level) = env::var("PRELOAD_LOG_LEVEL") {
        match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => default_level(),
        }
    } else {
        default_level()
    }
}

fn default_level() -> &'static str {
    if is_debug_enabled() { "debug" } else { "warn" }
}

/// Initialize a global `tracing` subscriber honoring the environment
/// variables above. Call once at startup; subsequent calls are ignored.
#[cfg(feature = "tracing-subscriber")]
pub fn init() {
    use std::sync::Once;

    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(get_log_level()));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init();
    });
}
