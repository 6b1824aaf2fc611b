//! Engine configuration loaded from environment variables.

use std::time::Duration;

/// Tuning parameters for the expiration engine.
///
/// All fields have defaults matching production behavior. The windows are
/// product-tuning constants, so they stay configurable rather than being
/// hard-coded.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Fixed period between scheduled sweeps (default: 30s).
    pub poll_interval: Duration,
    /// Delay before the first sweep after process start, so stale state is
    /// not reprocessed immediately (default: 10s).
    pub initial_delay: Duration,
    /// Minimum gap between foreground-triggered sweeps (default: 5s).
    pub foreground_debounce: Duration,
    /// Trailing window during which a missed expiry is still settled;
    /// older expiries are treated as abandoned (default: 24h).
    pub catch_up_window: chrono::Duration,
    /// Duplicate-notification suppression window (default: 5m).
    pub dedup_window: chrono::Duration,
    /// Suppression window for the no-winner viewer fan-out (default: 24h).
    pub viewer_dedup_window: chrono::Duration,
    /// Maximum entries in the process-local handled cache (default: 1024).
    pub handled_cache_capacity: usize,
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default |
    /// |----------------------------------|---------|
    /// | `SWEEP_POLL_INTERVAL_SECS`       | `30`    |
    /// | `SWEEP_INITIAL_DELAY_SECS`       | `10`    |
    /// | `SWEEP_FOREGROUND_DEBOUNCE_SECS` | `5`     |
    /// | `SWEEP_CATCH_UP_WINDOW_HOURS`    | `24`    |
    /// | `NOTIFICATION_DEDUP_WINDOW_MINS` | `5`     |
    /// | `VIEWER_DEDUP_WINDOW_HOURS`      | `24`    |
    /// | `HANDLED_CACHE_CAPACITY`         | `1024`  |
    pub fn from_env() -> Self {
        Self {
            poll_interval: Duration::from_secs(env_u64("SWEEP_POLL_INTERVAL_SECS", 30)),
            initial_delay: Duration::from_secs(env_u64("SWEEP_INITIAL_DELAY_SECS", 10)),
            foreground_debounce: Duration::from_secs(env_u64(
                "SWEEP_FOREGROUND_DEBOUNCE_SECS",
                5,
            )),
            catch_up_window: chrono::Duration::hours(env_i64(
                "SWEEP_CATCH_UP_WINDOW_HOURS",
                24,
            )),
            dedup_window: chrono::Duration::minutes(env_i64(
                "NOTIFICATION_DEDUP_WINDOW_MINS",
                5,
            )),
            viewer_dedup_window: chrono::Duration::hours(env_i64(
                "VIEWER_DEDUP_WINDOW_HOURS",
                24,
            )),
            handled_cache_capacity: env_u64("HANDLED_CACHE_CAPACITY", 1024) as usize,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            initial_delay: Duration::from_secs(10),
            foreground_debounce: Duration::from_secs(5),
            catch_up_window: chrono::Duration::hours(24),
            dedup_window: chrono::Duration::minutes(5),
            viewer_dedup_window: chrono::Duration::hours(24),
            handled_cache_capacity: 1024,
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|_| panic!("{key} must be a valid u64"))
}

fn env_i64(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|_| panic!("{key} must be a valid i64"))
}
