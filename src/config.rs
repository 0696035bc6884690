//! The tracker engine's own tunable options are defined in this module.
//!
//! This is distinct from a [`crate::types::Configuration`], which is a snapshot of a single
//! *saved network* the engine merely observes; `TrackerConfig` governs the engine itself.

use serde::{Deserialize, Serialize};

/// Default back-off schedule (seconds) used whenever a configured schedule is empty,
/// all-zero, or contains non-positive entries.
pub const DEFAULT_SCHEDULE_SEC: &[u64] = &[20, 40, 80, 160];

/// Constructor options for [`crate::engine::TrackerEngine`], matching the "Configuration
/// options" table verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Age past which a cached scan observation is no longer returned.
    pub max_scan_age_ms: i64,
    /// Nominal interval between periodic scans; also widens the anti-flicker window on a
    /// failed scan (`max_scan_age_ms + scan_interval_ms`).
    pub scan_interval_ms: i64,
    /// Back-off schedule (seconds) used while disconnected.
    #[serde(default)]
    pub disconnected_schedule_sec: Vec<u64>,
    /// Back-off schedule (seconds) used while connected with more than one saved network.
    #[serde(default)]
    pub connected_schedule_sec: Vec<u64>,
    /// Back-off schedule used while connected with exactly one saved network and firmware
    /// roaming support.
    #[serde(default)]
    pub single_saved_connected_schedule_sec: Vec<u64>,
    /// Maximum consecutive `start_scan()` rejections before a scan cycle aborts.
    #[serde(default = "default_scan_retry_max")]
    pub scan_retry_max: u32,
    /// Delay before a pending disconnect surfaces `UNKNOWN` if no platform event arrived.
    #[serde(default = "default_disconnect_watchdog_ms")]
    pub disconnect_watchdog_ms: u64,
    /// Whether auto-join is enabled by an external policy (mirrors the platform bit).
    #[serde(default)]
    pub auto_join_enabled_external: bool,
}

fn default_scan_retry_max() -> u32 {
    3
}

fn default_disconnect_watchdog_ms() -> u64 {
    10_000
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            max_scan_age_ms: 30_000,
            scan_interval_ms: 20_000,
            disconnected_schedule_sec: Vec::new(),
            connected_schedule_sec: Vec::new(),
            single_saved_connected_schedule_sec: Vec::new(),
            scan_retry_max: default_scan_retry_max(),
            disconnect_watchdog_ms: default_disconnect_watchdog_ms(),
            auto_join_enabled_external: true,
        }
    }
}

/// Returns `schedule` if it contains at least one positive entry, otherwise the default
/// schedule `[20, 40, 80, 160]` seconds. Per §4.C: "If the configured schedule is empty,
/// all zero, or contains non-positive entries, a default schedule is used."
pub fn effective_schedule(schedule: &[u64]) -> Vec<u64> {
    if schedule.is_empty() || schedule.iter().all(|v| *v == 0) {
        DEFAULT_SCHEDULE_SEC.to_vec()
    } else {
        schedule.iter().copied().filter(|v| *v > 0).collect::<Vec<_>>()
    }
}
