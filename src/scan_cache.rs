//! # Deduplicated, age-bounded store of scan observations (§4.B)
//!
//! Decoupling "what the radio last reported" from "what entries currently exist" is what
//! lets the entry catalog stay stable across a failed scan cycle (§5's anti-flicker
//! window).

use crate::clock::Clock;
use crate::errors::TrackerError;
use crate::types::ScanObservation;
use std::collections::HashMap;
use std::sync::Arc;

pub struct ScanCache {
    clock: Arc<dyn Clock>,
    max_age_ms: i64,
    observations: HashMap<String, ScanObservation>,
}

impl ScanCache {
    pub fn new(clock: Arc<dyn Clock>, max_age_ms: i64) -> Self {
        ScanCache { clock, max_age_ms, observations: HashMap::new() }
    }

    pub fn max_age_ms(&self) -> i64 {
        self.max_age_ms
    }

    /// Inserts each incoming observation if absent, or if its timestamp is strictly
    /// greater than the one already stored for that `bssid`. Never lowers a timestamp;
    /// never removes anything based on absence from `observations` (aging only, per
    /// Invariant 7).
    pub fn update(&mut self, observations: impl IntoIterator<Item = ScanObservation>) {
        for obs in observations {
            match self.observations.get(&obs.bssid) {
                Some(existing) if existing.timestamp_ms >= obs.timestamp_ms => {}
                _ => {
                    self.observations.insert(obs.bssid.clone(), obs);
                }
            }
        }
    }

    /// Returns observations with `now - ts <= window`, where `window` defaults to
    /// `max_age_ms` and may be explicitly widened up to `max_age_ms` (the caller is
    /// expected to pre-compute any anti-flicker widening and pass it here, already
    /// clamped -- see [`ScanCache::get_with_window`] for the unclamped variant used by the
    /// engine's anti-flicker pass).
    pub fn get(&self, age_window_ms: Option<i64>) -> Result<Vec<ScanObservation>, TrackerError> {
        let window = age_window_ms.unwrap_or(self.max_age_ms);
        if window > self.max_age_ms {
            return Err(TrackerError::InvalidAgeWindow);
        }
        Ok(self.collect_within(window))
    }

    /// Like [`ScanCache::get`], but allows widening past `max_age_ms` -- used exactly once,
    /// by the tracker engine's anti-flicker pass on a failed scan (§4.F), where the
    /// effective window is `max_age_ms + scan_interval_ms`.
    pub fn get_with_window(&self, age_window_ms: i64) -> Vec<ScanObservation> {
        self.collect_within(age_window_ms)
    }

    fn collect_within(&self, window_ms: i64) -> Vec<ScanObservation> {
        let now = self.clock.now_ms();
        let mut result: Vec<ScanObservation> = self
            .observations
            .values()
            .filter(|o| now - o.timestamp_ms <= window_ms)
            .cloned()
            .collect();
        // Stable, insertion-order-ish presentation: sort by bssid so results are
        // deterministic across runs (HashMap iteration order is not).
        result.sort_by(|a, b| a.bssid.cmp(&b.bssid));
        result
    }

    pub fn size(&self) -> usize {
        self.observations.len()
    }

    /// Clears the cache. Only ever called when the engine is stopped (§3 Lifecycle).
    pub fn clear(&mut self) {
        self.observations.clear();
    }
}
