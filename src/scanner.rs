//! # Periodic/PNO scan scheduling (§4.C)
//!
//! Three back-off schedules apply depending on connection state -- disconnected,
//! connected with more than one saved network, and connected with exactly one saved
//! network (eligible for firmware roaming, so scans can back off further). Mobility state
//! additionally governs the platform's background PNO scan period; a mobility change only
//! triggers a PNO restart when the period it maps to actually differs from the one in
//! effect (§4.C "PNO restart-if-period-differs").

use crate::config::{effective_schedule, TrackerConfig};
use crate::types::MobilityState;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Which back-off schedule governs the next scan delay.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ScanMode {
    Disconnected,
    Connected,
    SingleSavedConnected,
}

/// Emitted on each scheduled tick; the engine's worker loop turns this into a scan
/// request.
#[derive(Copy, Clone, Debug)]
pub struct ScanTick;

/// Tracks back-off position and consecutive `start_scan()` rejections.
pub struct Scanner {
    config: TrackerConfig,
    step: usize,
    retry_count: u32,
    pno_period_sec: Option<u64>,
}

impl Scanner {
    pub fn new(config: TrackerConfig) -> Self {
        Scanner { config, step: 0, retry_count: 0, pno_period_sec: None }
    }

    fn schedule_for(&self, mode: ScanMode) -> Vec<u64> {
        match mode {
            ScanMode::Disconnected => effective_schedule(&self.config.disconnected_schedule_sec),
            ScanMode::Connected => effective_schedule(&self.config.connected_schedule_sec),
            ScanMode::SingleSavedConnected => effective_schedule(&self.config.single_saved_connected_schedule_sec),
        }
    }

    /// Returns the delay (seconds) for the next tick and advances the back-off step,
    /// saturating at the schedule's last entry rather than wrapping.
    pub fn next_delay_sec(&mut self, mode: ScanMode) -> u64 {
        let schedule = self.schedule_for(mode);
        let idx = self.step.min(schedule.len() - 1);
        let delay = schedule[idx];
        if self.step < schedule.len() - 1 {
            self.step += 1;
        }
        delay
    }

    /// Resets back-off to the schedule's first entry, e.g. on a connectivity transition.
    pub fn reset_backoff(&mut self) {
        self.step = 0;
    }

    /// Records a `start_scan()` rejection. Returns `true` once `scan_retry_max`
    /// consecutive rejections have accumulated and the cycle should abort.
    pub fn record_rejected(&mut self) -> bool {
        self.retry_count += 1;
        self.retry_count >= self.config.scan_retry_max
    }

    pub fn record_success(&mut self) {
        self.retry_count = 0;
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    fn mobility_period_sec(mobility: MobilityState) -> u64 {
        match mobility {
            MobilityState::Stationary => 160,
            MobilityState::LowMovement => 80,
            MobilityState::HighMovement => 20,
        }
    }

    /// Returns `true` if the platform's PNO scan should be restarted with a new period --
    /// i.e. the mobility-derived period actually changed, not merely the mobility label.
    pub fn update_mobility(&mut self, mobility: MobilityState) -> bool {
        let period = Self::mobility_period_sec(mobility);
        let changed = self.pno_period_sec != Some(period);
        self.pno_period_sec = Some(period);
        changed
    }
}

/// Drives a tick loop that re-reads `mode` before every sleep, so a connectivity
/// transition changes the very next delay rather than waiting for the current schedule to
/// drain. Returns the task handle; drop it (or abort) to stop ticking.
pub fn spawn_ticker(scanner: Arc<Mutex<Scanner>>, mode: Arc<Mutex<ScanMode>>, tx: mpsc::UnboundedSender<ScanTick>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let delay_sec = {
                let current_mode = *mode.lock().expect("scan mode lock poisoned");
                scanner.lock().expect("scanner lock poisoned").next_delay_sec(current_mode)
            };
            tokio::time::sleep(std::time::Duration::from_secs(delay_sec)).await;
            if tx.send(ScanTick).is_err() {
                return;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_schedule(schedule: Vec<u64>) -> TrackerConfig {
        TrackerConfig { disconnected_schedule_sec: schedule, ..TrackerConfig::default() }
    }

    #[test]
    fn default_schedule_fallback_saturates_at_last_entry() {
        let mut scanner = Scanner::new(TrackerConfig::default());
        let delays: Vec<u64> = (0..6).map(|_| scanner.next_delay_sec(ScanMode::Disconnected)).collect();
        assert_eq!(delays, vec![20, 40, 80, 160, 160, 160]);
    }

    #[test]
    fn custom_schedule_drives_backoff() {
        let mut scanner = Scanner::new(config_with_schedule(vec![5, 15]));
        assert_eq!(scanner.next_delay_sec(ScanMode::Disconnected), 5);
        assert_eq!(scanner.next_delay_sec(ScanMode::Disconnected), 15);
        assert_eq!(scanner.next_delay_sec(ScanMode::Disconnected), 15);
    }

    #[test]
    fn reset_backoff_returns_to_first_entry() {
        let mut scanner = Scanner::new(config_with_schedule(vec![5, 15]));
        scanner.next_delay_sec(ScanMode::Disconnected);
        scanner.reset_backoff();
        assert_eq!(scanner.next_delay_sec(ScanMode::Disconnected), 5);
    }

    #[test]
    fn scan_retry_max_triggers_abort() {
        let mut scanner = Scanner::new(TrackerConfig { scan_retry_max: 3, ..TrackerConfig::default() });
        assert!(!scanner.record_rejected());
        assert!(!scanner.record_rejected());
        assert!(scanner.record_rejected());
    }

    #[test]
    fn success_resets_retry_count() {
        let mut scanner = Scanner::new(TrackerConfig::default());
        scanner.record_rejected();
        scanner.record_success();
        assert_eq!(scanner.retry_count(), 0);
    }

    #[test]
    fn mobility_restart_only_on_period_change() {
        let mut scanner = Scanner::new(TrackerConfig::default());
        assert!(scanner.update_mobility(MobilityState::Stationary));
        assert!(!scanner.update_mobility(MobilityState::Stationary));
        assert!(scanner.update_mobility(MobilityState::HighMovement));
    }

    #[test]
    fn single_saved_connected_schedule_is_independent() {
        let config = TrackerConfig { single_saved_connected_schedule_sec: vec![100], ..TrackerConfig::default() };
        let mut scanner = Scanner::new(config);
        assert_eq!(scanner.next_delay_sec(ScanMode::SingleSavedConnected), 100);
    }
}
