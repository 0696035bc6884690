//! # The tracker engine: worker task, reconciliation loop and public API (§3, §4, §9)
//!
//! [`TrackerEngine`] is the single entry point a consumer holds. Internally it follows the
//! "dual single-threaded-executor" mapping from §9: a dedicated worker task owns the
//! [`ScanCache`]/[`EntryCache`]/[`Scanner`] exclusively and runs every reconciliation pass
//! to completion before touching them again (no `Mutex` contention on the core state,
//! because nothing else ever reaches in), while the caller-supplied
//! [`tokio::runtime::Handle`] stands in for the main thread that listener callbacks land
//! on via the [`Dispatcher`].

use crate::callback::ResultCallback;
use crate::clock::Clock;
use crate::config::TrackerConfig;
use crate::dispatch::{DispatchEvent, Dispatcher, TrackerListener};
use crate::entry::WifiEntryOps;
use crate::entry_cache::EntryCache;
use crate::errors::TrackerError;
use crate::platform::WifiPlatform;
use crate::scan_cache::ScanCache;
use crate::scanner::{spawn_ticker, ScanMode, Scanner};
use crate::types::{ConfigChangeReason, MeteredOverride, MobilityState};
use crate::views::{DetailsView, PickerView, SavedNetworksView, SavedSubscriptionsView};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

enum WorkerEvent {
    ScanTick,
    ConnectionInfoUpdated,
    ConfigChanged(ConfigChangeReason),
    WifiStateChanged(crate::types::WifiState),
    MobilityChanged(MobilityState),
    Connect { key: String, cb: ResultCallback },
    Disconnect { key: String, reply: oneshot::Sender<Result<(), TrackerError>> },
    Forget { key: String, reply: oneshot::Sender<Result<(), TrackerError>> },
    SetAutoJoin { key: String, enabled: bool, reply: oneshot::Sender<Result<(), TrackerError>> },
    SetMeteredChoice { key: String, value: MeteredOverride, reply: oneshot::Sender<Result<(), TrackerError>> },
    Stop,
}

struct WorkerHandles {
    tx: mpsc::UnboundedSender<WorkerEvent>,
    worker: JoinHandle<()>,
    ticker: JoinHandle<()>,
}

/// The public surface of this crate. Construct one per platform session; call
/// [`TrackerEngine::start`] to begin reconciliation and [`TrackerEngine::stop`] to tear
/// it down (§3 Lifecycle: a stopped engine's state is discarded, not paused -- restart
/// begins from an empty catalog).
pub struct TrackerEngine {
    config: TrackerConfig,
    platform: Arc<dyn WifiPlatform>,
    clock: Arc<dyn Clock>,
    dispatcher: Arc<Dispatcher>,
    picker_view: Arc<PickerView>,
    saved_networks_view: Arc<SavedNetworksView>,
    saved_subscriptions_view: Arc<SavedSubscriptionsView>,
    details_view: Arc<DetailsView>,
    handles: StdMutex<Option<WorkerHandles>>,
}

impl TrackerEngine {
    pub fn new(config: TrackerConfig, platform: Arc<dyn WifiPlatform>, clock: Arc<dyn Clock>, main_thread: Handle) -> Self {
        TrackerEngine {
            config,
            platform,
            clock,
            dispatcher: Arc::new(Dispatcher::new(main_thread)),
            picker_view: Arc::new(PickerView::new()),
            saved_networks_view: Arc::new(SavedNetworksView::new()),
            saved_subscriptions_view: Arc::new(SavedSubscriptionsView::new()),
            details_view: Arc::new(DetailsView::new()),
            handles: StdMutex::new(None),
        }
    }

    pub fn set_listener(&self, listener: Option<Arc<dyn TrackerListener>>) {
        self.dispatcher.set_listener(listener);
    }

    pub fn picker_view(&self) -> Arc<PickerView> {
        self.picker_view.clone()
    }

    pub fn saved_networks_view(&self) -> Arc<SavedNetworksView> {
        self.saved_networks_view.clone()
    }

    pub fn saved_subscriptions_view(&self) -> Arc<SavedSubscriptionsView> {
        self.saved_subscriptions_view.clone()
    }

    pub fn details_view(&self) -> Arc<DetailsView> {
        self.details_view.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handles.lock().expect("engine handles lock poisoned").is_some()
    }

    /// Spawns the worker task and its tick scheduler. Idempotent: calling `start` while
    /// already running is a no-op.
    pub fn start(self: &Arc<Self>) {
        let mut guard = self.handles.lock().expect("engine handles lock poisoned");
        if guard.is_some() {
            return;
        }
        let (tx, rx) = mpsc::unbounded_channel();
        let scanner = Arc::new(StdMutex::new(Scanner::new(self.config.clone())));
        let mode = Arc::new(StdMutex::new(ScanMode::Disconnected));

        let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
        let ticker = spawn_ticker(scanner.clone(), mode.clone(), tick_tx);

        let worker_tx = tx.clone();
        tokio::spawn(async move {
            while tick_rx.recv().await.is_some() {
                if worker_tx.send(WorkerEvent::ScanTick).is_err() {
                    return;
                }
            }
        });

        let engine = self.clone();
        let worker = tokio::spawn(async move {
            engine.run_worker(rx, mode).await;
        });

        *guard = Some(WorkerHandles { tx, worker, ticker });
    }

    /// Stops the worker and tick scheduler, discards the entry/scan caches, and clears
    /// every view. The dispatcher is also stopped so any event already in flight is
    /// dropped rather than delivered against torn-down state.
    pub fn stop(&self) {
        let handles = self.handles.lock().expect("engine handles lock poisoned").take();
        if let Some(handles) = handles {
            let _ = handles.tx.send(WorkerEvent::Stop);
            handles.ticker.abort();
            handles.worker.abort();
        }
        self.dispatcher.stop();
        self.details_view.clear();
    }

    fn send(&self, event: WorkerEvent) -> Result<(), TrackerError> {
        let guard = self.handles.lock().expect("engine handles lock poisoned");
        match guard.as_ref() {
            Some(handles) => handles.tx.send(event).map_err(|_| TrackerError::Generic("engine worker is not running".into())),
            None => Err(TrackerError::Generic("engine is not started".into())),
        }
    }

    /// Requests a connect. `cb` is invoked exactly once, either by the worker once the
    /// platform call resolves, or immediately if the engine is not running.
    pub fn connect(&self, key: String, cb: ResultCallback) {
        let guard = self.handles.lock().expect("engine handles lock poisoned");
        match guard.as_ref() {
            Some(handles) => {
                if let Err(mpsc::error::SendError(WorkerEvent::Connect { cb, .. })) = handles.tx.send(WorkerEvent::Connect { key, cb }) {
                    cb(Err(TrackerError::Generic("engine worker is not running".into())));
                }
            }
            None => cb(Err(TrackerError::Generic("engine is not started".into()))),
        }
    }

    pub async fn disconnect(&self, key: String) -> Result<(), TrackerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(WorkerEvent::Disconnect { key, reply: reply_tx })?;
        reply_rx.await.map_err(|_| TrackerError::Generic("worker dropped the reply channel".into()))?
    }

    pub async fn forget(&self, key: String) -> Result<(), TrackerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(WorkerEvent::Forget { key, reply: reply_tx })?;
        reply_rx.await.map_err(|_| TrackerError::Generic("worker dropped the reply channel".into()))?
    }

    pub async fn set_auto_join_enabled(&self, key: String, enabled: bool) -> Result<(), TrackerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(WorkerEvent::SetAutoJoin { key, enabled, reply: reply_tx })?;
        reply_rx.await.map_err(|_| TrackerError::Generic("worker dropped the reply channel".into()))?
    }

    pub async fn set_metered_choice(&self, key: String, value: MeteredOverride) -> Result<(), TrackerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(WorkerEvent::SetMeteredChoice { key, value, reply: reply_tx })?;
        reply_rx.await.map_err(|_| TrackerError::Generic("worker dropped the reply channel".into()))?
    }

    pub fn notify_wifi_state_changed(&self, state: crate::types::WifiState) {
        let _ = self.send(WorkerEvent::WifiStateChanged(state));
    }

    pub fn notify_mobility_changed(&self, mobility: MobilityState) {
        let _ = self.send(WorkerEvent::MobilityChanged(mobility));
    }

    /// Lets a platform-pushed connection/network-state broadcast trigger an immediate
    /// reconciliation instead of waiting for the next scheduled scan tick (§4.F).
    pub fn notify_connection_info_changed(&self) {
        let _ = self.send(WorkerEvent::ConnectionInfoUpdated);
    }

    /// Lets a `CONFIGURED_NETWORKS_CHANGED` broadcast trigger an immediate re-read of saved
    /// configurations (both standard and Passpoint) instead of waiting for the next
    /// scheduled scan tick (§6).
    pub fn notify_configured_networks_changed(&self, reason: ConfigChangeReason) {
        let _ = self.send(WorkerEvent::ConfigChanged(reason));
    }

    async fn run_worker(self: Arc<Self>, mut rx: mpsc::UnboundedReceiver<WorkerEvent>, mode: Arc<StdMutex<ScanMode>>) {
        let mut scan_cache = ScanCache::new(self.clock.clone(), self.config.max_scan_age_ms);
        let mut entry_cache = EntryCache::new();
        let mut wifi_enabled = true;
        let mut last_scan_failed = false;

        while let Some(event) = rx.recv().await {
            match event {
                WorkerEvent::Stop => break,
                WorkerEvent::WifiStateChanged(state) => {
                    wifi_enabled = matches!(state, crate::types::WifiState::Enabled);
                    self.dispatcher.dispatch(DispatchEvent::WifiStateChanged(state));
                }
                WorkerEvent::MobilityChanged(_mobility) => {
                    // PNO period restart is a platform-side concern; the scanner already
                    // tracks whether a restart is owed. Nothing to reconcile here.
                }
                WorkerEvent::ConnectionInfoUpdated => {
                    self.reconcile_connection_info(&mut entry_cache).await;
                    self.publish_views(&entry_cache, &mode);
                }
                WorkerEvent::ConfigChanged(reason) => {
                    self.reconcile_configs(&mut entry_cache).await;
                    self.dispatcher.dispatch(DispatchEvent::ConfigChanged(reason));
                    self.publish_views(&entry_cache, &mode);
                }
                WorkerEvent::ScanTick => {
                    last_scan_failed = !self.run_scan_cycle(&mut scan_cache, &mut entry_cache, last_scan_failed, wifi_enabled).await;
                    self.publish_views(&entry_cache, &mode);
                }
                WorkerEvent::Connect { key, cb } => {
                    let entry = entry_cache.get(&key).cloned();
                    match entry {
                        Some(entry) => entry.connect(self.platform.as_ref(), cb).await,
                        None => cb(Err(TrackerError::Generic(format!("no entry for key {}", key)))),
                    }
                }
                WorkerEvent::Disconnect { key, reply } => {
                    let entry = entry_cache.get(&key).cloned();
                    let result = match entry {
                        Some(entry) => entry.disconnect(self.platform.as_ref(), self.config.disconnect_watchdog_ms).await,
                        None => Err(TrackerError::Generic(format!("no entry for key {}", key))),
                    };
                    let _ = reply.send(result);
                }
                WorkerEvent::Forget { key, reply } => {
                    let entry = entry_cache.get(&key).cloned();
                    let result = match entry {
                        Some(entry) => entry.forget(self.platform.as_ref()).await,
                        None => Err(TrackerError::Generic(format!("no entry for key {}", key))),
                    };
                    let _ = reply.send(result);
                }
                WorkerEvent::SetAutoJoin { key, enabled, reply } => {
                    let entry = entry_cache.get(&key).cloned();
                    let result = match entry {
                        Some(entry) => entry.set_auto_join_enabled(self.platform.as_ref(), enabled).await,
                        None => Err(TrackerError::Generic(format!("no entry for key {}", key))),
                    };
                    let _ = reply.send(result);
                }
                WorkerEvent::SetMeteredChoice { key, value, reply } => {
                    let result = match entry_cache.get_mut(&key) {
                        Some(crate::entry::WifiEntry::Passpoint(e)) => e.set_metered_choice(self.platform.as_ref(), value).await,
                        Some(crate::entry::WifiEntry::Standard(e)) => match e.config() {
                            Some(cfg) => self.platform.set_metered_override(cfg.network_id, value).await,
                            None => Err(TrackerError::Generic("entry is not saved".into())),
                        },
                        _ => Err(TrackerError::NotSupported),
                    };
                    let _ = reply.send(result);
                }
            }
        }

        entry_cache.clear();
        scan_cache.clear();
    }

    /// Runs one full reconciliation cycle in the canonical pass order: raw scans into the
    /// scan cache, saved-config passes (standard then Passpoint), scan-derived entry
    /// passes (standard then Passpoint then OSU), connection info, then expiry eviction.
    /// Returns `true` if the platform accepted the scan request.
    ///
    /// When `wifi_enabled` is `false` the scan input is treated as empty (§7 `WifiDisabled`):
    /// no scan is started and the scan cache is left untouched, so previously cached
    /// observations age out naturally while every other reconciliation pass still runs,
    /// pruning unsaved entries that fall out of the (now empty) scan window.
    async fn run_scan_cycle(&self, scan_cache: &mut ScanCache, entry_cache: &mut EntryCache, previous_failed: bool, wifi_enabled: bool) -> bool {
        let (accepted, window) = if !wifi_enabled {
            (false, Vec::new())
        } else {
            let accepted = self.platform.start_scan().await;
            let raw = self.platform.get_scan_results().await;
            scan_cache.update(raw);
            let window = if previous_failed {
                scan_cache.get_with_window(self.config.max_scan_age_ms + self.config.scan_interval_ms)
            } else {
                scan_cache.get(None).unwrap_or_default()
            };
            (accepted, window)
        };

        self.reconcile_configs(entry_cache).await;

        if let Err(e) = entry_cache.update_standard_from_scans(&window, self.platform.as_ref()) {
            log::warn!("standard scan reconciliation failed: {}", e);
        }

        let pp_matches = self.platform.find_passpoint_matches(&window).await;
        entry_cache.update_passpoint_from_scans(pp_matches, self.platform.as_ref());

        let osu_matches = self.platform.find_osu_providers(&window).await;
        entry_cache.update_osu_from_scans(osu_matches, self.platform.as_ref());

        self.reconcile_connection_info(entry_cache).await;
        entry_cache.evict_expired(self.clock.now_ms());

        accepted
    }

    /// Re-reads saved standard and Passpoint configurations and folds them into the entry
    /// cache (the config half of the canonical pass order, §4.E).
    async fn reconcile_configs(&self, entry_cache: &mut EntryCache) {
        let configs = self.platform.get_configured_networks().await;
        if let Err(e) = entry_cache.update_standard_from_configs(configs, self.platform.as_ref()) {
            log::warn!("standard config reconciliation failed: {}", e);
        }

        let pp_configs = self.platform.get_passpoint_configurations().await;
        entry_cache.update_passpoint_from_configs(pp_configs, self.platform.as_ref());
    }

    async fn reconcile_connection_info(&self, entry_cache: &mut EntryCache) {
        let info = self.platform.get_connection_info().await;
        let net_info = self.platform.get_active_network_info().await;
        let configs = self.platform.get_configured_networks().await;
        entry_cache.conditionally_create_connected_entry(&info, &net_info, &configs, self.platform.as_ref());
        let previous = entry_cache.current_connection_key().map(|s| s.to_owned());
        entry_cache.update_connection_info(&info, &net_info, self.platform.as_ref());
        let current = entry_cache.current_connection_key().map(|s| s.to_owned());
        if current != previous {
            self.dispatcher.dispatch(DispatchEvent::ConnectedEntryChanged(current));
        }
    }

    fn publish_views(&self, entry_cache: &EntryCache, mode: &Arc<StdMutex<ScanMode>>) {
        self.picker_view.rebuild(entry_cache);
        self.saved_networks_view.rebuild(entry_cache);
        self.saved_subscriptions_view.rebuild(entry_cache);
        self.dispatcher.dispatch(DispatchEvent::EntriesChanged);

        let picker_eligible: Vec<crate::entry::WifiEntry> =
            entry_cache.all().filter(|e| crate::views::is_picker_eligible(e)).cloned().collect();
        self.dispatcher.dispatch(DispatchEvent::Entries(picker_eligible));

        let saved_count = entry_cache.all().filter(|e| matches!(e, crate::entry::WifiEntry::Standard(_)) && e.is_saved()).count();
        let connected = entry_cache.current_connection_key().is_some();
        let next_mode = if !connected {
            ScanMode::Disconnected
        } else if saved_count <= 1 {
            ScanMode::SingleSavedConnected
        } else {
            ScanMode::Connected
        };
        *mode.lock().expect("scan mode lock poisoned") = next_mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::types::{Configuration, NetworkInfo, OsuMatch, PasspointMatch, ScanObservation, SecurityFamily, WifiState};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    struct FakePlatform;

    #[async_trait]
    impl WifiPlatform for FakePlatform {
        async fn get_wifi_state(&self) -> WifiState {
            WifiState::Enabled
        }
        async fn get_scan_results(&self) -> Vec<ScanObservation> {
            Vec::new()
        }
        async fn get_configured_networks(&self) -> Vec<Configuration> {
            Vec::new()
        }
        async fn get_passpoint_configurations(&self) -> Vec<crate::types::PasspointConfiguration> {
            Vec::new()
        }
        async fn get_connection_info(&self) -> crate::types::ConnectionInfo {
            crate::types::ConnectionInfo::default()
        }
        async fn get_active_network_info(&self) -> NetworkInfo {
            NetworkInfo::default()
        }
        fn calculate_signal_level(&self, rssi_dbm: i32) -> crate::utils::SignalLevel {
            if rssi_dbm >= -50 { 4 } else { 1 }
        }
        async fn start_scan(&self) -> bool {
            true
        }
        async fn connect_network(&self, _network_id: i32) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn connect_with_generated_config(&self, _ssid: &str, _security: SecurityFamily) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn connect_passpoint(&self, _unique_id: &str) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn disconnect(&self) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn remove_network(&self, _network_id: i32) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn remove_passpoint(&self, _fqdn: &str) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn disable_ephemeral_passpoint(&self, _fqdn: &str) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn set_metered_override(&self, _network_id: i32, _value: MeteredOverride) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn set_passpoint_metered_override(&self, _fqdn: &str, _value: MeteredOverride) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn allow_autojoin(&self, _network_id: i32, _enabled: bool) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn allow_autojoin_passpoint(&self, _fqdn: &str, _enabled: bool) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn find_passpoint_matches(&self, _scans: &[ScanObservation]) -> Vec<PasspointMatch> {
            Vec::new()
        }
        async fn find_osu_providers(&self, _scans: &[ScanObservation]) -> Vec<OsuMatch> {
            Vec::new()
        }
    }

    fn make_engine() -> Arc<TrackerEngine> {
        Arc::new(TrackerEngine::new(
            TrackerConfig::default(),
            Arc::new(FakePlatform),
            Arc::new(ManualClock::new(0)),
            Handle::current(),
        ))
    }

    #[tokio::test]
    async fn start_is_idempotent_and_stop_clears_running_state() {
        let engine = make_engine();
        assert!(!engine.is_running());
        engine.start();
        assert!(engine.is_running());
        engine.start();
        assert!(engine.is_running());
        engine.stop();
        assert!(!engine.is_running());
    }

    #[tokio::test]
    async fn connect_to_unknown_key_reports_failure_without_touching_the_platform() {
        let engine = make_engine();
        engine.start();
        let (tx, rx) = oneshot::channel();
        engine.connect("StandardWifiEntry:ghost,2".into(), Box::new(move |result| {
            let _ = tx.send(result);
        }));
        let result = rx.await.unwrap();
        assert!(result.is_err());
        engine.stop();
    }

    #[tokio::test]
    async fn operations_fail_fast_when_the_engine_is_not_started() {
        let engine = make_engine();
        let result = engine.disconnect("StandardWifiEntry:home,2".into()).await;
        assert!(result.is_err());
    }

    struct ScanCountingPlatform {
        start_scan_calls: AtomicUsize,
    }

    #[async_trait]
    impl WifiPlatform for ScanCountingPlatform {
        async fn get_wifi_state(&self) -> WifiState {
            WifiState::Enabled
        }
        async fn get_scan_results(&self) -> Vec<ScanObservation> {
            Vec::new()
        }
        async fn get_configured_networks(&self) -> Vec<Configuration> {
            Vec::new()
        }
        async fn get_passpoint_configurations(&self) -> Vec<crate::types::PasspointConfiguration> {
            Vec::new()
        }
        async fn get_connection_info(&self) -> crate::types::ConnectionInfo {
            crate::types::ConnectionInfo::default()
        }
        async fn get_active_network_info(&self) -> NetworkInfo {
            NetworkInfo::default()
        }
        fn calculate_signal_level(&self, rssi_dbm: i32) -> crate::utils::SignalLevel {
            if rssi_dbm >= -50 { 4 } else { 1 }
        }
        async fn start_scan(&self) -> bool {
            self.start_scan_calls.fetch_add(1, AtomicOrdering::SeqCst);
            true
        }
        async fn connect_network(&self, _network_id: i32) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn connect_with_generated_config(&self, _ssid: &str, _security: SecurityFamily) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn connect_passpoint(&self, _unique_id: &str) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn disconnect(&self) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn remove_network(&self, _network_id: i32) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn remove_passpoint(&self, _fqdn: &str) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn disable_ephemeral_passpoint(&self, _fqdn: &str) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn set_metered_override(&self, _network_id: i32, _value: MeteredOverride) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn set_passpoint_metered_override(&self, _fqdn: &str, _value: MeteredOverride) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn allow_autojoin(&self, _network_id: i32, _enabled: bool) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn allow_autojoin_passpoint(&self, _fqdn: &str, _enabled: bool) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn find_passpoint_matches(&self, _scans: &[ScanObservation]) -> Vec<PasspointMatch> {
            Vec::new()
        }
        async fn find_osu_providers(&self, _scans: &[ScanObservation]) -> Vec<OsuMatch> {
            Vec::new()
        }
    }

    /// §7 `WifiDisabled`: a disabled radio must not be scanned, and the scan window fed
    /// to reconciliation must be empty, even though every other pass still runs.
    #[tokio::test]
    async fn disabled_wifi_skips_the_platform_scan_and_empties_the_window() {
        let platform = Arc::new(ScanCountingPlatform { start_scan_calls: AtomicUsize::new(0) });
        let engine = TrackerEngine::new(TrackerConfig::default(), platform.clone(), Arc::new(ManualClock::new(0)), Handle::current());
        let mut scan_cache = ScanCache::new(Arc::new(ManualClock::new(0)), engine.config.max_scan_age_ms);
        let mut entry_cache = EntryCache::new();

        let accepted = engine.run_scan_cycle(&mut scan_cache, &mut entry_cache, false, false).await;
        assert!(!accepted);
        assert_eq!(entry_cache.len(), 0);
        assert_eq!(platform.start_scan_calls.load(AtomicOrdering::SeqCst), 0);

        let accepted = engine.run_scan_cycle(&mut scan_cache, &mut entry_cache, false, true).await;
        assert!(accepted);
        assert_eq!(platform.start_scan_calls.load(AtomicOrdering::SeqCst), 1);
    }

    /// `CONFIGURED_NETWORKS_CHANGED` (§6) reaches a registered listener without waiting
    /// for the next scan tick.
    #[tokio::test]
    async fn configured_networks_changed_reaches_listener_immediately() {
        struct RecordingListener {
            reason: StdMutex<Option<crate::types::ConfigChangeReason>>,
        }
        impl TrackerListener for RecordingListener {
            fn on_config_changed(&self, reason: crate::types::ConfigChangeReason) {
                *self.reason.lock().expect("lock poisoned") = Some(reason);
            }
        }

        let engine = make_engine();
        engine.start();
        let listener = Arc::new(RecordingListener { reason: StdMutex::new(None) });
        engine.set_listener(Some(listener.clone()));

        engine.notify_configured_networks_changed(crate::types::ConfigChangeReason::Added);
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert_eq!(*listener.reason.lock().expect("lock poisoned"), Some(crate::types::ConfigChangeReason::Added));
        engine.stop();
    }
}
