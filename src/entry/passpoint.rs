//! # Passpoint Wi-Fi entry (carrier/SP-signed roaming subscription)

use crate::clock::Clock;
use crate::errors::TrackerError;
use crate::key;
use crate::platform::WifiPlatform;
use crate::types::{ConnectedState, ConnectionInfo, MeteredOverride, NetworkInfo, PasspointConfiguration, ScanObservation};
use crate::utils::{clamp_level, SignalLevel, UNREACHABLE};
use std::time::Duration;

/// Identity = `unique_id` (derived from the subscription's unique id).
#[derive(Clone, Debug)]
pub struct PasspointWifiEntry {
    key: String,
    unique_id: String,
    fqdn: String,
    friendly_name: String,
    expiration_ms: i64,
    metered_override: MeteredOverride,
    home_scans: Vec<ScanObservation>,
    roaming_scans: Vec<ScanObservation>,
    is_roaming: bool,
    level: SignalLevel,
    connected_state: ConnectedState,
    config: Option<PasspointConfiguration>,
}

fn level_from_groups(home: &[ScanObservation], roaming: &[ScanObservation], platform: &dyn WifiPlatform) -> SignalLevel {
    home.iter()
        .chain(roaming.iter())
        .map(|o| o.level_dbm)
        .max()
        .map(|rssi| clamp_level(platform.calculate_signal_level(rssi)))
        .unwrap_or(UNREACHABLE)
}

impl PasspointWifiEntry {
    pub fn new(config: PasspointConfiguration, home_scans: Vec<ScanObservation>, roaming_scans: Vec<ScanObservation>, platform: &dyn WifiPlatform) -> Self {
        let is_roaming = home_scans.is_empty() && !roaming_scans.is_empty();
        let level = level_from_groups(&home_scans, &roaming_scans, platform);
        PasspointWifiEntry {
            key: key::passpoint_key(&config.unique_id),
            unique_id: config.unique_id.clone(),
            fqdn: config.fqdn.clone(),
            friendly_name: config.friendly_name.clone(),
            expiration_ms: config.expiration_ms,
            metered_override: config.metered_override,
            home_scans,
            roaming_scans,
            is_roaming,
            level,
            connected_state: ConnectedState::Disconnected,
            config: Some(config),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn fqdn(&self) -> &str {
        &self.fqdn
    }

    pub fn title(&self) -> &str {
        &self.friendly_name
    }

    pub fn level(&self) -> SignalLevel {
        self.level
    }

    pub fn connected_state(&self) -> ConnectedState {
        self.connected_state
    }

    pub fn is_roaming(&self) -> bool {
        self.is_roaming
    }

    /// Passpoint subscriptions are always considered "saved" -- there is no unsaved
    /// Passpoint entry, the subscription install is what creates it.
    pub fn is_saved(&self) -> bool {
        true
    }

    pub fn can_connect(&self) -> bool {
        self.level != UNREACHABLE && self.connected_state == ConnectedState::Disconnected && self.config.is_some()
    }

    pub fn can_disconnect(&self) -> bool {
        self.connected_state == ConnectedState::Connected
    }

    pub fn can_forget(&self) -> bool {
        true
    }

    pub fn can_set_metered_choice(&self) -> bool {
        true
    }

    pub fn can_set_auto_join(&self) -> bool {
        true
    }

    pub fn get_metered_choice(&self) -> MeteredOverride {
        self.metered_override
    }

    pub fn is_expired(&self, clock: &dyn Clock) -> bool {
        self.expiration_ms > 0 && clock.now_ms() >= self.expiration_ms
    }

    /// `info.is_passpoint_ap ∧ info.fqdn = my_fqdn`
    pub fn connection_info_matches(&self, info: &ConnectionInfo) -> bool {
        info.is_passpoint_ap && info.passpoint_fqdn.as_deref() == Some(self.fqdn.as_str())
    }

    /// Partitions home vs. roaming scan subsets; `is_roaming` is set when the home set is
    /// empty but the roaming set is not (§4.E `update_passpoint_from_scans`).
    pub fn update_scan_groups(&mut self, home_scans: Vec<ScanObservation>, roaming_scans: Vec<ScanObservation>, platform: &dyn WifiPlatform) {
        self.level = level_from_groups(&home_scans, &roaming_scans, platform);
        self.is_roaming = home_scans.is_empty() && !roaming_scans.is_empty();
        self.home_scans = home_scans;
        self.roaming_scans = roaming_scans;
    }

    /// Refreshes friendly name, expiration and metered override from a fresh config
    /// snapshot (§4.D `update_passpoint_config`).
    pub fn update_passpoint_config(&mut self, config: Option<PasspointConfiguration>) {
        if let Some(cfg) = &config {
            self.friendly_name = cfg.friendly_name.clone();
            self.expiration_ms = cfg.expiration_ms;
            self.metered_override = cfg.metered_override;
        }
        self.config = config;
    }

    pub fn update_connection_info(&mut self, info: &ConnectionInfo, net_info: &NetworkInfo) {
        if self.connection_info_matches(info) {
            self.connected_state = net_info
                .detailed_state
                .map(crate::types::map_detailed_state)
                .unwrap_or(ConnectedState::Disconnected);
        } else {
            self.connected_state = ConnectedState::Disconnected;
        }
    }

    pub async fn connect(&self, platform: &(dyn WifiPlatform), cb: crate::callback::ResultCallback) {
        let result = platform.connect_passpoint(&self.unique_id).await;
        cb(result);
    }

    pub async fn disconnect(&self, platform: &(dyn WifiPlatform), watchdog_ms: u64) -> Result<(), TrackerError> {
        if self.connected_state != ConnectedState::Connected {
            return Err(TrackerError::DisconnectFailed("not connected".into()));
        }
        let result = tokio::select! {
            result = platform.disconnect() => result,
            _ = tokio::time::sleep(Duration::from_millis(watchdog_ms)) => {
                Err(TrackerError::DisconnectFailed("UNKNOWN".into()))
            }
        };
        if let Err(e) = platform.disable_ephemeral_passpoint(&self.fqdn).await {
            log::warn!("failed to disable ephemeral passpoint network for {}: {}", self.fqdn, e);
        }
        result
    }

    /// Removes the passpoint configuration; calls back synchronously `SUCCESS` (§4.D
    /// `forget`).
    pub async fn forget(&self, platform: &(dyn WifiPlatform)) -> Result<(), TrackerError> {
        platform.remove_passpoint(&self.fqdn).await
    }

    /// Optimistically updates the cached override before the platform call resolves.
    pub async fn set_metered_choice(&mut self, platform: &(dyn WifiPlatform), value: MeteredOverride) -> Result<(), TrackerError> {
        self.metered_override = value;
        platform.set_passpoint_metered_override(&self.fqdn, value).await
    }

    pub async fn set_auto_join_enabled(&self, platform: &(dyn WifiPlatform), enabled: bool) -> Result<(), TrackerError> {
        platform.allow_autojoin_passpoint(&self.fqdn, enabled).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::types::WifiState;
    use async_trait::async_trait;

    struct FakePlatform;

    #[async_trait]
    impl WifiPlatform for FakePlatform {
        async fn get_wifi_state(&self) -> WifiState {
            WifiState::Enabled
        }
        async fn get_scan_results(&self) -> Vec<ScanObservation> {
            Vec::new()
        }
        async fn get_configured_networks(&self) -> Vec<crate::types::Configuration> {
            Vec::new()
        }
        async fn get_passpoint_configurations(&self) -> Vec<PasspointConfiguration> {
            Vec::new()
        }
        async fn get_connection_info(&self) -> ConnectionInfo {
            ConnectionInfo::default()
        }
        async fn get_active_network_info(&self) -> NetworkInfo {
            NetworkInfo::default()
        }
        fn calculate_signal_level(&self, rssi_dbm: i32) -> SignalLevel {
            if rssi_dbm >= -50 { 4 } else { 1 }
        }
        async fn start_scan(&self) -> bool {
            true
        }
        async fn connect_network(&self, _network_id: i32) -> Result<(), TrackerError> {
            Ok(())
        }
        async fn connect_with_generated_config(&self, _ssid: &str, _security: crate::types::SecurityFamily) -> Result<(), TrackerError> {
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
        async fn find_passpoint_matches(&self, _scans: &[ScanObservation]) -> Vec<crate::types::PasspointMatch> {
            Vec::new()
        }
        async fn find_osu_providers(&self, _scans: &[ScanObservation]) -> Vec<crate::types::OsuMatch> {
            Vec::new()
        }
    }

    fn config(expiration_ms: i64) -> PasspointConfiguration {
        PasspointConfiguration {
            unique_id: "sub1".into(),
            fqdn: "example.com".into(),
            friendly_name: "Example".into(),
            expiration_ms,
            metered_override: MeteredOverride::Auto,
            auto_join: true,
        }
    }

    #[test]
    fn non_expiring_subscription_never_expires() {
        let platform = FakePlatform;
        let entry = PasspointWifiEntry::new(config(0), Vec::new(), Vec::new(), &platform);
        let clock = ManualClock::new(1_000_000);
        assert!(!entry.is_expired(&clock));
    }

    #[test]
    fn subscription_expires_once_deadline_reached() {
        let platform = FakePlatform;
        let entry = PasspointWifiEntry::new(config(5_000), Vec::new(), Vec::new(), &platform);
        let clock = ManualClock::new(1_000);
        assert!(!entry.is_expired(&clock));
        clock.set(5_000);
        assert!(entry.is_expired(&clock));
    }

    #[test]
    fn roaming_flag_set_when_only_roaming_scans_present() {
        let platform = FakePlatform;
        let mut entry = PasspointWifiEntry::new(config(0), Vec::new(), Vec::new(), &platform);
        let roaming = vec![ScanObservation {
            bssid: "aa".into(),
            ssid: "roam-ap".into(),
            security_caps: crate::types::SecurityFamily::Eap,
            level_dbm: -55,
            frequency_mhz: 5180,
            timestamp_ms: 0,
            radio_chain_count: 1,
        }];
        entry.update_scan_groups(Vec::new(), roaming, &platform);
        assert!(entry.is_roaming());
    }

    #[tokio::test]
    async fn forget_removes_the_subscription() {
        let platform = FakePlatform;
        let entry = PasspointWifiEntry::new(config(0), Vec::new(), Vec::new(), &platform);
        assert!(entry.forget(&platform).await.is_ok());
    }
}
