//! # Standard (non-Passpoint, non-OSU) Wi-Fi entry

use crate::errors::TrackerError;
use crate::key;
use crate::platform::WifiPlatform;
use crate::types::{Configuration, ConnectedState, ConnectionInfo, MeteredOverride, NetworkInfo, ScanObservation, SecurityFamily};
use crate::utils::{clamp_level, sanitize_ssid, SignalLevel, UNREACHABLE};
use std::time::Duration;

/// Identity = `(sanitized_ssid, security_family)`.
#[derive(Clone, Debug)]
pub struct StandardWifiEntry {
    key: String,
    ssid: String,
    security: SecurityFamily,
    scans: Vec<ScanObservation>,
    level: SignalLevel,
    connected_state: ConnectedState,
    config: Option<Configuration>,
}

fn level_from_group(group: &[ScanObservation], platform: &dyn WifiPlatform) -> SignalLevel {
    group
        .iter()
        .map(|o| o.level_dbm)
        .max()
        .map(|rssi| clamp_level(platform.calculate_signal_level(rssi)))
        .unwrap_or(UNREACHABLE)
}

impl StandardWifiEntry {
    /// Fails with [`TrackerError::NullDependency`] when both `scans` and `config` are
    /// empty/absent (§8 boundary scenario 1).
    pub fn new(
        ssid: String,
        security: SecurityFamily,
        scans: Vec<ScanObservation>,
        config: Option<Configuration>,
        platform: &dyn WifiPlatform,
    ) -> Result<Self, TrackerError> {
        if scans.is_empty() && config.is_none() {
            return Err(TrackerError::NullDependency);
        }
        let level = level_from_group(&scans, platform);
        Ok(StandardWifiEntry {
            key: key::standard_key(&ssid, security),
            ssid,
            security,
            scans,
            level,
            connected_state: ConnectedState::Disconnected,
            config,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn security(&self) -> SecurityFamily {
        self.security
    }

    pub fn title(&self) -> &str {
        &self.ssid
    }

    pub fn level(&self) -> SignalLevel {
        self.level
    }

    pub fn connected_state(&self) -> ConnectedState {
        self.connected_state
    }

    pub fn is_saved(&self) -> bool {
        self.config.is_some()
    }

    pub fn config(&self) -> Option<&Configuration> {
        self.config.as_ref()
    }

    pub fn can_connect(&self) -> bool {
        self.level != UNREACHABLE && self.connected_state == ConnectedState::Disconnected
    }

    pub fn can_disconnect(&self) -> bool {
        self.connected_state == ConnectedState::Connected
    }

    pub fn can_forget(&self) -> bool {
        self.is_saved()
    }

    pub fn can_set_metered_choice(&self) -> bool {
        true
    }

    pub fn can_set_auto_join(&self) -> bool {
        self.is_saved()
    }

    pub fn get_metered_choice(&self) -> MeteredOverride {
        self.config.as_ref().map(|c| c.metered_override).unwrap_or(MeteredOverride::Auto)
    }

    pub fn is_expired(&self) -> bool {
        false
    }

    /// `saved ∧ info.network_id = config.network_id`
    pub fn connection_info_matches(&self, info: &ConnectionInfo) -> bool {
        match (&self.config, info.network_id) {
            (Some(cfg), Some(network_id)) => cfg.network_id == network_id,
            _ => false,
        }
    }

    /// Validates every observation's SSID/security against the entry's identity, then
    /// recomputes `level` from `max(level_dbm)` of the group (§4.D `update_scan`).
    pub fn update_scan(&mut self, group: Vec<ScanObservation>, platform: &dyn WifiPlatform) -> Result<(), TrackerError> {
        if group.iter().any(|o| o.ssid != self.ssid || o.security_caps != self.security) {
            return Err(TrackerError::Mismatch);
        }
        self.level = level_from_group(&group, platform);
        self.scans = group;
        Ok(())
    }

    /// Validates SSID/security consistency of a `Some` config, then stores it. `None`
    /// makes the entry unsaved (§4.D `update_config`).
    pub fn update_config(&mut self, config: Option<Configuration>) -> Result<(), TrackerError> {
        if let Some(cfg) = &config {
            let cfg_ssid = sanitize_ssid(&cfg.ssid_quoted);
            if cfg_ssid.as_deref() != Some(self.ssid.as_str()) || cfg.security_type != self.security {
                return Err(TrackerError::Mismatch);
            }
        }
        self.config = config;
        Ok(())
    }

    /// Transitions `connected_state` per the detailed-state mapping when the active
    /// connection matches this entry; updates `level` from `rssi_dbm` when present.
    /// Otherwise transitions to `Disconnected` (§4.D `update_connection_info`).
    pub fn update_connection_info(&mut self, info: &ConnectionInfo, net_info: &NetworkInfo, platform: &dyn WifiPlatform) {
        if self.connection_info_matches(info) {
            self.connected_state = net_info
                .detailed_state
                .map(crate::types::map_detailed_state)
                .unwrap_or(ConnectedState::Disconnected);
            if let Some(rssi) = info.rssi_dbm {
                self.level = clamp_level(platform.calculate_signal_level(rssi));
            }
        } else {
            self.connected_state = ConnectedState::Disconnected;
        }
    }

    pub async fn connect(&self, platform: &(dyn WifiPlatform), cb: crate::callback::ResultCallback) {
        let result = if self.is_saved() {
            let network_id = self.config.as_ref().expect("saved").network_id;
            platform.connect_network(network_id).await
        } else if self.security == SecurityFamily::Open {
            platform.connect_with_generated_config(&self.ssid, self.security).await
        } else {
            Err(TrackerError::NoPasswordProvided)
        };
        cb(result);
    }

    pub async fn disconnect(&self, platform: &(dyn WifiPlatform), watchdog_ms: u64) -> Result<(), TrackerError> {
        if self.connected_state != ConnectedState::Connected {
            return Err(TrackerError::DisconnectFailed("not connected".into()));
        }
        tokio::select! {
            result = platform.disconnect() => result,
            _ = tokio::time::sleep(Duration::from_millis(watchdog_ms)) => {
                Err(TrackerError::DisconnectFailed("UNKNOWN".into()))
            }
        }
    }

    pub async fn forget(&self, platform: &(dyn WifiPlatform)) -> Result<(), TrackerError> {
        match &self.config {
            Some(cfg) => platform.remove_network(cfg.network_id).await,
            None => Err(TrackerError::ForgetFailed("not saved".into())),
        }
    }

    pub async fn set_auto_join_enabled(&self, platform: &(dyn WifiPlatform), enabled: bool) -> Result<(), TrackerError> {
        match &self.config {
            Some(cfg) => platform.allow_autojoin(cfg.network_id, enabled).await,
            None => Err(TrackerError::Generic("entry is not saved".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
        async fn get_configured_networks(&self) -> Vec<Configuration> {
            Vec::new()
        }
        async fn get_passpoint_configurations(&self) -> Vec<crate::types::PasspointConfiguration> {
            Vec::new()
        }
        async fn get_connection_info(&self) -> ConnectionInfo {
            ConnectionInfo::default()
        }
        async fn get_active_network_info(&self) -> NetworkInfo {
            NetworkInfo::default()
        }
        fn calculate_signal_level(&self, rssi_dbm: i32) -> SignalLevel {
            // Crude linear bucketing good enough for deterministic tests.
            if rssi_dbm >= -50 {
                4
            } else if rssi_dbm >= -70 {
                2
            } else {
                0
            }
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
        async fn find_passpoint_matches(&self, _scans: &[ScanObservation]) -> Vec<crate::types::PasspointMatch> {
            Vec::new()
        }
        async fn find_osu_providers(&self, _scans: &[ScanObservation]) -> Vec<crate::types::OsuMatch> {
            Vec::new()
        }
    }

    fn obs(ssid: &str, bssid: &str, rssi: i32) -> ScanObservation {
        ScanObservation {
            bssid: bssid.to_owned(),
            ssid: ssid.to_owned(),
            security_caps: SecurityFamily::Psk,
            level_dbm: rssi,
            frequency_mhz: 2437,
            timestamp_ms: 0,
            radio_chain_count: 1,
        }
    }

    #[test]
    fn new_fails_without_scans_or_config() {
        let platform = FakePlatform;
        let result = StandardWifiEntry::new("home".into(), SecurityFamily::Psk, Vec::new(), None, &platform);
        assert_eq!(result.unwrap_err(), TrackerError::NullDependency);
    }

    #[test]
    fn level_is_derived_from_the_strongest_observation() {
        let platform = FakePlatform;
        let scans = vec![obs("home", "aa", -80), obs("home", "bb", -45)];
        let entry = StandardWifiEntry::new("home".into(), SecurityFamily::Psk, scans, None, &platform).unwrap();
        assert_eq!(entry.level(), 4);
    }

    #[test]
    fn update_scan_rejects_a_mismatched_group() {
        let platform = FakePlatform;
        let mut entry = StandardWifiEntry::new("home".into(), SecurityFamily::Psk, vec![obs("home", "aa", -60)], None, &platform).unwrap();
        let wrong = vec![obs("other", "bb", -40)];
        assert_eq!(entry.update_scan(wrong, &platform).unwrap_err(), TrackerError::Mismatch);
    }

    #[test]
    fn update_config_rejects_ssid_mismatch() {
        let platform = FakePlatform;
        let mut entry = StandardWifiEntry::new("home".into(), SecurityFamily::Psk, vec![obs("home", "aa", -60)], None, &platform).unwrap();
        let cfg = Configuration {
            network_id: 1,
            ssid_quoted: "\"other\"".into(),
            security_type: SecurityFamily::Psk,
            metered_override: MeteredOverride::Auto,
            auto_join: true,
            fqdn: None,
            creator_uid: 0,
            from_suggestion: false,
        };
        assert_eq!(entry.update_config(Some(cfg)).unwrap_err(), TrackerError::Mismatch);
    }

    #[tokio::test]
    async fn open_network_connects_with_a_generated_config() {
        let platform = FakePlatform;
        let entry = StandardWifiEntry::new("open".into(), SecurityFamily::Open, vec![obs("open", "aa", -50)], None, &platform).unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();
        entry.connect(&platform, Box::new(move |result| { let _ = tx.send(result); })).await;
        assert!(rx.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn secured_unsaved_network_refuses_to_connect() {
        let platform = FakePlatform;
        let entry = StandardWifiEntry::new("home".into(), SecurityFamily::Psk, vec![obs("home", "aa", -50)], None, &platform).unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();
        entry.connect(&platform, Box::new(move |result| { let _ = tx.send(result); })).await;
        assert_eq!(rx.await.unwrap().unwrap_err(), TrackerError::NoPasswordProvided);
    }

    #[tokio::test]
    async fn disconnect_when_not_connected_fails_immediately() {
        let platform = FakePlatform;
        let entry = StandardWifiEntry::new("home".into(), SecurityFamily::Psk, vec![obs("home", "aa", -50)], None, &platform).unwrap();
        let result = entry.disconnect(&platform, 1_000).await;
        assert!(matches!(result, Err(TrackerError::DisconnectFailed(_))));
    }
}
