//! # OSU (Online Sign-Up) Wi-Fi entry
//!
//! An OSU entry represents a provider offering online enrollment into a Passpoint
//! subscription. It is never connectable or saveable in the ordinary sense -- it exists to
//! be surfaced in the picker so the user can start a sign-up flow that is itself out of
//! scope (§1).

use crate::errors::TrackerError;
use crate::key;
use crate::platform::WifiPlatform;
use crate::types::{ConnectedState, ConnectionInfo, MeteredOverride, NetworkInfo, OsuProvider, ScanObservation};
use crate::utils::{clamp_level, SignalLevel, UNREACHABLE};

/// Identity = `(friendly_name, server_uri)`.
#[derive(Clone, Debug)]
pub struct OsuWifiEntry {
    key: String,
    friendly_name: String,
    server_uri: String,
    already_provisioned: bool,
    scans: Vec<ScanObservation>,
    level: SignalLevel,
    connected_state: ConnectedState,
}

fn level_from_group(group: &[ScanObservation], platform: &dyn WifiPlatform) -> SignalLevel {
    group
        .iter()
        .map(|o| o.level_dbm)
        .max()
        .map(|rssi| clamp_level(platform.calculate_signal_level(rssi)))
        .unwrap_or(UNREACHABLE)
}

impl OsuWifiEntry {
    pub fn new(provider: OsuProvider, scans: Vec<ScanObservation>, platform: &dyn WifiPlatform) -> Self {
        let level = level_from_group(&scans, platform);
        OsuWifiEntry {
            key: key::osu_key(&provider.friendly_name, &provider.server_uri),
            friendly_name: provider.friendly_name,
            server_uri: provider.server_uri,
            already_provisioned: provider.already_provisioned,
            scans,
            level,
            connected_state: ConnectedState::Disconnected,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.friendly_name
    }

    pub fn server_uri(&self) -> &str {
        &self.server_uri
    }

    pub fn already_provisioned(&self) -> bool {
        self.already_provisioned
    }

    pub fn level(&self) -> SignalLevel {
        self.level
    }

    pub fn connected_state(&self) -> ConnectedState {
        self.connected_state
    }

    pub fn is_saved(&self) -> bool {
        false
    }

    /// Reachable but never connectable -- sign-up happens out of band (§1 Non-goals).
    pub fn can_connect(&self) -> bool {
        false
    }

    pub fn can_disconnect(&self) -> bool {
        false
    }

    pub fn can_forget(&self) -> bool {
        false
    }

    pub fn can_set_metered_choice(&self) -> bool {
        false
    }

    pub fn can_set_auto_join(&self) -> bool {
        false
    }

    pub fn get_metered_choice(&self) -> MeteredOverride {
        MeteredOverride::Auto
    }

    pub fn is_expired(&self) -> bool {
        false
    }

    pub fn connection_info_matches(&self, _info: &ConnectionInfo) -> bool {
        false
    }

    pub fn update_scan(&mut self, group: Vec<ScanObservation>, platform: &dyn WifiPlatform) {
        self.level = level_from_group(&group, platform);
        self.scans = group;
    }

    pub fn update_connection_info(&mut self, _info: &ConnectionInfo, _net_info: &NetworkInfo) {
        self.connected_state = ConnectedState::Disconnected;
    }

    pub async fn connect(&self, _platform: &(dyn WifiPlatform), cb: crate::callback::ResultCallback) {
        cb(Err(TrackerError::NotSupported));
    }

    pub async fn disconnect(&self, _platform: &(dyn WifiPlatform), _watchdog_ms: u64) -> Result<(), TrackerError> {
        Err(TrackerError::NotSupported)
    }

    pub async fn forget(&self, _platform: &(dyn WifiPlatform)) -> Result<(), TrackerError> {
        Err(TrackerError::NotSupported)
    }

    pub async fn set_auto_join_enabled(&self, _platform: &(dyn WifiPlatform), _enabled: bool) -> Result<(), TrackerError> {
        Err(TrackerError::NotSupported)
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
        async fn get_configured_networks(&self) -> Vec<crate::types::Configuration> {
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

    fn provider() -> OsuProvider {
        OsuProvider { friendly_name: "Acme Wifi".into(), server_uri: "https://osu.acme.example".into(), already_provisioned: false }
    }

    #[test]
    fn osu_entry_is_never_saved_and_never_connectable() {
        let platform = FakePlatform;
        let entry = OsuWifiEntry::new(provider(), Vec::new(), &platform);
        assert!(!entry.is_saved());
        assert!(!entry.can_connect());
        assert!(!entry.can_forget());
    }

    #[tokio::test]
    async fn connect_attempt_is_rejected_as_not_supported() {
        let platform = FakePlatform;
        let entry = OsuWifiEntry::new(provider(), Vec::new(), &platform);
        let (tx, rx) = tokio::sync::oneshot::channel();
        entry.connect(&platform, Box::new(move |result| { let _ = tx.send(result); })).await;
        assert_eq!(rx.await.unwrap().unwrap_err(), TrackerError::NotSupported);
    }
}
