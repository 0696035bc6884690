//! # The abstract platform Wi-Fi manager API consumed by this crate (§6)
//!
//! Everything in this module is a seam: the platform Wi-Fi manager itself (connect /
//! disconnect / forget / scan RPCs, configuration enumeration, signal-level quantization),
//! the Passpoint/OSU subscription subsystem, and MAC/IP/proxy editing are all explicitly
//! out of scope (§1) and are referenced only through this trait.

use crate::errors::TrackerError;
use crate::types::{
    Configuration, ConnectionInfo, MeteredOverride, NetworkInfo, OsuMatch, PasspointConfiguration,
    PasspointMatch, ScanObservation, SecurityFamily, WifiState,
};
use crate::utils::SignalLevel;
use async_trait::async_trait;

/// The platform Wi-Fi manager, abstracted to the operations the tracker engine needs.
/// A production implementation forwards these to the OS network manager; tests use a
/// hand-written fake (§8).
#[async_trait]
pub trait WifiPlatform: Send + Sync {
    async fn get_wifi_state(&self) -> WifiState;
    async fn get_scan_results(&self) -> Vec<ScanObservation>;
    async fn get_configured_networks(&self) -> Vec<Configuration>;
    async fn get_passpoint_configurations(&self) -> Vec<PasspointConfiguration>;
    async fn get_connection_info(&self) -> ConnectionInfo;
    async fn get_active_network_info(&self) -> NetworkInfo;

    /// Quantizes a raw RSSI reading into the documented `0..=4` bucket.
    fn calculate_signal_level(&self, rssi_dbm: i32) -> SignalLevel;

    /// Requests a scan. Returns `false` if the platform rejected the request outright
    /// (busy, rate-limited, radio off).
    async fn start_scan(&self) -> bool;

    async fn connect_network(&self, network_id: i32) -> Result<(), TrackerError>;
    async fn connect_with_generated_config(&self, ssid: &str, security: SecurityFamily) -> Result<(), TrackerError>;
    async fn connect_passpoint(&self, unique_id: &str) -> Result<(), TrackerError>;
    async fn disconnect(&self) -> Result<(), TrackerError>;

    async fn remove_network(&self, network_id: i32) -> Result<(), TrackerError>;
    async fn remove_passpoint(&self, fqdn: &str) -> Result<(), TrackerError>;
    /// Disables the ephemeral network created for a Passpoint roaming session, part of
    /// the Passpoint disconnect sequence (§4.D).
    async fn disable_ephemeral_passpoint(&self, fqdn: &str) -> Result<(), TrackerError>;

    async fn set_metered_override(&self, network_id: i32, value: MeteredOverride) -> Result<(), TrackerError>;
    async fn set_passpoint_metered_override(&self, fqdn: &str, value: MeteredOverride) -> Result<(), TrackerError>;
    async fn allow_autojoin(&self, network_id: i32, enabled: bool) -> Result<(), TrackerError>;
    async fn allow_autojoin_passpoint(&self, fqdn: &str, enabled: bool) -> Result<(), TrackerError>;

    /// Matches the given scans against known Passpoint subscriptions, partitioned into
    /// home and roaming subsets per subscription (§4.E).
    async fn find_passpoint_matches(&self, scans: &[ScanObservation]) -> Vec<PasspointMatch>;
    /// Matches the given scans against known OSU providers (§4.E).
    async fn find_osu_providers(&self, scans: &[ScanObservation]) -> Vec<OsuMatch>;
}
