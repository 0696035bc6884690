//! # Entities shared across the scan cache, entry cache and views (§3)

use serde::{Deserialize, Serialize};

/// The encryption family of a network. Mirrors the teacher's own `Security` enum, but
/// carries the ordinal used in entry keys (§6: `"...," + security_int`) and adds `Sae`
/// since WPA3 access points are now common in scan results.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum SecurityFamily {
    Open = 0,
    Wep = 1,
    Psk = 2,
    Eap = 3,
    Sae = 4,
}

impl SecurityFamily {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// One BSSID sighting. Identity = `bssid`. Immutable after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanObservation {
    pub bssid: String,
    pub ssid: String,
    pub security_caps: SecurityFamily,
    pub level_dbm: i32,
    pub frequency_mhz: u32,
    pub timestamp_ms: i64,
    pub radio_chain_count: u8,
}

/// Whether a metered override has been explicitly set by the user, or left to the
/// platform's automatic classification.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum MeteredOverride {
    Auto,
    Metered,
    Unmetered,
}

/// A snapshot of a persisted network config. Lifecycle is owned externally (by the
/// platform); the core only ever holds a cloned snapshot taken at reconciliation time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub network_id: i32,
    pub ssid_quoted: String,
    pub security_type: SecurityFamily,
    pub metered_override: MeteredOverride,
    pub auto_join: bool,
    pub fqdn: Option<String>,
    pub creator_uid: i32,
    pub from_suggestion: bool,
}

/// A snapshot of a Passpoint subscription.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PasspointConfiguration {
    pub unique_id: String,
    pub fqdn: String,
    pub friendly_name: String,
    /// Milliseconds since the clock's epoch; `0` means "does not expire".
    pub expiration_ms: i64,
    pub metered_override: MeteredOverride,
    pub auto_join: bool,
}

/// An OSU (online sign-up) provider advertising a Passpoint subscription flow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OsuProvider {
    pub friendly_name: String,
    pub server_uri: String,
    pub already_provisioned: bool,
}

/// The result of asking the platform which scans match which Passpoint subscription.
#[derive(Clone, Debug, Default)]
pub struct PasspointMatch {
    pub unique_id: String,
    pub home_scans: Vec<ScanObservation>,
    pub roaming_scans: Vec<ScanObservation>,
}

/// The result of asking the platform which scans match which OSU provider.
#[derive(Clone, Debug, Default)]
pub struct OsuMatch {
    pub provider: OsuProvider,
    pub scans: Vec<ScanObservation>,
}

/// Last observed active connection, as reported by the platform.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    pub bssid: Option<String>,
    pub ssid: Option<String>,
    pub network_id: Option<i32>,
    pub passpoint_fqdn: Option<String>,
    pub is_passpoint_ap: bool,
    pub is_osu_ap: bool,
    pub rssi_dbm: Option<i32>,
}

/// Platform-reported detailed connectivity state, mapped to [`ConnectedState`] per §4.D.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum DetailedState {
    Scanning,
    Authenticating,
    ObtainingIp,
    VerifyingPoorLink,
    CaptivePortalCheck,
    Connected,
    Disconnected,
    Idle,
    Failed,
}

/// A network-state broadcast payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub detailed_state: Option<DetailedState>,
}

impl Default for DetailedState {
    fn default() -> Self {
        DetailedState::Idle
    }
}

/// Maps a platform detailed state onto the entry connected-state sub-machine (§4.D).
pub fn map_detailed_state(state: DetailedState) -> ConnectedState {
    match state {
        DetailedState::Scanning
        | DetailedState::Authenticating
        | DetailedState::ObtainingIp
        | DetailedState::VerifyingPoorLink
        | DetailedState::CaptivePortalCheck => ConnectedState::Connecting,
        DetailedState::Connected => ConnectedState::Connected,
        DetailedState::Disconnected | DetailedState::Idle | DetailedState::Failed => ConnectedState::Disconnected,
    }
}

/// The entry connected-state sub-machine: `Disconnected -> Connecting -> Connected ->
/// Disconnected`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ConnectedState {
    Disconnected,
    Connecting,
    Connected,
}

/// Overall platform Wi-Fi radio state.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum WifiState {
    Disabled,
    Enabling,
    Enabled,
    Disabling,
    Unknown,
}

/// Reason carried by a `CONFIGURED_NETWORKS_CHANGED` broadcast.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ConfigChangeReason {
    Added,
    Removed,
    ConfigChange,
}

/// Mobility state influencing PNO (disconnected background scan) schedule selection.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum MobilityState {
    Stationary,
    LowMovement,
    HighMovement,
}

/// Capability flags surfaced per entry, independent of kind.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryCapabilities {
    pub can_connect: bool,
    pub can_disconnect: bool,
    pub can_forget: bool,
    pub can_set_metered_choice: bool,
    pub can_set_auto_join: bool,
}

pub use crate::utils::UNREACHABLE;
