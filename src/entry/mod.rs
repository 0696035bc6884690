//! # Entry kinds and the tagged-variant dispatch table (§3, §9)
//!
//! Standard, Passpoint and OSU entries share a capability surface but differ enough in
//! identity and behavior that a single struct with optional fields would be worse than
//! naming the three kinds. Rather than an inheritance chain, [`WifiEntry`] is a tagged
//! enum over the three concrete kinds, and [`WifiEntryOps`] is the dispatch table of
//! shared read-only operations (§9 design note).

pub mod osu;
pub mod passpoint;
pub mod standard;

pub use osu::OsuWifiEntry;
pub use passpoint::PasspointWifiEntry;
pub use standard::StandardWifiEntry;

use crate::callback::ResultCallback;
use crate::errors::TrackerError;
use crate::platform::WifiPlatform;
use crate::types::{ConnectedState, ConnectionInfo, MeteredOverride, NetworkInfo};
use crate::utils::SignalLevel;

/// Shared read-only surface dispatched across the three entry kinds.
pub trait WifiEntryOps {
    fn key(&self) -> &str;
    fn title(&self) -> &str;
    fn level(&self) -> SignalLevel;
    fn connected_state(&self) -> ConnectedState;
    fn is_saved(&self) -> bool;
    fn can_connect(&self) -> bool;
    fn can_disconnect(&self) -> bool;
    fn can_forget(&self) -> bool;
    fn can_set_metered_choice(&self) -> bool;
    fn can_set_auto_join(&self) -> bool;
    fn get_metered_choice(&self) -> MeteredOverride;
    /// Passpoint subscriptions expire on a wall-clock deadline; standard and OSU entries
    /// never do. `now_ms` lets the dispatch stay sync without pulling a `Clock` reference
    /// through every implementor.
    fn is_expired(&self, now_ms: i64) -> bool;
    fn connection_info_matches(&self, info: &ConnectionInfo) -> bool;
}

impl WifiEntryOps for StandardWifiEntry {
    fn key(&self) -> &str {
        self.key()
    }
    fn title(&self) -> &str {
        self.title()
    }
    fn level(&self) -> SignalLevel {
        self.level()
    }
    fn connected_state(&self) -> ConnectedState {
        self.connected_state()
    }
    fn is_saved(&self) -> bool {
        self.is_saved()
    }
    fn can_connect(&self) -> bool {
        self.can_connect()
    }
    fn can_disconnect(&self) -> bool {
        self.can_disconnect()
    }
    fn can_forget(&self) -> bool {
        self.can_forget()
    }
    fn can_set_metered_choice(&self) -> bool {
        self.can_set_metered_choice()
    }
    fn can_set_auto_join(&self) -> bool {
        self.can_set_auto_join()
    }
    fn get_metered_choice(&self) -> MeteredOverride {
        self.get_metered_choice()
    }
    fn is_expired(&self, _now_ms: i64) -> bool {
        self.is_expired()
    }
    fn connection_info_matches(&self, info: &ConnectionInfo) -> bool {
        self.connection_info_matches(info)
    }
}

impl WifiEntryOps for PasspointWifiEntry {
    fn key(&self) -> &str {
        self.key()
    }
    fn title(&self) -> &str {
        self.title()
    }
    fn level(&self) -> SignalLevel {
        self.level()
    }
    fn connected_state(&self) -> ConnectedState {
        self.connected_state()
    }
    fn is_saved(&self) -> bool {
        self.is_saved()
    }
    fn can_connect(&self) -> bool {
        self.can_connect()
    }
    fn can_disconnect(&self) -> bool {
        self.can_disconnect()
    }
    fn can_forget(&self) -> bool {
        self.can_forget()
    }
    fn can_set_metered_choice(&self) -> bool {
        self.can_set_metered_choice()
    }
    fn can_set_auto_join(&self) -> bool {
        self.can_set_auto_join()
    }
    fn get_metered_choice(&self) -> MeteredOverride {
        self.get_metered_choice()
    }
    fn is_expired(&self, now_ms: i64) -> bool {
        let clock = crate::clock::ManualClock::new(now_ms);
        PasspointWifiEntry::is_expired(self, &clock)
    }
    fn connection_info_matches(&self, info: &ConnectionInfo) -> bool {
        self.connection_info_matches(info)
    }
}

impl WifiEntryOps for OsuWifiEntry {
    fn key(&self) -> &str {
        self.key()
    }
    fn title(&self) -> &str {
        self.title()
    }
    fn level(&self) -> SignalLevel {
        self.level()
    }
    fn connected_state(&self) -> ConnectedState {
        self.connected_state()
    }
    fn is_saved(&self) -> bool {
        self.is_saved()
    }
    fn can_connect(&self) -> bool {
        self.can_connect()
    }
    fn can_disconnect(&self) -> bool {
        self.can_disconnect()
    }
    fn can_forget(&self) -> bool {
        self.can_forget()
    }
    fn can_set_metered_choice(&self) -> bool {
        self.can_set_metered_choice()
    }
    fn can_set_auto_join(&self) -> bool {
        self.can_set_auto_join()
    }
    fn get_metered_choice(&self) -> MeteredOverride {
        self.get_metered_choice()
    }
    fn is_expired(&self, _now_ms: i64) -> bool {
        self.is_expired()
    }
    fn connection_info_matches(&self, info: &ConnectionInfo) -> bool {
        self.connection_info_matches(info)
    }
}

/// Tagged union of the three entry kinds, keyed by [`WifiEntryOps::key`].
#[derive(Clone, Debug)]
pub enum WifiEntry {
    Standard(StandardWifiEntry),
    Passpoint(PasspointWifiEntry),
    Osu(OsuWifiEntry),
}

impl WifiEntryOps for WifiEntry {
    fn key(&self) -> &str {
        match self {
            WifiEntry::Standard(e) => e.key(),
            WifiEntry::Passpoint(e) => e.key(),
            WifiEntry::Osu(e) => e.key(),
        }
    }
    fn title(&self) -> &str {
        match self {
            WifiEntry::Standard(e) => e.title(),
            WifiEntry::Passpoint(e) => e.title(),
            WifiEntry::Osu(e) => e.title(),
        }
    }
    fn level(&self) -> SignalLevel {
        match self {
            WifiEntry::Standard(e) => e.level(),
            WifiEntry::Passpoint(e) => e.level(),
            WifiEntry::Osu(e) => e.level(),
        }
    }
    fn connected_state(&self) -> ConnectedState {
        match self {
            WifiEntry::Standard(e) => e.connected_state(),
            WifiEntry::Passpoint(e) => e.connected_state(),
            WifiEntry::Osu(e) => e.connected_state(),
        }
    }
    fn is_saved(&self) -> bool {
        match self {
            WifiEntry::Standard(e) => e.is_saved(),
            WifiEntry::Passpoint(e) => e.is_saved(),
            WifiEntry::Osu(e) => e.is_saved(),
        }
    }
    fn can_connect(&self) -> bool {
        match self {
            WifiEntry::Standard(e) => e.can_connect(),
            WifiEntry::Passpoint(e) => e.can_connect(),
            WifiEntry::Osu(e) => e.can_connect(),
        }
    }
    fn can_disconnect(&self) -> bool {
        match self {
            WifiEntry::Standard(e) => e.can_disconnect(),
            WifiEntry::Passpoint(e) => e.can_disconnect(),
            WifiEntry::Osu(e) => e.can_disconnect(),
        }
    }
    fn can_forget(&self) -> bool {
        match self {
            WifiEntry::Standard(e) => e.can_forget(),
            WifiEntry::Passpoint(e) => e.can_forget(),
            WifiEntry::Osu(e) => e.can_forget(),
        }
    }
    fn can_set_metered_choice(&self) -> bool {
        match self {
            WifiEntry::Standard(e) => e.can_set_metered_choice(),
            WifiEntry::Passpoint(e) => e.can_set_metered_choice(),
            WifiEntry::Osu(e) => e.can_set_metered_choice(),
        }
    }
    fn can_set_auto_join(&self) -> bool {
        match self {
            WifiEntry::Standard(e) => e.can_set_auto_join(),
            WifiEntry::Passpoint(e) => e.can_set_auto_join(),
            WifiEntry::Osu(e) => e.can_set_auto_join(),
        }
    }
    fn get_metered_choice(&self) -> MeteredOverride {
        match self {
            WifiEntry::Standard(e) => e.get_metered_choice(),
            WifiEntry::Passpoint(e) => e.get_metered_choice(),
            WifiEntry::Osu(e) => e.get_metered_choice(),
        }
    }
    fn is_expired(&self, now_ms: i64) -> bool {
        match self {
            WifiEntry::Standard(e) => WifiEntryOps::is_expired(e, now_ms),
            WifiEntry::Passpoint(e) => WifiEntryOps::is_expired(e, now_ms),
            WifiEntry::Osu(e) => WifiEntryOps::is_expired(e, now_ms),
        }
    }
    fn connection_info_matches(&self, info: &ConnectionInfo) -> bool {
        match self {
            WifiEntry::Standard(e) => e.connection_info_matches(info),
            WifiEntry::Passpoint(e) => e.connection_info_matches(info),
            WifiEntry::Osu(e) => e.connection_info_matches(info),
        }
    }
}

impl WifiEntry {
    pub fn update_connection_info(&mut self, info: &ConnectionInfo, net_info: &NetworkInfo, platform: &dyn WifiPlatform) {
        match self {
            WifiEntry::Standard(e) => e.update_connection_info(info, net_info, platform),
            WifiEntry::Passpoint(e) => e.update_connection_info(info, net_info),
            WifiEntry::Osu(e) => e.update_connection_info(info, net_info),
        }
    }

    pub async fn connect(&self, platform: &(dyn WifiPlatform), cb: ResultCallback) {
        match self {
            WifiEntry::Standard(e) => e.connect(platform, cb).await,
            WifiEntry::Passpoint(e) => e.connect(platform, cb).await,
            WifiEntry::Osu(e) => e.connect(platform, cb).await,
        }
    }

    pub async fn disconnect(&self, platform: &(dyn WifiPlatform), watchdog_ms: u64) -> Result<(), TrackerError> {
        match self {
            WifiEntry::Standard(e) => e.disconnect(platform, watchdog_ms).await,
            WifiEntry::Passpoint(e) => e.disconnect(platform, watchdog_ms).await,
            WifiEntry::Osu(e) => e.disconnect(platform, watchdog_ms).await,
        }
    }

    pub async fn forget(&self, platform: &(dyn WifiPlatform)) -> Result<(), TrackerError> {
        match self {
            WifiEntry::Standard(e) => e.forget(platform).await,
            WifiEntry::Passpoint(e) => e.forget(platform).await,
            WifiEntry::Osu(e) => e.forget(platform).await,
        }
    }

    pub async fn set_auto_join_enabled(&self, platform: &(dyn WifiPlatform), enabled: bool) -> Result<(), TrackerError> {
        match self {
            WifiEntry::Standard(e) => e.set_auto_join_enabled(platform, enabled).await,
            WifiEntry::Passpoint(e) => e.set_auto_join_enabled(platform, enabled).await,
            WifiEntry::Osu(e) => e.set_auto_join_enabled(platform, enabled).await,
        }
    }

    pub fn as_standard(&self) -> Option<&StandardWifiEntry> {
        match self {
            WifiEntry::Standard(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_passpoint(&self) -> Option<&PasspointWifiEntry> {
        match self {
            WifiEntry::Passpoint(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_osu(&self) -> Option<&OsuWifiEntry> {
        match self {
            WifiEntry::Osu(e) => Some(e),
            _ => None,
        }
    }
}
