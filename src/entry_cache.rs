//! # Entry catalog: reconciles scans and configs into a keyed set of entries (§4.E)
//!
//! Every mutation pass keeps the single-kind-ownership invariant: a key maps to at most
//! one entry, and that entry's kind never changes once created (Invariant 1). Passes are
//! applied by the engine in the canonical order documented in [`crate::engine`].

use crate::entry::{OsuWifiEntry, PasspointWifiEntry, StandardWifiEntry, WifiEntry, WifiEntryOps};
use crate::errors::TrackerError;
use crate::platform::WifiPlatform;
use crate::types::{Configuration, ConnectionInfo, NetworkInfo, OsuMatch, PasspointConfiguration, PasspointMatch, ScanObservation};
use crate::utils::sanitize_ssid;
use std::collections::HashMap;

#[derive(Default)]
pub struct EntryCache {
    entries: HashMap<String, WifiEntry>,
    current_connection_key: Option<String>,
}

fn group_standard_scans(scans: &[ScanObservation]) -> HashMap<String, (String, crate::types::SecurityFamily, Vec<ScanObservation>)> {
    let mut groups: HashMap<String, (String, crate::types::SecurityFamily, Vec<ScanObservation>)> = HashMap::new();
    for obs in scans {
        let key = crate::key::standard_key(&obs.ssid, obs.security_caps);
        groups
            .entry(key)
            .or_insert_with(|| (obs.ssid.clone(), obs.security_caps, Vec::new()))
            .2
            .push(obs.clone());
    }
    groups
}

impl EntryCache {
    pub fn new() -> Self {
        EntryCache { entries: HashMap::new(), current_connection_key: None }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&WifiEntry> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut WifiEntry> {
        self.entries.get_mut(key)
    }

    pub fn all(&self) -> impl Iterator<Item = &WifiEntry> {
        self.entries.values()
    }

    pub fn current_connection_key(&self) -> Option<&str> {
        self.current_connection_key.as_deref()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_connection_key = None;
    }

    /// Pass 1: fold fresh scan observations into standard entries, grouped by
    /// `(ssid, security)`. Every existing standard entry gets its group replaced for this
    /// cycle -- possibly empty, if its key is absent from `scans` -- so an entry whose
    /// network has dropped out of range recomputes to `UNREACHABLE` instead of going stale
    /// (Invariant 4). Creates entries for groups with no existing match, then evicts
    /// entries left unreachable, unsaved and not the active connection (§4.E step 3).
    pub fn update_standard_from_scans(&mut self, scans: &[ScanObservation], platform: &dyn WifiPlatform) -> Result<(), TrackerError> {
        let mut groups = group_standard_scans(scans);

        let standard_keys: Vec<String> =
            self.entries.iter().filter(|(_, e)| matches!(e, WifiEntry::Standard(_))).map(|(key, _)| key.clone()).collect();

        for key in &standard_keys {
            let group = groups.remove(key).map(|(_, _, group)| group).unwrap_or_default();
            if let Some(WifiEntry::Standard(e)) = self.entries.get_mut(key) {
                e.update_scan(group, platform)?;
            }
        }

        for (key, (ssid, security, group)) in groups {
            if self.entries.contains_key(&key) {
                return Err(TrackerError::Mismatch);
            }
            let entry = StandardWifiEntry::new(ssid, security, group, None, platform)?;
            self.entries.insert(key, WifiEntry::Standard(entry));
        }

        let current_connection_key = self.current_connection_key.clone();
        self.entries.retain(|key, entry| match entry {
            WifiEntry::Standard(e) => {
                e.is_saved() || e.level() != crate::utils::UNREACHABLE || current_connection_key.as_deref() == Some(key.as_str())
            }
            _ => true,
        });
        Ok(())
    }

    /// Pass 2: fold persisted configs into standard entries. Resolves duplicate keys by
    /// preferring the config with `from_suggestion == false` (Open Question: saved beats
    /// suggested). Configs absent from this snapshot clear the corresponding entry's saved
    /// state; an entry left with neither scans nor config is evicted.
    pub fn update_standard_from_configs(&mut self, configs: Vec<Configuration>, platform: &dyn WifiPlatform) -> Result<(), TrackerError> {
        let mut by_key: HashMap<String, Configuration> = HashMap::new();
        for cfg in configs {
            let ssid = match sanitize_ssid(&cfg.ssid_quoted) {
                Some(s) => s,
                None => continue,
            };
            let key = crate::key::standard_key(&ssid, cfg.security_type);
            match by_key.get(&key) {
                Some(existing) if !existing.from_suggestion => {}
                _ => {
                    by_key.insert(key, cfg);
                }
            }
        }

        for (key, cfg) in &by_key {
            match self.entries.get_mut(key) {
                Some(WifiEntry::Standard(e)) => {
                    e.update_config(Some(cfg.clone()))?;
                }
                Some(_) => return Err(TrackerError::Mismatch),
                None => {
                    let ssid = sanitize_ssid(&cfg.ssid_quoted).ok_or(TrackerError::MalformedKey(cfg.ssid_quoted.clone()))?;
                    let entry = StandardWifiEntry::new(ssid, cfg.security_type, Vec::new(), Some(cfg.clone()), platform)?;
                    self.entries.insert(key.clone(), WifiEntry::Standard(entry));
                }
            }
        }

        let stale: Vec<String> = self
            .entries
            .iter()
            .filter_map(|(key, entry)| match entry {
                WifiEntry::Standard(e) if e.is_saved() && !by_key.contains_key(key) => Some(key.clone()),
                _ => None,
            })
            .collect();
        for key in &stale {
            if let Some(WifiEntry::Standard(e)) = self.entries.get_mut(key) {
                e.update_config(None)?;
            }
        }

        let current_connection_key = self.current_connection_key.clone();
        self.entries.retain(|key, entry| match entry {
            WifiEntry::Standard(e) => {
                e.is_saved() || e.level() != crate::utils::UNREACHABLE || current_connection_key.as_deref() == Some(key.as_str())
            }
            _ => true,
        });
        Ok(())
    }

    /// Pass 3: creates/refreshes Passpoint entries from the platform's subscription
    /// snapshot. A subscription missing from this snapshot is removed entirely --
    /// Passpoint entries have no unsaved state.
    pub fn update_passpoint_from_configs(&mut self, configs: Vec<PasspointConfiguration>, platform: &dyn WifiPlatform) {
        let mut seen = Vec::with_capacity(configs.len());
        for cfg in configs {
            let key = crate::key::passpoint_key(&cfg.unique_id);
            seen.push(key.clone());
            match self.entries.get_mut(&key) {
                Some(WifiEntry::Passpoint(e)) => e.update_passpoint_config(Some(cfg)),
                _ => {
                    let entry = PasspointWifiEntry::new(cfg, Vec::new(), Vec::new(), platform);
                    self.entries.insert(key, WifiEntry::Passpoint(entry));
                }
            }
        }
        self.entries.retain(|key, entry| match entry {
            WifiEntry::Passpoint(_) => seen.contains(key),
            _ => true,
        });
    }

    /// Pass 4: folds fresh home/roaming scan matches into existing Passpoint entries.
    /// Matches for a subscription with no known config are dropped (§4.E: subscription
    /// configs are the source of truth for which Passpoint entries exist).
    pub fn update_passpoint_from_scans(&mut self, matches: Vec<PasspointMatch>, platform: &dyn WifiPlatform) {
        for m in matches {
            let key = crate::key::passpoint_key(&m.unique_id);
            if let Some(WifiEntry::Passpoint(e)) = self.entries.get_mut(&key) {
                e.update_scan_groups(m.home_scans, m.roaming_scans, platform);
            }
        }
    }

    /// Pass 5: OSU entries are wholly derived from the current scan cycle -- they carry
    /// no persisted config -- so each cycle replaces the OSU set outright.
    pub fn update_osu_from_scans(&mut self, matches: Vec<OsuMatch>, platform: &dyn WifiPlatform) {
        let mut fresh_keys = Vec::with_capacity(matches.len());
        for m in matches {
            let key = crate::key::osu_key(&m.provider.friendly_name, &m.provider.server_uri);
            fresh_keys.push(key.clone());
            let entry = OsuWifiEntry::new(m.provider, m.scans, platform);
            self.entries.insert(key, WifiEntry::Osu(entry));
        }
        self.entries.retain(|key, entry| match entry {
            WifiEntry::Osu(_) => fresh_keys.contains(key),
            _ => true,
        });
    }

    /// Fabricates a standard entry from its matching saved configuration when the platform
    /// reports an active connection that no cached entry yet claims (§4.E). Covers the gap
    /// between association and the first post-association scan: without this, a freshly
    /// connected network that hasn't been seen in a scan this cycle has no entry for
    /// `update_connection_info` to mark `Connected`. No-op if some entry already matches
    /// `info`, if there's no active `network_id`, or if no saved config matches it.
    pub fn conditionally_create_connected_entry(
        &mut self,
        info: &ConnectionInfo,
        net_info: &NetworkInfo,
        configs: &[Configuration],
        platform: &dyn WifiPlatform,
    ) {
        let Some(network_id) = info.network_id else { return };
        if self.entries.values().any(|e| e.connection_info_matches(info)) {
            return;
        }
        let Some(cfg) = configs.iter().find(|c| c.network_id == network_id) else { return };
        let Some(ssid) = sanitize_ssid(&cfg.ssid_quoted) else { return };
        let key = crate::key::standard_key(&ssid, cfg.security_type);
        if self.entries.contains_key(&key) {
            return;
        }
        if let Ok(mut entry) = StandardWifiEntry::new(ssid, cfg.security_type, Vec::new(), Some(cfg.clone()), platform) {
            entry.update_connection_info(info, net_info, platform);
            self.entries.insert(key, WifiEntry::Standard(entry));
        }
    }

    /// Pass 6: broadcasts the active connection/network-state snapshot to every entry,
    /// then records whichever entry (if any) claims the active connection.
    pub fn update_connection_info(&mut self, info: &ConnectionInfo, net_info: &NetworkInfo, platform: &dyn WifiPlatform) {
        self.current_connection_key = None;
        for (key, entry) in self.entries.iter_mut() {
            entry.update_connection_info(info, net_info, platform);
            if entry.connection_info_matches(info) && entry.connected_state() == crate::types::ConnectedState::Connected {
                self.current_connection_key = Some(key.clone());
            }
        }
    }

    /// Evicts expired Passpoint subscriptions (§4.D `is_expired`).
    pub fn evict_expired(&mut self, now_ms: i64) {
        self.entries.retain(|_, entry| !matches!(entry, WifiEntry::Passpoint(_)) || !entry.is_expired(now_ms));
    }
}
