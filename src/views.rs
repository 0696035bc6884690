//! # Materialized, read-locked views over the entry catalog (§4.G)
//!
//! The engine holds the authoritative [`crate::entry_cache::EntryCache`] behind its own
//! worker task; consumers never touch it directly. Instead each view is a small
//! `RwLock`-guarded snapshot, rebuilt after every reconciliation pass, that getters copy
//! out of defensively so a caller can't observe a half-updated list mid-rebuild.

use crate::entry::{WifiEntry, WifiEntryOps};
use crate::entry_cache::EntryCache;
use crate::types::{ConnectedState, EntryCapabilities, MeteredOverride};
use crate::utils::SignalLevel;
use std::sync::RwLock;

/// A defensive-copy summary of one entry, stable across the lifetime of the snapshot it
/// came from (the live [`WifiEntry`] may keep mutating after this is taken).
#[derive(Clone, Debug, PartialEq)]
pub struct EntrySummary {
    pub key: String,
    pub title: String,
    pub level: SignalLevel,
    pub connected_state: ConnectedState,
    pub is_saved: bool,
    pub metered_choice: MeteredOverride,
    pub capabilities: EntryCapabilities,
}

impl EntrySummary {
    fn from_entry(entry: &WifiEntry) -> Self {
        EntrySummary {
            key: entry.key().to_owned(),
            title: entry.title().to_owned(),
            level: entry.level(),
            connected_state: entry.connected_state(),
            is_saved: entry.is_saved(),
            metered_choice: entry.get_metered_choice(),
            capabilities: EntryCapabilities {
                can_connect: entry.can_connect(),
                can_disconnect: entry.can_disconnect(),
                can_forget: entry.can_forget(),
                can_set_metered_choice: entry.can_set_metered_choice(),
                can_set_auto_join: entry.can_set_auto_join(),
            },
        }
    }
}

/// Sorts by signal level descending, then title ascending (Open Question: picker order).
fn picker_sort(items: &mut Vec<EntrySummary>) {
    items.sort_by(|a, b| b.level.cmp(&a.level).then_with(|| a.title.cmp(&b.title)));
}

/// An entry belongs in the picker if it's reachable, or if it's mid-connection --
/// the active/activating entry must not disappear from the picker just because its
/// level momentarily reads `UNREACHABLE` (Testable Property 6).
pub fn is_picker_eligible(entry: &WifiEntry) -> bool {
    entry.level() != crate::utils::UNREACHABLE || matches!(entry.connected_state(), ConnectedState::Connecting | ConnectedState::Connected)
}

/// All reachable entries (any kind), in picker presentation order.
#[derive(Default)]
pub struct PickerView {
    entries: RwLock<Vec<EntrySummary>>,
}

impl PickerView {
    pub fn new() -> Self {
        PickerView { entries: RwLock::new(Vec::new()) }
    }

    pub fn rebuild(&self, cache: &EntryCache) {
        let mut items: Vec<EntrySummary> = cache.all().filter(|e| is_picker_eligible(e)).map(EntrySummary::from_entry).collect();
        picker_sort(&mut items);
        *self.entries.write().expect("picker view lock poisoned") = items;
    }

    pub fn entries(&self) -> Vec<EntrySummary> {
        self.entries.read().expect("picker view lock poisoned").clone()
    }
}

/// Saved standard (and generated-config) networks, regardless of reachability.
#[derive(Default)]
pub struct SavedNetworksView {
    entries: RwLock<Vec<EntrySummary>>,
}

impl SavedNetworksView {
    pub fn new() -> Self {
        SavedNetworksView { entries: RwLock::new(Vec::new()) }
    }

    pub fn rebuild(&self, cache: &EntryCache) {
        let mut items: Vec<EntrySummary> = cache
            .all()
            .filter(|e| matches!(e, WifiEntry::Standard(_)) && e.is_saved())
            .map(EntrySummary::from_entry)
            .collect();
        picker_sort(&mut items);
        *self.entries.write().expect("saved networks view lock poisoned") = items;
    }

    pub fn entries(&self) -> Vec<EntrySummary> {
        self.entries.read().expect("saved networks view lock poisoned").clone()
    }
}

/// Installed Passpoint subscriptions.
#[derive(Default)]
pub struct SavedSubscriptionsView {
    entries: RwLock<Vec<EntrySummary>>,
}

impl SavedSubscriptionsView {
    pub fn new() -> Self {
        SavedSubscriptionsView { entries: RwLock::new(Vec::new()) }
    }

    pub fn rebuild(&self, cache: &EntryCache) {
        let mut items: Vec<EntrySummary> = cache
            .all()
            .filter(|e| matches!(e, WifiEntry::Passpoint(_)))
            .map(EntrySummary::from_entry)
            .collect();
        picker_sort(&mut items);
        *self.entries.write().expect("saved subscriptions view lock poisoned") = items;
    }

    pub fn entries(&self) -> Vec<EntrySummary> {
        self.entries.read().expect("saved subscriptions view lock poisoned").clone()
    }
}

/// A single entry's full detail, as selected by key (e.g. for a details screen).
#[derive(Default)]
pub struct DetailsView {
    current: RwLock<Option<EntrySummary>>,
}

impl DetailsView {
    pub fn new() -> Self {
        DetailsView { current: RwLock::new(None) }
    }

    pub fn select(&self, cache: &EntryCache, key: &str) {
        let summary = cache.get(key).map(EntrySummary::from_entry);
        *self.current.write().expect("details view lock poisoned") = summary;
    }

    pub fn clear(&self) {
        *self.current.write().expect("details view lock poisoned") = None;
    }

    pub fn current(&self) -> Option<EntrySummary> {
        self.current.read().expect("details view lock poisoned").clone()
    }
}
