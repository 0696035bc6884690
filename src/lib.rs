//! # wifi-tracker
//!
//! A client-side Wi-Fi tracking engine: reconciles radio scans, saved network
//! configurations, Passpoint subscriptions and the active connection into a stable,
//! keyed catalog of entries for a UI to render. The platform Wi-Fi manager itself --
//! the actual scan/connect/disconnect RPCs -- is outside this crate's scope and is
//! referenced only through the [`platform::WifiPlatform`] trait.

#[macro_use]
extern crate log;

pub mod callback;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod entry;
pub mod entry_cache;
pub mod errors;
pub mod key;
pub mod platform;
pub mod scan_cache;
pub mod scanner;
pub mod types;
pub mod utils;
pub mod views;

pub use callback::ResultCallback;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::TrackerConfig;
pub use dispatch::{DispatchEvent, Dispatcher, TrackerListener};
pub use engine::TrackerEngine;
pub use entry::{OsuWifiEntry, PasspointWifiEntry, StandardWifiEntry, WifiEntry, WifiEntryOps};
pub use entry_cache::EntryCache;
pub use errors::TrackerError;
pub use platform::WifiPlatform;
pub use scan_cache::ScanCache;
pub use scanner::{ScanMode, Scanner};
pub use views::{DetailsView, EntrySummary, PickerView, SavedNetworksView, SavedSubscriptionsView};
