//! # Listener dispatch onto the "main thread" (§9 Coroutine/async mapping)
//!
//! The engine's worker task is the single-threaded-executor analogue of the source
//! system's worker thread; the caller-supplied [`tokio::runtime::Handle`] it posts
//! callbacks onto is the analogue of its main thread. [`Dispatcher`] is the seam between
//! the two: it holds the one registered listener and posts each event onto the main-thread
//! handle, exactly once, dropping events delivered after [`Dispatcher::stop`].

use crate::entry::WifiEntry;
use crate::types::{ConfigChangeReason, WifiState};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;

/// Broadcasts the engine can raise on its listener. Mirrors the entry/connection/radio
/// events enumerated in §4.F.
#[derive(Clone, Debug)]
pub enum DispatchEvent {
    EntriesChanged,
    ConnectedEntryChanged(Option<String>),
    WifiStateChanged(WifiState),
    ConfigChanged(ConfigChangeReason),
    ConnectResult { key: String, success: bool },
    Entries(Vec<WifiEntry>),
}

/// Callback surface a consumer implements to observe engine state changes. Every method
/// has a no-op default so implementors only override what they care about -- matches the
/// teacher's own listener-trait style.
pub trait TrackerListener: Send + Sync {
    fn on_entries_changed(&self) {}
    fn on_connected_entry_changed(&self, _key: Option<&str>) {}
    fn on_wifi_state_changed(&self, _state: WifiState) {}
    fn on_config_changed(&self, _reason: ConfigChangeReason) {}
    fn on_connect_result(&self, _key: &str, _success: bool) {}
    /// Fired once per reconciliation pass with the fresh picker-eligible entry set, for
    /// listeners that want the data rather than just the change notification.
    fn on_entries(&self, _entries: &[WifiEntry]) {}
}

/// Posts [`DispatchEvent`]s to at most one registered listener on the main-thread handle.
pub struct Dispatcher {
    main_thread: Handle,
    listener: Arc<Mutex<Option<Arc<dyn TrackerListener>>>>,
    stopped: Arc<AtomicBool>,
}

impl Dispatcher {
    pub fn new(main_thread: Handle) -> Self {
        Dispatcher { main_thread, listener: Arc::new(Mutex::new(None)), stopped: Arc::new(AtomicBool::new(false)) }
    }

    pub fn set_listener(&self, listener: Option<Arc<dyn TrackerListener>>) {
        *self.listener.lock().expect("dispatcher listener lock poisoned") = listener;
    }

    /// Gates all future dispatch. Once stopped, a `Dispatcher` cannot be restarted --
    /// callers create a fresh one on engine restart (§3 Lifecycle).
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Posts `event` onto the main-thread handle. Silently dropped if stopped or if no
    /// listener is registered.
    pub fn dispatch(&self, event: DispatchEvent) {
        if self.stopped.load(Ordering::SeqCst) {
            return;
        }
        let listener = self.listener.clone();
        let stopped = self.stopped.clone();
        self.main_thread.spawn(async move {
            if stopped.load(Ordering::SeqCst) {
                return;
            }
            let guard = listener.lock().expect("dispatcher listener lock poisoned");
            if let Some(l) = guard.as_ref() {
                match event {
                    DispatchEvent::EntriesChanged => l.on_entries_changed(),
                    DispatchEvent::ConnectedEntryChanged(key) => l.on_connected_entry_changed(key.as_deref()),
                    DispatchEvent::WifiStateChanged(state) => l.on_wifi_state_changed(state),
                    DispatchEvent::ConfigChanged(reason) => l.on_config_changed(reason),
                    DispatchEvent::ConnectResult { key, success } => l.on_connect_result(&key, success),
                    DispatchEvent::Entries(entries) => l.on_entries(&entries),
                }
            }
        });
    }
}
