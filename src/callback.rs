//! # Single-result callback type for connect/disconnect/forget (§5)
//!
//! "Connect/disconnect/forget carry a single user-provided callback. At most one success
//! or one failure is delivered per request; late platform events that no longer
//! correspond to the pending request are dropped." The engine satisfies this by awaiting
//! exactly one `Result` (disconnect races the platform response against a watchdog with
//! `tokio::select!`, whose losing branch is cancelled, not merely ignored) and invoking
//! the callback with it exactly once.

use crate::errors::TrackerError;

pub type ResultCallback = Box<dyn FnOnce(Result<(), TrackerError>) + Send + 'static>;
