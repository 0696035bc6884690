//! # Error and Result Type
//!
//! This crate uses one wrapping error type.
//! Sub-modules and methods should return a specific error type whenever possible though.

use std::error;
use std::fmt;

/// The main error type used throughout this crate. It implements [error::Error] so that
/// you can use it in any situation where the standard error type is expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// Generic errors are very rarely used and only used if no other error type matches
    Generic(String),
    /// An incoming scan observation or configuration does not match the identity of the
    /// entry it was routed to. Never surfaced to consumers, only to the reconciler, which
    /// is expected to route it to the correct key instead.
    Mismatch,
    /// `ScanCache::get` was asked for a window wider than the cache's configured bound.
    InvalidAgeWindow,
    /// An entry key string does not conform to the documented `Kind:...` format.
    MalformedKey(String),
    /// A required construction argument (scan group, config, provider) was missing.
    NullDependency,
    /// `start_scan()` returned false for `scan_retry_max` consecutive attempts in a row.
    ScanSubmissionFailed,
    ConnectFailed(String),
    DisconnectFailed(String),
    ForgetFailed(String),
    /// An open/OWE network requires no password, but the caller has none and the network
    /// is not already saved.
    NoPasswordProvided,
    /// The operation is not supported for this entry kind (OSU entries, mainly).
    NotSupported,
    /// Wifi was disabled mid-reconciliation; scan input is treated as empty for this pass.
    WifiDisabled,
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TrackerError::Generic(m) => m.fmt(f),
            TrackerError::Mismatch => write!(f, "observation/config does not match the entry's identity"),
            TrackerError::InvalidAgeWindow => write!(f, "requested age window exceeds the scan cache's max age"),
            TrackerError::MalformedKey(k) => write!(f, "malformed entry key: {}", k),
            TrackerError::NullDependency => write!(f, "required construction argument missing"),
            TrackerError::ScanSubmissionFailed => write!(f, "platform rejected the scan request too many times"),
            TrackerError::ConnectFailed(m) => write!(f, "connect failed: {}", m),
            TrackerError::DisconnectFailed(m) => write!(f, "disconnect failed: {}", m),
            TrackerError::ForgetFailed(m) => write!(f, "forget failed: {}", m),
            TrackerError::NoPasswordProvided => write!(f, "no password provided for a secured network"),
            TrackerError::NotSupported => write!(f, "operation not supported for this entry kind"),
            TrackerError::WifiDisabled => write!(f, "wifi is disabled"),
        }
    }
}

impl error::Error for TrackerError {}

impl From<String> for TrackerError {
    fn from(error: String) -> Self {
        TrackerError::Generic(error)
    }
}
