//! # Utility methods and types

/// Signal level as reported to a UI: `0..=4`, or `UNREACHABLE` if nothing currently
/// contributes to the entry's level (§3 Invariant 4).
pub type SignalLevel = i8;

/// Sentinel level for an entry with no currently-associated observation.
pub const UNREACHABLE: SignalLevel = -1;

/// Strips the optional surrounding quotes network managers use for SSIDs (`"ssid"` vs
/// `ssid`) and rejects an effectively-empty result. Used both when building entry keys
/// from scans (already unquoted) and from saved configurations (quoted).
pub fn sanitize_ssid(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let unquoted = if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };
    if unquoted.is_empty() {
        None
    } else {
        Some(unquoted.to_owned())
    }
}

/// Clamps a raw RSSI-derived level into the documented `0..=4` or `UNREACHABLE` range.
/// Platform implementations are expected to already quantize via `calculate_signal_level`;
/// this only guards against an out-of-range platform bug propagating further.
pub fn clamp_level(level: i8) -> SignalLevel {
    if level < 0 {
        UNREACHABLE
    } else {
        level.min(4)
    }
}
