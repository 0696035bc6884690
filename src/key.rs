//! # Entry key construction (bit-exact formats, §6)

use crate::types::SecurityFamily;

pub const STANDARD_PREFIX: &str = "StandardWifiEntry:";
pub const PASSPOINT_PREFIX: &str = "PasspointWifiEntry:";
pub const OSU_PREFIX: &str = "OsuWifiEntry:";

/// `"StandardWifiEntry:" + unquoted_ssid + "," + security_int`
pub fn standard_key(unquoted_ssid: &str, security: SecurityFamily) -> String {
    format!("{}{},{}", STANDARD_PREFIX, unquoted_ssid, security.as_i32())
}

/// `"PasspointWifiEntry:" + unique_id`
pub fn passpoint_key(unique_id: &str) -> String {
    format!("{}{}", PASSPOINT_PREFIX, unique_id)
}

/// `"OsuWifiEntry:" + friendly_name + "," + server_uri`
pub fn osu_key(friendly_name: &str, server_uri: &str) -> String {
    format!("{}{},{}", OSU_PREFIX, friendly_name, server_uri)
}
