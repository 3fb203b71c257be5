//! Terminal capability database for `DECRQSS` (request status string) and
//! `XTGETTCAP` (query terminfo capability by hex-encoded name) replies.
//!
//! A small static table, built with `lazy_static!` the same way
//! `modes.rs`'s `DEC_DEFAULTS` is, covering the handful of boolean/string
//! terminfo capabilities this engine claims to support.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `DECRQSS` answers one of these CSI settings with its current value,
/// wrapped in a DCS `1$r...ST` (supported) or `0$r` (unsupported) reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusSetting {
    GraphicRendition,
    TopBottomMargins,
    LeftRightMargins,
    CursorStyle,
    ProtectionAttribute,
}

pub fn status_setting_from_request(request: &[u8]) -> Option<StatusSetting> {
    match request {
        b"m" => Some(StatusSetting::GraphicRendition),
        b"r" => Some(StatusSetting::TopBottomMargins),
        b"s" => Some(StatusSetting::LeftRightMargins),
        b" q" => Some(StatusSetting::CursorStyle),
        b"\"q" => Some(StatusSetting::ProtectionAttribute),
        _ => None,
    }
}

lazy_static! {
    /// Boolean terminfo capabilities this engine claims, keyed by the
    /// two-letter termcap name `XTGETTCAP` queries use.
    static ref BOOLEAN_CAPS: HashMap<&'static str, bool> = {
        let mut m = HashMap::new();
        m.insert("am", true);  // auto_right_margin
        m.insert("bce", true); // back_color_erase
        m.insert("xenl", true); // eat_newline_glitch
        m.insert("mir", true); // move_insert_mode
        m
    };

    /// String terminfo capabilities, keyed the same way.
    static ref STRING_CAPS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("TN", "xterm-256color");
        m.insert("Co", "256");
        m.insert("colors", "256");
        m.insert("cup", "\x1b[%i%p1%d;%p2%dH");
        m.insert("clear", "\x1b[H\x1b[2J");
        m
    };
}

/// Look up a capability by its plain (not hex-encoded) termcap/terminfo
/// name, returning the string `XTGETTCAP` should report.
pub fn lookup_capability(name: &str) -> Option<String> {
    if let Some(&value) = STRING_CAPS.get(name) {
        return Some(value.to_string());
    }
    if let Some(&present) = BOOLEAN_CAPS.get(name) {
        return present.then(String::new);
    }
    None
}

/// An owned, serializable snapshot of the capability table, for callers that
/// want to ship the whole set (e.g. into a test fixture or a config dump)
/// rather than look up names one at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityTable {
    pub booleans: HashMap<String, bool>,
    pub strings: HashMap<String, String>,
}

pub fn capability_table_snapshot() -> CapabilityTable {
    CapabilityTable {
        booleans: BOOLEAN_CAPS.iter().map(|(&k, &v)| (k.to_string(), v)).collect(),
        strings: STRING_CAPS.iter().map(|(&k, v)| (k.to_string(), v.to_string())).collect(),
    }
}

/// Decode an `XTGETTCAP` payload (`;`-separated hex-encoded capability
/// names) into the plain names to look up.
pub fn decode_tcap_names(payload: &str) -> Vec<String> {
    payload
        .split(';')
        .filter_map(|hex| {
            let bytes: Option<Vec<u8>> = (0..hex.len())
                .step_by(2)
                .map(|i| hex.get(i..i + 2).and_then(|byte| u8::from_str_radix(byte, 16).ok()))
                .collect();
            bytes.and_then(|b| String::from_utf8(b).ok())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sgr_request_resolves() {
        assert_eq!(status_setting_from_request(b"m"), Some(StatusSetting::GraphicRendition));
    }

    #[test]
    fn unknown_request_is_none() {
        assert_eq!(status_setting_from_request(b"zz"), None);
    }

    #[test]
    fn known_string_capability_resolves() {
        assert_eq!(lookup_capability("Co"), Some("256".to_string()));
    }

    #[test]
    fn unknown_capability_is_none() {
        assert_eq!(lookup_capability("nonexistent"), None);
    }

    #[test]
    fn tcap_names_decode_from_hex() {
        // "Co" encoded as hex is 436f.
        assert_eq!(decode_tcap_names("436f"), vec!["Co".to_string()]);
    }

    #[test]
    fn capability_snapshot_includes_known_entries() {
        let snapshot = capability_table_snapshot();
        assert_eq!(snapshot.strings.get("Co"), Some(&"256".to_string()));
        assert_eq!(snapshot.booleans.get("bce"), Some(&true));
    }
}
