//! ANSI (`SM`/`RM`) and DEC private (`CSI ? ... h/l`) mode storage, plus the
//! XTSAVE/XTRESTORE per-mode save stack.
//!
//! A `HashMap`-backed lookup table covers the full ANSI/DEC mode catalogue a
//! complete terminal core must track, since callers beyond dispatch (status
//! reporting via DECRQM, XTSAVE/XTRESTORE) need to address modes this
//! engine itself never branches on.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Reset-state default for each DEC private mode this engine recognizes.
    /// Modes absent here default to `false` like ANSI modes do.
    static ref DEC_DEFAULTS: HashMap<u16, bool> = {
        let mut m = HashMap::new();
        m.insert(7, true);   // DECAWM autowrap
        m.insert(25, true);  // DECTCEM cursor visible
        m.insert(1049, false); // alternate screen buffer
        m
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeKind {
    Ansi,
    Dec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModeState {
    ansi: HashMap<u16, bool>,
    dec: HashMap<u16, bool>,
    save_stack: HashMap<u16, Vec<bool>>,
}

impl ModeState {
    pub fn new() -> Self {
        ModeState::default()
    }

    pub fn get(&self, kind: ModeKind, code: u16) -> bool {
        match kind {
            ModeKind::Ansi => self.ansi.get(&code).copied().unwrap_or(false),
            ModeKind::Dec => self.dec.get(&code).copied().unwrap_or_else(|| DEC_DEFAULTS.get(&code).copied().unwrap_or(false)),
        }
    }

    pub fn set(&mut self, kind: ModeKind, code: u16, value: bool) {
        match kind {
            ModeKind::Ansi => self.ansi.insert(code, value),
            ModeKind::Dec => self.dec.insert(code, value),
        };
    }

    /// XTSAVE (`CSI ? Pm s`): push the current value of each mode in `codes`.
    pub fn save(&mut self, codes: &[u16]) {
        for &code in codes {
            let value = self.get(ModeKind::Dec, code);
            self.save_stack.entry(code).or_default().push(value);
        }
    }

    /// XTRESTORE (`CSI ? Pm r`): pop the most recently saved value of each
    /// mode in `codes`; modes with no saved value are left untouched.
    pub fn restore(&mut self, codes: &[u16]) {
        for &code in codes {
            if let Some(stack) = self.save_stack.get_mut(&code) {
                if let Some(value) = stack.pop() {
                    self.dec.insert(code, value);
                }
            }
        }
    }

    /// `DECRQM`/ANSI DSR-mode reply status: 0 not recognized, 1 set, 2 reset,
    /// 3 permanently set, 4 permanently reset. This engine never permanently
    /// pins a mode, so only 1/2 are ever reported once recognized.
    pub fn request_status(&self, kind: ModeKind, code: u16) -> u8 {
        let recognized = match kind {
            ModeKind::Ansi => KNOWN_ANSI_MODES.contains(&code),
            ModeKind::Dec => KNOWN_DEC_MODES.contains(&code),
        };
        if !recognized {
            return 0;
        }
        if self.get(kind, code) {
            1
        } else {
            2
        }
    }
}

/// The ANSI (non-private) modes DECRQM should acknowledge as recognized.
pub const KNOWN_ANSI_MODES: &[u16] = &[2, 4, 12, 20];

/// The DEC private modes DECRQM should acknowledge as recognized: cursor
/// keys, autowrap, origin, cursor visibility, mouse reporting variants,
/// bracketed paste, alternate screen, sixel scrolling.
pub const KNOWN_DEC_MODES: &[u16] = &[
    1, 3, 5, 6, 7, 8, 9, 12, 25, 40, 45, 47, 66, 69, 1000, 1002, 1003, 1004, 1005, 1006, 1015, 1047, 1048, 1049, 2004, 8452,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dec_autowrap_defaults_on() {
        let state = ModeState::new();
        assert!(state.get(ModeKind::Dec, 7));
    }

    #[test]
    fn save_restore_round_trips() {
        let mut state = ModeState::new();
        state.set(ModeKind::Dec, 1000, true);
        state.save(&[1000]);
        state.set(ModeKind::Dec, 1000, false);
        assert!(!state.get(ModeKind::Dec, 1000));
        state.restore(&[1000]);
        assert!(state.get(ModeKind::Dec, 1000));
    }

    #[test]
    fn unrecognized_mode_reports_zero() {
        let state = ModeState::new();
        assert_eq!(state.request_status(ModeKind::Dec, 65535), 0);
    }

    #[test]
    fn mode_state_round_trips_through_json_snapshot() {
        let mut state = ModeState::new();
        state.set(ModeKind::Dec, 1049, true);
        state.set(ModeKind::Ansi, 4, true);

        let json = serde_json::to_string(&state).unwrap();
        let restored: ModeState = serde_json::from_str(&json).unwrap();
        assert!(restored.get(ModeKind::Dec, 1049));
        assert!(restored.get(ModeKind::Ansi, 4));
    }
}
