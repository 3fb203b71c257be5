//! Fixed-table byte-level state machine for ECMA-48/DEC/xterm control streams.
//!
//! States follow the canonical ECMA-48/Williams table, extended with the two
//! auxiliary passthrough modes the DCS sub-parsers need (`DcsPassthrough`
//! forwards bytes verbatim, `DcsIgnore`/`CsiIgnore` swallow a malformed
//! sequence without dispatching it).

use crate::error::ParseError;
use crate::params::Params;
use crate::sequence::{Category, Sequence};
use crate::sink::ParserSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Escape,
    EscapeIntermediate,
    CsiEntry,
    CsiParam,
    CsiIntermediate,
    CsiIgnore,
    DcsEntry,
    DcsParam,
    DcsIntermediate,
    DcsPassthrough,
    DcsIgnore,
    OscString,
    SosPmApcString,
    Utf8Continuation,
}

/// Decodes a byte stream into [`ParserSink`] callbacks.
///
/// Owns the in-progress [`Sequence`] (parameters, intermediates, leader,
/// final byte, string payload) and the UTF-8 continuation-byte accumulator;
/// neither survives a [`ByteParser::reset`].
pub struct ByteParser {
    state: State,
    sequence: Sequence,
    /// Set once inside an escape/CSI/DCS/string envelope that just saw `ESC`,
    /// waiting to see whether the next byte is `\` (String Terminator).
    pending_st: bool,
    /// Bytes still expected to complete the current UTF-8 scalar.
    utf8_remaining: u8,
    utf8_value: u32,
    /// The state to resume once `Utf8Continuation` completes or aborts.
    utf8_resume: ResumeAfterUtf8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResumeAfterUtf8 {
    Ground,
}

impl Default for ByteParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteParser {
    pub fn new() -> Self {
        Self {
            state: State::Ground,
            sequence: Sequence::default(),
            pending_st: false,
            utf8_remaining: 0,
            utf8_value: 0,
            utf8_resume: ResumeAfterUtf8::Ground,
        }
    }

    /// Return to `Ground`, discarding any in-progress sequence. Used after a
    /// hard reset (RIS).
    pub fn reset(&mut self) {
        self.state = State::Ground;
        self.sequence.reset();
        self.pending_st = false;
        self.utf8_remaining = 0;
        self.utf8_value = 0;
    }

    pub fn parse(&mut self, bytes: &[u8], sink: &mut dyn ParserSink) {
        for &byte in bytes {
            self.parse_byte(byte, sink);
        }
    }

    fn parse_byte(&mut self, byte: u8, sink: &mut dyn ParserSink) {
        // CAN/SUB abort any sequence in progress, unconditionally (ECMA-48 §5.4).
        if matches!(byte, 0x18 | 0x1A) && self.state != State::Ground && self.state != State::Utf8Continuation {
            self.abort_to_ground();
            sink.execute(byte);
            return;
        }

        match self.state {
            State::Ground => self.in_ground(byte, sink),
            State::Utf8Continuation => self.in_utf8_continuation(byte, sink),
            State::Escape => self.in_escape(byte, sink),
            State::EscapeIntermediate => self.in_escape_intermediate(byte, sink),
            State::CsiEntry | State::CsiParam => self.in_csi_param(byte, sink),
            State::CsiIntermediate => self.in_csi_intermediate(byte, sink),
            State::CsiIgnore => self.in_csi_ignore(byte),
            State::DcsEntry | State::DcsParam => self.in_dcs_param(byte, sink),
            State::DcsIntermediate => self.in_dcs_intermediate(byte, sink),
            State::DcsPassthrough => self.in_dcs_passthrough(byte, sink),
            State::DcsIgnore => self.in_dcs_ignore(byte),
            State::OscString => self.in_osc_string(byte, sink),
            State::SosPmApcString => self.in_sos_pm_apc_string(byte),
        }
    }

    fn abort_to_ground(&mut self) {
        self.state = State::Ground;
        self.sequence.reset();
        self.pending_st = false;
    }

    // ---- Ground --------------------------------------------------------

    fn in_ground(&mut self, byte: u8, sink: &mut dyn ParserSink) {
        match byte {
            0x1B => {
                self.sequence.reset();
                self.state = State::Escape;
            }
            0x00..=0x17 | 0x19 | 0x1C..=0x1F | 0x7F => sink.execute(byte),
            0x20..=0x7E => sink.print(byte as char),
            0xC2..=0xDF => self.begin_utf8(byte, 1, 0x1F, sink),
            0xE0..=0xEF => self.begin_utf8(byte, 2, 0x0F, sink),
            0xF0..=0xF4 => self.begin_utf8(byte, 3, 0x07, sink),
            _ => {
                sink.report_error(ParseError::InvalidUtf8 { lead: byte });
                sink.print('\u{FFFD}');
            }
        }
    }

    fn begin_utf8(&mut self, lead: u8, remaining: u8, mask: u8, sink: &mut dyn ParserSink) {
        self.utf8_remaining = remaining;
        self.utf8_value = (lead & mask) as u32;
        self.utf8_resume = ResumeAfterUtf8::Ground;
        self.state = State::Utf8Continuation;
        let _ = sink;
    }

    fn in_utf8_continuation(&mut self, byte: u8, sink: &mut dyn ParserSink) {
        if byte & 0xC0 != 0x80 {
            sink.report_error(ParseError::InvalidUtf8 { lead: byte });
            sink.print('\u{FFFD}');
            self.state = State::Ground;
            // The byte that broke continuation may itself start something new.
            self.in_ground(byte, sink);
            return;
        }
        self.utf8_value = (self.utf8_value << 6) | (byte & 0x3F) as u32;
        self.utf8_remaining -= 1;
        if self.utf8_remaining == 0 {
            let ResumeAfterUtf8::Ground = self.utf8_resume;
            self.state = State::Ground;
            match char::from_u32(self.utf8_value) {
                Some(ch) => sink.print(ch),
                None => {
                    sink.report_error(ParseError::InvalidUtf8 { lead: byte });
                    sink.print('\u{FFFD}');
                }
            }
        }
    }

    // ---- Escape ----------------------------------------------------------

    fn in_escape(&mut self, byte: u8, sink: &mut dyn ParserSink) {
        match byte {
            0x00..=0x17 | 0x19 | 0x1C..=0x1F => sink.execute(byte),
            b'[' => {
                self.sequence.category = Some(Category::Csi);
                self.state = State::CsiEntry;
            }
            b']' => {
                self.sequence.category = Some(Category::Osc);
                self.pending_st = false;
                self.state = State::OscString;
            }
            b'P' => {
                self.sequence.category = Some(Category::Dcs);
                self.state = State::DcsEntry;
            }
            b'X' => {
                self.sequence.category = Some(Category::Sos);
                self.pending_st = false;
                self.state = State::SosPmApcString;
            }
            b'^' => {
                self.sequence.category = Some(Category::Pm);
                self.pending_st = false;
                self.state = State::SosPmApcString;
            }
            b'_' => {
                self.sequence.category = Some(Category::Apc);
                self.pending_st = false;
                self.state = State::SosPmApcString;
            }
            0x20..=0x2F => {
                self.sequence.intermediates.push(byte);
                self.state = State::EscapeIntermediate;
            }
            0x30..=0x7E => {
                self.sequence.final_byte = Some(byte);
                sink.esc_dispatch(&self.sequence);
                self.state = State::Ground;
            }
            _ => self.abort_to_ground(),
        }
    }

    fn in_escape_intermediate(&mut self, byte: u8, sink: &mut dyn ParserSink) {
        match byte {
            0x00..=0x17 | 0x19 | 0x1C..=0x1F => sink.execute(byte),
            0x20..=0x2F => self.sequence.intermediates.push(byte),
            0x30..=0x7E => {
                self.sequence.final_byte = Some(byte);
                sink.esc_dispatch(&self.sequence);
                self.state = State::Ground;
            }
            _ => self.abort_to_ground(),
        }
    }

    // ---- CSI ---------------------------------------------------------------

    fn in_csi_param(&mut self, byte: u8, sink: &mut dyn ParserSink) {
        match byte {
            0x00..=0x17 | 0x19 | 0x1C..=0x1F => sink.execute(byte),
            b'0'..=b'9' => {
                self.sequence.params.push_digit(byte - b'0');
                self.state = State::CsiParam;
            }
            b';' => {
                self.sequence.params.next_param();
                self.state = State::CsiParam;
            }
            b':' => {
                self.sequence.params.next_subparam();
                self.state = State::CsiParam;
            }
            b'<' | b'=' | b'>' | b'?' if self.sequence.params.is_empty() => {
                self.sequence.leader = Some(byte);
                self.sequence.params.set_leader(byte);
                self.state = State::CsiParam;
            }
            0x20..=0x2F => {
                self.sequence.intermediates.push(byte);
                self.state = State::CsiIntermediate;
            }
            0x40..=0x7E => {
                self.sequence.final_byte = Some(byte);
                sink.csi_dispatch(&self.sequence);
                self.state = State::Ground;
            }
            _ => {
                sink.report_error(ParseError::MalformedParameter { description: "unexpected byte in CSI parameter position" });
                self.state = State::CsiIgnore;
            }
        }
    }

    fn in_csi_intermediate(&mut self, byte: u8, sink: &mut dyn ParserSink) {
        match byte {
            0x00..=0x17 | 0x19 | 0x1C..=0x1F => sink.execute(byte),
            0x20..=0x2F => self.sequence.intermediates.push(byte),
            0x40..=0x7E => {
                self.sequence.final_byte = Some(byte);
                sink.csi_dispatch(&self.sequence);
                self.state = State::Ground;
            }
            _ => {
                sink.report_error(ParseError::MalformedParameter { description: "parameter byte after CSI intermediate" });
                self.state = State::CsiIgnore;
            }
        }
    }

    fn in_csi_ignore(&mut self, byte: u8) {
        if let 0x40..=0x7E = byte {
            self.abort_to_ground();
        }
    }

    // ---- DCS -----------------------------------------------------------

    fn in_dcs_param(&mut self, byte: u8, sink: &mut dyn ParserSink) {
        match byte {
            b'0'..=b'9' => {
                self.sequence.params.push_digit(byte - b'0');
                self.state = State::DcsParam;
            }
            b';' => {
                self.sequence.params.next_param();
                self.state = State::DcsParam;
            }
            b':' => {
                self.sequence.params.next_subparam();
                self.state = State::DcsParam;
            }
            b'<' | b'=' | b'>' | b'?' if self.sequence.params.is_empty() => {
                self.sequence.leader = Some(byte);
                self.sequence.params.set_leader(byte);
                self.state = State::DcsParam;
            }
            0x20..=0x2F => {
                self.sequence.intermediates.push(byte);
                self.state = State::DcsIntermediate;
            }
            0x40..=0x7E => {
                self.sequence.final_byte = Some(byte);
                sink.dcs_hook(&self.sequence);
                self.pending_st = false;
                self.state = State::DcsPassthrough;
            }
            _ => {
                sink.report_error(ParseError::MalformedParameter { description: "unexpected byte in DCS parameter position" });
                self.state = State::DcsIgnore;
            }
        }
    }

    fn in_dcs_intermediate(&mut self, byte: u8, sink: &mut dyn ParserSink) {
        match byte {
            0x20..=0x2F => self.sequence.intermediates.push(byte),
            0x40..=0x7E => {
                self.sequence.final_byte = Some(byte);
                sink.dcs_hook(&self.sequence);
                self.pending_st = false;
                self.state = State::DcsPassthrough;
            }
            _ => {
                sink.report_error(ParseError::MalformedParameter { description: "parameter byte after DCS intermediate" });
                self.state = State::DcsIgnore;
            }
        }
    }

    fn in_dcs_ignore(&mut self, byte: u8) {
        if byte == 0x1B {
            self.pending_st = true;
        } else if self.pending_st && byte == b'\\' {
            self.abort_to_ground();
        } else {
            self.pending_st = false;
        }
    }

    fn in_dcs_passthrough(&mut self, byte: u8, sink: &mut dyn ParserSink) {
        if self.pending_st {
            self.pending_st = false;
            if byte == b'\\' {
                sink.dcs_unhook();
                self.state = State::Ground;
                return;
            }
            // Not a real ST: the ESC was itself passthrough data, replay both.
            sink.dcs_put(0x1B);
        }
        if byte == 0x1B {
            self.pending_st = true;
        } else if matches!(byte, 0x18 | 0x1A) {
            sink.dcs_unhook();
            self.abort_to_ground();
        } else {
            sink.dcs_put(byte);
        }
    }

    // ---- OSC / SOS / PM / APC -------------------------------------------

    fn in_osc_string(&mut self, byte: u8, sink: &mut dyn ParserSink) {
        match byte {
            0x07 => {
                sink.osc_dispatch(&self.sequence);
                self.state = State::Ground;
            }
            0x1B => self.pending_st = true,
            b'\\' if self.pending_st => {
                sink.osc_dispatch(&self.sequence);
                self.state = State::Ground;
            }
            _ => {
                if self.pending_st {
                    self.sequence.text.push(0x1B);
                    self.pending_st = false;
                }
                self.sequence.text.push(byte);
            }
        }
    }

    fn in_sos_pm_apc_string(&mut self, byte: u8) {
        match byte {
            0x1B => self.pending_st = true,
            b'\\' if self.pending_st => self.abort_to_ground(),
            _ => {
                if self.pending_st {
                    self.sequence.text.push(0x1B);
                    self.pending_st = false;
                }
                self.sequence.text.push(byte);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        prints: String,
        csi: Vec<(Option<u8>, Vec<u8>, Vec<u16>, u8)>,
        executed: Vec<u8>,
    }

    impl ParserSink for Recorder {
        fn print(&mut self, ch: char) {
            self.prints.push(ch);
        }
        fn execute(&mut self, c0: u8) {
            self.executed.push(c0);
        }
        fn csi_dispatch(&mut self, seq: &Sequence) {
            let params = seq.params.iter().map(|g| g.first().copied().unwrap_or(0)).collect();
            self.csi.push((seq.leader, seq.intermediates.clone(), params, seq.final_byte.unwrap()));
        }
        fn esc_dispatch(&mut self, _seq: &Sequence) {}
        fn osc_dispatch(&mut self, _seq: &Sequence) {}
        fn dcs_hook(&mut self, _seq: &Sequence) {}
        fn dcs_put(&mut self, _byte: u8) {}
        fn dcs_unhook(&mut self) {}
    }

    #[test]
    fn prints_ascii() {
        let mut p = ByteParser::new();
        let mut r = Recorder::default();
        p.parse(b"hello", &mut r);
        assert_eq!(r.prints, "hello");
    }

    #[test]
    fn decodes_utf8_multibyte() {
        let mut p = ByteParser::new();
        let mut r = Recorder::default();
        p.parse("héllo→".as_bytes(), &mut r);
        assert_eq!(r.prints, "héllo→");
    }

    #[test]
    fn replaces_invalid_utf8_with_replacement_char() {
        let mut p = ByteParser::new();
        let mut r = Recorder::default();
        p.parse(&[0xFFu8, b'A'], &mut r);
        assert_eq!(r.prints, "\u{FFFD}A");
    }

    #[test]
    fn parses_csi_with_params_and_leader() {
        let mut p = ByteParser::new();
        let mut r = Recorder::default();
        p.parse(b"\x1b[?25h", &mut r);
        assert_eq!(r.csi, vec![(Some(b'?'), vec![], vec![25], b'h')]);
    }

    #[test]
    fn multi_param_csi() {
        let mut p = ByteParser::new();
        let mut r = Recorder::default();
        p.parse(b"\x1b[2;3H", &mut r);
        assert_eq!(r.csi, vec![(None, vec![], vec![2, 3], b'H')]);
    }

    #[test]
    fn executes_c0_and_recovers_from_cancel_mid_csi() {
        let mut p = ByteParser::new();
        let mut r = Recorder::default();
        p.parse(b"\x1b[3;\x18A", &mut r);
        assert_eq!(r.executed, vec![0x18]);
        assert!(r.csi.is_empty());
        assert_eq!(r.prints, "A");
    }

    #[test]
    fn malformed_csi_is_swallowed_without_dispatch() {
        let mut p = ByteParser::new();
        let mut r = Recorder::default();
        // DEL mid-parameter-list is invalid; the whole sequence is swallowed
        // up to its final byte without a dispatch, and parsing recovers.
        p.parse(b"\x1b[1\x7fgarbage\x1b[5A", &mut r);
        assert_eq!(r.csi.len(), 1);
        assert_eq!(r.csi[0], (None, vec![], vec![5], b'A'));
    }
}
