//! Reduces parser callbacks into addressed [`Function`]s and forwards them to
//! a [`VtSink`].
//!
//! `ByteParser` stays a pure byte-level state machine; `Sequencer` owns the
//! `Sequence`-building and table dispatch on top of it, rather than folding
//! both roles into one parser object that both tracks byte-level state and
//! calls back into a command sink directly.

use crate::function::{c0_function, resolve, Function};
use crate::params::Params;
use crate::sequence::{Category, Sequence};
use crate::sink::ParserSink;
use crate::{ParseError, ANSI_OSC_MAX_LEN};

/// Outcome of dispatching one resolved [`Function`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStatus {
    Ok,
    Unsupported,
    Invalid,
}

/// The `Screen`-side half of dispatch; implemented by `vtengine::Screen`.
pub trait VtSink {
    fn dispatch(&mut self, function: Function, params: &Params, text: &str) -> DispatchStatus;
    fn print(&mut self, ch: char);

    fn report_error(&mut self, _error: ParseError) {}
}

/// Builds [`Sequence`]s out of [`ParserSink`] callbacks and dispatches
/// completed ones to a [`VtSink`].
pub struct Sequencer<S: VtSink> {
    sink: S,
    current: Sequence,
}

impl<S: VtSink> Sequencer<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, current: Sequence::default() }
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

impl<S: VtSink> ParserSink for Sequencer<S> {
    fn print(&mut self, ch: char) {
        self.sink.print(ch);
    }

    fn execute(&mut self, c0: u8) {
        let function = c0_function(c0);
        if function != Function::Unknown {
            self.sink.dispatch(function, &Params::new(), "");
        }
    }

    fn csi_dispatch(&mut self, seq: &Sequence) {
        let function = resolve(seq);
        self.sink.dispatch(function, &seq.params, "");
    }

    fn esc_dispatch(&mut self, seq: &Sequence) {
        let function = resolve(seq);
        self.sink.dispatch(function, &seq.params, "");
    }

    fn osc_dispatch(&mut self, seq: &Sequence) {
        let text = seq.text_str();
        let function = osc_function(&text);
        self.sink.dispatch(function, &seq.params, osc_payload(&text));
    }

    fn dcs_hook(&mut self, seq: &Sequence) {
        self.current = seq.clone();
    }

    fn dcs_put(&mut self, byte: u8) {
        if self.current.text.len() < ANSI_OSC_MAX_LEN {
            self.current.text.push(byte);
        }
    }

    fn dcs_unhook(&mut self) {
        let function = resolve(&self.current);
        let text = self.current.text_str().into_owned();
        self.sink.dispatch(function, &self.current.params, &text);
        self.current.reset();
    }

    fn report_error(&mut self, error: ParseError) {
        self.sink.report_error(error);
    }
}

/// OSC sequences are addressed by their leading numeric code, which
/// `ByteParser` hands over as plain text (`"4;1;rgb:ff/00/00"`).
fn osc_function(text: &str) -> Function {
    let code = text.split(';').next().unwrap_or("");
    match code {
        "0" | "2" => Function::SetIconAndWindowTitle,
        "1" => Function::SetWindowTitle,
        "4" => Function::SetColorPaletteEntry,
        "104" => Function::ResetColorPaletteEntry,
        "7" => Function::SetCurrentWorkingDirectory,
        "8" => Function::Hyperlink,
        "9" => Function::Notify,
        "10" => Function::SetForegroundColor,
        "11" => Function::SetBackgroundColor,
        "12" => Function::SetCursorColor,
        "110" => Function::ResetForegroundColor,
        "52" => Function::ClipboardAccess,
        _ => Function::Unknown,
    }
}

fn osc_payload(text: &str) -> &str {
    match text.find(';') {
        Some(idx) => &text[idx + 1..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byte_parser::ByteParser;

    #[derive(Default)]
    struct Recorder {
        dispatched: Vec<(Function, Vec<u16>, String)>,
        printed: String,
    }

    impl VtSink for Recorder {
        fn dispatch(&mut self, function: Function, params: &Params, text: &str) -> DispatchStatus {
            let values: Vec<u16> = params.iter().map(|g| g[0]).collect();
            self.dispatched.push((function, values, text.to_string()));
            DispatchStatus::Ok
        }

        fn print(&mut self, ch: char) {
            self.printed.push(ch);
        }
    }

    #[test]
    fn cup_dispatches_with_params() {
        let mut parser = ByteParser::new();
        let mut seq = Sequencer::new(Recorder::default());
        parser.parse(b"\x1b[10;20H", &mut seq);
        let r = seq.into_inner();
        assert_eq!(r.dispatched, vec![(Function::CursorPosition, vec![10, 20], String::new())]);
    }

    #[test]
    fn sgr_and_print_interleave() {
        let mut parser = ByteParser::new();
        let mut seq = Sequencer::new(Recorder::default());
        parser.parse(b"\x1b[31mhi", &mut seq);
        let r = seq.into_inner();
        assert_eq!(r.dispatched, vec![(Function::SelectGraphicRendition, vec![31], String::new())]);
        assert_eq!(r.printed, "hi");
    }

    #[test]
    fn osc_hyperlink_splits_code_and_payload() {
        let mut parser = ByteParser::new();
        let mut seq = Sequencer::new(Recorder::default());
        parser.parse(b"\x1b]8;id=1;https://example.com\x1b\\", &mut seq);
        let r = seq.into_inner();
        assert_eq!(r.dispatched[0].0, Function::Hyperlink);
        assert_eq!(r.dispatched[0].2, "id=1;https://example.com");
    }
}
