//! The callback surface [`ByteParser`](crate::ByteParser) drives while decoding
//! a stream.
//!
//! The state machine never constructs a `Screen` value itself, it calls back
//! into whatever is listening. Here the listener is always a
//! [`Sequencer`](crate::Sequencer), which is itself generic over a
//! [`VtSink`](crate::VtSink) (the `Screen` side, implemented by `vtengine`).

use crate::{ParseError, Sequence};

pub trait ParserSink {
    fn print(&mut self, ch: char);
    fn execute(&mut self, c0: u8);
    fn csi_dispatch(&mut self, seq: &Sequence);
    fn esc_dispatch(&mut self, seq: &Sequence);
    fn osc_dispatch(&mut self, seq: &Sequence);
    fn dcs_hook(&mut self, seq: &Sequence);
    fn dcs_put(&mut self, byte: u8);
    fn dcs_unhook(&mut self);

    /// Default implementation swallows diagnostics; real sinks route this to `log`.
    fn report_error(&mut self, _error: ParseError) {}
}
