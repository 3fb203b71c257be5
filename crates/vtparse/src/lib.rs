//! Byte-level ECMA-48/DEC/xterm control-sequence parsing.
//!
//! A [`ByteParser`] turns raw bytes into [`ParserSink`] callbacks. A
//! [`Sequencer`] sits on top, accumulating those callbacks into addressed
//! [`Function`]s and forwarding them to a [`VtSink`] — the role
//! `vtengine::Screen` plays for a complete terminal.

mod byte_parser;
mod error;
mod function;
mod params;
mod sequence;
mod sequencer;
mod sgr;
mod sink;

pub use byte_parser::ByteParser;
pub use error::{ErrorLevel, ParseError};
pub use function::{c0_function, resolve, Function};
pub use params::{Params, MAX_PARAMS};
pub use sequence::{Category, Sequence};
pub use sequencer::{DispatchStatus, Sequencer, VtSink};
pub use sgr::{parse_sgr, BlinkStyle, Color, FrameStyle, SgrAttribute, UnderlineStyle};
pub use sink::ParserSink;

/// OSC/DCS string payloads are capped to guard against a hostile or runaway
/// producer holding the parser in one unterminated string state forever.
pub const ANSI_OSC_MAX_LEN: usize = 1 << 20;
