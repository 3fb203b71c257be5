//! Parser-level error and diagnostic types.
//!
//! A malformed byte is never fatal: the [`ByteParser`](crate::ByteParser) always
//! recovers to `Ground` and reports the problem through [`ParseError`] rather
//! than aborting the stream.

use std::fmt::Display;

/// Severity used when routing a [`ParseError`] to the `log` facade.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorLevel {
    Info = 0,
    Warning = 1,
    Error = 2,
}

impl ErrorLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl Display for ErrorLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recoverable problem observed while decoding the byte stream or building a
/// [`Sequence`](crate::Sequence). Never halts parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A control byte arrived in a state that has no transition for it; the
    /// parser dropped back to `Ground`.
    UnexpectedByte { state: &'static str, byte: u8 },
    /// A UTF-8 continuation sequence was malformed; U+FFFD was substituted.
    InvalidUtf8 { lead: u8 },
    /// A CSI/DCS parameter overflowed or carried an unrecognised private marker.
    MalformedParameter { description: &'static str },
    /// An OSC/DCS/SOS/PM/APC string ran to end-of-input without a terminator.
    UnterminatedString { category: &'static str },
}

impl ParseError {
    pub fn level(&self) -> ErrorLevel {
        match self {
            Self::UnexpectedByte { .. } => ErrorLevel::Warning,
            Self::InvalidUtf8 { .. } => ErrorLevel::Warning,
            Self::MalformedParameter { .. } => ErrorLevel::Error,
            Self::UnterminatedString { .. } => ErrorLevel::Info,
        }
    }
}

impl std::error::Error for ParseError {}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedByte { state, byte } => {
                write!(f, "unexpected byte {} in state {state}", print_byte(*byte))
            }
            Self::InvalidUtf8 { lead } => write!(f, "invalid UTF-8 sequence starting with {}", print_byte(*lead)),
            Self::MalformedParameter { description } => write!(f, "malformed parameter: {description}"),
            Self::UnterminatedString { category } => write!(f, "unterminated {category} string at end of input"),
        }
    }
}

/// Render a byte with its C0 mnemonic for diagnostics, e.g. `0x1B (ESC)`.
pub fn print_byte(byte: u8) -> String {
    const NAMES: [&str; 33] = [
        "NUL", "SOH", "STX", "ETX", "EOT", "ENQ", "ACK", "BEL", "BS", "TAB", "LF", "VT", "FF", "CR", "SO", "SI", "DLE", "DC1", "DC2", "DC3", "DC4", "NAK",
        "SYN", "ETB", "CAN", "EM", "SUB", "ESC", "FS", "GS", "RS", "US", "DEL",
    ];
    match byte {
        0x00..=0x1F => format!("0x{byte:02X} ({})", NAMES[byte as usize]),
        0x20..=0x7E => format!("0x{byte:02X} ('{}')", byte as char),
        0x7F => format!("0x{byte:02X} ({})", NAMES[32]),
        _ => format!("0x{byte:02X}"),
    }
}
