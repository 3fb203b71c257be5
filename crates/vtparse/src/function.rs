//! Control-function catalogue and lookup table.
//!
//! A completed [`Sequence`] is addressed by `(category, leader, intermediates,
//! final_byte)`, keying a static table on the raw escape shape rather than
//! building a parse tree; the handler side (`vtengine::Screen`) only ever sees
//! a resolved [`Function`] plus the sequence's parameters.

use crate::sequence::{Category, Sequence};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    // C0
    Bell,
    Backspace,
    Tab,
    LineFeed,
    VerticalTab,
    FormFeed,
    CarriageReturn,
    ShiftOut,
    ShiftIn,

    // Cursor movement
    CursorUp,
    CursorDown,
    CursorForward,
    CursorBackward,
    CursorNextLine,
    CursorPrecedingLine,
    CursorHorizontalAbsolute,
    CursorPosition,
    VerticalPositionAbsolute,
    HorizontalPositionAbsolute,
    HorizontalPositionRelative,
    HorizontalVerticalPosition,

    // Editing
    EraseInDisplay,
    EraseInLine,
    InsertCharacter,
    DeleteCharacter,
    InsertLine,
    DeleteLine,
    EraseCharacter,

    // DEC rectangular area operations
    SelectiveEraseInDisplay,
    SelectiveEraseInLine,
    SelectiveEraseRectangularArea,
    ChangeAttributesInRectangularArea,
    CopyRectangularArea,
    EraseRectangularArea,
    FillRectangularArea,

    // Scrolling
    ScrollUp,
    ScrollDown,
    ReverseIndex,
    Index,
    NextLine,
    BackIndex,
    ForwardIndex,

    // Margins and page layout
    SetTopBottomMargins,
    SetLeftRightMargins,
    SetColumnsPerPage,
    SetLinesPerScreen,

    // Modes
    SetMode,
    ResetMode,
    SaveModes,
    RestoreModes,
    RequestMode,

    // Graphics rendition
    SelectGraphicRendition,

    // Device status / identification
    PrimaryDeviceAttributes,
    SecondaryDeviceAttributes,
    TertiaryDeviceAttributes,
    DeviceStatusReport,
    ExtendedCursorPosition,
    RequestStatusString,
    RequestPresentationStateReport,

    // Cursor appearance / protection
    SetCursorStyle,
    SelectCharacterProtection,
    SoftReset,
    FullReset,
    ScreenAlignmentTest,
    SaveCursor,
    RestoreCursor,

    // OSC family
    Hyperlink,
    SetIconAndWindowTitle,
    SetWindowTitle,
    SetCurrentWorkingDirectory,
    Notify,
    ClipboardAccess,
    SetForegroundColor,
    SetBackgroundColor,
    SetCursorColor,
    SetColorPaletteEntry,
    ResetColorPaletteEntry,
    ResetForegroundColor,

    // Images
    Sixel,

    // Misc DCS / terminal introspection
    RequestTerminfoCapability,
    StatusLineProtocol,
    WindowManipulation,
    SetGraphicsAttributes,

    Unknown,
}

type Key = (Category, Option<u8>, &'static [u8], u8);

macro_rules! table {
    ($(($cat:expr, $leader:expr, $imm:expr, $fin:expr) => $f:expr,)*) => {
        &[$((($cat, $leader, $imm, $fin), $f)),*]
    };
}

static FUNCTION_TABLE: &[(Key, Function)] = table! {
    (Category::Csi, None, b"", b'A') => Function::CursorUp,
    (Category::Csi, None, b"", b'B') => Function::CursorDown,
    (Category::Csi, None, b"", b'C') => Function::CursorForward,
    (Category::Csi, None, b"", b'D') => Function::CursorBackward,
    (Category::Csi, None, b"", b'E') => Function::CursorNextLine,
    (Category::Csi, None, b"", b'F') => Function::CursorPrecedingLine,
    (Category::Csi, None, b"", b'G') => Function::CursorHorizontalAbsolute,
    (Category::Csi, None, b"", b'H') => Function::CursorPosition,
    (Category::Csi, None, b"", b'f') => Function::HorizontalVerticalPosition,
    (Category::Csi, None, b"", b'd') => Function::VerticalPositionAbsolute,
    (Category::Csi, None, b"", b'`') => Function::HorizontalPositionAbsolute,
    (Category::Csi, None, b"", b'a') => Function::HorizontalPositionRelative,

    (Category::Csi, None, b"", b'J') => Function::EraseInDisplay,
    (Category::Csi, Some(b'?'), b"", b'J') => Function::SelectiveEraseInDisplay,
    (Category::Csi, None, b"", b'K') => Function::EraseInLine,
    (Category::Csi, Some(b'?'), b"", b'K') => Function::SelectiveEraseInLine,
    (Category::Csi, None, b"", b'@') => Function::InsertCharacter,
    (Category::Csi, None, b"", b'P') => Function::DeleteCharacter,
    (Category::Csi, None, b"", b'L') => Function::InsertLine,
    (Category::Csi, None, b"", b'M') => Function::DeleteLine,
    (Category::Csi, None, b"", b'X') => Function::EraseCharacter,

    (Category::Csi, None, b"$", b'{') => Function::SelectiveEraseRectangularArea,
    (Category::Csi, None, b"$", b'r') => Function::ChangeAttributesInRectangularArea,
    (Category::Csi, None, b"$", b'v') => Function::CopyRectangularArea,
    (Category::Csi, None, b"$", b'z') => Function::EraseRectangularArea,
    (Category::Csi, None, b"$", b'x') => Function::FillRectangularArea,

    (Category::Csi, None, b"", b'S') => Function::ScrollUp,
    (Category::Csi, None, b"", b'T') => Function::ScrollDown,

    (Category::Csi, None, b"", b'r') => Function::SetTopBottomMargins,
    (Category::Csi, None, b"", b's') => Function::SetLeftRightMargins,
    (Category::Csi, None, b"$", b'|') => Function::SetColumnsPerPage,
    (Category::Csi, None, b"*", b'|') => Function::SetLinesPerScreen,

    (Category::Csi, None, b"", b'h') => Function::SetMode,
    (Category::Csi, None, b"", b'l') => Function::ResetMode,
    (Category::Csi, Some(b'?'), b"", b'h') => Function::SetMode,
    (Category::Csi, Some(b'?'), b"", b'l') => Function::ResetMode,
    (Category::Csi, Some(b'?'), b"", b's') => Function::SaveModes,
    (Category::Csi, Some(b'?'), b"", b'r') => Function::RestoreModes,
    (Category::Csi, None, b"$", b'p') => Function::RequestMode,
    (Category::Csi, Some(b'?'), b"$", b'p') => Function::RequestMode,

    (Category::Csi, None, b"", b'm') => Function::SelectGraphicRendition,

    (Category::Csi, None, b"", b'c') => Function::PrimaryDeviceAttributes,
    (Category::Csi, Some(b'>'), b"", b'c') => Function::SecondaryDeviceAttributes,
    (Category::Csi, Some(b'='), b"", b'c') => Function::TertiaryDeviceAttributes,
    (Category::Csi, None, b"", b'n') => Function::DeviceStatusReport,
    (Category::Csi, Some(b'?'), b"", b'n') => Function::DeviceStatusReport,
    (Category::Csi, None, b"$", b'w') => Function::RequestPresentationStateReport,
    (Category::Dcs, None, b"$", b'q') => Function::RequestStatusString,

    (Category::Csi, None, b"", b'q') => Function::SetCursorStyle,
    (Category::Csi, None, b"\"", b'q') => Function::SelectCharacterProtection,
    (Category::Csi, None, b"!", b'p') => Function::SoftReset,
    (Category::Csi, None, b"", b'p') => Function::ScreenAlignmentTest,

    (Category::Csi, None, b"", b't') => Function::WindowManipulation,
    (Category::Csi, Some(b'?'), b"", b'S') => Function::SetGraphicsAttributes,
    (Category::Csi, None, b"", b'u') => Function::RestoreCursor,
};

static ESC_TABLE: &[(Option<u8>, &[u8], u8, Function)] = &[
    (None, b"", b'D', Function::Index),
    (None, b"", b'E', Function::NextLine),
    (None, b"", b'M', Function::ReverseIndex),
    (None, b"", b'6', Function::BackIndex),
    (None, b"", b'9', Function::ForwardIndex),
    (None, b"", b'c', Function::FullReset),
    (None, b"", b'7', Function::SaveCursor),
    (None, b"", b'8', Function::RestoreCursor),
    (None, b"#", b'8', Function::ScreenAlignmentTest),
];

/// Look up a finished [`Sequence`]'s function. `Unknown` is a legal,
/// reportable result: unrecognized sequences are dropped silently rather
/// than treated as a parse error.
pub fn resolve(seq: &Sequence) -> Function {
    let Some(final_byte) = seq.final_byte else {
        return Function::Unknown;
    };
    match seq.category {
        Some(Category::Esc) => ESC_TABLE
            .iter()
            .find(|(leader, imm, fin, _)| *leader == seq.leader && *imm == seq.intermediates.as_slice() && *fin == final_byte)
            .map(|(_, _, _, f)| *f)
            .unwrap_or(Function::Unknown),
        Some(cat) => FUNCTION_TABLE
            .iter()
            .find(|((c, leader, imm, fin), _)| *c == cat && *leader == seq.leader && *imm == seq.intermediates.as_slice() && *fin == final_byte)
            .map(|(_, f)| *f)
            .unwrap_or(Function::Unknown),
        None => Function::Unknown,
    }
}

/// C0 control codes handled by `execute()` rather than `csi_dispatch`/`esc_dispatch`.
pub fn c0_function(byte: u8) -> Function {
    match byte {
        0x07 => Function::Bell,
        0x08 => Function::Backspace,
        0x09 => Function::Tab,
        0x0a => Function::LineFeed,
        0x0b => Function::VerticalTab,
        0x0c => Function::FormFeed,
        0x0d => Function::CarriageReturn,
        0x0e => Function::ShiftOut,
        0x0f => Function::ShiftIn,
        _ => Function::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Params;

    fn csi(leader: Option<u8>, intermediates: &[u8], final_byte: u8) -> Sequence {
        Sequence {
            category: Some(Category::Csi),
            leader,
            intermediates: intermediates.to_vec(),
            final_byte: Some(final_byte),
            params: Params::new(),
            text: Vec::new(),
        }
    }

    #[test]
    fn resolves_cursor_up() {
        assert_eq!(resolve(&csi(None, b"", b'A')), Function::CursorUp);
    }

    #[test]
    fn private_leader_distinguishes_functions() {
        assert_eq!(resolve(&csi(None, b"", b'h')), Function::SetMode);
        assert_eq!(resolve(&csi(Some(b'?'), b"", b'h')), Function::SetMode);
        assert_eq!(resolve(&csi(Some(b'?'), b"", b'n')), Function::DeviceStatusReport);
    }

    #[test]
    fn unknown_final_byte_is_unknown_not_an_error() {
        assert_eq!(resolve(&csi(None, b"", b'~')), Function::Unknown);
    }

    #[test]
    fn esc_index_resolves() {
        let seq = Sequence {
            category: Some(Category::Esc),
            leader: None,
            intermediates: vec![],
            final_byte: Some(b'D'),
            params: Params::new(),
            text: Vec::new(),
        };
        assert_eq!(resolve(&seq), Function::Index);
    }
}
