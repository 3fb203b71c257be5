//! Cursor position plus the SCO/DEC "saved cursor" snapshot.
//!
//! Carries position, graphics attributes, insert-mode, visibility, and
//! shape, plus the origin-mode-relative positioning and pending-wrap state
//! DECOM/DECAWM need.

use crate::attributes::GraphicsAttributes;
use crate::position::Position;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CursorShape {
    #[default]
    Block,
    Underline,
    Bar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    pub position: Position,
    pub attributes: GraphicsAttributes,
    pub insert_mode: bool,
    pub visible: bool,
    pub blinking: bool,
    pub shape: CursorShape,
    /// DECSCA: marks every cell this cursor subsequently writes as protected.
    pub protected: bool,
    /// Sticky "past the last column" state autowrap needs: set when a print
    /// lands exactly on the last column, consumed by the next print or
    /// explicit motion.
    pub pending_wrap: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor {
            position: Position::default(),
            attributes: GraphicsAttributes::default(),
            insert_mode: false,
            visible: true,
            blinking: true,
            shape: CursorShape::Block,
            protected: false,
            pending_wrap: false,
        }
    }
}

impl Cursor {
    pub fn reset(&mut self) {
        *self = Cursor::default();
    }
}

/// The DECSC/DECRC (and XTSAVE/XTRESTORE) snapshot: cursor position and
/// rendition, plus the origin-mode and character-set state active at save
/// time.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedCursor {
    pub position: Position,
    pub attributes: GraphicsAttributes,
    pub origin_mode: bool,
    pub pending_wrap: bool,
}

impl SavedCursor {
    pub fn capture(cursor: &Cursor, origin_mode: bool) -> Self {
        SavedCursor {
            position: cursor.position,
            attributes: cursor.attributes,
            origin_mode,
            pending_wrap: cursor.pending_wrap,
        }
    }

    pub fn restore_into(&self, cursor: &mut Cursor) {
        cursor.position = self.position;
        cursor.attributes = self.attributes;
        cursor.pending_wrap = self.pending_wrap;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_restore_round_trips_position_and_attributes() {
        let mut cursor = Cursor::default();
        cursor.position = Position::new(5, 2);
        cursor.attributes.foreground = vtparse::Color::Indexed(3);
        let saved = SavedCursor::capture(&cursor, true);

        cursor.position = Position::new(0, 0);
        cursor.attributes = GraphicsAttributes::default();
        saved.restore_into(&mut cursor);

        assert_eq!(cursor.position, Position::new(5, 2));
        assert_eq!(cursor.attributes.foreground, vtparse::Color::Indexed(3));
    }
}
