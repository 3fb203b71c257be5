//! `GraphicsAttributes`: the mutable SGR state a cursor carries and each cell
//! stamps onto its text.
//!
//! Colors and style bits are kept separate: `bitflags!` covers the boolean
//! half of the state (bold, faint, italic, ...) while foreground/background/
//! underline colors and the richer style catalogue `vtparse::sgr` exposes
//! (underline style, blink, frame) get their own fields.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use vtparse::{BlinkStyle, Color, FrameStyle, SgrAttribute, UnderlineStyle};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct StyleFlags: u16 {
        const BOLD        = 1 << 0;
        const FAINT       = 1 << 1;
        const ITALIC      = 1 << 2;
        const INVERSE     = 1 << 3;
        const HIDDEN      = 1 << 4;
        const CROSSED_OUT = 1 << 5;
        const OVERLINE    = 1 << 6;
        /// Marks a cell as the trailing half of a wide character rather than
        /// a glyph of its own; always follows a width-2 cell.
        const WIDE_CHAR_CONTINUATION = 1 << 7;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphicsAttributes {
    pub foreground: Color,
    pub background: Color,
    pub underline_color: Color,
    pub underline: UnderlineStyle,
    pub blink: BlinkStyle,
    pub frame: FrameStyle,
    pub flags: StyleFlags,
}

impl Default for GraphicsAttributes {
    fn default() -> Self {
        Self {
            foreground: Color::Default,
            background: Color::Default,
            underline_color: Color::Default,
            underline: UnderlineStyle::Off,
            blink: BlinkStyle::Off,
            frame: FrameStyle::Off,
            flags: StyleFlags::empty(),
        }
    }
}

impl GraphicsAttributes {
    /// Fold one parsed SGR instruction into this attribute set, in place.
    pub fn apply(&mut self, attr: SgrAttribute) {
        match attr {
            SgrAttribute::Reset => *self = Self::default(),
            SgrAttribute::Bold(on) => self.flags.set(StyleFlags::BOLD, on),
            SgrAttribute::Faint(on) => self.flags.set(StyleFlags::FAINT, on),
            SgrAttribute::Italic(on) => self.flags.set(StyleFlags::ITALIC, on),
            SgrAttribute::Underline(style) => self.underline = style,
            SgrAttribute::UnderlineColor(color) => self.underline_color = color,
            SgrAttribute::Blink(style) => self.blink = style,
            SgrAttribute::Inverse(on) => self.flags.set(StyleFlags::INVERSE, on),
            SgrAttribute::Hidden(on) => self.flags.set(StyleFlags::HIDDEN, on),
            SgrAttribute::CrossedOut(on) => self.flags.set(StyleFlags::CROSSED_OUT, on),
            SgrAttribute::Frame(style) => self.frame = style,
            SgrAttribute::Overline(on) => self.flags.set(StyleFlags::OVERLINE, on),
            SgrAttribute::Foreground(color) => self.foreground = color,
            SgrAttribute::Background(color) => self.background = color,
            SgrAttribute::Font(_) | SgrAttribute::Unsupported(_) => {}
        }
    }

    pub fn apply_all(&mut self, attrs: &[SgrAttribute]) {
        for &a in attrs {
            self.apply(a);
        }
    }

    pub fn swap_fg_bg(self) -> GraphicsAttributes {
        GraphicsAttributes {
            foreground: self.background,
            background: self.foreground,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_clears_everything() {
        let mut a = GraphicsAttributes::default();
        a.apply(SgrAttribute::Bold(true));
        a.apply(SgrAttribute::Foreground(Color::Indexed(1)));
        a.apply(SgrAttribute::Reset);
        assert_eq!(a, GraphicsAttributes::default());
    }

    #[test]
    fn bold_and_faint_are_independent_flags() {
        let mut a = GraphicsAttributes::default();
        a.apply_all(&[SgrAttribute::Bold(true), SgrAttribute::Faint(true)]);
        assert!(a.flags.contains(StyleFlags::BOLD));
        assert!(a.flags.contains(StyleFlags::FAINT));
        a.apply(SgrAttribute::Bold(false));
        assert!(!a.flags.contains(StyleFlags::BOLD));
        assert!(a.flags.contains(StyleFlags::FAINT));
    }

    #[test]
    fn attributes_round_trip_through_json_snapshot() {
        let mut a = GraphicsAttributes::default();
        a.apply_all(&[SgrAttribute::Bold(true), SgrAttribute::Foreground(Color::Rgb(1, 2, 3))]);
        let json = serde_json::to_string(&a).unwrap();
        let restored: GraphicsAttributes = serde_json::from_str(&json).unwrap();
        assert_eq!(a, restored);
    }
}
