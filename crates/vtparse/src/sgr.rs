//! SGR (Select Graphic Rendition) parameter grammar, covering indexed,
//! aixterm-bright, and truecolor colors plus the wider underline-style
//! catalogue and the `:`-delimited sub-parameter form (`38:2::r:g:b`, `4:3`)
//! alongside the classic `;`-delimited one (`38;2;r;g;b`).

use serde::{Deserialize, Serialize};

use crate::params::Params;

/// A terminal color value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Color {
    #[default]
    Default,
    /// No SGR color command has ever targeted this slot (distinct from `Default`,
    /// which means "explicitly reset to the default").
    Undefined,
    /// Standard or aixterm-bright 8-color index, 0..=15 collapsed to Indexed; kept
    /// split from `Bright` only at the SGR-code level (30-37/90-97 vs 40-47/100-107).
    Indexed(u8),
    Bright(u8),
    Rgb(u8, u8, u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnderlineStyle {
    Off,
    Single,
    Double,
    Curly,
    Dotted,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlinkStyle {
    Off,
    Slow,
    Rapid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameStyle {
    Off,
    Framed,
    Encircled,
}

/// One parsed SGR instruction; `Screen::apply_sgr` folds a stream of these
/// into the cursor's `GraphicsAttributes`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SgrAttribute {
    Reset,
    Bold(bool),
    Faint(bool),
    Italic(bool),
    Underline(UnderlineStyle),
    UnderlineColor(Color),
    Blink(BlinkStyle),
    Inverse(bool),
    Hidden(bool),
    CrossedOut(bool),
    Frame(FrameStyle),
    Overline(bool),
    Foreground(Color),
    Background(Color),
    Font(u8),
    Unsupported(u16),
}

const ANSI_COLOR_OFFSETS: [u8; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

/// Parse one complete `CSI ... m` parameter list into a sequence of
/// attribute edits, in order.
pub fn parse_sgr(params: &Params) -> Vec<SgrAttribute> {
    let mut out = Vec::new();
    if params.len() == 0 {
        out.push(SgrAttribute::Reset);
        return out;
    }
    let mut i = 0;
    let len = params.len();
    while i < len {
        let group = params.subparams(i);
        let code = group.first().copied().unwrap_or(0);
        match code {
            0 => out.push(SgrAttribute::Reset),
            1 => out.push(SgrAttribute::Bold(true)),
            2 => out.push(SgrAttribute::Faint(true)),
            3 => out.push(SgrAttribute::Italic(true)),
            4 => out.push(SgrAttribute::Underline(underline_style_from(group.get(1).copied()))),
            5 => out.push(SgrAttribute::Blink(BlinkStyle::Slow)),
            6 => out.push(SgrAttribute::Blink(BlinkStyle::Rapid)),
            7 => out.push(SgrAttribute::Inverse(true)),
            8 => out.push(SgrAttribute::Hidden(true)),
            9 => out.push(SgrAttribute::CrossedOut(true)),
            21 => out.push(SgrAttribute::Underline(UnderlineStyle::Double)),
            22 => {
                out.push(SgrAttribute::Bold(false));
                out.push(SgrAttribute::Faint(false));
            }
            23 => out.push(SgrAttribute::Italic(false)),
            24 => out.push(SgrAttribute::Underline(UnderlineStyle::Off)),
            25 => out.push(SgrAttribute::Blink(BlinkStyle::Off)),
            27 => out.push(SgrAttribute::Inverse(false)),
            28 => out.push(SgrAttribute::Hidden(false)),
            29 => out.push(SgrAttribute::CrossedOut(false)),
            30..=37 => out.push(SgrAttribute::Foreground(Color::Indexed(ANSI_COLOR_OFFSETS[(code - 30) as usize]))),
            38 => {
                let (color, consumed) = parse_extended_color(params, group, i);
                out.push(SgrAttribute::Foreground(color));
                i += consumed;
                continue;
            }
            39 => out.push(SgrAttribute::Foreground(Color::Default)),
            40..=47 => out.push(SgrAttribute::Background(Color::Indexed(ANSI_COLOR_OFFSETS[(code - 40) as usize]))),
            48 => {
                let (color, consumed) = parse_extended_color(params, group, i);
                out.push(SgrAttribute::Background(color));
                i += consumed;
                continue;
            }
            49 => out.push(SgrAttribute::Background(Color::Default)),
            50 => {}
            51 => out.push(SgrAttribute::Frame(FrameStyle::Framed)),
            52 => out.push(SgrAttribute::Frame(FrameStyle::Encircled)),
            53 => out.push(SgrAttribute::Overline(true)),
            54 => out.push(SgrAttribute::Frame(FrameStyle::Off)),
            55 => out.push(SgrAttribute::Overline(false)),
            58 => {
                let (color, consumed) = parse_extended_color(params, group, i);
                out.push(SgrAttribute::UnderlineColor(color));
                i += consumed;
                continue;
            }
            59 => out.push(SgrAttribute::UnderlineColor(Color::Default)),
            90..=97 => out.push(SgrAttribute::Foreground(Color::Bright(ANSI_COLOR_OFFSETS[(code - 90) as usize]))),
            100..=107 => out.push(SgrAttribute::Background(Color::Bright(ANSI_COLOR_OFFSETS[(code - 100) as usize]))),
            10..=19 => out.push(SgrAttribute::Font((code - 10) as u8)),
            other => out.push(SgrAttribute::Unsupported(other)),
        }
        i += 1;
    }
    out
}

fn underline_style_from(sub: Option<u16>) -> UnderlineStyle {
    match sub {
        None | Some(1) => UnderlineStyle::Single,
        Some(0) => UnderlineStyle::Off,
        Some(2) => UnderlineStyle::Double,
        Some(3) => UnderlineStyle::Curly,
        Some(4) => UnderlineStyle::Dotted,
        Some(5) => UnderlineStyle::Dashed,
        Some(_) => UnderlineStyle::Single,
    }
}

/// Parse `38`/`48`/`58` extended color forms, both `:`-subparam
/// (`38:2::r:g:b`, `38:5:n`) and classic `;`-separated (`38;2;r;g;b`,
/// `38;5;n`). Returns `(color, number_of_top_level_params_consumed)`.
fn parse_extended_color(params: &Params, group: &[u16], i: usize) -> (Color, usize) {
    if group.len() > 1 {
        // Colon form: mode is the first sub-parameter.
        return match group.get(1).copied() {
            Some(5) => (Color::Indexed(group.get(2).copied().unwrap_or(0) as u8), 1),
            Some(2) => {
                // 38:2:colorspace:r:g:b — colorspace id is optional/ignored.
                let rest: Vec<u16> = group[2..].to_vec();
                let (r, g, b) = match rest.len() {
                    4 => (rest[1], rest[2], rest[3]),
                    3 => (rest[0], rest[1], rest[2]),
                    _ => (0, 0, 0),
                };
                (Color::Rgb(r as u8, g as u8, b as u8), 1)
            }
            _ => (Color::Undefined, 1),
        };
    }
    // Classic semicolon form spans subsequent top-level parameters.
    match params.get(i + 1, 0) {
        5 => (Color::Indexed(params.get(i + 2, 0) as u8), 3),
        2 => (
            Color::Rgb(params.get(i + 2, 0) as u8, params.get(i + 3, 0) as u8, params.get(i + 4, 0) as u8),
            5,
        ),
        _ => (Color::Undefined, 1),
    }
}
