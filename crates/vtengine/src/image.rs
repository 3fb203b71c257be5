//! Sixel decoding and the registry of images placed into the grid.
//!
//! A `Read`/`ReadColor`/`ReadSize`/`Repeat` state machine decodes the sixel
//! byte stream against a full 256-register color table addressable via
//! `#Pc;Pu;Px;Py;Pz` (RGB-percent and HLS color definitions).

use crate::error::{EngineError, EngineResult};

const MAX_COLOR_REGISTERS: usize = 256;

/// The sixel color-register palette, seeded with the standard VT340
/// 16-color defaults and mutable via `#Pc;2;Pr;Pg;Pb` (RGB, 0-100 scale)
/// or `#Pc;1;Ph;Pl;Ps` (HLS).
#[derive(Debug, Clone)]
pub struct ColorRegisters {
    rgb: Vec<(u8, u8, u8)>,
}

impl Default for ColorRegisters {
    fn default() -> Self {
        let mut rgb = vec![(0, 0, 0); MAX_COLOR_REGISTERS];
        const VT340: [(u8, u8, u8); 16] = [
            (0, 0, 0),
            (51, 51, 204),
            (204, 33, 33),
            (51, 204, 51),
            (204, 51, 204),
            (51, 204, 204),
            (204, 204, 51),
            (136, 136, 136),
            (68, 68, 68),
            (85, 85, 204),
            (221, 85, 85),
            (85, 221, 85),
            (221, 85, 221),
            (85, 221, 221),
            (221, 221, 85),
            (221, 221, 221),
        ];
        for (i, color) in VT340.into_iter().enumerate() {
            rgb[i] = color;
        }
        ColorRegisters { rgb }
    }
}

impl ColorRegisters {
    pub fn set_rgb_percent(&mut self, register: u16, r: u16, g: u16, b: u16) -> EngineResult<()> {
        let idx = self.validate(register)?;
        let scale = |v: u16| ((v.min(100) as u32 * 255 / 100) as u8);
        self.rgb[idx] = (scale(r), scale(g), scale(b));
        Ok(())
    }

    pub fn set_hls(&mut self, register: u16, h: u16, l: u16, s: u16) -> EngineResult<()> {
        let idx = self.validate(register)?;
        self.rgb[idx] = hls_to_rgb(h, l, s);
        Ok(())
    }

    pub fn get(&self, register: u16) -> (u8, u8, u8) {
        self.rgb.get(register as usize).copied().unwrap_or((0, 0, 0))
    }

    fn validate(&self, register: u16) -> EngineResult<usize> {
        if (register as usize) >= MAX_COLOR_REGISTERS {
            return Err(EngineError::PaletteRegisterOutOfRange(register));
        }
        Ok(register as usize)
    }
}

fn hls_to_rgb(h: u16, l: u16, s: u16) -> (u8, u8, u8) {
    let l = l as f32 / 100.0;
    let s = s as f32 / 100.0;
    if s == 0.0 {
        let v = (l * 255.0) as u8;
        return (v, v, v);
    }
    let h = (h as f32) / 360.0;
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let channel = |t: f32| {
        let t = t.rem_euclid(1.0);
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    };
    (channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0))
}

#[derive(Debug, Clone)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decode one `DECSIXEL` payload (the bytes between `DCS` and `ST`) into an
/// RGBA image, using and possibly mutating `registers` for `#` color
/// introducer/definition commands.
pub fn decode_sixel(data: &str, registers: &mut ColorRegisters) -> EngineResult<Image> {
    let chars: Vec<char> = data.chars().collect();
    let mut rows: Vec<Vec<u8>> = Vec::new();
    let mut band_row = 0usize;
    let mut column = 0usize;
    let mut current_register: u16 = 0;
    let mut max_width = 0usize;

    let ensure_row = |rows: &mut Vec<Vec<u8>>, row: usize, width: usize| {
        while rows.len() <= row {
            rows.push(vec![0u8; width.max(1)]);
        }
        if rows[row].len() < width {
            rows[row].resize(width, 0);
        }
    };

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '?'..='~' => {
                let bits = chars[i] as u8 - b'?';
                for bit in 0..6 {
                    let row = band_row * 6 + bit;
                    ensure_row(&mut rows, row, column + 1);
                    if bits & (1 << bit) != 0 {
                        rows[row][column] = current_register as u8;
                    }
                }
                column += 1;
                max_width = max_width.max(column);
                i += 1;
            }
            '!' => {
                i += 1;
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let repeat_count: u32 = chars[start..i].iter().collect::<String>().parse().unwrap_or(1).max(1);
                if i < chars.len() && matches!(chars[i], '?'..='~') {
                    let bits = chars[i] as u8 - b'?';
                    for _ in 0..repeat_count {
                        for bit in 0..6 {
                            let row = band_row * 6 + bit;
                            ensure_row(&mut rows, row, column + 1);
                            if bits & (1 << bit) != 0 {
                                rows[row][column] = current_register as u8;
                            }
                        }
                        column += 1;
                    }
                    max_width = max_width.max(column);
                    i += 1;
                }
            }
            '#' => {
                i += 1;
                let mut params = Vec::new();
                loop {
                    let start = i;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                    params.push(chars[start..i].iter().collect::<String>().parse().unwrap_or(0));
                    if i < chars.len() && chars[i] == ';' {
                        i += 1;
                        continue;
                    }
                    break;
                }
                apply_color_command(&params, registers, &mut current_register)?;
            }
            '$' => {
                column = 0;
                i += 1;
            }
            '-' => {
                band_row += 1;
                column = 0;
                i += 1;
            }
            _ => i += 1,
        }
    }

    let height = rows.len();
    let width = max_width.max(rows.iter().map(Vec::len).max().unwrap_or(0));
    let mut rgba = vec![0u8; width * height * 4];
    for (y, row) in rows.iter().enumerate() {
        for x in 0..width {
            let register = row.get(x).copied().unwrap_or(0) as u16;
            let (r, g, b) = registers.get(register);
            let offset = (y * width + x) * 4;
            rgba[offset] = r;
            rgba[offset + 1] = g;
            rgba[offset + 2] = b;
            rgba[offset + 3] = if register == 0 { 0 } else { 255 };
        }
    }
    Ok(Image { width: width as u32, height: height as u32, rgba })
}

fn apply_color_command(params: &[u16], registers: &mut ColorRegisters, current_register: &mut u16) -> EngineResult<()> {
    let Some(&register) = params.first() else {
        return Ok(());
    };
    *current_register = register;
    if params.len() >= 5 {
        let (system, a, b, c) = (params[1], params[2], params[3], params[4]);
        match system {
            1 => registers.set_hls(register, a, b, c)?,
            _ => registers.set_rgb_percent(register, a, b, c)?,
        }
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct ImageRegistry {
    images: Vec<Image>,
    pub color_registers: ColorRegisters,
}

impl ImageRegistry {
    pub fn new() -> Self {
        ImageRegistry::default()
    }

    pub fn place_sixel(&mut self, data: &str) -> EngineResult<u32> {
        let image = decode_sixel(data, &mut self.color_registers)?;
        let id = self.images.len() as u32;
        self.images.push(image);
        Ok(id)
    }

    pub fn get(&self, id: u32) -> Option<&Image> {
        self.images.get(id as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_sixel_band_decodes_a_solid_column() {
        let mut registers = ColorRegisters::default();
        // "#1" selects register 1, "~" (0x7E-0x3F=0x3F=63, all six bits set).
        let image = decode_sixel("#1~", &mut registers).unwrap();
        assert_eq!(image.height, 6);
        assert_eq!(image.width, 1);
        assert_eq!(image.rgba[3], 255);
    }

    #[test]
    fn repeat_count_expands_width() {
        let mut registers = ColorRegisters::default();
        let image = decode_sixel("#1!3~", &mut registers).unwrap();
        assert_eq!(image.width, 3);
    }

    #[test]
    fn newline_starts_a_new_band() {
        let mut registers = ColorRegisters::default();
        let image = decode_sixel("#1~-#1~", &mut registers).unwrap();
        assert_eq!(image.height, 12);
    }

    #[test]
    fn rgb_color_definition_updates_register() {
        let mut registers = ColorRegisters::default();
        let image = decode_sixel("#2;2;100;0;0~", &mut registers).unwrap();
        assert_eq!(&image.rgba[0..3], &[255, 0, 0]);
    }
}
