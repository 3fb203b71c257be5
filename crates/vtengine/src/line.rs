//! A single row of the grid, stored either as a dense cell array or, while it
//! still holds uniformly-styled plain text, as a cheap `(attributes, text)`
//! pair.
//!
//! The storage promotes from the cheap `Trivial` form to the dense
//! `Inflated` form on the first write that can't be represented by shared
//! attributes plus plain text (per-cell SGR, a wide character, a hyperlink,
//! a combining mark), and demotes back to `Trivial` when the whole line is
//! cleared.

use bitflags::bitflags;

use crate::cell::Cell;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LineFlags: u8 {
        /// This line's content continues onto the next row (soft wrap, not CR/LF).
        const WRAPPED       = 1 << 0;
        const DOUBLE_WIDTH  = 1 << 1;
        const DOUBLE_HEIGHT_TOP    = 1 << 2;
        const DOUBLE_HEIGHT_BOTTOM = 1 << 3;
    }
}

#[derive(Debug, Clone)]
enum Storage {
    /// All cells share `attributes`; `text` holds one `char` per column,
    /// padded with spaces to `width`. Valid only while nothing has ever
    /// diverged a single cell's style or width from the rest of the line.
    Trivial { attributes: crate::attributes::GraphicsAttributes, text: Vec<char> },
    Inflated(Vec<Cell>),
}

#[derive(Debug, Clone)]
pub struct Line {
    storage: Storage,
    width: usize,
    pub flags: LineFlags,
}

impl Line {
    pub fn blank(width: usize) -> Self {
        Line {
            storage: Storage::Trivial {
                attributes: crate::attributes::GraphicsAttributes::default(),
                text: vec![' '; width],
            },
            width,
            flags: LineFlags::empty(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn get(&self, column: usize) -> Cell {
        match &self.storage {
            Storage::Trivial { attributes, text } => Cell::new(text.get(column).copied().unwrap_or(' '), *attributes),
            Storage::Inflated(cells) => cells.get(column).copied().unwrap_or_default(),
        }
    }

    /// Write `cell` at `column`, promoting to `Inflated` storage the moment
    /// the write would diverge from the trivial line's shared attributes.
    pub fn set(&mut self, column: usize, cell: Cell) {
        if column >= self.width {
            return;
        }
        if let Storage::Trivial { attributes, text } = &mut self.storage {
            let homogeneous =
                cell.attributes == *attributes && cell.width == 1 && !cell.protected && cell.hyperlink_id.is_none() && cell.combining_marks().is_empty();
            if homogeneous {
                text[column] = cell.ch;
                return;
            }
            self.inflate();
        }
        if let Storage::Inflated(cells) = &mut self.storage {
            cells[column] = cell;
        }
    }

    /// Append a combining codepoint to the cluster already written at
    /// `column`, promoting to `Inflated` storage (a trivial line's cells are
    /// plain `char`s and cannot carry a combining tail).
    pub fn push_combining(&mut self, column: usize, mark: char) {
        if column >= self.width {
            return;
        }
        self.inflate();
        if let Storage::Inflated(cells) = &mut self.storage {
            cells[column].push_combining(mark);
        }
    }

    fn inflate(&mut self) {
        if let Storage::Trivial { attributes, text } = &self.storage {
            let cells = text
                .iter()
                .map(|&ch| Cell::new(ch, *attributes))
                .collect();
            self.storage = Storage::Inflated(cells);
        }
    }

    /// Overwrite the whole line with blanks carrying `attributes`, demoting
    /// back to `Trivial` storage (ED/EL's erase path never needs per-cell
    /// divergence).
    pub fn clear(&mut self, attributes: crate::attributes::GraphicsAttributes) {
        self.storage = Storage::Trivial { attributes, text: vec![' '; self.width] };
        self.flags = LineFlags::empty();
    }

    pub fn clear_range(&mut self, range: std::ops::Range<usize>, attributes: crate::attributes::GraphicsAttributes) {
        let blank = Cell::new(' ', attributes);
        for column in range {
            if column < self.width {
                self.set(column, blank);
            }
        }
    }

    pub fn resize(&mut self, new_width: usize) {
        match &mut self.storage {
            Storage::Trivial { text, .. } => text.resize(new_width, ' '),
            Storage::Inflated(cells) => cells.resize(new_width, Cell::default()),
        }
        self.width = new_width;
    }

    pub fn is_blank(&self) -> bool {
        match &self.storage {
            Storage::Trivial { text, .. } => text.iter().all(|&c| c == ' '),
            Storage::Inflated(cells) => cells.iter().all(Cell::is_blank),
        }
    }

    pub fn cells(&self) -> Vec<Cell> {
        (0..self.width).map(|c| self.get(c)).collect()
    }

    pub fn text(&self) -> String {
        match &self.storage {
            Storage::Trivial { text, .. } => text.iter().collect(),
            Storage::Inflated(cells) => cells.iter().filter(|c| !c.is_continuation()).map(Cell::text).collect(),
        }
    }
}
