//! One screen buffer's worth of terminal state and the control-function
//! operations that mutate it.
//!
//! Implements `vtparse::VtSink`: dispatch arrives here pre-resolved to a
//! [`vtparse::Function`] plus its parameters, and this module is purely
//! responsible for turning that into grid mutation. Side effects a caller
//! needs (replies, title changes, a bell) are queued rather than pushed
//! through a callback, since `Screen` has no reference to whatever owns the
//! PTY or renderer; `Terminal` drains the queues after each feed.

use base64::Engine;
use log::warn;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

use vtparse::{parse_sgr, DispatchStatus, Function, ParseError, Params, VtSink};

use crate::cell::Cell;
use crate::cursor::{Cursor, CursorShape, SavedCursor};
use crate::grid::Grid;
use crate::hyperlink::HyperlinkRegistry;
use crate::image::ImageRegistry;
use crate::line::LineFlags;
use crate::margin::Margins;
use crate::modes::{ModeKind, ModeState};
use crate::position::Position;
use crate::tabstops::TabStops;

pub struct Screen {
    grid: Grid,
    cursor: Cursor,
    saved_cursor: Option<SavedCursor>,
    margins: Margins,
    tabstops: TabStops,
    scrollback_capacity: usize,
    pub modes: ModeState,
    pub hyperlinks: HyperlinkRegistry,
    pub images: ImageRegistry,
    current_hyperlink: Option<u32>,
    origin_mode: bool,
    replies: Vec<String>,
    title: Option<String>,
    bell_pending: bool,
    /// Decoded OSC 52 payload awaiting pickup: the selection letter(s)
    /// (`c` clipboard, `p` primary, ...) and the raw bytes after
    /// base64-decoding. Acting on it (talking to a system clipboard) is the
    /// owner's job; decoding the payload is this crate's.
    clipboard: Option<(String, Vec<u8>)>,
    /// The grapheme cluster (base char plus any combining marks already
    /// folded in) and grid position of the last base cell `print_char`
    /// wrote, so the next incoming codepoint can be tested for a cluster
    /// break against it. Cleared by every non-print dispatch.
    pending_grapheme: String,
    pending_grapheme_pos: Option<Position>,
}

impl Screen {
    pub fn new(columns: usize, rows: usize, scrollback_capacity: usize) -> Self {
        Screen {
            grid: Grid::new(columns, rows, scrollback_capacity),
            cursor: Cursor::default(),
            saved_cursor: None,
            margins: Margins::full(columns, rows),
            tabstops: TabStops::new(columns),
            scrollback_capacity,
            modes: ModeState::new(),
            hyperlinks: HyperlinkRegistry::new(),
            images: ImageRegistry::new(),
            current_hyperlink: None,
            origin_mode: false,
            replies: Vec::new(),
            title: None,
            bell_pending: false,
            clipboard: None,
            pending_grapheme: String::new(),
            pending_grapheme_pos: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Drain pending device replies (DSR/DA/DECRQM answers) queued by the
    /// last `feed` for the caller to write back to the PTY.
    pub fn take_replies(&mut self) -> Vec<String> {
        std::mem::take(&mut self.replies)
    }

    pub fn take_title(&mut self) -> Option<String> {
        self.title.take()
    }

    pub fn take_bell(&mut self) -> bool {
        std::mem::replace(&mut self.bell_pending, false)
    }

    /// Drain a decoded OSC 52 clipboard write, if one arrived since the last
    /// call: the selection letter(s) and the raw decoded bytes.
    pub fn take_clipboard(&mut self) -> Option<(String, Vec<u8>)> {
        self.clipboard.take()
    }

    /// DECSC/DECRC snapshot, used by `Terminal` to preserve cursor state
    /// across a primary/alternate screen swap.
    pub fn save_cursor(&mut self) {
        self.saved_cursor = Some(SavedCursor::capture(&self.cursor, self.origin_mode));
    }

    pub fn restore_cursor(&mut self) {
        if let Some(saved) = self.saved_cursor.clone() {
            saved.restore_into(&mut self.cursor);
            self.origin_mode = saved.origin_mode;
            self.clamp_cursor();
        }
    }

    /// Blank the visible grid and home the cursor, used by `Terminal` when
    /// entering or leaving the alternate screen buffer (modes 1047/1049).
    pub fn clear_all(&mut self) {
        let attributes = self.cursor.attributes;
        self.grid.clear_visible(attributes);
        self.move_cursor(0, 0);
    }

    pub fn resize(&mut self, columns: usize, rows: usize) {
        self.grid.resize(columns, rows);
        self.tabstops.resize(columns);
        self.margins.reset(columns, rows);
        self.cursor.position.column = self.cursor.position.column.min(columns.saturating_sub(1));
        self.cursor.position.row = self.cursor.position.row.min(rows.saturating_sub(1));
    }

    fn columns(&self) -> usize {
        self.grid.columns()
    }

    fn rows(&self) -> usize {
        self.grid.rows()
    }

    /// Top/bottom row a cursor motion is clamped to: the full screen unless
    /// DECOM (origin mode) is set, in which case motions and CUP addressing
    /// are relative to the scroll region.
    fn vertical_bounds(&self) -> (usize, usize) {
        if self.origin_mode {
            (self.margins.top, self.margins.bottom)
        } else {
            (0, self.rows() - 1)
        }
    }

    fn clamp_cursor(&mut self) {
        let (top, bottom) = self.vertical_bounds();
        self.cursor.position.row = self.cursor.position.row.clamp(top, bottom);
        self.cursor.position.column = self.cursor.position.column.min(self.columns().saturating_sub(1));
        self.cursor.pending_wrap = false;
    }

    fn move_cursor(&mut self, column: usize, row: usize) {
        self.cursor.position.column = column.min(self.columns().saturating_sub(1));
        self.cursor.position.row = row;
        self.clamp_cursor();
    }

    fn move_relative(&mut self, dc: isize, dr: isize) {
        let column = (self.cursor.position.column as isize + dc).max(0) as usize;
        let row = (self.cursor.position.row as isize + dr).max(0) as usize;
        self.move_cursor(column, row);
    }

    /// Advance past the bottom margin by scrolling the region up, or past
    /// the grid bottom when outside the region.
    fn line_feed(&mut self) {
        if self.cursor.position.row == self.margins.bottom {
            self.grid
                .scroll_region_up(self.margins.top, self.margins.bottom, self.margins.left, self.margins.right, 1, self.cursor.attributes);
        } else if self.cursor.position.row < self.rows() - 1 {
            self.cursor.position.row += 1;
        }
        self.cursor.pending_wrap = false;
    }

    fn reverse_index(&mut self) {
        if self.cursor.position.row == self.margins.top {
            self.grid
                .scroll_region_down(self.margins.top, self.margins.bottom, self.margins.left, self.margins.right, 1, self.cursor.attributes);
        } else if self.cursor.position.row > 0 {
            self.cursor.position.row -= 1;
        }
        self.cursor.pending_wrap = false;
    }

    /// Grapheme-cluster-aware print: a codepoint that does not start a new
    /// cluster relative to the last printed base character is appended to
    /// that cell as a combining mark instead of occupying a cell of its own.
    fn print_char(&mut self, ch: char) {
        if let Some(pos) = self.pending_grapheme_pos {
            let mut candidate = self.pending_grapheme.clone();
            candidate.push(ch);
            if candidate.graphemes(true).count() == 1 {
                self.grid.row_mut(pos.row).push_combining(pos.column, ch);
                self.pending_grapheme = candidate;
                return;
            }
        }
        let pos = self.write_base_cell(ch);
        self.pending_grapheme = ch.to_string();
        self.pending_grapheme_pos = Some(pos);
    }

    fn write_base_cell(&mut self, ch: char) -> Position {
        let width = UnicodeWidthChar::width(ch).unwrap_or(1).max(1);
        if self.cursor.pending_wrap {
            self.cursor.pending_wrap = false;
            self.grid.row_mut(self.cursor.position.row).flags |= LineFlags::WRAPPED;
            self.line_feed();
            self.cursor.position.column = 0;
        }
        let column = self.cursor.position.column;
        let row = self.cursor.position.row;
        if self.cursor.insert_mode {
            self.shift_right_from(column, width);
        }
        let mut cell = Cell::new(ch, self.cursor.attributes);
        cell.width = width as u8;
        cell.protected = self.cursor.protected;
        cell.hyperlink_id = self.current_hyperlink;
        self.grid.row_mut(row).set(column, cell);
        for extra in 1..width {
            let mut continuation = Cell::default();
            continuation.width = 0;
            continuation.attributes.flags.insert(crate::attributes::StyleFlags::WIDE_CHAR_CONTINUATION);
            self.grid.row_mut(row).set(column + extra, continuation);
        }
        if column + width >= self.columns() {
            self.cursor.pending_wrap = true;
        } else {
            self.cursor.position.column = column + width;
        }
        Position::new(column, row)
    }

    fn shift_right_from(&mut self, column: usize, amount: usize) {
        let row = self.cursor.position.row;
        let right = self.margins.right.max(self.columns().saturating_sub(1));
        self.grid.scroll_region_down(row, row, column, right, amount, self.cursor.attributes);
    }

    /// Blank the half-open `[start, end)` run of `row`, skipping protected
    /// cells when `selective` is set (DECSED/DECSEL honor DECSCA; plain
    /// ED/EL overwrite everything).
    fn erase_run(&mut self, row: usize, start: usize, end: usize, selective: bool) {
        let attrs = self.cursor.attributes;
        for column in start..end.min(self.columns()) {
            if selective && self.grid.row(row).get(column).protected {
                continue;
            }
            self.grid.row_mut(row).set(column, Cell::new(' ', attrs));
        }
    }

    fn erase_row(&mut self, row: usize, selective: bool) {
        if selective {
            self.erase_run(row, 0, self.columns(), true);
        } else {
            self.grid.row_mut(row).clear(self.cursor.attributes);
        }
    }

    fn erase_in_display(&mut self, mode: u16, selective: bool) {
        let (row, col) = (self.cursor.position.row, self.cursor.position.column);
        match mode {
            0 => {
                self.erase_in_line(0, selective);
                for r in (row + 1)..self.rows() {
                    self.erase_row(r, selective);
                }
            }
            1 => {
                for r in 0..row {
                    self.erase_row(r, selective);
                }
                self.erase_run(row, 0, col + 1, selective);
            }
            2 | 3 => {
                if selective {
                    for r in 0..self.rows() {
                        self.erase_row(r, true);
                    }
                } else {
                    self.grid.clear_visible(self.cursor.attributes);
                }
            }
            _ => {}
        }
    }

    fn erase_in_line(&mut self, mode: u16, selective: bool) {
        let (row, col) = (self.cursor.position.row, self.cursor.position.column);
        let width = self.columns();
        match mode {
            0 => self.erase_run(row, col, width, selective),
            1 => self.erase_run(row, 0, col + 1, selective),
            2 => self.erase_row(row, selective),
            _ => {}
        }
    }

    fn insert_characters(&mut self, n: usize) {
        let row = self.cursor.position.row;
        let right = self.margins.right.max(self.columns().saturating_sub(1));
        self.grid.scroll_region_down(row, row, self.cursor.position.column, right, n, self.cursor.attributes);
    }

    fn delete_characters(&mut self, n: usize) {
        let row = self.cursor.position.row;
        let right = self.margins.right.max(self.columns().saturating_sub(1));
        self.grid.scroll_region_up(row, row, self.cursor.position.column, right, n, self.cursor.attributes);
    }

    fn insert_lines(&mut self, n: usize) {
        if !self.margins.contains_row(self.cursor.position.row) {
            return;
        }
        self.grid
            .scroll_region_down(self.cursor.position.row, self.margins.bottom, self.margins.left, self.margins.right, n, self.cursor.attributes);
    }

    fn delete_lines(&mut self, n: usize) {
        if !self.margins.contains_row(self.cursor.position.row) {
            return;
        }
        self.grid
            .scroll_region_up(self.cursor.position.row, self.margins.bottom, self.margins.left, self.margins.right, n, self.cursor.attributes);
    }

    fn erase_characters(&mut self, n: usize) {
        let row = self.cursor.position.row;
        let end = self.cursor.position.column + n;
        self.erase_run(row, self.cursor.position.column, end, false);
    }

    fn copy_rectangle(&mut self, params: &Params) {
        let top = params.get(0, 1).saturating_sub(1) as usize;
        let left = params.get(1, 1).saturating_sub(1) as usize;
        let bottom = params.get(2, 1).saturating_sub(1) as usize;
        let right = params.get(3, 1).saturating_sub(1) as usize;
        let dest_row = params.get(5, 1).saturating_sub(1) as usize;
        let dest_col = params.get(6, 1).saturating_sub(1) as usize;
        if bottom < top || right < left {
            return;
        }
        let mut snapshot = Vec::new();
        for r in top..=bottom.min(self.rows() - 1) {
            let mut cols = Vec::new();
            for c in left..=right.min(self.columns() - 1) {
                cols.push(self.grid.row(r).get(c));
            }
            snapshot.push(cols);
        }
        for (dr, cols) in snapshot.into_iter().enumerate() {
            let target_row = dest_row + dr;
            if target_row >= self.rows() {
                break;
            }
            for (dc, cell) in cols.into_iter().enumerate() {
                let target_col = dest_col + dc;
                if target_col < self.columns() {
                    self.grid.row_mut(target_row).set(target_col, cell);
                }
            }
        }
    }

    fn erase_rectangle(&mut self, params: &Params, fill_char: Option<char>, selective: bool) {
        let top = params.get(0, 1).saturating_sub(1) as usize;
        let left = params.get(1, 1).saturating_sub(1) as usize;
        let bottom = params.get(2, self.rows() as u16).saturating_sub(1) as usize;
        let right = params.get(3, self.columns() as u16).saturating_sub(1) as usize;
        for r in top..=bottom.min(self.rows() - 1) {
            for c in left..=right.min(self.columns() - 1) {
                if selective && self.grid.row(r).get(c).protected {
                    continue;
                }
                let mut cell = Cell::new(' ', self.cursor.attributes);
                if let Some(ch) = fill_char {
                    cell.ch = ch;
                }
                self.grid.row_mut(r).set(c, cell);
            }
        }
    }

    fn change_attributes_in_rectangle(&mut self, params: &Params) {
        let top = params.get(0, 1).saturating_sub(1) as usize;
        let left = params.get(1, 1).saturating_sub(1) as usize;
        let bottom = params.get(2, self.rows() as u16).saturating_sub(1) as usize;
        let right = params.get(3, self.columns() as u16).saturating_sub(1) as usize;
        let mut fake = Params::new();
        for idx in 4..params.len() {
            if idx > 4 {
                fake.next_param();
            }
            for digit in params.get(idx, 0).to_string().chars() {
                fake.push_digit(digit.to_digit(10).unwrap_or(0) as u8);
            }
        }
        let deltas = parse_sgr(&fake);
        for r in top..=bottom.min(self.rows() - 1) {
            for c in left..=right.min(self.columns() - 1) {
                let mut cell = self.grid.row(r).get(c);
                cell.attributes.apply_all(&deltas);
                self.grid.row_mut(r).set(c, cell);
            }
        }
    }

    fn apply_sgr(&mut self, params: &Params) {
        let deltas = parse_sgr(params);
        self.cursor.attributes.apply_all(&deltas);
    }

    fn tab_forward(&mut self) {
        let next = self.tabstops.next_stop(self.cursor.position.column);
        self.cursor.position.column = next.min(self.columns() - 1);
    }

    fn set_mode(&mut self, params: &Params, private: bool, value: bool) {
        for group in params.iter() {
            let code = group.first().copied().unwrap_or(0);
            if private {
                self.modes.set(ModeKind::Dec, code, value);
                if code == 6 {
                    self.origin_mode = value;
                }
            } else {
                self.modes.set(ModeKind::Ansi, code, value);
            }
        }
        self.clamp_cursor();
    }

    fn full_reset(&mut self) {
        let (columns, rows, scrollback) = (self.columns(), self.rows(), self.scrollback_capacity);
        *self = Screen::new(columns, rows, scrollback);
    }

    /// OSC 52: `Pc;Pd` where `Pc` names one or more clipboard selections and
    /// `Pd` is either `?` (a read request, unserviceable without a host
    /// round-trip so we drop it) or the payload base64-encoded.
    fn handle_clipboard_access(&mut self, text: &str) {
        let Some((selection, payload)) = text.split_once(';') else {
            return;
        };
        if payload == "?" {
            return;
        }
        if let Ok(data) = base64::engine::general_purpose::STANDARD.decode(payload) {
            self.clipboard = Some((selection.to_string(), data));
        } else {
            warn!("OSC 52 clipboard payload was not valid base64");
        }
    }

    /// OSC 4: one or more `Pc;spec` pairs setting or querying a sixel color
    /// register. `spec` of `?` queries the register's current value back as
    /// `OSC 4 ; Pc ; rgb:RRRR/GGGG/BBBB ST`.
    fn handle_osc4(&mut self, payload: &str) {
        let mut parts = payload.split(';');
        while let (Some(reg_str), Some(spec)) = (parts.next(), parts.next()) {
            let Ok(register) = reg_str.parse::<u16>() else {
                continue;
            };
            if spec == "?" {
                let (r, g, b) = self.images.color_registers.get(register);
                self.replies.push(format!("\x1b]4;{register};rgb:{r:02x}{r:02x}/{g:02x}{g:02x}/{b:02x}{b:02x}\x1b\\"));
                continue;
            }
            if let Err(e) = apply_color_palette_entry(register, spec, &mut self.images.color_registers) {
                warn!("OSC 4 palette update rejected: {e}");
            }
        }
    }

    /// DECRQTSR (`CSI Ps $ w`) with `Ps == 2`: answer with the active tab
    /// stop set as DECTABSR, `DCS 2 $ u Ds1/Ds2/... ST` (one 1-based column
    /// per stop). Other `Ps` values (color table report) aren't claimed.
    fn report_tab_stops(&mut self, params: &Params) {
        if params.get(0, 0) != 2 {
            return;
        }
        let stops: Vec<String> = (0..self.columns()).filter(|&c| self.tabstops.is_set(c)).map(|c| (c + 1).to_string()).collect();
        self.replies.push(format!("\x1bP2$u{}\x1b\\", stops.join("/")));
    }

    fn screen_alignment_test(&mut self) {
        for r in 0..self.rows() {
            for c in 0..self.columns() {
                self.grid.row_mut(r).set(c, Cell::new('E', Default::default()));
            }
        }
        self.move_cursor(0, 0);
    }

    fn device_status_report(&mut self, params: &Params) {
        let extended = params.leader() == Some(b'?');
        match params.get(0, 0) {
            5 => self.replies.push("\x1b[0n".to_string()),
            6 => {
                let row = self.cursor.position.row + 1;
                let col = self.cursor.position.column + 1;
                if extended {
                    self.replies.push(format!("\x1b[?{row};{col};1R"));
                } else {
                    self.replies.push(format!("\x1b[{row};{col}R"));
                }
            }
            _ => {}
        }
    }
}

impl VtSink for Screen {
    fn dispatch(&mut self, function: Function, params: &Params, text: &str) -> DispatchStatus {
        use Function::*;
        self.pending_grapheme.clear();
        self.pending_grapheme_pos = None;
        match function {
            Bell => self.bell_pending = true,
            Backspace => self.move_relative(-1, 0),
            Tab => self.tab_forward(),
            LineFeed | VerticalTab | FormFeed => self.line_feed(),
            CarriageReturn => self.cursor.position.column = 0,
            ShiftOut | ShiftIn => {}

            CursorUp => self.move_relative(0, -(params.get(0, 1) as isize)),
            CursorDown => self.move_relative(0, params.get(0, 1) as isize),
            CursorForward => self.move_relative(params.get(0, 1) as isize, 0),
            CursorBackward => self.move_relative(-(params.get(0, 1) as isize), 0),
            CursorNextLine => {
                self.move_relative(0, params.get(0, 1) as isize);
                self.cursor.position.column = 0;
            }
            CursorPrecedingLine => {
                self.move_relative(0, -(params.get(0, 1) as isize));
                self.cursor.position.column = 0;
            }
            CursorHorizontalAbsolute => {
                let col = params.get(0, 1).saturating_sub(1) as usize;
                self.move_cursor(col, self.cursor.position.row);
            }
            CursorPosition | HorizontalVerticalPosition => {
                let (top, _) = self.vertical_bounds();
                let row = top + params.get(0, 1).saturating_sub(1) as usize;
                let col = params.get(1, 1).saturating_sub(1) as usize;
                self.move_cursor(col, row);
            }
            VerticalPositionAbsolute => {
                let row = params.get(0, 1).saturating_sub(1) as usize;
                self.move_cursor(self.cursor.position.column, row);
            }
            HorizontalPositionAbsolute => {
                let col = params.get(0, 1).saturating_sub(1) as usize;
                self.move_cursor(col, self.cursor.position.row);
            }
            HorizontalPositionRelative => self.move_relative(params.get(0, 1) as isize, 0),

            EraseInDisplay => self.erase_in_display(params.get(0, 0), false),
            SelectiveEraseInDisplay => self.erase_in_display(params.get(0, 0), true),
            EraseInLine => self.erase_in_line(params.get(0, 0), false),
            SelectiveEraseInLine => self.erase_in_line(params.get(0, 0), true),
            InsertCharacter => self.insert_characters(params.get(0, 1) as usize),
            DeleteCharacter => self.delete_characters(params.get(0, 1) as usize),
            InsertLine => self.insert_lines(params.get(0, 1) as usize),
            DeleteLine => self.delete_lines(params.get(0, 1) as usize),
            EraseCharacter => self.erase_characters(params.get(0, 1) as usize),

            SelectiveEraseRectangularArea => self.erase_rectangle(params, None, true),
            ChangeAttributesInRectangularArea => self.change_attributes_in_rectangle(params),
            CopyRectangularArea => self.copy_rectangle(params),
            EraseRectangularArea => self.erase_rectangle(params, None, false),
            FillRectangularArea => {
                let ch = char::from_u32(params.get(0, b' ' as u16) as u32).unwrap_or(' ');
                self.erase_rectangle(params, Some(ch), false);
            }

            ScrollUp => self
                .grid
                .scroll_region_up(self.margins.top, self.margins.bottom, self.margins.left, self.margins.right, params.get(0, 1) as usize, self.cursor.attributes),
            ScrollDown => self.grid.scroll_region_down(
                self.margins.top,
                self.margins.bottom,
                self.margins.left,
                self.margins.right,
                params.get(0, 1) as usize,
                self.cursor.attributes,
            ),
            ReverseIndex => self.reverse_index(),
            Index => self.line_feed(),
            NextLine => {
                self.line_feed();
                self.cursor.position.column = 0;
            }
            BackIndex => self.move_relative(-1, 0),
            ForwardIndex => self.move_relative(1, 0),

            SetTopBottomMargins => {
                let top = params.get(0, 1).saturating_sub(1) as usize;
                let bottom = if params.len() > 1 { params.get(1, self.rows() as u16) } else { self.rows() as u16 }.saturating_sub(1) as usize;
                self.margins.set_vertical(top, bottom, self.rows());
                self.move_cursor(0, 0);
            }
            SetLeftRightMargins => {
                // Without DECLRMM enabled, `CSI s` is the ANSI.SYS cursor-save
                // form rather than DECSLRM (matches xterm's fallback).
                if !self.modes.get(ModeKind::Dec, 69) {
                    self.save_cursor();
                } else {
                    let left = params.get(0, 1).saturating_sub(1) as usize;
                    let right = if params.len() > 1 { params.get(1, self.columns() as u16) } else { self.columns() as u16 }.saturating_sub(1) as usize;
                    self.margins.set_horizontal(left, right, self.columns());
                    self.move_cursor(0, 0);
                }
            }
            SaveCursor => self.save_cursor(),
            RestoreCursor => self.restore_cursor(),
            SetColumnsPerPage | SetLinesPerScreen => return DispatchStatus::Unsupported,

            SetMode => self.set_mode(params, params.leader() == Some(b'?'), true),
            ResetMode => self.set_mode(params, params.leader() == Some(b'?'), false),
            SaveModes => {
                let codes: Vec<u16> = params.iter().map(|g| g.first().copied().unwrap_or(0)).collect();
                self.modes.save(&codes);
            }
            RestoreModes => {
                let codes: Vec<u16> = params.iter().map(|g| g.first().copied().unwrap_or(0)).collect();
                self.modes.restore(&codes);
            }
            RequestMode => {
                let code = params.get(0, 0);
                let kind = if params.leader() == Some(b'?') { ModeKind::Dec } else { ModeKind::Ansi };
                let status = self.modes.request_status(kind, code);
                let leader = if matches!(kind, ModeKind::Dec) { "?" } else { "" };
                self.replies.push(format!("\x1b[{leader}{code};{status}$y"));
            }

            SelectGraphicRendition => self.apply_sgr(params),

            PrimaryDeviceAttributes => self.replies.push("\x1b[?62;22c".to_string()),
            SecondaryDeviceAttributes => self.replies.push("\x1b[>0;95;0c".to_string()),
            TertiaryDeviceAttributes => self.replies.push("\x1bP!|00000000\x1b\\".to_string()),
            DeviceStatusReport | ExtendedCursorPosition => self.device_status_report(params),
            RequestPresentationStateReport => self.report_tab_stops(params),
            RequestStatusString => return DispatchStatus::Unsupported,

            SetCursorStyle => {
                self.cursor.shape = match params.get(0, 1) {
                    0 | 1 => CursorShape::Block,
                    2 => {
                        self.cursor.blinking = false;
                        CursorShape::Block
                    }
                    3 => CursorShape::Underline,
                    4 => {
                        self.cursor.blinking = false;
                        CursorShape::Underline
                    }
                    5 => CursorShape::Bar,
                    6 => {
                        self.cursor.blinking = false;
                        CursorShape::Bar
                    }
                    _ => self.cursor.shape,
                };
            }
            SelectCharacterProtection => self.cursor.protected = params.get(0, 0) == 1,
            SoftReset => {
                self.cursor = Cursor::default();
                self.margins.reset(self.columns(), self.rows());
                self.origin_mode = false;
            }
            FullReset => self.full_reset(),
            ScreenAlignmentTest => self.screen_alignment_test(),

            Hyperlink => self.current_hyperlink = self.hyperlinks.intern_osc8(text),
            SetIconAndWindowTitle | SetWindowTitle => self.title = Some(text.to_string()),
            SetCurrentWorkingDirectory | Notify => {}
            ClipboardAccess => self.handle_clipboard_access(text),
            SetForegroundColor | SetBackgroundColor | SetCursorColor => {}
            SetColorPaletteEntry => self.handle_osc4(text),
            ResetColorPaletteEntry | ResetForegroundColor => {}

            Sixel => {
                if let Err(e) = self.images.place_sixel(text) {
                    warn!("sixel decode failed: {e}");
                }
            }

            RequestTerminfoCapability | StatusLineProtocol | WindowManipulation | SetGraphicsAttributes => return DispatchStatus::Unsupported,

            Unknown => return DispatchStatus::Invalid,
        }
        DispatchStatus::Ok
    }

    fn print(&mut self, ch: char) {
        self.print_char(ch);
    }

    fn report_error(&mut self, error: ParseError) {
        warn!("parse error: {error}");
    }
}

/// Apply one `Pc;spec` pair from an `OSC 4` payload, where `spec` is
/// `rgb:RR/GG/BB` (hex).
fn apply_color_palette_entry(register: u16, spec: &str, registers: &mut crate::image::ColorRegisters) -> Result<(), crate::error::EngineError> {
    if let Some(hex) = spec.strip_prefix("rgb:") {
        let channels: Vec<&str> = hex.split('/').collect();
        if channels.len() == 3 {
            let parse = |s: &str| u8::from_str_radix(&s[..s.len().min(2)], 16).unwrap_or(0);
            let (r, g, b) = (parse(channels[0]), parse(channels[1]), parse(channels[2]));
            registers.set_rgb_percent(register, r as u16 * 100 / 255, g as u16 * 100 / 255, b as u16 * 100 / 255)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vtparse::{ByteParser, Color, Sequencer};

    fn run(screen: Screen, input: &[u8]) -> Screen {
        let _ = env_logger::try_init();
        let mut seq = Sequencer::new(screen);
        let mut parser = ByteParser::new();
        parser.parse(input, &mut seq);
        seq.into_inner()
    }

    #[test]
    fn autowrap_then_linefeed_wraps_into_next_row() {
        let screen = Screen::new(5, 3, 0);
        let screen = run(screen, b"abcde f");
        assert_eq!(screen.grid().row(0).text(), "abcde");
        assert_eq!(screen.grid().row(1).text().trim_end(), "f");
    }

    #[test]
    fn cup_then_ed_clears_from_cursor() {
        let screen = Screen::new(5, 2, 0);
        let screen = run(screen, b"hello\x1b[1;3Hworld\x1b[1;3H\x1b[J");
        assert_eq!(screen.grid().row(0).text(), "he   ");
    }

    #[test]
    fn decstbm_then_ri_scrolls_region_down() {
        let screen = Screen::new(5, 4, 0);
        let mut screen = run(screen, b"\x1b[2;3r");
        screen.move_cursor(0, 1);
        let mut seq = Sequencer::new(screen);
        let mut parser = ByteParser::new();
        parser.parse(b"x\x1bM", &mut seq);
        let screen = seq.into_inner();
        assert_eq!(screen.grid().row(1).text().trim_end(), "");
        assert_eq!(screen.grid().row(2).text().trim_end(), "x");
    }

    #[test]
    fn truecolor_sgr_round_trips_through_attributes() {
        let screen = Screen::new(5, 1, 0);
        let screen = run(screen, b"\x1b[38;2;10;20;30mX");
        assert_eq!(screen.grid().row(0).get(0).attributes.foreground, Color::Rgb(10, 20, 30));
    }

    #[test]
    fn osc4_palette_set_updates_color_register() {
        let screen = Screen::new(2, 1, 0);
        let screen = run(screen, b"\x1b]4;1;rgb:ff/00/00\x07");
        assert_eq!(screen.images.color_registers.get(1), (255, 0, 0));
    }

    #[test]
    fn osc4_palette_query_round_trips_a_set_value() {
        let mut screen = run(Screen::new(2, 1, 0), b"\x1b]4;1;rgb:ff/00/00\x07");
        screen.dispatch(vtparse::Function::SetColorPaletteEntry, &vtparse::Params::default(), "1;?");
        assert_eq!(screen.take_replies(), vec!["\x1b]4;1;rgb:ff00/0000/0000\x1b\\".to_string()]);
    }

    #[test]
    fn decsca_protects_cells_from_selective_erase() {
        let screen = Screen::new(5, 1, 0);
        let screen = run(screen, b"\x1b[1\"qAB\x1b[0\"q\x1b[1;1H\x1b[?2J");
        assert_eq!(screen.grid().row(0).text(), "AB   ");
    }

    #[test]
    fn device_status_report_queues_cursor_position_reply() {
        let mut screen = run(Screen::new(10, 5, 0), b"\x1b[3;4H");
        let mut p = Params::new();
        p.push_digit(6);
        let status = screen.dispatch(Function::DeviceStatusReport, &p, "");
        assert_eq!(status, DispatchStatus::Ok);
        assert_eq!(screen.take_replies(), vec!["\x1b[3;4R".to_string()]);
    }

    #[test]
    fn osc52_clipboard_write_decodes_base64_payload() {
        let mut screen = run(Screen::new(5, 1, 0), b"\x1b]52;c;aGVsbG8=\x07");
        assert_eq!(screen.take_clipboard(), Some(("c".to_string(), b"hello".to_vec())));
    }

    #[test]
    fn osc52_clipboard_read_request_is_ignored() {
        let mut screen = run(Screen::new(5, 1, 0), b"\x1b]52;c;?\x07");
        assert_eq!(screen.take_clipboard(), None);
    }
}
