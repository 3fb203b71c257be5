//! Owns the primary and alternate screen buffers and routes incoming bytes
//! to whichever is active.
//!
//! `TerminalSink` wraps `Screen` to intercept a handful of functions (the
//! alt-screen mode triplet 47/1047/1049) before forwarding everything else
//! through unchanged.

use std::sync::Arc;

use parking_lot::Mutex;
use vtparse::{ByteParser, DispatchStatus, Function, Params, Sequencer, VtSink};

use crate::screen::Screen;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveBuffer {
    Primary,
    Alternate,
}

pub struct Terminal {
    primary: Screen,
    alternate: Screen,
    active: ActiveBuffer,
    parser: ByteParser,
}

impl Terminal {
    pub fn new(columns: usize, rows: usize, scrollback_capacity: usize) -> Self {
        Terminal {
            primary: Screen::new(columns, rows, scrollback_capacity),
            alternate: Screen::new(columns, rows, 0),
            active: ActiveBuffer::Primary,
            parser: ByteParser::new(),
        }
    }

    pub fn active_screen(&self) -> &Screen {
        match self.active {
            ActiveBuffer::Primary => &self.primary,
            ActiveBuffer::Alternate => &self.alternate,
        }
    }

    pub fn active_buffer(&self) -> ActiveBuffer {
        self.active
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        let Terminal { primary, alternate, active, parser } = self;
        let sink = TerminalSink { primary, alternate, active };
        let mut sequencer = Sequencer::new(sink);
        parser.parse(bytes, &mut sequencer);
    }

    pub fn resize(&mut self, columns: usize, rows: usize) {
        self.primary.resize(columns, rows);
        self.alternate.resize(columns, rows);
    }

    pub fn take_replies(&mut self) -> Vec<String> {
        self.active_mut().take_replies()
    }

    pub fn take_title(&mut self) -> Option<String> {
        self.active_mut().take_title()
    }

    pub fn take_bell(&mut self) -> bool {
        self.active_mut().take_bell()
    }

    pub fn take_clipboard(&mut self) -> Option<(String, Vec<u8>)> {
        self.active_mut().take_clipboard()
    }

    fn active_mut(&mut self) -> &mut Screen {
        match self.active {
            ActiveBuffer::Primary => &mut self.primary,
            ActiveBuffer::Alternate => &mut self.alternate,
        }
    }
}

/// A `Terminal` shared between a PTY reader thread and a renderer thread via
/// `Arc<Mutex<..>>`. The lock is meant to be held for the duration of one
/// input chunk or one render snapshot, not across a whole session.
#[derive(Clone)]
pub struct SharedTerminal {
    inner: Arc<Mutex<Terminal>>,
}

impl SharedTerminal {
    pub fn new(columns: usize, rows: usize, scrollback_capacity: usize) -> Self {
        SharedTerminal {
            inner: Arc::new(Mutex::new(Terminal::new(columns, rows, scrollback_capacity))),
        }
    }

    pub fn feed(&self, bytes: &[u8]) {
        self.inner.lock().feed(bytes);
    }

    pub fn lock(&self) -> parking_lot::MutexGuard<'_, Terminal> {
        self.inner.lock()
    }
}

/// A transient view over `Terminal`'s two buffers, constructed fresh for
/// each `feed` call so the borrow checker sees the disjoint field borrows.
struct TerminalSink<'a> {
    primary: &'a mut Screen,
    alternate: &'a mut Screen,
    active: &'a mut ActiveBuffer,
}

impl<'a> TerminalSink<'a> {
    fn active_mut(&mut self) -> &mut Screen {
        match *self.active {
            ActiveBuffer::Primary => self.primary,
            ActiveBuffer::Alternate => self.alternate,
        }
    }

    /// `save_cursor`/`clear_on_enable` model the difference between mode 47
    /// (bare buffer swap), 1047 (swap + clear), and 1049 (swap + clear +
    /// cursor save/restore), matching xterm's documented behavior for each.
    fn switch_buffer(&mut self, enable: bool, save_cursor: bool, clear_on_enable: bool) {
        match (*self.active, enable) {
            (ActiveBuffer::Primary, true) => {
                if save_cursor {
                    self.primary.save_cursor();
                }
                *self.active = ActiveBuffer::Alternate;
                if clear_on_enable {
                    self.alternate.clear_all();
                }
            }
            (ActiveBuffer::Alternate, false) => {
                if clear_on_enable {
                    self.alternate.clear_all();
                }
                *self.active = ActiveBuffer::Primary;
                if save_cursor {
                    self.primary.restore_cursor();
                }
            }
            _ => {}
        }
    }

    fn intercept_mode(&mut self, function: Function, params: &Params) {
        if params.leader() != Some(b'?') {
            return;
        }
        let enable = function == Function::SetMode;
        for group in params.iter() {
            match group.first().copied().unwrap_or(0) {
                47 => self.switch_buffer(enable, false, false),
                1047 => self.switch_buffer(enable, false, true),
                1049 => self.switch_buffer(enable, true, true),
                _ => {}
            }
        }
    }
}

impl<'a> VtSink for TerminalSink<'a> {
    fn dispatch(&mut self, function: Function, params: &Params, text: &str) -> DispatchStatus {
        if matches!(function, Function::SetMode | Function::ResetMode) {
            self.intercept_mode(function, params);
        }
        self.active_mut().dispatch(function, params, text)
    }

    fn print(&mut self, ch: char) {
        self.active_mut().print(ch);
    }

    fn report_error(&mut self, error: vtparse::ParseError) {
        self.active_mut().report_error(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternate_screen_mode_swaps_active_buffer() {
        let mut term = Terminal::new(5, 2, 0);
        term.feed(b"hi");
        assert_eq!(term.active_screen().grid().row(0).text().trim_end(), "hi");

        term.feed(b"\x1b[?1049h");
        assert_eq!(term.active_buffer(), ActiveBuffer::Alternate);
        assert_eq!(term.active_screen().grid().row(0).text().trim_end(), "");

        term.feed(b"\x1b[?1049l");
        assert_eq!(term.active_buffer(), ActiveBuffer::Primary);
        assert_eq!(term.active_screen().grid().row(0).text().trim_end(), "hi");
    }

    #[test]
    fn plain_mode_47_swaps_without_clearing_or_saving_cursor() {
        let mut term = Terminal::new(5, 2, 0);
        term.feed(b"ab\x1b[?47h");
        assert_eq!(term.active_buffer(), ActiveBuffer::Alternate);
        term.feed(b"\x1b[?47l");
        assert_eq!(term.active_screen().grid().row(0).text().trim_end(), "ab");
    }

    #[test]
    fn device_status_report_is_drained_from_the_active_buffer() {
        let mut term = Terminal::new(5, 2, 0);
        term.feed(b"\x1b[6n");
        assert_eq!(term.take_replies(), vec!["\x1b[1;1R".to_string()]);
    }

    #[test]
    fn shared_terminal_is_visible_across_clones() {
        let shared = SharedTerminal::new(5, 1, 0);
        let reader = shared.clone();
        reader.feed(b"hi");
        assert_eq!(shared.lock().active_screen().grid().row(0).text().trim_end(), "hi");
    }
}
