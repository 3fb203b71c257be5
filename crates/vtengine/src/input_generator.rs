//! Encodes user input (keyboard, mouse, focus events) into the byte
//! sequences a connected application expects to read back from the pty.
//!
//! Mouse encoding (button/event-type/modifier into X10/VT200/ButtonEvents
//! reports, plus the SGR extended-coordinate form for mode 1006) reads
//! tracking/encoding mode straight out of `ModeState` rather than a separate
//! mouse-state struct. Keyboard encoding (cursor keys honoring DECCKM,
//! function keys, ctrl/alt modifier encoding) follows plain xterm
//! convention.

use crate::modes::{ModeKind, ModeState};
use crate::position::Position;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    #[default]
    None,
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Press,
    Release,
    Motion,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyModifiers {
    fn is_empty(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt
    }

    /// xterm's modifier parameter: 1 + (shift=1 | alt=2 | ctrl=4), omitted entirely when no modifier is held.
    fn code(&self) -> u16 {
        1 + if self.shift { 1 } else { 0 } + if self.alt { 2 } else { 0 } + if self.ctrl { 4 } else { 0 }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub button: MouseButton,
    pub position: Position,
    pub modifiers: KeyModifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tracking {
    Normal,
    ButtonEvent,
    AnyEvent,
}

/// `None` if no mouse tracking mode is enabled, or the event is motion
/// reported under a tracking mode that doesn't want it.
pub fn encode_mouse_event(event: MouseEvent, modes: &ModeState) -> Option<String> {
    let tracking = if modes.get(ModeKind::Dec, 1003) {
        Tracking::AnyEvent
    } else if modes.get(ModeKind::Dec, 1002) {
        Tracking::ButtonEvent
    } else if modes.get(ModeKind::Dec, 1000) {
        Tracking::Normal
    } else {
        return None;
    };
    if event.kind == MouseEventKind::Motion && tracking == Tracking::Normal {
        return None;
    }
    let column = event.position.column as u16 + 1;
    let row = event.position.row as u16 + 1;
    let motion = event.kind == MouseEventKind::Motion;

    if modes.get(ModeKind::Dec, 1006) {
        let cb = sgr_button_code(event.button, event.modifiers, motion);
        let final_char = if event.kind == MouseEventKind::Release { 'm' } else { 'M' };
        Some(format!("\x1b[<{cb};{column};{row}{final_char}"))
    } else {
        let cb = legacy_button_code(event.button, event.kind, event.modifiers, motion);
        let encode = |v: u16| char::from((v.min(223) + 32) as u8);
        Some(format!("\x1b[M{}{}{}", encode(cb), encode(column), encode(row)))
    }
}

pub fn encode_focus_event(focused: bool, modes: &ModeState) -> Option<String> {
    if !modes.get(ModeKind::Dec, 1004) {
        return None;
    }
    Some(if focused { "\x1b[I".to_string() } else { "\x1b[O".to_string() })
}

fn legacy_button_code(button: MouseButton, kind: MouseEventKind, modifiers: KeyModifiers, motion: bool) -> u16 {
    let mut cb: u16 = match kind {
        MouseEventKind::Release => 3,
        _ => base_button_code(button),
    };
    apply_modifiers(&mut cb, modifiers);
    if motion {
        cb |= 32;
    }
    cb
}

fn sgr_button_code(button: MouseButton, modifiers: KeyModifiers, motion: bool) -> u16 {
    let mut cb = base_button_code(button);
    apply_modifiers(&mut cb, modifiers);
    if motion {
        cb |= 32;
    }
    cb
}

fn base_button_code(button: MouseButton) -> u16 {
    match button {
        MouseButton::None | MouseButton::Left => 0,
        MouseButton::Middle => 1,
        MouseButton::Right => 2,
        MouseButton::WheelUp => 64,
        MouseButton::WheelDown => 65,
    }
}

fn apply_modifiers(cb: &mut u16, modifiers: KeyModifiers) {
    if modifiers.shift {
        *cb |= 4;
    }
    if modifiers.alt {
        *cb |= 8;
    }
    if modifiers.ctrl {
        *cb |= 16;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    Function(u8),
}

/// Encode one keypress for the pty, honoring DECCKM (application cursor
/// keys, mode 1) and DECNKM (application keypad, mode 66 in this engine's
/// catalogue) the way xterm does.
pub fn encode_key(key: KeyCode, modifiers: KeyModifiers, modes: &ModeState) -> String {
    let app_cursor = modes.get(ModeKind::Dec, 1);
    match key {
        KeyCode::Char(ch) => encode_char(ch, modifiers),
        KeyCode::Enter => "\r".to_string(),
        KeyCode::Tab => "\t".to_string(),
        KeyCode::Backspace => "\x7f".to_string(),
        KeyCode::Escape => "\x1b".to_string(),
        KeyCode::Up => arrow(app_cursor, 'A', modifiers),
        KeyCode::Down => arrow(app_cursor, 'B', modifiers),
        KeyCode::Right => arrow(app_cursor, 'C', modifiers),
        KeyCode::Left => arrow(app_cursor, 'D', modifiers),
        KeyCode::Home => arrow(app_cursor, 'H', modifiers),
        KeyCode::End => arrow(app_cursor, 'F', modifiers),
        KeyCode::PageUp => tilde(5, modifiers),
        KeyCode::PageDown => tilde(6, modifiers),
        KeyCode::Insert => tilde(2, modifiers),
        KeyCode::Delete => tilde(3, modifiers),
        KeyCode::Function(n) => function_key(n, modifiers),
    }
}

fn encode_char(ch: char, modifiers: KeyModifiers) -> String {
    let body = if modifiers.ctrl && ch.is_ascii_alphabetic() {
        let code = ch.to_ascii_uppercase() as u8 & 0x1f;
        (code as char).to_string()
    } else {
        ch.to_string()
    };
    if modifiers.alt {
        format!("\x1b{body}")
    } else {
        body
    }
}

fn arrow(app_cursor: bool, letter: char, modifiers: KeyModifiers) -> String {
    if modifiers.is_empty() {
        let introducer = if app_cursor { 'O' } else { '[' };
        format!("\x1b{introducer}{letter}")
    } else {
        format!("\x1b[1;{}{letter}", modifiers.code())
    }
}

fn tilde(code: u8, modifiers: KeyModifiers) -> String {
    if modifiers.is_empty() {
        format!("\x1b[{code}~")
    } else {
        format!("\x1b[{code};{}~", modifiers.code())
    }
}

fn function_key(n: u8, modifiers: KeyModifiers) -> String {
    // F1-F4 use the SS3 letter form; F5 and up use the numbered CSI ~ form.
    if (1..=4).contains(&n) {
        let letter = (b'P' + (n - 1)) as char;
        if modifiers.is_empty() {
            format!("\x1bO{letter}")
        } else {
            format!("\x1b[1;{}{letter}", modifiers.code())
        }
    } else {
        let code = match n {
            5 => 15,
            6 => 17,
            7 => 18,
            8 => 19,
            9 => 20,
            10 => 21,
            11 => 23,
            12 => 24,
            _ => return String::new(),
        };
        tilde(code, modifiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modes_with(codes: &[u16]) -> ModeState {
        let mut modes = ModeState::new();
        for &c in codes {
            modes.set(ModeKind::Dec, c, true);
        }
        modes
    }

    #[test]
    fn mouse_press_without_tracking_mode_is_suppressed() {
        let event = MouseEvent { kind: MouseEventKind::Press, button: MouseButton::Left, position: Position::new(0, 0), modifiers: KeyModifiers::default() };
        assert_eq!(encode_mouse_event(event, &ModeState::new()), None);
    }

    #[test]
    fn sgr_mouse_report_encodes_one_based_coordinates() {
        let modes = modes_with(&[1000, 1006]);
        let event = MouseEvent { kind: MouseEventKind::Press, button: MouseButton::Left, position: Position::new(4, 9), modifiers: KeyModifiers::default() };
        assert_eq!(encode_mouse_event(event, &modes), Some("\x1b[<0;5;10M".to_string()));
    }

    #[test]
    fn legacy_release_report_always_uses_button_code_three() {
        let modes = modes_with(&[1000]);
        let event = MouseEvent { kind: MouseEventKind::Release, button: MouseButton::Right, position: Position::new(0, 0), modifiers: KeyModifiers::default() };
        let report = encode_mouse_event(event, &modes).unwrap();
        assert_eq!(report.as_bytes()[3], 3 + 32);
    }

    #[test]
    fn up_arrow_switches_introducer_with_application_cursor_mode() {
        let normal = ModeState::new();
        let mut app = ModeState::new();
        app.set(ModeKind::Dec, 1, true);
        assert_eq!(encode_key(KeyCode::Up, KeyModifiers::default(), &normal), "\x1b[A");
        assert_eq!(encode_key(KeyCode::Up, KeyModifiers::default(), &app), "\x1bOA");
    }

    #[test]
    fn ctrl_letter_produces_control_code() {
        let modifiers = KeyModifiers { ctrl: true, ..Default::default() };
        assert_eq!(encode_key(KeyCode::Char('c'), modifiers, &ModeState::new()), "\x03");
    }
}
