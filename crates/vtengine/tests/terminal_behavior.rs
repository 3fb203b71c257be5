//! End-to-end coverage driving `Terminal`/`Screen` with real byte streams,
//! exercising the invariants and scenarios a complete terminal core needs to
//! hold: autowrap/linefeed interaction, region-scoped scrolling, rectangular
//! copy overlap, palette query round-trips, wrap-spanning search, and the
//! handful of status-reporting sequences (DECRQM, DECTABSR, SGR truecolor in
//! both delimiter forms).

use vtengine::{Position, Terminal};
use vtparse::Color;

fn feed(columns: usize, rows: usize, input: &[u8]) -> Terminal {
    let mut term = Terminal::new(columns, rows, 0);
    term.feed(input);
    term
}

#[test]
fn cursor_position_is_always_clamped_to_the_visible_grid() {
    let mut term = feed(10, 5, b"\x1b[999;999H");
    let screen = term.active_screen();
    assert_eq!(screen.cursor().position, Position::new(9, 4));
    term.feed(b"\x1b[0;0H");
    assert_eq!(term.active_screen().cursor().position, Position::new(0, 0));
}

#[test]
fn autowrap_pending_state_survives_an_explicit_linefeed() {
    // Filling the last column sets pending-wrap without moving the cursor;
    // a hard LF immediately afterward must still only advance one row, not
    // wrap the pending column into a second row itself.
    let term = feed(5, 3, b"abcde\nX");
    let screen = term.active_screen();
    assert_eq!(screen.grid().row(0).text(), "abcde");
    assert_eq!(screen.grid().row(1).get(4).ch, 'X');
    assert_eq!(screen.cursor().position.row, 1);
}

#[test]
fn cup_then_erase_in_display_clears_only_from_the_cursor_onward() {
    let term = feed(5, 2, b"AAAAA\x1b[1;3HBB\x1b[0J");
    let screen = term.active_screen();
    // CUP lands at column 2 (1-based col 3) and "BB" overwrites columns 2-3;
    // ED0 then clears from the cursor (column 4) to the end of the screen.
    assert_eq!(screen.grid().row(0).text(), "AABB ");
    assert_eq!(screen.grid().row(1).text(), "     ");
}

#[test]
fn reverse_index_at_the_top_margin_scrolls_only_the_scroll_region() {
    let term = feed(
        5,
        5,
        b"\x1b[1;1HA\x1b[2;1HB\x1b[3;1HC\x1b[4;1HD\x1b[5;1HE\x1b[2;4r\x1b[2;1H\x1bM",
    );
    let grid = term.active_screen().grid();
    assert_eq!(grid.row(0).text().trim_end(), "A");
    assert_eq!(grid.row(1).text().trim_end(), "");
    assert_eq!(grid.row(2).text().trim_end(), "B");
    assert_eq!(grid.row(3).text().trim_end(), "C");
    assert_eq!(grid.row(4).text().trim_end(), "E");
}

#[test]
fn decrca_copy_blends_an_overlapping_destination_from_a_single_snapshot() {
    // Source rect rows 1-2 / cols 1-2 (1-based) copied to rows 2-3 / cols
    // 2-3, overlapping its own source by one row and column. The copy must
    // read every source cell from one snapshot taken before any write, so
    // the bottom-right destination cell ends up with the source's original
    // bottom-right value rather than a value this same copy just wrote.
    let term = feed(4, 3, b"AB\x1b[2;1HCD\x1b[1;1;2;2;1;2;2$v");
    let grid = term.active_screen().grid();
    assert_eq!(grid.row(1).text(), "CAB ");
    assert_eq!(grid.row(2).text(), " CD ");
}

#[test]
fn osc4_palette_query_returns_the_value_just_set() {
    let mut term = feed(2, 1, b"\x1b]4;1;rgb:ff/00/00\x07");
    term.feed(b"\x1b]4;1;?\x07");
    assert_eq!(term.take_replies(), vec!["\x1b]4;1;rgb:ff00/0000/0000\x1b\\".to_string()]);
}

#[test]
fn search_reverse_finds_a_match_spanning_an_autowrapped_row() {
    // Columns is 3, so "abcd" autowraps after the 3rd column; "cd" ends up
    // split across the wrap boundary ("ab" | "cd" + blank).
    let term = feed(3, 2, b"abcd");
    let grid = term.active_screen().grid();
    assert!(grid.row(0).flags.contains(vtengine::LineFlags::WRAPPED));
    let found = grid.search_reverse("bc", grid.total_rows() - 1).expect("match spanning the wrap");
    assert_eq!(grid.resolve_match(found), Position::new(1, 0));
}

#[test]
fn sgr_truecolor_parses_both_semicolon_and_colon_delimited_forms() {
    let term = feed(4, 1, b"\x1b[38;2;10;20;30mA\x1b[38:2::40:50:60mB");
    let grid = term.active_screen().grid();
    assert_eq!(grid.row(0).get(0).attributes.foreground, Color::Rgb(10, 20, 30));
    assert_eq!(grid.row(0).get(1).attributes.foreground, Color::Rgb(40, 50, 60));
}

#[test]
fn decrqm_reports_set_reset_and_unrecognized_status_codes() {
    // DECTCEM (cursor visible) defaults on: Set.
    let mut term = feed(10, 3, b"\x1b[?25$p");
    assert_eq!(term.take_replies(), vec!["\x1b[?25;1$y".to_string()]);
    // Turning it off and re-querying reports Reset.
    term.feed(b"\x1b[?25l\x1b[?25$p");
    assert_eq!(term.take_replies(), vec!["\x1b[?25;2$y".to_string()]);
    // A code outside the known DEC mode catalogue reports NotRecognized.
    term.feed(b"\x1b[?9999$p");
    assert_eq!(term.take_replies(), vec!["\x1b[?9999;0$y".to_string()]);
}

#[test]
fn dectabsr_reports_the_default_tab_stop_set() {
    let mut term = feed(20, 3, b"\x1b[2$w");
    assert_eq!(term.take_replies(), vec!["\x1bP2$u9/17\x1b\\".to_string()]);
}

#[test]
fn wide_character_writes_an_explicitly_flagged_continuation_cell() {
    let term = feed(4, 1, "\u{4e2d}X".as_bytes());
    let grid = term.active_screen().grid();
    let base = grid.row(0).get(0);
    let continuation = grid.row(0).get(1);
    assert_eq!(base.width, 2);
    assert!(!base.is_continuation());
    assert!(continuation.is_continuation());
    assert_eq!(grid.row(0).get(2).ch, 'X');
}
