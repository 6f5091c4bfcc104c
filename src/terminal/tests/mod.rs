//! Terminal emulator tests.
//!
//! Organized by handler category:
//! - cursor: Cursor movement
//! - scroll: Scroll region behavior
//! - editing: Erase/delete operations
//! - style: SGR color/attribute parsing
//! - modes: Cursor visibility and alternate screen

use super::*;

fn row_text(buf: &TerminalBuffer, y: usize) -> String {
    let line: String = (0..buf.width())
        .filter_map(|x| buf.cell(x, y))
        .filter(|c| !c.is_continuation())
        .map(|c| c.char)
        .collect();
    line.trim_end().to_string()
}

fn cell_at(buf: &TerminalBuffer, x: usize, y: usize) -> Cell {
    buf.cell(x, y).expect("cell in range")
}

// ============================================================================
// Printing
// ============================================================================

#[test]
fn prints_plain_text() {
    let mut buf = TerminalBuffer::new(10, 3);
    buf.process("hello");
    assert_eq!(row_text(&buf, 0), "hello");
    assert_eq!(buf.cursor_col(), 5);
}

#[test]
fn crlf_moves_to_next_line() {
    let mut buf = TerminalBuffer::new(10, 3);
    buf.process("one\r\ntwo");
    assert_eq!(row_text(&buf, 0), "one");
    assert_eq!(row_text(&buf, 1), "two");
}

#[test]
fn wraps_at_right_margin() {
    let mut buf = TerminalBuffer::new(4, 3);
    buf.process("abcdef");
    assert_eq!(row_text(&buf, 0), "abcd");
    assert_eq!(row_text(&buf, 1), "ef");
}

#[test]
fn last_column_write_defers_wrap() {
    let mut buf = TerminalBuffer::new(4, 3);
    buf.process("abcd");
    assert_eq!(buf.cursor_row(), 0);
    assert_eq!(buf.cursor_col(), 3);
    buf.process("\r\n");
    assert_eq!(buf.cursor_row(), 1);
}

#[test]
fn wide_char_occupies_two_cells() {
    let mut buf = TerminalBuffer::new(6, 1);
    buf.process("a漢b");
    assert_eq!(cell_at(&buf, 1, 0).char, '漢');
    assert_eq!(cell_at(&buf, 1, 0).width, 2);
    assert!(cell_at(&buf, 2, 0).is_continuation());
    assert_eq!(cell_at(&buf, 3, 0).char, 'b');
}

#[test]
fn overwriting_wide_char_half_clears_pair() {
    let mut buf = TerminalBuffer::new(6, 1);
    buf.process("漢\x1b[2Gx");
    assert_eq!(cell_at(&buf, 0, 0).char, ' ');
    assert_eq!(cell_at(&buf, 1, 0).char, 'x');
    assert_eq!(cell_at(&buf, 1, 0).width, 1);
}

#[test]
fn utf8_split_across_chunks_is_reassembled() {
    let mut buf = TerminalBuffer::new(6, 1);
    let bytes = "é".as_bytes();
    buf.process_bytes(&bytes[..1]);
    buf.process_bytes(&bytes[1..]);
    assert_eq!(cell_at(&buf, 0, 0).char, 'é');
}

// ============================================================================
// Cursor
// ============================================================================

#[test]
fn cup_positions_cursor_one_based() {
    let mut buf = TerminalBuffer::new(10, 5);
    buf.process("\x1b[3;4HX");
    assert_eq!(cell_at(&buf, 3, 2).char, 'X');
}

#[test]
fn relative_moves_clamp_to_grid() {
    let mut buf = TerminalBuffer::new(10, 5);
    buf.process("\x1b[99B\x1b[99C");
    assert_eq!(buf.cursor_row(), 4);
    assert_eq!(buf.cursor_col(), 9);
    buf.process("\x1b[99A\x1b[99D");
    assert_eq!(buf.cursor_row(), 0);
    assert_eq!(buf.cursor_col(), 0);
}

#[test]
fn backspace_and_tab() {
    let mut buf = TerminalBuffer::new(20, 1);
    buf.process("ab\x08c\tZ");
    assert_eq!(row_text(&buf, 0), "ac      Z");
}

#[test]
fn save_and_restore_cursor() {
    let mut buf = TerminalBuffer::new(10, 5);
    buf.process("\x1b[2;2H\x1b7\x1b[5;5H\x1b8X");
    assert_eq!(cell_at(&buf, 1, 1).char, 'X');
}

// ============================================================================
// Scroll
// ============================================================================

#[test]
fn line_feed_at_bottom_scrolls() {
    let mut buf = TerminalBuffer::new(5, 2);
    buf.process("a\r\nb\r\nc");
    assert_eq!(row_text(&buf, 0), "b");
    assert_eq!(row_text(&buf, 1), "c");
}

#[test]
fn scroll_region_confines_scrolling() {
    let mut buf = TerminalBuffer::new(5, 4);
    buf.process("top\x1b[2;3r\x1b[2;1Hx\r\ny\r\nz");
    assert_eq!(row_text(&buf, 0), "top");
    assert_eq!(row_text(&buf, 1), "y");
    assert_eq!(row_text(&buf, 2), "z");
    assert_eq!(row_text(&buf, 3), "");
}

#[test]
fn reverse_index_at_top_scrolls_down() {
    let mut buf = TerminalBuffer::new(5, 3);
    buf.process("a\r\nb\x1b[1;1H\x1bM");
    assert_eq!(row_text(&buf, 0), "");
    assert_eq!(row_text(&buf, 1), "a");
    assert_eq!(row_text(&buf, 2), "b");
}

// ============================================================================
// Editing
// ============================================================================

#[test]
fn erase_display_clears_everything() {
    let mut buf = TerminalBuffer::new(5, 2);
    buf.process("abc\r\ndef\x1b[2J");
    assert_eq!(row_text(&buf, 0), "");
    assert_eq!(row_text(&buf, 1), "");
}

#[test]
fn erase_line_to_end() {
    let mut buf = TerminalBuffer::new(10, 1);
    buf.process("abcdef\x1b[4G\x1b[K");
    assert_eq!(row_text(&buf, 0), "abc");
}

#[test]
fn erase_keeps_current_background() {
    let mut buf = TerminalBuffer::new(4, 1);
    buf.process("\x1b[44m\x1b[2K");
    assert_eq!(cell_at(&buf, 3, 0).style.bg, Color::Indexed(4));
}

#[test]
fn delete_and_insert_chars() {
    let mut buf = TerminalBuffer::new(10, 1);
    buf.process("abcdef\x1b[2G\x1b[2P");
    assert_eq!(row_text(&buf, 0), "adef");
    buf.process("\x1b[2@");
    assert_eq!(row_text(&buf, 0), "a  def");
}

#[test]
fn insert_and_delete_lines() {
    let mut buf = TerminalBuffer::new(5, 3);
    buf.process("a\r\nb\r\nc\x1b[2;1H\x1b[L");
    assert_eq!(row_text(&buf, 1), "");
    assert_eq!(row_text(&buf, 2), "b");
    buf.process("\x1b[M");
    assert_eq!(row_text(&buf, 1), "b");
}

// ============================================================================
// Style
// ============================================================================

#[test]
fn sgr_basic_colors_and_attrs() {
    let mut buf = TerminalBuffer::new(5, 1);
    buf.process("\x1b[1;31;42mX");
    let style = cell_at(&buf, 0, 0).style;
    assert!(style.bold);
    assert_eq!(style.fg, Color::Indexed(1));
    assert_eq!(style.bg, Color::Indexed(2));
}

#[test]
fn sgr_bright_colors_map_to_upper_palette() {
    let mut buf = TerminalBuffer::new(5, 1);
    buf.process("\x1b[91;104mX");
    let style = cell_at(&buf, 0, 0).style;
    assert_eq!(style.fg, Color::Indexed(9));
    assert_eq!(style.bg, Color::Indexed(12));
}

#[test]
fn sgr_256_and_true_color() {
    let mut buf = TerminalBuffer::new(5, 1);
    buf.process("\x1b[38;5;196mA\x1b[48;2;10;20;30mB");
    assert_eq!(cell_at(&buf, 0, 0).style.fg, Color::Indexed(196));
    let b = cell_at(&buf, 1, 0).style;
    assert_eq!(b.fg, Color::Indexed(196));
    assert_eq!(b.bg, Color::Rgb(10, 20, 30));
}

#[test]
fn sgr_colon_true_color() {
    let mut buf = TerminalBuffer::new(5, 1);
    buf.process("\x1b[38:2::1:2:3mA");
    assert_eq!(cell_at(&buf, 0, 0).style.fg, Color::Rgb(1, 2, 3));
}

#[test]
fn sgr_reset_clears_style() {
    let mut buf = TerminalBuffer::new(5, 1);
    buf.process("\x1b[1;7;33mA\x1b[0mB\x1b[4mC\x1b[mD");
    assert!(cell_at(&buf, 1, 0).style.is_plain());
    assert!(cell_at(&buf, 2, 0).style.underline);
    assert!(cell_at(&buf, 3, 0).style.is_plain());
}

// ============================================================================
// Modes
// ============================================================================

#[test]
fn cursor_visibility_mode() {
    let mut buf = TerminalBuffer::new(5, 1);
    assert!(buf.cursor().visible);
    buf.process("\x1b[?25l");
    assert!(!buf.cursor().visible);
    buf.process("\x1b[?25h");
    assert!(buf.cursor().visible);
}

#[test]
fn alternate_screen_restores_primary() {
    let mut buf = TerminalBuffer::new(10, 2);
    buf.process("shell$");
    buf.process("\x1b[?1049h\x1b[HFULLSCREEN");
    assert_eq!(row_text(&buf, 0), "FULLSCREEN");
    buf.process("\x1b[?1049l");
    assert_eq!(row_text(&buf, 0), "shell$");
    assert_eq!(buf.cursor_col(), 6);
}

#[test]
fn resize_keeps_content_and_clamps_cursor() {
    let mut buf = TerminalBuffer::new(10, 5);
    buf.process("hello\x1b[5;10H");
    buf.resize(3, 2);
    assert_eq!(row_text(&buf, 0), "hel");
    assert_eq!(buf.cursor_row(), 1);
    assert_eq!(buf.cursor_col(), 2);
}

#[test]
fn full_reset_clears_screen() {
    let mut buf = TerminalBuffer::new(5, 1);
    buf.process("\x1b[31mabc\x1bc");
    assert_eq!(row_text(&buf, 0), "");
    assert_eq!(buf.cursor_col(), 0);
}
