//! Virtual terminal emulator module.
//!
//! Provides a VTE-based terminal buffer that turns the byte stream of a PTY
//! into a grid of styled cells, plus the [`Grid`] capability the renderers
//! consume and an owned [`Snapshot`] of that grid.
//!
//! The emulator covers what shells and common TUI programs need for faithful
//! screenshots. It is not a complete VT implementation; unknown sequences are
//! ignored.

mod handlers;
mod snapshot;
mod types;

#[cfg(test)]
mod tests;

pub use snapshot::Snapshot;
pub use types::{Cell, CellStyle, Color, Cursor};

use unicode_width::UnicodeWidthChar;
use vte::{Params, Perform};

/// Read access to a cell-addressable terminal grid.
///
/// This is the boundary between whatever maintains terminal state and the
/// renderers. Implementors must return `None` for out-of-range coordinates.
pub trait Grid {
    /// Grid size as `(cols, rows)`.
    fn dimensions(&self) -> (usize, usize);
    /// Cell at column `x`, row `y`.
    fn cell(&self, x: usize, y: usize) -> Option<Cell>;
    /// Current cursor position and visibility.
    fn cursor(&self) -> Cursor;
}

/// Cursor state saved by DECSC / CSI s.
#[derive(Debug, Clone, Copy)]
struct SavedCursor {
    row: usize,
    col: usize,
    style: CellStyle,
}

/// Virtual terminal buffer.
pub struct TerminalBuffer {
    width: usize,
    height: usize,
    lines: Vec<Vec<Cell>>,
    cursor_row: usize,
    cursor_col: usize,
    cursor_visible: bool,
    /// Set after printing into the last column; the next print wraps first.
    wrap_pending: bool,
    style: CellStyle,
    scroll_top: usize,
    /// Inclusive bottom row of the scroll region.
    scroll_bottom: usize,
    saved_cursor: Option<SavedCursor>,
    /// Primary screen kept aside while the alternate screen is active.
    primary: Option<Vec<Vec<Cell>>>,
    parser: vte::Parser,
}

impl TerminalBuffer {
    /// Create an empty buffer of `width` columns by `height` rows.
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            lines: vec![vec![Cell::default(); width]; height],
            cursor_row: 0,
            cursor_col: 0,
            cursor_visible: true,
            wrap_pending: false,
            style: CellStyle::default(),
            scroll_top: 0,
            scroll_bottom: height - 1,
            saved_cursor: None,
            primary: None,
            parser: vte::Parser::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cursor_row(&self) -> usize {
        self.cursor_row
    }

    pub fn cursor_col(&self) -> usize {
        self.cursor_col
    }

    /// Feed UTF-8 text through the emulator.
    pub fn process(&mut self, data: &str) {
        self.process_bytes(data.as_bytes());
    }

    /// Feed raw PTY bytes through the emulator.
    ///
    /// Multi-byte characters split across calls are reassembled by the parser.
    pub fn process_bytes(&mut self, bytes: &[u8]) {
        let mut parser = std::mem::replace(&mut self.parser, vte::Parser::new());
        {
            let mut performer = TerminalPerformer { buffer: self };
            parser.advance(&mut performer, bytes);
        }
        self.parser = parser;
    }

    /// Take a point-in-time copy of the visible grid.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    /// Resize the grid, keeping the top-left content.
    pub fn resize(&mut self, width: usize, height: usize) {
        let width = width.max(1);
        let height = height.max(1);
        for line in &mut self.lines {
            line.resize(width, Cell::default());
        }
        self.lines.resize(height, vec![Cell::default(); width]);
        if let Some(primary) = self.primary.as_mut() {
            for line in primary.iter_mut() {
                line.resize(width, Cell::default());
            }
            primary.resize(height, vec![Cell::default(); width]);
        }
        self.width = width;
        self.height = height;
        self.scroll_top = 0;
        self.scroll_bottom = height - 1;
        self.cursor_row = self.cursor_row.min(height - 1);
        self.cursor_col = self.cursor_col.min(width - 1);
        self.wrap_pending = false;
    }

    /// Full reset (RIS).
    fn reset(&mut self) {
        *self = Self::new(self.width, self.height);
    }

    fn blank_line(&self) -> Vec<Cell> {
        vec![Cell::blank(self.erase_style()); self.width]
    }

    /// Erased cells keep the current background, like xterm.
    fn erase_style(&self) -> CellStyle {
        CellStyle {
            bg: self.style.bg,
            ..CellStyle::default()
        }
    }

    fn print(&mut self, c: char) {
        let char_width = c.width().unwrap_or(0);
        // Combining marks and other zero-width code points are dropped.
        if char_width == 0 || char_width > self.width {
            return;
        }

        if self.wrap_pending || self.cursor_col + char_width > self.width {
            self.cursor_col = 0;
            self.wrap_pending = false;
            self.line_feed();
        }

        let row = self.cursor_row;
        let col = self.cursor_col;
        self.clear_wide_pair(row, col);
        self.lines[row][col] = Cell {
            char: c,
            width: char_width as u8,
            style: self.style,
        };
        if char_width == 2 {
            self.clear_wide_pair(row, col + 1);
            self.lines[row][col + 1] = Cell::continuation(self.style);
        }

        let next = col + char_width;
        if next >= self.width {
            self.cursor_col = self.width - 1;
            self.wrap_pending = true;
        } else {
            self.cursor_col = next;
        }
    }

    /// Break up a wide character when one of its halves is overwritten.
    fn clear_wide_pair(&mut self, row: usize, col: usize) {
        let cell = self.lines[row][col];
        if cell.is_continuation() && col > 0 {
            self.lines[row][col - 1] = Cell::blank(cell.style);
        } else if cell.width == 2 && col + 1 < self.width {
            self.lines[row][col + 1] = Cell::blank(cell.style);
        }
    }

    fn set_private_mode(&mut self, mode: u16, enable: bool) {
        match mode {
            25 => self.cursor_visible = enable,
            47 | 1047 => self.switch_screen(enable),
            1049 if enable => {
                self.save_cursor();
                self.switch_screen(true);
            }
            1049 => {
                self.switch_screen(false);
                self.restore_cursor();
            }
            _ => tracing::trace!(mode, enable, "Unhandled private mode"),
        }
    }

    fn switch_screen(&mut self, alternate: bool) {
        match (alternate, self.primary.is_some()) {
            (true, false) => {
                let blank = vec![vec![Cell::default(); self.width]; self.height];
                self.primary = Some(std::mem::replace(&mut self.lines, blank));
            }
            (false, true) => {
                if let Some(primary) = self.primary.take() {
                    self.lines = primary;
                }
            }
            _ => {}
        }
    }
}

impl Grid for TerminalBuffer {
    fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.lines.get(y).and_then(|line| line.get(x)).copied()
    }

    fn cursor(&self) -> Cursor {
        Cursor {
            col: self.cursor_col,
            row: self.cursor_row,
            visible: self.cursor_visible,
        }
    }
}

/// Owned copy of the parameter list; colon subparameters stay grouped.
fn collect_params(params: &Params) -> Vec<Vec<u16>> {
    params.iter().map(|p| p.to_vec()).collect()
}

/// Parameter `idx` with 0 or missing treated as `default`.
fn param_or(params: &[Vec<u16>], idx: usize, default: usize) -> usize {
    match params.get(idx).and_then(|p| p.first()) {
        Some(0) | None => default,
        Some(&v) => v as usize,
    }
}

/// `vte::Perform` adapter that applies parsed actions to a buffer.
struct TerminalPerformer<'a> {
    buffer: &'a mut TerminalBuffer,
}

impl Perform for TerminalPerformer<'_> {
    fn print(&mut self, c: char) {
        self.buffer.print(c);
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            0x08 => self.buffer.backspace(),
            0x09 => self.buffer.tab(),
            0x0a..=0x0c => self.buffer.line_feed(),
            0x0d => self.buffer.carriage_return(),
            _ => {}
        }
    }

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], ignore: bool, action: char) {
        if ignore {
            return;
        }
        let params = collect_params(params);
        let buf = &mut *self.buffer;

        if intermediates.first() == Some(&b'?') {
            if matches!(action, 'h' | 'l') {
                for p in &params {
                    if let Some(&mode) = p.first() {
                        buf.set_private_mode(mode, action == 'h');
                    }
                }
            }
            return;
        }
        if !intermediates.is_empty() {
            return;
        }

        match action {
            'A' => buf.move_up(param_or(&params, 0, 1)),
            'B' | 'e' => buf.move_down(param_or(&params, 0, 1)),
            'C' | 'a' => buf.move_forward(param_or(&params, 0, 1)),
            'D' => buf.move_back(param_or(&params, 0, 1)),
            'E' => {
                buf.move_down(param_or(&params, 0, 1));
                buf.carriage_return();
            }
            'F' => {
                buf.move_up(param_or(&params, 0, 1));
                buf.carriage_return();
            }
            'G' | '`' => buf.set_col(param_or(&params, 0, 1) - 1),
            'd' => buf.set_row(param_or(&params, 0, 1) - 1),
            'H' | 'f' => buf.set_position(param_or(&params, 0, 1) - 1, param_or(&params, 1, 1) - 1),
            'J' => buf.erase_display(param_or(&params, 0, 0)),
            'K' => buf.erase_line(param_or(&params, 0, 0)),
            'X' => buf.erase_chars(param_or(&params, 0, 1)),
            '@' => buf.insert_chars(param_or(&params, 0, 1)),
            'P' => buf.delete_chars(param_or(&params, 0, 1)),
            'L' => buf.insert_lines(param_or(&params, 0, 1)),
            'M' => buf.delete_lines(param_or(&params, 0, 1)),
            'S' => buf.scroll_up(param_or(&params, 0, 1)),
            'T' => buf.scroll_down(param_or(&params, 0, 1)),
            'r' => {
                let bottom = param_or(&params, 1, buf.height);
                buf.set_scroll_region(param_or(&params, 0, 1) - 1, bottom - 1);
            }
            'm' => buf.apply_sgr(&params),
            's' => buf.save_cursor(),
            'u' => buf.restore_cursor(),
            _ => tracing::trace!(action = %action, "Unhandled CSI sequence"),
        }
    }

    fn esc_dispatch(&mut self, intermediates: &[u8], _ignore: bool, byte: u8) {
        if !intermediates.is_empty() {
            // Character set designation and similar; no effect on the grid.
            return;
        }
        match byte {
            b'7' => self.buffer.save_cursor(),
            b'8' => self.buffer.restore_cursor(),
            b'D' => self.buffer.line_feed(),
            b'E' => {
                self.buffer.carriage_return();
                self.buffer.line_feed();
            }
            b'M' => self.buffer.reverse_index(),
            b'c' => self.buffer.reset(),
            _ => {}
        }
    }
}
