//! Erase, insert and delete operations.
//!
//! Handles ED, EL, ECH, ICH, DCH, IL and DL. Erased cells take the current
//! background color.

use crate::terminal::{Cell, TerminalBuffer};

impl TerminalBuffer {
    /// ED: 0 = cursor to end, 1 = start to cursor, 2/3 = whole screen.
    pub(in crate::terminal) fn erase_display(&mut self, mode: usize) {
        let blank = Cell::blank(self.erase_style());
        match mode {
            0 => {
                self.erase_line(0);
                for line in self.lines.iter_mut().skip(self.cursor_row + 1) {
                    line.fill(blank);
                }
            }
            1 => {
                self.erase_line(1);
                for line in self.lines.iter_mut().take(self.cursor_row) {
                    line.fill(blank);
                }
            }
            2 | 3 => {
                for line in &mut self.lines {
                    line.fill(blank);
                }
            }
            _ => {}
        }
    }

    /// EL: 0 = cursor to end, 1 = start to cursor, 2 = whole line.
    pub(in crate::terminal) fn erase_line(&mut self, mode: usize) {
        let blank = Cell::blank(self.erase_style());
        let col = self.cursor_col;
        let line = &mut self.lines[self.cursor_row];
        match mode {
            0 => line[col..].fill(blank),
            1 => line[..=col].fill(blank),
            2 => line.fill(blank),
            _ => {}
        }
        self.wrap_pending = false;
    }

    /// ECH: blank `n` cells starting at the cursor without moving it.
    pub(in crate::terminal) fn erase_chars(&mut self, n: usize) {
        let blank = Cell::blank(self.erase_style());
        let start = self.cursor_col;
        let end = (start + n).min(self.width);
        self.lines[self.cursor_row][start..end].fill(blank);
    }

    /// ICH: shift the rest of the line right, inserting blanks.
    pub(in crate::terminal) fn insert_chars(&mut self, n: usize) {
        let blank = Cell::blank(self.erase_style());
        let col = self.cursor_col;
        let width = self.width;
        let line = &mut self.lines[self.cursor_row];
        let n = n.min(width - col);
        line.truncate(width - n);
        for _ in 0..n {
            line.insert(col, blank);
        }
    }

    /// DCH: remove `n` cells at the cursor, pulling the rest of the line left.
    pub(in crate::terminal) fn delete_chars(&mut self, n: usize) {
        let blank = Cell::blank(self.erase_style());
        let col = self.cursor_col;
        let width = self.width;
        let line = &mut self.lines[self.cursor_row];
        let n = n.min(width - col);
        line.drain(col..col + n);
        line.resize(width, blank);
    }

    /// IL: insert blank lines at the cursor row within the scroll region.
    pub(in crate::terminal) fn insert_lines(&mut self, n: usize) {
        if self.cursor_row < self.scroll_top || self.cursor_row > self.scroll_bottom {
            return;
        }
        let n = n.min(self.scroll_bottom - self.cursor_row + 1);
        for _ in 0..n {
            self.lines.remove(self.scroll_bottom);
            let blank = self.blank_line();
            self.lines.insert(self.cursor_row, blank);
        }
        self.cursor_col = 0;
    }

    /// DL: delete lines at the cursor row within the scroll region.
    pub(in crate::terminal) fn delete_lines(&mut self, n: usize) {
        if self.cursor_row < self.scroll_top || self.cursor_row > self.scroll_bottom {
            return;
        }
        let n = n.min(self.scroll_bottom - self.cursor_row + 1);
        for _ in 0..n {
            self.lines.remove(self.cursor_row);
            let blank = self.blank_line();
            self.lines.insert(self.scroll_bottom, blank);
        }
        self.cursor_col = 0;
    }
}
