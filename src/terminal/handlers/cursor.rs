//! Cursor movement and positioning.
//!
//! Handles C0 cursor controls (BS, HT, CR) and the CSI movement family
//! (CUU, CUD, CUF, CUB, CHA, VPA, CUP), plus DECSC/DECRC save and restore.

use crate::terminal::{SavedCursor, TerminalBuffer};

const TAB_WIDTH: usize = 8;

impl TerminalBuffer {
    pub(in crate::terminal) fn move_up(&mut self, n: usize) {
        // Movement stops at the scroll margin when starting inside the region.
        let limit = if self.cursor_row >= self.scroll_top {
            self.scroll_top
        } else {
            0
        };
        self.cursor_row = self.cursor_row.saturating_sub(n).max(limit);
        self.wrap_pending = false;
    }

    pub(in crate::terminal) fn move_down(&mut self, n: usize) {
        let limit = if self.cursor_row <= self.scroll_bottom {
            self.scroll_bottom
        } else {
            self.height - 1
        };
        self.cursor_row = (self.cursor_row + n).min(limit);
        self.wrap_pending = false;
    }

    pub(in crate::terminal) fn move_forward(&mut self, n: usize) {
        self.cursor_col = (self.cursor_col + n).min(self.width - 1);
        self.wrap_pending = false;
    }

    pub(in crate::terminal) fn move_back(&mut self, n: usize) {
        self.cursor_col = self.cursor_col.saturating_sub(n);
        self.wrap_pending = false;
    }

    /// Absolute positioning, zero-based and clamped to the grid.
    pub(in crate::terminal) fn set_position(&mut self, row: usize, col: usize) {
        self.cursor_row = row.min(self.height - 1);
        self.cursor_col = col.min(self.width - 1);
        self.wrap_pending = false;
    }

    pub(in crate::terminal) fn set_col(&mut self, col: usize) {
        self.cursor_col = col.min(self.width - 1);
        self.wrap_pending = false;
    }

    pub(in crate::terminal) fn set_row(&mut self, row: usize) {
        self.cursor_row = row.min(self.height - 1);
        self.wrap_pending = false;
    }

    pub(in crate::terminal) fn carriage_return(&mut self) {
        self.cursor_col = 0;
        self.wrap_pending = false;
    }

    pub(in crate::terminal) fn backspace(&mut self) {
        self.cursor_col = self.cursor_col.saturating_sub(1);
        self.wrap_pending = false;
    }

    pub(in crate::terminal) fn tab(&mut self) {
        let next = (self.cursor_col / TAB_WIDTH + 1) * TAB_WIDTH;
        self.cursor_col = next.min(self.width - 1);
    }

    pub(in crate::terminal) fn save_cursor(&mut self) {
        self.saved_cursor = Some(SavedCursor {
            row: self.cursor_row,
            col: self.cursor_col,
            style: self.style,
        });
    }

    /// Restore the saved cursor, or home it when nothing was saved.
    pub(in crate::terminal) fn restore_cursor(&mut self) {
        let saved = self.saved_cursor.unwrap_or(SavedCursor {
            row: 0,
            col: 0,
            style: Default::default(),
        });
        self.set_position(saved.row, saved.col);
        self.style = saved.style;
    }
}
