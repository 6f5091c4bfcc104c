//! Scroll region and scrolling operations.
//!
//! Handles:
//! - Line feed / index at the bottom margin (IND, LF)
//! - Reverse index at the top margin (RI)
//! - Scroll up / down (SU, SD)
//! - Scroll region (DECSTBM)

use crate::terminal::TerminalBuffer;

impl TerminalBuffer {
    /// Move down one line, scrolling the region when at its bottom margin.
    pub(in crate::terminal) fn line_feed(&mut self) {
        self.wrap_pending = false;
        if self.cursor_row == self.scroll_bottom {
            self.scroll_up(1);
        } else if self.cursor_row + 1 < self.height {
            self.cursor_row += 1;
        }
    }

    /// Move up one line, scrolling the region down when at its top margin.
    pub(in crate::terminal) fn reverse_index(&mut self) {
        self.wrap_pending = false;
        if self.cursor_row == self.scroll_top {
            self.scroll_down(1);
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
        }
    }

    /// Shift the scroll region up by `n` lines, blanking the bottom.
    pub(in crate::terminal) fn scroll_up(&mut self, n: usize) {
        let region = self.scroll_bottom - self.scroll_top + 1;
        let n = n.min(region);
        for _ in 0..n {
            self.lines.remove(self.scroll_top);
            let blank = self.blank_line();
            self.lines.insert(self.scroll_bottom, blank);
        }
    }

    /// Shift the scroll region down by `n` lines, blanking the top.
    pub(in crate::terminal) fn scroll_down(&mut self, n: usize) {
        let region = self.scroll_bottom - self.scroll_top + 1;
        let n = n.min(region);
        for _ in 0..n {
            self.lines.remove(self.scroll_bottom);
            let blank = self.blank_line();
            self.lines.insert(self.scroll_top, blank);
        }
    }

    /// DECSTBM. Invalid regions reset to the full screen; the cursor homes.
    pub(in crate::terminal) fn set_scroll_region(&mut self, top: usize, bottom: usize) {
        let bottom = bottom.min(self.height - 1);
        if top < bottom {
            self.scroll_top = top;
            self.scroll_bottom = bottom;
        } else {
            self.scroll_top = 0;
            self.scroll_bottom = self.height - 1;
        }
        self.set_position(0, 0);
    }
}
