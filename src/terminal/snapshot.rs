//! Point-in-time copy of a terminal grid.
//!
//! Renderers never read a live buffer cell by cell: the PTY reader may be
//! writing into it concurrently. Instead the grid is copied once under the
//! lock and every output format is produced from that copy.

use super::{Cell, Cursor, Grid};

/// Owned, immutable copy of a grid's cells and cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
    cursor: Cursor,
}

impl Snapshot {
    /// Copy every cell of `grid`. Missing cells are captured as empty cells.
    pub fn capture<G: Grid + ?Sized>(grid: &G) -> Self {
        let (cols, rows) = grid.dimensions();
        let mut cells = Vec::with_capacity(cols * rows);
        for y in 0..rows {
            for x in 0..cols {
                cells.push(grid.cell(x, y).unwrap_or_default());
            }
        }
        Self {
            cols,
            rows,
            cells,
            cursor: grid.cursor(),
        }
    }

    /// Build a snapshot from explicit rows, padding short rows with empty cells.
    pub fn from_rows(rows: Vec<Vec<Cell>>, cursor: Cursor) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let row_count = rows.len();
        let mut cells = Vec::with_capacity(cols * row_count);
        for mut row in rows {
            row.resize(cols, Cell::default());
            cells.extend(row);
        }
        Self {
            cols,
            rows: row_count,
            cells,
            cursor,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Cells of row `y`; empty when out of range.
    pub fn row(&self, y: usize) -> &[Cell] {
        if y >= self.rows {
            return &[];
        }
        &self.cells[y * self.cols..(y + 1) * self.cols]
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }
}

impl Grid for Snapshot {
    fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x >= self.cols || y >= self.rows {
            return None;
        }
        self.cells.get(y * self.cols + x).copied()
    }

    fn cursor(&self) -> Cursor {
        self.cursor
    }
}
