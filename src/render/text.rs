//! Plain-text rendering.

use super::{trimmed_len, visible_cells};
use crate::terminal::Snapshot;

/// One line per row, trailing whitespace trimmed, joined with `\n`.
///
/// Interior spaces are kept and empty rows stay as empty lines, so the
/// output always has exactly `rows` lines.
pub fn render_text(snapshot: &Snapshot) -> String {
    let mut lines = Vec::with_capacity(snapshot.rows());
    for y in 0..snapshot.rows() {
        let cells = visible_cells(snapshot.row(y));
        let keep = trimmed_len(&cells);
        lines.push(cells[..keep].iter().map(|c| c.char).collect::<String>());
    }
    lines.join("\n")
}
