//! ANSI escape code rendering.
//!
//! Re-emits each row's characters with SGR sequences, writing a transition
//! only when the style actually changes between adjacent cells.

use super::{trimmed_len, visible_cells};
use crate::terminal::{CellStyle, Color, Snapshot};

const RESET: &str = "\x1b[0m";

/// Append SGR parameters for a foreground color.
///
/// Palette indices below 16 use the compact 30-37 / 90-97 forms.
/// Returns `false` if the color is the default and nothing was appended.
fn push_fg(color: Color, codes: &mut Vec<String>) -> bool {
    match color {
        Color::Default => return false,
        Color::Indexed(n) if n < 8 => codes.push((30 + n as u16).to_string()),
        Color::Indexed(n) if n < 16 => codes.push((90 + n as u16 - 8).to_string()),
        Color::Indexed(n) => codes.push(format!("38;5;{}", n)),
        Color::Rgb(r, g, b) => codes.push(format!("38;2;{};{};{}", r, g, b)),
    }
    true
}

/// Append SGR parameters for a background color.
///
/// Palette indices below 16 use the compact 40-47 / 100-107 forms.
fn push_bg(color: Color, codes: &mut Vec<String>) -> bool {
    match color {
        Color::Default => return false,
        Color::Indexed(n) if n < 8 => codes.push((40 + n as u16).to_string()),
        Color::Indexed(n) if n < 16 => codes.push((100 + n as u16 - 8).to_string()),
        Color::Indexed(n) => codes.push(format!("48;5;{}", n)),
        Color::Rgb(r, g, b) => codes.push(format!("48;2;{};{};{}", r, g, b)),
    }
    true
}

/// Append SGR parameters for text attributes (bold, dim, italic, underline, reverse).
fn push_attrs(style: &CellStyle, codes: &mut Vec<String>) {
    let attrs = [
        (style.bold, "1"),
        (style.dim, "2"),
        (style.italic, "3"),
        (style.underline, "4"),
        (style.reverse, "7"),
    ];
    codes.extend(
        attrs
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, code)| code.to_string()),
    );
}

/// A single SGR sequence selecting `style` from a reset state.
///
/// Returns an empty string for the plain style.
pub fn sgr_sequence(style: &CellStyle) -> String {
    let mut codes = Vec::new();
    push_attrs(style, &mut codes);
    push_fg(style.fg, &mut codes);
    push_bg(style.bg, &mut codes);
    if codes.is_empty() {
        String::new()
    } else {
        format!("\x1b[{}m", codes.join(";"))
    }
}

/// Render a snapshot as ANSI-escaped text.
///
/// Rows are trimmed exactly like [`render_text`](super::render_text), so
/// removing the escapes yields the plain-text form. Every styled run is
/// closed with a reset, and a styled row always ends reset.
pub fn render_ansi(snapshot: &Snapshot) -> String {
    let mut lines = Vec::with_capacity(snapshot.rows());

    for y in 0..snapshot.rows() {
        let cells = visible_cells(snapshot.row(y));
        let keep = trimmed_len(&cells);
        let mut line = String::with_capacity(keep * 2);
        let mut current = CellStyle::default();

        for cell in &cells[..keep] {
            if cell.style != current {
                if !current.is_plain() {
                    line.push_str(RESET);
                }
                line.push_str(&sgr_sequence(&cell.style));
                current = cell.style;
            }
            line.push(cell.char);
        }

        if !current.is_plain() {
            line.push_str(RESET);
        }
        lines.push(line);
    }

    lines.join("\n")
}
