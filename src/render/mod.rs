//! Snapshot renderers.
//!
//! Every renderer is a pure function of a [`Snapshot`] and [`RenderOptions`]:
//! - text: characters only, trailing whitespace trimmed per row
//! - ansi: the same characters with minimal SGR transitions
//! - svg: a monospace vector document with cursor overlay
//!
//! Rendering the same snapshot twice always yields identical output.

mod ansi;
mod svg;
mod text;

pub use ansi::{render_ansi, sgr_sequence};
pub use svg::{render_svg, xml_escape, CHAR_WIDTH_RATIO, LINE_HEIGHT_RATIO, PADDING};
pub use text::render_text;

use crate::terminal::{Cell, Snapshot};
use crate::theme::{default_theme, Theme};

pub const DEFAULT_FONT_SIZE: f64 = 14.0;
pub const DEFAULT_FONT_FAMILY: &str = "Hack, Monaco, Courier, monospace";

/// Options shared by all renderers.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: &'static Theme,
    pub font_size: f64,
    pub font_family: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

impl RenderOptions {
    pub fn with_theme(theme: &'static Theme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }
}

/// All textual representations of one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub ansi: String,
    pub svg: String,
}

/// Render `snapshot` into every textual format at once.
pub fn render(snapshot: &Snapshot, options: &RenderOptions) -> Rendered {
    Rendered {
        text: render_text(snapshot),
        ansi: render_ansi(snapshot),
        svg: render_svg(snapshot, options),
    }
}

/// Cells of a row that start a character, skipping wide-char continuations.
fn visible_cells(row: &[Cell]) -> Vec<&Cell> {
    row.iter().filter(|c| !c.is_continuation()).collect()
}

/// Number of leading cells kept once trailing whitespace is trimmed.
///
/// Text and ANSI output share this so stripping the escapes from the ANSI
/// form gives back the text form exactly.
fn trimmed_len(cells: &[&Cell]) -> usize {
    cells
        .iter()
        .rposition(|c| !c.char.is_whitespace())
        .map_or(0, |i| i + 1)
}
