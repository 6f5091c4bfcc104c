//! Terminal data types.
//!
//! Contains the core data structures for representing terminal state:
//! - Color: default, 256-color palette index, or true color
//! - CellStyle: Text attributes (bold, italic, underline, etc.)
//! - Cell: A single character with its display width and style
//! - Cursor: Cursor position and visibility

/// A cell color as stored in the terminal buffer.
///
/// Terminal emulators commonly hand out colors on a single numeric channel
/// (negative = default, 0-255 = palette, larger = packed `0xRRGGBB`).
/// That convention is decoded once via [`Color::from_code`] so the rest of
/// the crate only ever matches on variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Theme default (foreground or background depending on use)
    #[default]
    Default,
    /// 256-color palette index
    Indexed(u8),
    /// 24-bit true color
    Rgb(u8, u8, u8),
}

impl Color {
    /// Decode a numeric color code.
    pub fn from_code(code: i64) -> Self {
        match code {
            c if c < 0 => Color::Default,
            c if c <= 255 => Color::Indexed(c as u8),
            c => {
                let packed = (c & 0x00ff_ffff) as u32;
                Color::Rgb((packed >> 16) as u8, (packed >> 8) as u8, packed as u8)
            }
        }
    }

    /// Encode back into the numeric convention (`-1` for default).
    ///
    /// Returns `None` for true colors at or below `0x0000ff`: their packed
    /// value lands in the palette range and would decode as [`Color::Indexed`].
    pub fn to_code(self) -> Option<i64> {
        match self {
            Color::Default => Some(-1),
            Color::Indexed(n) => Some(n as i64),
            Color::Rgb(r, g, b) => {
                let packed = ((r as i64) << 16) | ((g as i64) << 8) | b as i64;
                (packed > 0xff).then_some(packed)
            }
        }
    }
}

/// Style attributes for a terminal cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellStyle {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
    pub reverse: bool,
}

impl CellStyle {
    /// True when no color or attribute differs from the terminal default.
    pub fn is_plain(&self) -> bool {
        *self == CellStyle::default()
    }
}

/// A single cell in the terminal buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub char: char,
    /// Display width: 1 or 2, or 0 for the trailing half of a wide character
    pub width: u8,
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            char: ' ',
            width: 1,
            style: CellStyle::default(),
        }
    }
}

impl Cell {
    /// Cell occupied by the right half of a wide character.
    pub fn continuation(style: CellStyle) -> Self {
        Self {
            char: ' ',
            width: 0,
            style,
        }
    }

    pub fn is_continuation(&self) -> bool {
        self.width == 0
    }

    /// Blank cell carrying only a style (used by erase operations).
    pub fn blank(style: CellStyle) -> Self {
        Self {
            char: ' ',
            width: 1,
            style,
        }
    }
}

/// Cursor position and visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub col: usize,
    pub row: usize,
    pub visible: bool,
}
