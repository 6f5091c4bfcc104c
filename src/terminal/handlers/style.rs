//! SGR (Select Graphic Rendition) handler.
//!
//! Handles CSI m sequence for text styling:
//! - Reset (0)
//! - Bold, dim, italic, underline, reverse (1-7) and their resets (22-27)
//! - Standard foreground/background colors (30-47)
//! - Extended colors - 256-color mode (38;5;n, 48;5;n)
//! - Extended colors - RGB mode (38;2;r;g;b, 48;2;r;g;b), also colon form
//! - Bright foreground/background colors (90-107)

use crate::terminal::{CellStyle, Color, TerminalBuffer};

impl TerminalBuffer {
    pub(in crate::terminal) fn apply_sgr(&mut self, params: &[Vec<u16>]) {
        if params.is_empty() {
            self.style = CellStyle::default();
            return;
        }

        let mut i = 0;
        while i < params.len() {
            let param = &params[i];
            let code = param.first().copied().unwrap_or(0);
            match code {
                0 => self.style = CellStyle::default(),
                1 => self.style.bold = true,
                2 => self.style.dim = true,
                3 => self.style.italic = true,
                4 => self.style.underline = true,
                7 => self.style.reverse = true,
                22 => {
                    self.style.bold = false;
                    self.style.dim = false;
                }
                23 => self.style.italic = false,
                24 => self.style.underline = false,
                27 => self.style.reverse = false,
                30..=37 => self.style.fg = Color::Indexed((code - 30) as u8),
                39 => self.style.fg = Color::Default,
                40..=47 => self.style.bg = Color::Indexed((code - 40) as u8),
                49 => self.style.bg = Color::Default,
                90..=97 => self.style.fg = Color::Indexed((code - 90 + 8) as u8),
                100..=107 => self.style.bg = Color::Indexed((code - 100 + 8) as u8),
                38 | 48 => {
                    let (color, consumed) = if param.len() > 1 {
                        (extended_color(&param[1..]), 0)
                    } else {
                        let rest: Vec<u16> = params[i + 1..]
                            .iter()
                            .map(|p| p.first().copied().unwrap_or(0))
                            .collect();
                        extended_color_with_len(&rest)
                    };
                    if let Some(color) = color {
                        if code == 38 {
                            self.style.fg = color;
                        } else {
                            self.style.bg = color;
                        }
                    }
                    i += consumed;
                }
                _ => {}
            }
            i += 1;
        }
    }
}

/// Parse `5;n` or `2;r;g;b` from colon subparameters.
fn extended_color(sub: &[u16]) -> Option<Color> {
    match sub {
        [5, n, ..] => Some(Color::Indexed(*n as u8)),
        // Colon form may carry an empty colorspace id: 38:2::r:g:b
        [2, _, r, g, b] | [2, r, g, b] => Some(Color::Rgb(*r as u8, *g as u8, *b as u8)),
        _ => None,
    }
}

/// Parse `5;n` or `2;r;g;b` from the following semicolon parameters,
/// returning how many of them were consumed.
fn extended_color_with_len(rest: &[u16]) -> (Option<Color>, usize) {
    match rest {
        [5, n, ..] => (Some(Color::Indexed(*n as u8)), 2),
        [2, r, g, b, ..] => (Some(Color::Rgb(*r as u8, *g as u8, *b as u8)), 4),
        [5] | [2, ..] => (None, rest.len()),
        _ => (None, 0),
    }
}
