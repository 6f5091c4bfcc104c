//! 256-color lookup table and color resolution.
//!
//! Layout follows the xterm convention:
//! - 0-15: the theme's base colors
//! - 16-231: 6x6x6 color cube, component levels `0, 95, 135, 175, 215, 255`
//! - 232-255: 24-step grayscale ramp starting at 8, step 10

use super::{Rgb, Theme};
use crate::terminal::Color;

/// Number of entries in every palette.
pub const PALETTE_SIZE: usize = 256;

/// Concrete colors for every palette index, derived from a theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [Rgb; PALETTE_SIZE],
}

/// Cube component level: 0 stays 0, otherwise `v * 40 + 55`.
fn cube_level(v: usize) -> u8 {
    if v == 0 {
        0
    } else {
        (v * 40 + 55) as u8
    }
}

impl Palette {
    /// Build the palette for `theme`.
    pub fn new(theme: &Theme) -> Self {
        let mut colors = [Rgb::default(); PALETTE_SIZE];
        colors[..16].copy_from_slice(&theme.ansi);

        let mut idx = 16;
        for r in 0..6 {
            for g in 0..6 {
                for b in 0..6 {
                    colors[idx] = Rgb::new(cube_level(r), cube_level(g), cube_level(b));
                    idx += 1;
                }
            }
        }

        for i in 0..24 {
            let v = (i * 10 + 8) as u8;
            colors[idx] = Rgb::new(v, v, v);
            idx += 1;
        }

        Self { colors }
    }

    pub fn get(&self, index: u8) -> Rgb {
        self.colors[index as usize]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rgb> {
        self.colors.iter()
    }
}

/// Resolve a cell color to a concrete color.
///
/// `fallback` is the theme default the caller wants for [`Color::Default`]:
/// the foreground when resolving a foreground, the background otherwise.
pub fn resolve(color: Color, palette: &Palette, fallback: Rgb) -> Rgb {
    match color {
        Color::Default => fallback,
        Color::Indexed(n) => palette.get(n),
        Color::Rgb(r, g, b) => Rgb::new(r, g, b),
    }
}
