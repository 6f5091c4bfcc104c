//! Color themes for rendered output.
//!
//! A theme supplies the 16 base ANSI colors plus the default foreground and
//! background. Themes are immutable; a session picks one at start and keeps
//! it for its whole lifetime.

mod palette;

pub use palette::{resolve, Palette};

use std::fmt;

use crate::error::CaptureError;

/// Name of the theme used when none is configured.
pub const DEFAULT_THEME: &str = "one-dark";

/// A concrete 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub const fn from_u32(packed: u32) -> Self {
        Self {
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
        }
    }

    /// Pack as `0xRRGGBB`.
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Lowercase `#rrggbb` form used in SVG attributes.
    pub fn hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Whether a theme is meant for a dark or a light background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    Dark,
    Light,
}

impl ThemeKind {
    pub fn label(&self) -> &'static str {
        match self {
            ThemeKind::Dark => "dark",
            ThemeKind::Light => "light",
        }
    }
}

/// A named terminal color theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ThemeKind,
    pub foreground: Rgb,
    pub background: Rgb,
    /// ANSI colors 0-15 (8 normal followed by 8 bright)
    pub ansi: [Rgb; 16],
}

const fn palette16(colors: [u32; 16]) -> [Rgb; 16] {
    let mut out = [Rgb::new(0, 0, 0); 16];
    let mut i = 0;
    while i < 16 {
        out[i] = Rgb::from_u32(colors[i]);
        i += 1;
    }
    out
}

const SOLARIZED_ANSI: [u32; 16] = [
    0x073642, 0xdc322f, 0x859900, 0xb58900, 0x268bd2, 0xd33682, 0x2aa198, 0xeee8d5, //
    0x002b36, 0xcb4b16, 0x586e75, 0x657b83, 0x839496, 0x6c71c4, 0x93a1a1, 0xfdf6e3,
];

/// All built-in themes, default first.
pub static THEMES: &[Theme] = &[
    Theme {
        name: "one-dark",
        description: "Atom One Dark, muted colors on a charcoal background",
        kind: ThemeKind::Dark,
        foreground: Rgb::from_u32(0xabb2bf),
        background: Rgb::from_u32(0x282c34),
        ansi: palette16([
            0x1e2127, 0xe06c75, 0x98c379, 0xd19a66, 0x61afef, 0xc678dd, 0x56b6c2, 0xabb2bf, //
            0x5c6370, 0xe06c75, 0x98c379, 0xd19a66, 0x61afef, 0xc678dd, 0x56b6c2, 0xffffff,
        ]),
    },
    Theme {
        name: "dracula",
        description: "Dracula, vivid pastels on a dark purple-gray background",
        kind: ThemeKind::Dark,
        foreground: Rgb::from_u32(0xf8f8f2),
        background: Rgb::from_u32(0x282a36),
        ansi: palette16([
            0x21222c, 0xff5555, 0x50fa7b, 0xf1fa8c, 0xbd93f9, 0xff79c6, 0x8be9fd, 0xf8f8f2, //
            0x6272a4, 0xff6e6e, 0x69ff94, 0xffffa5, 0xd6acff, 0xff92df, 0xa4ffff, 0xffffff,
        ]),
    },
    Theme {
        name: "nord",
        description: "Nord, arctic blue-gray tones",
        kind: ThemeKind::Dark,
        foreground: Rgb::from_u32(0xd8dee9),
        background: Rgb::from_u32(0x2e3440),
        ansi: palette16([
            0x3b4252, 0xbf616a, 0xa3be8c, 0xebcb8b, 0x81a1c1, 0xb48ead, 0x88c0d0, 0xe5e9f0, //
            0x4c566a, 0xbf616a, 0xa3be8c, 0xebcb8b, 0x81a1c1, 0xb48ead, 0x8fbcbb, 0xeceff4,
        ]),
    },
    Theme {
        name: "solarized-dark",
        description: "Solarized on its dark base",
        kind: ThemeKind::Dark,
        foreground: Rgb::from_u32(0x839496),
        background: Rgb::from_u32(0x002b36),
        ansi: palette16(SOLARIZED_ANSI),
    },
    Theme {
        name: "solarized-light",
        description: "Solarized on its light base",
        kind: ThemeKind::Light,
        foreground: Rgb::from_u32(0x657b83),
        background: Rgb::from_u32(0xfdf6e3),
        ansi: palette16(SOLARIZED_ANSI),
    },
    Theme {
        name: "github-light",
        description: "GitHub light, high contrast on white",
        kind: ThemeKind::Light,
        foreground: Rgb::from_u32(0x24292f),
        background: Rgb::from_u32(0xffffff),
        ansi: palette16([
            0x24292f, 0xcf222e, 0x116329, 0x4d2d00, 0x0969da, 0x8250df, 0x1b7c83, 0x6e7781, //
            0x57606a, 0xa40e26, 0x1a7f37, 0x633c01, 0x218bff, 0xa475f9, 0x3192aa, 0x8c959f,
        ]),
    },
];

/// Look up a built-in theme by name (case-insensitive).
pub fn get_theme(name: &str) -> Result<&'static Theme, CaptureError> {
    THEMES
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| CaptureError::UnknownTheme {
            name: name.to_string(),
            available: theme_names().join(", "),
        })
}

/// The theme used when nothing is configured.
pub fn default_theme() -> &'static Theme {
    &THEMES[0]
}

pub fn theme_names() -> Vec<&'static str> {
    THEMES.iter().map(|t| t.name).collect()
}

/// Theme names grouped as `(dark, light)`.
pub fn themes_by_kind() -> (Vec<&'static str>, Vec<&'static str>) {
    let (dark, light): (Vec<&Theme>, Vec<&Theme>) =
        THEMES.iter().partition(|t| t.kind == ThemeKind::Dark);
    (
        dark.iter().map(|t| t.name).collect(),
        light.iter().map(|t| t.name).collect(),
    )
}
