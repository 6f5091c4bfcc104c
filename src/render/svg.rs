//! SVG rendering.
//!
//! Produces one primitive per line inside a group filled with the theme
//! foreground. Per-cell markup is only written where it differs from the
//! theme defaults:
//! - a background `<rect>` when the cell background is not the theme background
//! - a `fill` on `<text>` when the foreground is not the theme foreground
//! - `font-weight`, `font-style` and `text-decoration` for bold, italic, underline

use std::fmt::Write;

use crate::terminal::Snapshot;
use crate::theme::{resolve, Palette};

use super::RenderOptions;

/// Cell width as a fraction of the font size.
pub const CHAR_WIDTH_RATIO: f64 = 0.6;
/// Line height as a fraction of the font size.
pub const LINE_HEIGHT_RATIO: f64 = 1.2;
/// Outer padding around the grid, in pixels.
pub const PADDING: f64 = 10.0;

/// Escape the five XML special characters.
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn escape_char(ch: char) -> String {
    xml_escape(ch.encode_utf8(&mut [0; 4]))
}

/// Render a snapshot as an SVG document.
pub fn render_svg(snapshot: &Snapshot, options: &RenderOptions) -> String {
    let theme = options.theme;
    let palette = Palette::new(theme);
    let font_size = options.font_size;

    let char_width = font_size * CHAR_WIDTH_RATIO;
    let line_height = font_size * LINE_HEIGHT_RATIO;
    let width = snapshot.cols() as f64 * char_width + PADDING * 2.0;
    let height = snapshot.rows() as f64 * line_height + PADDING * 2.0;

    let mut lines: Vec<String> = Vec::new();

    for y in 0..snapshot.rows() {
        for (x, cell) in snapshot.row(y).iter().enumerate() {
            if cell.is_continuation() {
                continue;
            }

            let mut fg = resolve(cell.style.fg, &palette, theme.foreground);
            let mut bg = resolve(cell.style.bg, &palette, theme.background);
            if cell.style.reverse {
                std::mem::swap(&mut fg, &mut bg);
            }

            let x_pos = PADDING + x as f64 * char_width;
            let y_pos = PADDING + y as f64 * line_height + font_size;

            if bg != theme.background {
                lines.push(format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                    x_pos,
                    y_pos - font_size,
                    char_width * cell.width as f64,
                    line_height,
                    bg
                ));
            }

            let blank = cell.char.is_whitespace();
            if blank && bg == theme.background {
                continue;
            }

            let mut attrs = String::new();
            if fg != theme.foreground {
                let _ = write!(attrs, r#" fill="{}""#, fg);
            }
            if cell.style.bold {
                attrs.push_str(r#" font-weight="bold""#);
            }
            if cell.style.italic {
                attrs.push_str(r#" font-style="italic""#);
            }
            if cell.style.underline {
                attrs.push_str(r#" text-decoration="underline""#);
            }

            let content = if blank {
                " ".to_string()
            } else {
                escape_char(cell.char)
            };
            lines.push(format!(
                r#"<text x="{}" y="{}"{}>{}</text>"#,
                x_pos, y_pos, attrs, content
            ));
        }
    }

    let cursor = snapshot.cursor();
    if cursor.visible && cursor.col < snapshot.cols() && cursor.row < snapshot.rows() {
        let x_pos = PADDING + cursor.col as f64 * char_width;
        let y_pos = PADDING + cursor.row as f64 * line_height;

        lines.push(format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            x_pos, y_pos, char_width, line_height, theme.foreground
        ));

        if let Some(cell) = snapshot.row(cursor.row).get(cursor.col) {
            if !cell.char.is_whitespace() {
                lines.push(format!(
                    r#"<text x="{}" y="{}" fill="{}">{}</text>"#,
                    x_pos,
                    y_pos + font_size,
                    theme.background,
                    escape_char(cell.char)
                ));
            }
        }
    }

    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" font-family=\"{}\" font-size=\"{}\">\n\
         <rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n\
         <g fill=\"{}\">\n\
         {}\n\
         </g>\n\
         </svg>",
        width,
        height,
        xml_escape(&options.font_family),
        font_size,
        theme.background,
        theme.foreground,
        lines.join("\n")
    )
}
