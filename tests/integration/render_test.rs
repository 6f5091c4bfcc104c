//! Integration tests for screen rendering

use termsnap::codec::strip_ansi;
use termsnap::render::{render, render_ansi, render_svg, render_text, RenderOptions};
use termsnap::terminal::{Cell, CellStyle, Color, Cursor, Snapshot};
use termsnap::theme::{get_theme, Palette, THEMES};

use super::helpers::screen;

fn hidden_cursor() -> Cursor {
    Cursor {
        col: 0,
        row: 0,
        visible: false,
    }
}

// ============================================================================
// Palette Tests
// ============================================================================

#[test]
fn every_theme_palette_has_256_entries_starting_with_its_ansi_colors() {
    for theme in THEMES {
        let palette = Palette::new(theme);
        assert_eq!(palette.len(), 256, "{}", theme.name);
        for (i, color) in theme.ansi.iter().enumerate() {
            assert_eq!(palette.get(i as u8), *color, "{} index {}", theme.name, i);
        }
    }
}

// ============================================================================
// Vector Document Tests
// ============================================================================

#[test]
fn red_bold_cell_on_default_background() {
    let theme = get_theme("one-dark").unwrap();
    let cell = Cell {
        char: 'A',
        width: 1,
        style: CellStyle {
            fg: Color::Indexed(1),
            bold: true,
            ..CellStyle::default()
        },
    };
    let snapshot = Snapshot::from_rows(vec![vec![cell]], hidden_cursor());
    let svg = render_svg(&snapshot, &RenderOptions::with_theme(theme));

    let red = theme.ansi[1].to_string();
    let text = svg
        .lines()
        .find(|l| l.starts_with("<text"))
        .expect("text element for 'A'");
    assert!(text.contains(&format!(r#"fill="{}""#, red)));
    assert!(text.contains(r#"font-weight="bold""#));
    assert!(text.ends_with(">A</text>"));

    // Only the full-size document background, no per-cell fill
    let rects: Vec<&str> = svg.lines().filter(|l| l.starts_with("<rect")).collect();
    assert_eq!(rects.len(), 1);
    assert!(rects[0].contains(r#"width="100%""#));
}

#[test]
fn rendering_is_idempotent() {
    let snapshot = screen(20, 3, "\x1b[1;32muser@host\x1b[0m:\x1b[34m~\x1b[0m$ ls\r\n\x1b[44mdir\x1b[0m");
    let options = RenderOptions::default();
    assert_eq!(render(&snapshot, &options), render(&snapshot, &options));
}

#[test]
fn true_color_cells_use_exact_rgb() {
    let snapshot = screen(4, 1, "\x1b[?25l\x1b[38;2;18;52;86mX");
    let svg = render_svg(&snapshot, &RenderOptions::default());
    assert!(svg.contains(r##"fill="#123456""##));
}

// ============================================================================
// Text and ANSI Tests
// ============================================================================

#[test]
fn plain_text_reproduces_grid() {
    let snapshot = screen(10, 3, "abcdefghij\r\nklmnopqrst\r\nuvwxyz0123");
    let text = render_text(&snapshot);
    assert_eq!(text, "abcdefghij\nklmnopqrst\nuvwxyz0123");
    assert!(!text.contains('\x1b'));
}

#[test]
fn stripped_ansi_equals_text() {
    let snapshot = screen(
        30,
        4,
        "\x1b[1;31merror\x1b[0m: \x1b[4mfile.rs\x1b[24m\r\n\x1b[7m rev \x1b[27m\x1b[38;5;208morange\r\n\x1b[48;2;10;20;30m  bg  \x1b[0m",
    );
    assert_eq!(strip_ansi(&render_ansi(&snapshot)), render_text(&snapshot));
}

#[test]
fn ansi_output_for_styled_prompt() {
    let snapshot = screen(20, 2, "\x1b[1;32mok\x1b[0m done\r\n\x1b[90mdim gray");
    insta::assert_snapshot!(render_ansi(&snapshot).replace('\x1b', "ESC"), @r###"
    ESC[1;32mokESC[0m done
    ESC[90mdim grayESC[0m
    "###);
}
