//! Themes command handler

use anyhow::Result;

use termsnap::theme::{get_theme, themes_by_kind, ThemeKind, DEFAULT_THEME};

/// List built-in themes grouped by kind.
#[cfg(not(tarpaulin_include))]
pub fn handle() -> Result<()> {
    let (dark, light) = themes_by_kind();
    for (kind, names) in [(ThemeKind::Dark, dark), (ThemeKind::Light, light)] {
        println!("{}:", kind.label());
        for name in names {
            let theme = get_theme(name)?;
            let marker = if name == DEFAULT_THEME { " (default)" } else { "" };
            println!(
                "  {:<16} {} on {}  {}{}",
                theme.name, theme.foreground, theme.background, theme.description, marker
            );
        }
    }
    Ok(())
}
