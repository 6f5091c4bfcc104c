//! Screenshot command handler

use anyhow::{Context, Result};

use termsnap::cli::ScreenshotArgs;
use termsnap::Config;

use super::{open_store, send_inputs, start_session};

/// Run the command, send inputs, and save one screenshot.
#[cfg(not(tarpaulin_include))]
pub fn handle(args: ScreenshotArgs) -> Result<()> {
    let config = Config::load()?;
    let args = args.session;
    let store = open_store(&config, &args)?;
    let session = start_session(&store, &args)?;

    send_inputs(&store, &session, &args, || true)?;

    let shot = store
        .screenshot(session.id(), args.name.as_deref())
        .context("Failed to save screenshot")?;
    store.stop(session.id())?;

    println!("{}", shot.png.display());
    println!("{}", shot.svg.display());
    println!("{}", shot.ansi.display());
    println!("{}", shot.text.display());
    Ok(())
}
