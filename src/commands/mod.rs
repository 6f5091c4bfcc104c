//! Subcommand handlers

pub mod completions;
pub mod config;
pub mod record;
pub mod screenshot;
pub mod themes;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use termsnap::animation::GifEncoder;
use termsnap::cli::SessionArgs;
use termsnap::journal::Journal;
use termsnap::raster::ResvgRasterizer;
use termsnap::session::NativePtySpawner;
use termsnap::{Config, Session, SessionSpec, SessionStore};

/// Build a store from the config file, with command-line overrides applied.
#[cfg(not(tarpaulin_include))]
pub fn open_store(config: &Config, args: &SessionArgs) -> Result<SessionStore> {
    let mut settings = config.store_settings();
    if let Some(dir) = &args.output_dir {
        settings.output_dir = dir.clone();
    }

    let store = SessionStore::new(
        settings,
        Box::new(NativePtySpawner),
        Arc::new(ResvgRasterizer::new(config.render.zoom)),
        Box::new(GifEncoder::default()),
    );

    match &config.journal_path {
        Some(path) => {
            let journal = Journal::open(path)
                .with_context(|| format!("Failed to open journal {}", path.display()))?;
            Ok(store.with_journal(journal))
        }
        None => Ok(store),
    }
}

/// Start the session described by `args` and let it settle.
#[cfg(not(tarpaulin_include))]
pub fn start_session(store: &SessionStore, args: &SessionArgs) -> Result<Arc<Session>> {
    let (program, rest) = args
        .command
        .split_first()
        .context("No command given")?;
    let spec = SessionSpec {
        args: rest.to_vec(),
        cols: args.cols,
        rows: args.rows,
        theme: args.theme.clone(),
        ..SessionSpec::new(program.clone())
    };
    let session = store
        .start(spec)
        .with_context(|| format!("Failed to start '{}'", program))?;
    thread::sleep(Duration::from_millis(args.wait_ms));
    Ok(session)
}

/// Send each `--send` input, waiting `--wait-ms` after each.
///
/// Stops early when `keep_going` returns false.
#[cfg(not(tarpaulin_include))]
pub fn send_inputs(
    store: &SessionStore,
    session: &Session,
    args: &SessionArgs,
    keep_going: impl Fn() -> bool,
) -> Result<()> {
    let delay = Duration::from_millis(args.wait_ms);
    for input in &args.send {
        if !keep_going() {
            break;
        }
        store
            .send(session.id(), input, Some(delay))
            .with_context(|| format!("Failed to send input '{}'", input))?;
    }
    Ok(())
}
