//! Record command handler

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use humansize::{format_size, DECIMAL};

use termsnap::cli::RecordArgs;
use termsnap::recording::RecordingSummary;
use termsnap::Config;

use super::{open_store, send_inputs, start_session};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the command and record it until it exits, the duration elapses,
/// or Ctrl-C is pressed.
#[cfg(not(tarpaulin_include))]
pub fn handle(args: RecordArgs) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(&config, &args.session)?;

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst))
            .context("Failed to install Ctrl-C handler")?;
    }
    let running = || !interrupted.load(Ordering::SeqCst);

    let session = start_session(&store, &args.session)?;
    let fps = store
        .record_start(session.id(), Some(args.fps.unwrap_or(config.recording.fps)))
        .context("Failed to start recording")?;
    let started = Instant::now();
    eprintln!("Recording at {} fps. Press Ctrl-C to stop.", fps);

    send_inputs(&store, &session, &args.session, running)?;

    let deadline = args.duration_ms.map(|ms| started + Duration::from_millis(ms));
    while running()
        && session.is_alive()
        && deadline.is_none_or(|d| Instant::now() < d)
    {
        thread::sleep(POLL_INTERVAL);
    }

    let summary = store
        .record_stop(session.id(), args.session.name.as_deref())
        .context("Failed to save recording")?;
    store.stop(session.id())?;

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RecordingSummary) {
    println!("{}", summary.path.display());
    eprintln!(
        "{} frames ({} captured, {} duplicates), {:.1}s, {}",
        summary.frame_count,
        summary.captured_frames,
        summary.duplicates_skipped,
        summary.duration_ms as f64 / 1000.0,
        format_size(summary.size_bytes, DECIMAL)
    );
    if summary.skipped_ticks > 0 || summary.failed_ticks > 0 {
        eprintln!(
            "{} ticks skipped (capture slower than frame rate), {} failed",
            summary.skipped_ticks, summary.failed_ticks
        );
    }
}
