//! Timed capture of a terminal into an animation.
//!
//! A [`Recorder`] holds at most one active [`Recording`]. While active, a
//! dedicated capture thread wakes every `1000 / fps` ms, renders the current
//! screen, rasterizes it and writes a numbered frame. Stopping signals the
//! thread, waits for it to exit, then compacts the frames into a GIF.
//!
//! Ticks never overlap. When a tick takes longer than the period, the
//! deadlines it ran past are dropped and counted as skipped rather than
//! fired back to back. Their time is credited to the frame on screen while
//! they passed, so the animation still plays in real time.

mod frames;

pub use frames::FrameStore;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::animation::{assemble, Animation, AnimationEncoder, TimedFrame};
use crate::error::{CaptureError, Result};
use crate::raster::Rasterizer;

pub const DEFAULT_FPS: u32 = 10;
pub const MAX_FPS: u32 = 30;

/// Resolve a requested frame rate: default when absent or zero, capped at [`MAX_FPS`].
pub fn clamp_fps(fps: Option<u32>) -> u32 {
    fps.filter(|f| *f > 0).unwrap_or(DEFAULT_FPS).min(MAX_FPS)
}

/// Produces the vector document for the current screen.
pub trait FrameSource: Send + Sync {
    fn render_svg(&self) -> String;
}

/// Counters kept by the capture thread.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Frames written to disk
    pub persisted: u64,
    /// Deadlines dropped because a previous tick overran
    pub skipped: u64,
    /// Ticks whose render or write failed
    pub failed: u64,
    /// Ticks each persisted frame stayed on screen, by frame index
    pub frame_ticks: Vec<u32>,
}

impl TickStats {
    /// Charge `n` ticks to the most recent frame. Nothing is on screen yet
    /// before the first frame, so those ticks are not shown.
    fn credit_last(&mut self, n: u64) {
        if let Some(last) = self.frame_ticks.last_mut() {
            *last = last.saturating_add(n.min(u32::MAX as u64) as u32);
        }
    }
}

/// Result of a completed recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingSummary {
    pub path: PathBuf,
    /// Frames in the animation after compaction
    pub frame_count: usize,
    /// Frames captured before compaction
    pub captured_frames: usize,
    pub duplicates_skipped: usize,
    /// Wall-clock time between start and stop
    pub duration_ms: u64,
    /// Display time of the animation
    pub animation_ms: u64,
    pub skipped_ticks: u64,
    pub failed_ticks: u64,
    pub size_bytes: u64,
}

/// An active recording and its capture thread.
pub struct Recording {
    fps: u32,
    started: Instant,
    frames: FrameStore,
    persisted: Arc<AtomicU64>,
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<TickStats>>,
}

impl Recording {
    /// Create the frame directory and start capturing.
    pub fn start(
        frames_dir: &Path,
        fps: Option<u32>,
        source: Arc<dyn FrameSource>,
        rasterizer: Arc<dyn Rasterizer>,
    ) -> Result<Self> {
        let fps = clamp_fps(fps);
        let frames = FrameStore::create(frames_dir)?;
        let persisted = Arc::new(AtomicU64::new(0));
        let (stop_tx, stop_rx) = mpsc::channel();

        let period = Duration::from_secs(1) / fps;
        let worker = CaptureWorker {
            source,
            rasterizer,
            frames: frames.clone(),
            persisted: Arc::clone(&persisted),
        };
        let handle = thread::Builder::new()
            .name("termsnap-capture".to_string())
            .spawn(move || worker.run(period, stop_rx))?;

        tracing::info!(fps, dir = %frames.dir().display(), "Recording started");

        Ok(Self {
            fps,
            started: Instant::now(),
            frames,
            persisted,
            stop_tx,
            handle: Some(handle),
        })
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn frames_dir(&self) -> &Path {
        self.frames.dir()
    }

    /// Frames persisted so far.
    pub fn frames_captured(&self) -> u64 {
        self.persisted.load(Ordering::SeqCst)
    }

    /// Signal the capture thread and wait for it to exit.
    ///
    /// Once this returns no further frame will be written.
    fn halt(&mut self) -> TickStats {
        // A send error only means the thread is already gone
        let _ = self.stop_tx.send(());
        match self.handle.take().map(JoinHandle::join) {
            Some(Ok(stats)) => stats,
            Some(Err(_)) => {
                tracing::warn!("Capture thread panicked");
                TickStats {
                    persisted: self.frames_captured(),
                    ..TickStats::default()
                }
            }
            None => TickStats::default(),
        }
    }

    /// Stop capturing and write the animation to `output`.
    ///
    /// The frame directory is removed whether or not encoding succeeds.
    pub fn finish(mut self, output: &Path, encoder: &dyn AnimationEncoder) -> Result<RecordingSummary> {
        let stats = self.halt();
        let duration_ms = self.started.elapsed().as_millis() as u64;

        let result = self.encode(output, encoder, &stats.frame_ticks);
        if let Err(e) = self.frames.remove() {
            tracing::warn!(error = %e, "Failed to remove frame directory");
        }
        let animation = result?;

        let size_bytes = fs::metadata(output).map(|m| m.len()).unwrap_or(0);
        let summary = RecordingSummary {
            path: output.to_path_buf(),
            frame_count: animation.frame_count,
            captured_frames: animation.captured,
            duplicates_skipped: animation.duplicates_skipped,
            duration_ms,
            animation_ms: animation.duration_ms,
            skipped_ticks: stats.skipped,
            failed_ticks: stats.failed,
            size_bytes,
        };

        tracing::info!(
            path = %summary.path.display(),
            frames = summary.frame_count,
            captured = summary.captured_frames,
            deduplicated = summary.duplicates_skipped,
            duration_ms = summary.duration_ms,
            "Recording saved"
        );
        Ok(summary)
    }

    fn encode(
        &self,
        output: &Path,
        encoder: &dyn AnimationEncoder,
        frame_ticks: &[u32],
    ) -> Result<Animation> {
        let images = self.frames.load_all()?;
        // Without counts from the capture thread every frame is one tick
        let frames = images.into_iter().enumerate().map(|(i, image)| TimedFrame {
            image,
            ticks: frame_ticks.get(i).copied().unwrap_or(1).max(1),
        });
        let animation = assemble(frames, self.fps, encoder)?;
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output, &animation.bytes)?;
        Ok(animation)
    }

    /// Stop capturing and discard all frames.
    pub fn cancel(mut self) {
        let stats = self.halt();
        if let Err(e) = self.frames.remove() {
            tracing::warn!(error = %e, "Failed to remove frame directory");
        }
        tracing::info!(discarded = stats.persisted, "Recording cancelled");
    }
}

impl Drop for Recording {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.halt();
        }
    }
}

/// State moved onto the capture thread.
struct CaptureWorker {
    source: Arc<dyn FrameSource>,
    rasterizer: Arc<dyn Rasterizer>,
    frames: FrameStore,
    persisted: Arc<AtomicU64>,
}

impl CaptureWorker {
    fn run(self, period: Duration, stop_rx: mpsc::Receiver<()>) -> TickStats {
        let mut stats = TickStats::default();
        let mut next = Instant::now() + period;

        loop {
            let wait = next.saturating_duration_since(Instant::now());
            match stop_rx.recv_timeout(wait) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }

            match self.tick(stats.persisted) {
                Ok(()) => {
                    stats.persisted += 1;
                    stats.frame_ticks.push(1);
                    self.persisted.store(stats.persisted, Ordering::SeqCst);
                }
                Err(e) => {
                    // The previous frame stays on screen for this tick
                    stats.failed += 1;
                    stats.credit_last(1);
                    tracing::warn!(error = %e, "Frame capture failed");
                }
            }

            next += period;
            let now = Instant::now();
            if now > next {
                let missed = missed_deadlines(now - next, period);
                stats.skipped += missed;
                stats.credit_last(missed);
                next += period * missed as u32;
                tracing::debug!(missed, "Capture overran its period");
            }
        }

        stats
    }

    fn tick(&self, index: u64) -> Result<()> {
        let svg = self.source.render_svg();
        let image = self.rasterizer.rasterize(&svg)?;
        self.frames.write(index, &image)?;
        tracing::debug!(index, "Frame written");
        Ok(())
    }
}

/// Deadlines that passed while `behind` late: the one just missed plus
/// every full period after it.
fn missed_deadlines(behind: Duration, period: Duration) -> u64 {
    (behind.as_nanos() / period.as_nanos().max(1)) as u64 + 1
}

/// State of a [`Recorder`].
enum Slot {
    Idle,
    Active(Recording),
    /// A stop is halting, encoding and cleaning up outside the lock
    Stopping,
}

/// Per-session recording slot enforcing one recording at a time.
///
/// A recording being stopped still occupies the slot until its frame
/// directory is gone, so a new start cannot write into it.
pub struct Recorder {
    session_id: String,
    slot: Mutex<Slot>,
}

/// Returns the slot to idle when a stop finishes, even by unwinding.
struct StopGuard<'a>(&'a Recorder);

impl Drop for StopGuard<'_> {
    fn drop(&mut self) {
        *self.0.slot() = Slot::Idle;
    }
}

impl Recorder {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            slot: Mutex::new(Slot::Idle),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Slot> {
        // A poisoned slot still holds a valid state
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether a recording is active or still being stopped.
    pub fn is_recording(&self) -> bool {
        !matches!(*self.slot(), Slot::Idle)
    }

    /// Start recording. Fails with [`CaptureError::AlreadyRecording`] if one is active.
    pub fn start(
        &self,
        frames_dir: &Path,
        fps: Option<u32>,
        source: Arc<dyn FrameSource>,
        rasterizer: Arc<dyn Rasterizer>,
    ) -> Result<u32> {
        let mut slot = self.slot();
        if !matches!(*slot, Slot::Idle) {
            return Err(CaptureError::AlreadyRecording {
                id: self.session_id.clone(),
            });
        }
        let recording = Recording::start(frames_dir, fps, source, rasterizer)?;
        let fps = recording.fps();
        *slot = Slot::Active(recording);
        Ok(fps)
    }

    /// Move an active recording out, leaving the slot in [`Slot::Stopping`].
    fn begin_stop(&self) -> Option<(Recording, StopGuard<'_>)> {
        let mut slot = self.slot();
        match std::mem::replace(&mut *slot, Slot::Stopping) {
            Slot::Active(recording) => Some((recording, StopGuard(self))),
            other => {
                *slot = other;
                None
            }
        }
    }

    /// Stop the active recording. Fails with [`CaptureError::NotRecording`]
    /// if none is active.
    ///
    /// Starting again is refused until this returns. The slot is idle
    /// afterwards even when encoding fails.
    pub fn stop(&self, output: &Path, encoder: &dyn AnimationEncoder) -> Result<RecordingSummary> {
        let (recording, _guard) = self.begin_stop().ok_or_else(|| CaptureError::NotRecording {
            id: self.session_id.clone(),
        })?;
        recording.finish(output, encoder)
    }

    /// Cancel any active recording. Returns whether one was active.
    pub fn cancel(&self) -> bool {
        match self.begin_stop() {
            Some((recording, _guard)) => {
                recording.cancel();
                true
            }
            None => false,
        }
    }
}
