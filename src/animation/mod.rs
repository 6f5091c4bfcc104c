//! Frame compaction and animation assembly.
//!
//! A recording produces one bitmap per persisted tick, weighted by any ticks
//! the capture thread had to skip after it. Consecutive identical bitmaps
//! are folded into the frame before them by extending its display time, so
//! the animation stays small while its total duration still matches the
//! wall-clock time that was captured.

mod gif;

pub use gif::GifEncoder;

use image::RgbaImage;

use crate::error::{CaptureError, Result};

/// A retained frame and how many ticks it stays on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedFrame {
    pub image: RgbaImage,
    /// Always at least 1
    pub ticks: u32,
}

impl From<RgbaImage> for TimedFrame {
    /// A frame captured on a single tick.
    fn from(image: RgbaImage) -> Self {
        Self { image, ticks: 1 }
    }
}

impl TimedFrame {
    /// Display time as an exact `(numerator, denominator)` in milliseconds.
    pub fn delay_ms(&self, fps: u32) -> (u32, u32) {
        (1000 * self.ticks, fps.max(1))
    }
}

/// Output of [`compact`].
#[derive(Debug, Clone)]
pub struct Compacted {
    pub frames: Vec<TimedFrame>,
    /// Number of input frames
    pub captured: usize,
    /// Input frames folded into their predecessor
    pub duplicates_skipped: usize,
}

/// Fold consecutive identical frames together.
///
/// Frames are plain bitmaps (one tick each) or [`TimedFrame`]s that already
/// carry the ticks they covered. The first frame is always retained. A frame
/// equal to the last retained one (same size, same pixels) adds its ticks to
/// it instead of being kept. `frames.len() + duplicates_skipped == captured`
/// always holds, and the total tick count is unchanged.
pub fn compact<I>(frames: I) -> Result<Compacted>
where
    I: IntoIterator,
    I::Item: Into<TimedFrame>,
{
    let mut retained: Vec<TimedFrame> = Vec::new();
    let mut captured = 0;
    let mut duplicates_skipped = 0;

    for frame in frames {
        let frame = frame.into();
        captured += 1;
        match retained.last_mut() {
            Some(last)
                if last.image.dimensions() == frame.image.dimensions()
                    && last.image.as_raw() == frame.image.as_raw() =>
            {
                last.ticks += frame.ticks;
                duplicates_skipped += 1;
            }
            _ => retained.push(frame),
        }
    }

    if retained.is_empty() {
        return Err(CaptureError::EmptyRecording);
    }

    Ok(Compacted {
        frames: retained,
        captured,
        duplicates_skipped,
    })
}

/// Writes timed frames into an animation container.
pub trait AnimationEncoder: Send + Sync {
    /// File extension of the produced container, without the dot.
    fn extension(&self) -> &'static str;

    /// Encode `frames` in order. Failures are [`CaptureError::Encode`].
    fn encode(&self, frames: &[TimedFrame], fps: u32) -> Result<Vec<u8>>;
}

/// An encoded animation and its frame accounting.
#[derive(Debug, Clone)]
pub struct Animation {
    pub bytes: Vec<u8>,
    /// Frames present in the animation
    pub frame_count: usize,
    pub duplicates_skipped: usize,
    /// Frames handed in before compaction
    pub captured: usize,
    /// Total display time, `ticks * 1000 / fps`
    pub duration_ms: u64,
}

/// Compact `frames` and encode them with `encoder` at `fps`.
pub fn assemble<I>(frames: I, fps: u32, encoder: &dyn AnimationEncoder) -> Result<Animation>
where
    I: IntoIterator,
    I::Item: Into<TimedFrame>,
{
    let fps = fps.max(1);
    let compacted = compact(frames)?;
    let bytes = encoder.encode(&compacted.frames, fps)?;
    let ticks: u64 = compacted.frames.iter().map(|f| f.ticks as u64).sum();
    let duration_ms = ticks * 1000 / fps as u64;

    tracing::debug!(
        captured = compacted.captured,
        retained = compacted.frames.len(),
        duplicates = compacted.duplicates_skipped,
        bytes = bytes.len(),
        "Assembled animation"
    );

    Ok(Animation {
        bytes,
        frame_count: compacted.frames.len(),
        duplicates_skipped: compacted.duplicates_skipped,
        captured: compacted.captured,
        duration_ms,
    })
}
