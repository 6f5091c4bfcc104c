//! Integration tests for frame compaction and the recorder

use std::io::Cursor;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, Rgba, RgbaImage};
use tempfile::TempDir;

use termsnap::animation::{assemble, compact, GifEncoder};
use termsnap::raster::Rasterizer;
use termsnap::recording::{FrameSource, Recorder};
use termsnap::CaptureError;

fn solid(v: u8) -> RgbaImage {
    RgbaImage::from_pixel(4, 2, Rgba([v, v, v, 255]))
}

/// Delay of each decoded frame in milliseconds.
fn gif_delays(bytes: &[u8]) -> Vec<f64> {
    let decoder = GifDecoder::new(Cursor::new(bytes)).unwrap();
    decoder
        .into_frames()
        .collect_frames()
        .unwrap()
        .iter()
        .map(|f| {
            let (n, d) = f.delay().numer_denom_ms();
            n as f64 / d as f64
        })
        .collect()
}

// ============================================================================
// Compaction Tests
// ============================================================================

#[test]
fn static_screen_at_10_fps_for_half_a_second() {
    let frames = (0..5).map(|_| solid(7));
    let animation = assemble(frames, 10, &GifEncoder::default()).unwrap();

    assert_eq!(animation.frame_count, 1);
    assert_eq!(animation.duplicates_skipped, 4);
    assert_eq!(animation.duration_ms, 500);
    assert_eq!(gif_delays(&animation.bytes), vec![500.0]);
}

#[test]
fn duplicates_extend_their_predecessor() {
    let frames = vec![solid(1), solid(1), solid(2), solid(2), solid(2), solid(1)];
    let compacted = compact(frames).unwrap();

    let ticks: Vec<u32> = compacted.frames.iter().map(|f| f.ticks).collect();
    assert_eq!(ticks, vec![2, 3, 1]);
    assert_eq!(compacted.duplicates_skipped, 3);
    assert_eq!(
        compacted.frames.len() + compacted.duplicates_skipped,
        compacted.captured
    );
}

#[test]
fn total_display_time_covers_every_captured_frame() {
    let frames = vec![solid(1), solid(2), solid(2), solid(3)];
    let animation = assemble(frames, 20, &GifEncoder::default()).unwrap();

    let total: f64 = gif_delays(&animation.bytes).iter().sum();
    assert_eq!(animation.frame_count, 3);
    assert_eq!(animation.duration_ms, 200);
    assert!((total - 200.0).abs() < 1.0, "total delay {}", total);
}

#[test]
fn no_frames_is_an_empty_recording() {
    let err = assemble(Vec::<RgbaImage>::new(), 10, &GifEncoder::default()).unwrap_err();
    assert!(matches!(err, CaptureError::EmptyRecording));
}

// ============================================================================
// Recorder Tests
// ============================================================================

/// Screen whose content is set from the test.
struct Screen(AtomicU8);

impl FrameSource for Screen {
    fn render_svg(&self) -> String {
        self.0.load(Ordering::SeqCst).to_string()
    }
}

/// Maps the document (a number) to a solid image of that shade.
struct ShadeRasterizer;

impl Rasterizer for ShadeRasterizer {
    fn rasterize(&self, svg: &str) -> termsnap::Result<RgbaImage> {
        Ok(solid(svg.parse().unwrap_or(0)))
    }
}

#[test]
fn recorder_rejects_double_start_and_idle_stop() {
    let tmp = TempDir::new().unwrap();
    let recorder = Recorder::new("shell-session-abcdef");

    let err = recorder
        .stop(&tmp.path().join("x.gif"), &GifEncoder::default())
        .unwrap_err();
    assert!(matches!(err, CaptureError::NotRecording { .. }));

    let screen = Arc::new(Screen(AtomicU8::new(0)));
    recorder
        .start(&tmp.path().join("frames"), None, screen.clone(), Arc::new(ShadeRasterizer))
        .unwrap();
    let err = recorder
        .start(&tmp.path().join("frames"), None, screen, Arc::new(ShadeRasterizer))
        .unwrap_err();
    assert_eq!(err.to_string(), "Session shell-session-abcdef is already recording");
    assert!(recorder.cancel());
}

#[test]
fn recorder_keeps_distinct_screens() {
    let tmp = TempDir::new().unwrap();
    let frames_dir = tmp.path().join("frames");
    let recorder = Recorder::new("s");
    let screen = Arc::new(Screen(AtomicU8::new(10)));

    let fps = recorder
        .start(&frames_dir, Some(20), screen.clone(), Arc::new(ShadeRasterizer))
        .unwrap();
    assert_eq!(fps, 20);

    let count = || std::fs::read_dir(&frames_dir).map(|d| d.count()).unwrap_or(0);
    let wait_for = |n: usize| {
        let deadline = Instant::now() + Duration::from_secs(5);
        while count() < n && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
    };
    wait_for(2);
    screen.0.store(200, Ordering::SeqCst);
    let seen = count();
    wait_for(seen + 2);

    let output = tmp.path().join("out").join("clip.gif");
    let summary = recorder.stop(&output, &GifEncoder::default()).unwrap();

    assert!(summary.frame_count >= 2);
    assert_eq!(
        summary.frame_count + summary.duplicates_skipped,
        summary.captured_frames
    );
    assert_eq!(gif_delays(&std::fs::read(&output).unwrap()).len(), summary.frame_count);
    assert!(!frames_dir.exists());
}
