//! Integration tests for sessions running on a real pseudo-terminal

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use image::RgbaImage;
use tempfile::TempDir;

use termsnap::animation::GifEncoder;
use termsnap::raster::Rasterizer;
use termsnap::session::NativePtySpawner;
use termsnap::{CaptureError, Session, SessionSpec, SessionStore, StoreSettings};

/// Skips font loading; these tests only check files and text.
struct BlankRasterizer;

impl Rasterizer for BlankRasterizer {
    fn rasterize(&self, _svg: &str) -> termsnap::Result<RgbaImage> {
        Ok(RgbaImage::new(2, 2))
    }
}

fn store(tmp: &TempDir) -> SessionStore {
    let settings = StoreSettings {
        output_dir: tmp.path().to_path_buf(),
        run_id: "run-it".to_string(),
        cols: 60,
        rows: 10,
        ..StoreSettings::default()
    };
    SessionStore::new(
        settings,
        Box::new(NativePtySpawner),
        Arc::new(BlankRasterizer),
        Box::new(GifEncoder::default()),
    )
}

fn shell(store: &SessionStore, script: &str) -> Arc<Session> {
    let spec = SessionSpec {
        args: vec!["-c".to_string(), script.to_string()],
        ..SessionSpec::new("sh")
    };
    store.start(spec).unwrap()
}

/// Poll the screen until it contains `needle`.
fn wait_for_text(session: &Session, needle: &str) -> String {
    let deadline = Instant::now() + Duration::from_secs(10);
    loop {
        let text = session.text();
        if text.contains(needle) || Instant::now() > deadline {
            return text;
        }
        thread::sleep(Duration::from_millis(20));
    }
}

#[test]
fn output_reaches_the_screen_and_the_log() {
    let tmp = TempDir::new().unwrap();
    let store = store(&tmp);
    let session = shell(&store, "printf '\\033[31mred\\033[0m plain\\n'; sleep 5");

    let text = wait_for_text(&session, "red plain");
    assert!(text.contains("red plain"), "screen was {:?}", text);

    let cleaned = store.read(session.id(), false).unwrap();
    assert!(cleaned.contains("red plain"));
    let raw = store.read(session.id(), true).unwrap();
    assert!(raw.contains("\x1b[31mred"));

    store.stop(session.id()).unwrap();
}

#[test]
fn input_is_delivered_to_the_process() {
    let tmp = TempDir::new().unwrap();
    let store = store(&tmp);
    let session = shell(&store, "read line; echo \"got:$line\"; sleep 5");

    store
        .send(session.id(), "hello\\r", Some(Duration::from_millis(50)))
        .unwrap();
    let text = wait_for_text(&session, "got:hello");
    assert!(text.contains("got:hello"), "screen was {:?}", text);

    store.stop(session.id()).unwrap();
}

#[test]
fn child_sees_a_color_terminal() {
    let tmp = TempDir::new().unwrap();
    let store = store(&tmp);
    let session = shell(&store, "echo \"term=$TERM color=$COLORTERM\"; sleep 5");

    let text = wait_for_text(&session, "color=");
    assert!(text.contains("term=xterm-256color color=truecolor"), "screen was {:?}", text);
    store.stop(session.id()).unwrap();
}

#[test]
fn screenshot_files_land_in_the_session_directory() {
    let tmp = TempDir::new().unwrap();
    let store = store(&tmp);
    let session = shell(&store, "echo ready; sleep 5");
    wait_for_text(&session, "ready");

    let shot = store.screenshot(session.id(), Some("ready")).unwrap();
    let dir = tmp.path().join("run-it").join(session.id()).join("screenshots");
    assert_eq!(shot.png, dir.join("ready.png"));
    assert!(std::fs::read_to_string(&shot.text).unwrap().starts_with("ready"));

    store.stop(session.id()).unwrap();
}

#[test]
fn stopped_session_is_gone() {
    let tmp = TempDir::new().unwrap();
    let store = store(&tmp);
    let session = shell(&store, "sleep 30");
    let id = session.id().to_string();

    store.stop(&id).unwrap();
    assert!(!session.is_alive());
    let err = store.read(&id, false).unwrap_err();
    assert!(matches!(err, CaptureError::SessionNotFound { .. }));
}
