//! Live terminal sessions.
//!
//! A [`Session`] couples a process running on a PTY with the terminal buffer
//! its output is fed into. Everything a caller can capture (text, screenshots,
//! recordings) is derived from that buffer; the raw output log only backs
//! [`Session::read`].

mod output_log;
pub mod pty;
mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use output_log::{OutputLog, MAX_CHUNKS};
pub use pty::{NativePtySpawner, PtyChannel, PtyCommand, PtySpawner};
pub use store::{SessionSpec, SessionStore, StoreSettings};

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use crate::animation::AnimationEncoder;
use crate::codec::{interpret_escapes, strip_ansi, truncate_tail, MAX_READ_CHARS};
use crate::error::Result;
use crate::files::filename::{artifact_name, ArtifactKind};
use crate::files::SessionPaths;
use crate::raster::{encode_png, Rasterizer};
use crate::recording::{FrameSource, Recorder, RecordingSummary};
use crate::render::{render, render_svg, render_text, RenderOptions};
use crate::terminal::{Snapshot, TerminalBuffer};
use crate::theme::Theme;

/// Pause after writing input before the screen is read back.
pub const DEFAULT_SEND_DELAY: Duration = Duration::from_millis(100);

/// Screen text around one `send`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub before: String,
    pub after: String,
}

/// Files written by one screenshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    pub name: String,
    pub png: PathBuf,
    pub svg: PathBuf,
    pub ansi: PathBuf,
    pub text: PathBuf,
}

fn lock_terminal(terminal: &Mutex<TerminalBuffer>) -> MutexGuard<'_, TerminalBuffer> {
    // A panic mid-update leaves a usable grid behind
    terminal.lock().unwrap_or_else(|e| e.into_inner())
}

/// Renders the live buffer for the capture thread.
struct BufferSource {
    terminal: Arc<Mutex<TerminalBuffer>>,
    options: RenderOptions,
}

impl FrameSource for BufferSource {
    fn render_svg(&self) -> String {
        // Copy under the lock, render outside it
        let snapshot = lock_terminal(&self.terminal).snapshot();
        render_svg(&snapshot, &self.options)
    }
}

/// A process on a PTY and the screen it draws.
pub struct Session {
    id: String,
    cols: u16,
    rows: u16,
    terminal: Arc<Mutex<TerminalBuffer>>,
    output: Arc<OutputLog>,
    pty: Mutex<Box<dyn PtyChannel>>,
    recorder: Recorder,
    paths: SessionPaths,
    options: RenderOptions,
}

impl Session {
    /// Spawn `command` and start feeding its output into a fresh buffer.
    pub fn start(
        id: impl Into<String>,
        command: &PtyCommand,
        options: RenderOptions,
        paths: SessionPaths,
        spawner: &dyn PtySpawner,
    ) -> Result<Self> {
        let id = id.into();
        let terminal = Arc::new(Mutex::new(TerminalBuffer::new(
            command.cols as usize,
            command.rows as usize,
        )));
        let output = Arc::new(OutputLog::default());

        let mut pty = spawner.spawn(command)?;
        let (term, log) = (Arc::clone(&terminal), Arc::clone(&output));
        pty.on_data(Box::new(move |bytes: &[u8]| {
            log.push(bytes);
            lock_terminal(&term).process_bytes(bytes);
        }))?;

        tracing::info!(
            session = %id,
            command = %command.program,
            theme = options.theme.name,
            "Session started"
        );

        Ok(Self {
            recorder: Recorder::new(id.clone()),
            id,
            cols: command.cols,
            rows: command.rows,
            terminal,
            output,
            pty: Mutex::new(pty),
            paths,
            options,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn theme(&self) -> &'static Theme {
        self.options.theme
    }

    pub fn paths(&self) -> &SessionPaths {
        &self.paths
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    pub fn is_alive(&self) -> bool {
        self.pty().is_alive()
    }

    fn pty(&self) -> MutexGuard<'_, Box<dyn PtyChannel>> {
        self.pty.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Point-in-time copy of the screen.
    pub fn snapshot(&self) -> Snapshot {
        lock_terminal(&self.terminal).snapshot()
    }

    /// Visible screen as plain text.
    pub fn text(&self) -> String {
        render_text(&self.snapshot())
    }

    /// Write `input` (escape notations interpreted), wait `delay`, and
    /// return the screen text from before and after.
    pub fn send(&self, input: &str, delay: Duration) -> Result<SendOutcome> {
        let before = self.text();
        let bytes = interpret_escapes(input);
        self.pty().write(bytes.as_bytes())?;
        tracing::debug!(session = %self.id, bytes = bytes.len(), "Input sent");

        thread::sleep(delay);
        Ok(SendOutcome {
            before,
            after: self.text(),
        })
    }

    /// Recent raw output, escape sequences stripped unless `raw`, limited to
    /// the last [`MAX_READ_CHARS`] characters.
    pub fn read(&self, raw: bool) -> String {
        let content = self.output.contents();
        let content = if raw { content } else { strip_ansi(&content) };
        truncate_tail(&content, MAX_READ_CHARS)
    }

    /// Render the screen and write `.png`, `.svg`, `.ansi` and `.txt` files.
    pub fn screenshot(&self, name: Option<&str>, rasterizer: &dyn Rasterizer) -> Result<Screenshot> {
        let name = artifact_name(name, ArtifactKind::Screenshot);
        let rendered = render(&self.snapshot(), &self.options);
        let png = encode_png(&rasterizer.rasterize(&rendered.svg)?)?;

        let dir = self.paths.screenshots();
        fs::create_dir_all(&dir)?;
        let shot = Screenshot {
            png: dir.join(format!("{}.png", name)),
            svg: dir.join(format!("{}.svg", name)),
            ansi: dir.join(format!("{}.ansi", name)),
            text: dir.join(format!("{}.txt", name)),
            name,
        };
        fs::write(&shot.png, png)?;
        fs::write(&shot.svg, &rendered.svg)?;
        fs::write(&shot.ansi, &rendered.ansi)?;
        fs::write(&shot.text, &rendered.text)?;

        tracing::info!(
            session = %self.id,
            dir = %dir.display(),
            name = %shot.name,
            "Screenshot saved"
        );
        Ok(shot)
    }

    /// Start capturing frames. Returns the effective frame rate.
    pub fn record_start(&self, fps: Option<u32>, rasterizer: Arc<dyn Rasterizer>) -> Result<u32> {
        let source = Arc::new(BufferSource {
            terminal: Arc::clone(&self.terminal),
            options: self.options.clone(),
        });
        self.recorder
            .start(&self.paths.frames(), fps, source, rasterizer)
    }

    /// Stop capturing and write the animation under `recordings/`.
    pub fn record_stop(
        &self,
        name: Option<&str>,
        encoder: &dyn AnimationEncoder,
    ) -> Result<RecordingSummary> {
        let name = artifact_name(name, ArtifactKind::Recording);
        let output = self
            .paths
            .recordings()
            .join(format!("{}.{}", name, encoder.extension()));
        self.recorder.stop(&output, encoder)
    }

    /// Cancel any recording and kill the process.
    pub fn stop(&self) -> Result<()> {
        if self.recorder.cancel() {
            tracing::info!(session = %self.id, "Active recording discarded");
        }
        self.pty().kill()?;
        tracing::info!(session = %self.id, "Session stopped");
        Ok(())
    }
}
