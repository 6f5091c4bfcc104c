//! Registry of live sessions.
//!
//! The store owns every [`Session`] along with the collaborators they share
//! (PTY spawner, rasterizer, animation encoder). It is created once and
//! passed to whoever drives sessions; there is no global registry.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde_json::{json, Value};
use uuid::Uuid;

use super::pty::{PtyCommand, PtySpawner};
use super::{Screenshot, SendOutcome, Session, DEFAULT_SEND_DELAY};
use crate::animation::AnimationEncoder;
use crate::error::{CaptureError, Result};
use crate::files::SessionPaths;
use crate::journal::Journal;
use crate::raster::Rasterizer;
use crate::recording::RecordingSummary;
use crate::render::{RenderOptions, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE};
use crate::theme::{get_theme, DEFAULT_THEME};

const ID_PREFIX: &str = "shell-session-";
const ID_SUFFIX_LEN: usize = 6;

/// Defaults applied to every session the store starts.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    pub output_dir: PathBuf,
    /// Groups the sessions of one process under `output_dir`
    pub run_id: String,
    pub cols: u16,
    pub rows: u16,
    pub theme: String,
    pub font_size: f64,
    pub font_family: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("/tmp/termsnap"),
            run_id: new_run_id(),
            cols: 120,
            rows: 40,
            theme: DEFAULT_THEME.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

/// `run-<utc timestamp>-<pid>`, unique per process.
pub fn new_run_id() -> String {
    format!(
        "run-{}-{}",
        chrono::Utc::now().format("%Y%m%dT%H%M%S"),
        std::process::id()
    )
}

/// What to start. Unset fields fall back to [`StoreSettings`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSpec {
    pub command: String,
    pub args: Vec<String>,
    pub cols: Option<u16>,
    pub rows: Option<u16>,
    pub theme: Option<String>,
    pub cwd: Option<PathBuf>,
}

impl SessionSpec {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }
}

/// Live sessions keyed by id.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Arc<Session>>>,
    spawner: Box<dyn PtySpawner>,
    rasterizer: Arc<dyn Rasterizer>,
    encoder: Box<dyn AnimationEncoder>,
    settings: StoreSettings,
    journal: Option<Journal>,
}

impl SessionStore {
    pub fn new(
        settings: StoreSettings,
        spawner: Box<dyn PtySpawner>,
        rasterizer: Arc<dyn Rasterizer>,
        encoder: Box<dyn AnimationEncoder>,
    ) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            spawner,
            rasterizer,
            encoder,
            settings,
            journal: None,
        }
    }

    /// Record every operation to `journal`.
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, Arc<Session>>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn journal(&self, tool: &str, input: Value, output: Value) {
        if let Some(journal) = &self.journal {
            if let Err(e) = journal.record(tool, &input, &output) {
                tracing::warn!(error = %e, path = %journal.path().display(), "Failed to write journal entry");
            }
        }
    }

    /// Ids of all live sessions, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.sessions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Result<Arc<Session>> {
        self.sessions()
            .get(id)
            .cloned()
            .ok_or_else(|| CaptureError::SessionNotFound { id: id.to_string() })
    }

    fn unused_id(&self) -> String {
        let sessions = self.sessions();
        loop {
            let uuid = Uuid::new_v4().simple().to_string();
            let id = format!("{}{}", ID_PREFIX, &uuid[..ID_SUFFIX_LEN]);
            if !sessions.contains_key(&id) {
                return id;
            }
        }
    }

    /// Spawn a new session and return it.
    pub fn start(&self, spec: SessionSpec) -> Result<Arc<Session>> {
        let theme = get_theme(spec.theme.as_deref().unwrap_or(&self.settings.theme))?;
        let command = PtyCommand {
            program: spec.command.clone(),
            args: spec.args.clone(),
            cols: spec.cols.filter(|c| *c > 0).unwrap_or(self.settings.cols),
            rows: spec.rows.filter(|r| *r > 0).unwrap_or(self.settings.rows),
            cwd: spec.cwd.clone(),
        };
        let options = RenderOptions {
            theme,
            font_size: self.settings.font_size,
            font_family: self.settings.font_family.clone(),
        };

        let id = self.unused_id();
        let paths = SessionPaths::new(&self.settings.output_dir, &self.settings.run_id, &id);
        let session = Arc::new(Session::start(
            id.clone(),
            &command,
            options,
            paths,
            self.spawner.as_ref(),
        )?);
        self.sessions().insert(id.clone(), Arc::clone(&session));

        self.journal(
            "start",
            json!({
                "command": spec.command,
                "args": spec.args,
                "cols": spec.cols,
                "rows": spec.rows,
                "theme": spec.theme,
            }),
            json!({ "session_id": id, "theme": theme.name }),
        );
        Ok(session)
    }

    /// Write input to a session. `delay` defaults to [`DEFAULT_SEND_DELAY`].
    pub fn send(&self, id: &str, input: &str, delay: Option<Duration>) -> Result<SendOutcome> {
        let delay = delay.unwrap_or(DEFAULT_SEND_DELAY);
        let outcome = self.get(id)?.send(input, delay)?;
        self.journal(
            "send",
            json!({ "session_id": id, "input": input, "delay_ms": delay.as_millis() as u64 }),
            json!({ "buffer_before": outcome.before, "buffer_after": outcome.after }),
        );
        Ok(outcome)
    }

    pub fn read(&self, id: &str, raw: bool) -> Result<String> {
        let output = self.get(id)?.read(raw);
        self.journal(
            "read",
            json!({ "session_id": id, "raw": raw }),
            json!({ "output": output }),
        );
        Ok(output)
    }

    pub fn screenshot(&self, id: &str, name: Option<&str>) -> Result<Screenshot> {
        let shot = self.get(id)?.screenshot(name, self.rasterizer.as_ref())?;
        self.journal(
            "screenshot",
            json!({ "session_id": id, "name": name }),
            json!({
                "name": shot.name,
                "png": shot.png,
                "svg": shot.svg,
                "ansi": shot.ansi,
                "text": shot.text,
            }),
        );
        Ok(shot)
    }

    /// Start recording a session. Returns the effective frame rate.
    pub fn record_start(&self, id: &str, fps: Option<u32>) -> Result<u32> {
        let session = self.get(id)?;
        let fps_used = session.record_start(fps, Arc::clone(&self.rasterizer))?;
        self.journal(
            "record_start",
            json!({ "session_id": id, "fps": fps }),
            json!({ "recording": true, "fps": fps_used }),
        );
        Ok(fps_used)
    }

    pub fn record_stop(&self, id: &str, name: Option<&str>) -> Result<RecordingSummary> {
        let summary = self.get(id)?.record_stop(name, self.encoder.as_ref())?;
        self.journal(
            "record_stop",
            json!({ "session_id": id, "name": name }),
            json!({
                "path": summary.path,
                "frame_count": summary.frame_count,
                "captured_frames": summary.captured_frames,
                "duplicates_skipped": summary.duplicates_skipped,
                "duration_ms": summary.duration_ms,
            }),
        );
        Ok(summary)
    }

    /// Stop a session and forget it.
    pub fn stop(&self, id: &str) -> Result<()> {
        let session = self
            .sessions()
            .remove(id)
            .ok_or_else(|| CaptureError::SessionNotFound { id: id.to_string() })?;
        session.stop()?;
        self.journal("stop", json!({ "session_id": id }), json!({ "success": true }));
        Ok(())
    }

    /// Stop every session, logging failures.
    pub fn stop_all(&self) {
        let sessions: Vec<Arc<Session>> = self.sessions().drain().map(|(_, s)| s).collect();
        for session in sessions {
            if let Err(e) = session.stop() {
                tracing::warn!(session = %session.id(), error = %e, "Failed to stop session");
            }
        }
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.stop_all();
    }
}
