//! Pseudo-terminal channel.
//!
//! [`PtyChannel`] is the seam between a session and the process it drives:
//! bytes go in through `write`, output comes back through the `on_data`
//! callback. [`NativePtySpawner`] backs it with `portable-pty`.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::thread;

use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};

use crate::error::{CaptureError, Result};

/// Variables removed from the child environment so the process does not
/// believe it runs inside the terminal multiplexer or emulator of the parent.
const PARENT_TERMINAL_VARS: &[&str] = &[
    "TERM_PROGRAM",
    "TERM_PROGRAM_VERSION",
    "TERM_SESSION_ID",
    "ITERM_SESSION_ID",
    "ITERM_PROFILE",
    "TMUX",
    "TMUX_PANE",
    "STY",
    "WINDOW",
];

/// Receives raw output chunks from the PTY reader thread.
pub type DataCallback = Box<dyn FnMut(&[u8]) + Send>;

/// What to run and at which size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PtyCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cols: u16,
    pub rows: u16,
    pub cwd: Option<PathBuf>,
}

/// A running process attached to a pseudo-terminal.
pub trait PtyChannel: Send {
    /// Write input bytes to the process.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Start delivering output to `callback`. Can only be called once.
    fn on_data(&mut self, callback: DataCallback) -> Result<()>;

    /// Terminate the process. Safe to call more than once.
    fn kill(&mut self) -> Result<()>;

    /// Whether the process is still running.
    fn is_alive(&mut self) -> bool;
}

/// Starts processes on fresh pseudo-terminals.
pub trait PtySpawner: Send + Sync {
    fn spawn(&self, command: &PtyCommand) -> Result<Box<dyn PtyChannel>>;
}

fn pty_error(context: &str, err: impl std::fmt::Display) -> CaptureError {
    CaptureError::Pty(format!("{}: {}", context, err))
}

/// Build the child command with a clean terminal environment.
pub fn build_command(command: &PtyCommand) -> CommandBuilder {
    let mut cmd = CommandBuilder::new(&command.program);
    cmd.args(&command.args);
    if let Some(cwd) = &command.cwd {
        cmd.cwd(cwd);
    } else if let Ok(cwd) = std::env::current_dir() {
        cmd.cwd(cwd);
    }

    for (key, value) in std::env::vars() {
        cmd.env(key, value);
    }
    for key in PARENT_TERMINAL_VARS {
        cmd.env_remove(key);
    }
    cmd.env("TERM", "xterm-256color");
    cmd.env("COLORTERM", "truecolor");
    cmd
}

/// [`PtySpawner`] using the platform's native PTY implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativePtySpawner;

impl PtySpawner for NativePtySpawner {
    fn spawn(&self, command: &PtyCommand) -> Result<Box<dyn PtyChannel>> {
        let pair = native_pty_system()
            .openpty(PtySize {
                rows: command.rows,
                cols: command.cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| pty_error("failed to open pty", e))?;

        let child = pair
            .slave
            .spawn_command(build_command(command))
            .map_err(|e| pty_error(&format!("failed to spawn '{}'", command.program), e))?;
        // Only the child keeps the slave open, so EOF arrives when it exits
        drop(pair.slave);

        let writer = pair
            .master
            .take_writer()
            .map_err(|e| pty_error("failed to open pty writer", e))?;
        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| pty_error("failed to open pty reader", e))?;

        tracing::info!(
            program = %command.program,
            pid = child.process_id().unwrap_or(0),
            cols = command.cols,
            rows = command.rows,
            "PTY spawned"
        );

        Ok(Box::new(NativePty {
            _master: pair.master,
            writer,
            child,
            reader: Some(reader),
        }))
    }
}

struct NativePty {
    // Kept alive for the lifetime of the session
    _master: Box<dyn MasterPty + Send>,
    writer: Box<dyn Write + Send>,
    child: Box<dyn Child + Send + Sync>,
    reader: Option<Box<dyn Read + Send>>,
}

impl PtyChannel for NativePty {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.writer.flush()?;
        Ok(())
    }

    fn on_data(&mut self, mut callback: DataCallback) -> Result<()> {
        let mut reader = self
            .reader
            .take()
            .ok_or_else(|| CaptureError::Pty("output is already being read".to_string()))?;

        // Detached: the thread ends on EOF once the child exits
        thread::Builder::new()
            .name("termsnap-pty-reader".to_string())
            .spawn(move || {
                let mut buf = [0u8; 4096];
                loop {
                    match reader.read(&mut buf) {
                        Ok(0) => break,
                        Ok(n) => callback(&buf[..n]),
                        Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                        Err(e) => {
                            // EIO is the normal end of a Linux PTY
                            tracing::debug!(error = %e, "PTY read ended");
                            break;
                        }
                    }
                }
            })?;
        Ok(())
    }

    fn kill(&mut self) -> Result<()> {
        if self.is_alive() {
            self.child.kill()?;
            // Reap so no zombie is left behind
            let _ = self.child.wait();
        }
        Ok(())
    }

    fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }
}

impl Drop for NativePty {
    fn drop(&mut self) {
        if let Err(e) = self.kill() {
            tracing::warn!(error = %e, "Failed to kill PTY child");
        }
    }
}
