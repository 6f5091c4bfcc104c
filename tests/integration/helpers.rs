//! Shared helpers for integration tests

use std::path::Path;
use std::process::Command;

use termsnap::terminal::{Snapshot, TerminalBuffer};

/// Run the termsnap binary with its config file pointed at `config`.
///
/// Returns `(stdout, stderr, exit_code)`.
pub fn run_termsnap(args: &[&str], config: &Path) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_termsnap"))
        .args(args)
        .env("TERMSNAP_CONFIG", config)
        .env_remove("RUST_LOG")
        .env_remove("TERMSNAP_LOG")
        .output()
        .expect("Failed to execute termsnap");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

/// Feed `input` through a fresh `cols` x `rows` terminal and snapshot it.
pub fn screen(cols: usize, rows: usize, input: &str) -> Snapshot {
    let mut buffer = TerminalBuffer::new(cols, rows);
    buffer.process(input);
    buffer.snapshot()
}
