//! JSONL journal of session operations.
//!
//! Each successful operation appends one line:
//! `{"ts":"2026-01-01T00:00:00.000Z","tool":"send","input":{..},"output":{..}}`.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

#[derive(Serialize)]
struct Entry<'a> {
    ts: String,
    tool: &'a str,
    input: &'a Value,
    output: &'a Value,
}

/// Append-only operation log.
#[derive(Debug)]
pub struct Journal {
    path: PathBuf,
    file: Mutex<File>,
}

impl Journal {
    /// Open `path` for appending, creating it and its parent directory.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry.
    pub fn record(&self, tool: &str, input: &Value, output: &Value) -> Result<()> {
        let entry = Entry {
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            tool,
            input,
            output,
        };
        let mut line = serde_json::to_string(&entry).map_err(std::io::Error::from)?;
        line.push('\n');

        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        // One write per line keeps concurrent entries from interleaving
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}
