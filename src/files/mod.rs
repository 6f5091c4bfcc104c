//! On-disk layout of session artifacts.
//!
//! ```text
//! <output_dir>/<run-id>/<session-id>/
//!   screenshots/<name>.{png,svg,ansi,txt}
//!   recordings/<name>.gif
//!   frames/frame000000.png   (only while recording)
//! ```

pub mod filename;

use std::path::{Path, PathBuf};

/// Directories belonging to one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPaths {
    root: PathBuf,
}

impl SessionPaths {
    pub fn new(output_dir: &Path, run_id: &str, session_id: &str) -> Self {
        Self {
            root: output_dir.join(run_id).join(session_id),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn screenshots(&self) -> PathBuf {
        self.root.join("screenshots")
    }

    pub fn recordings(&self) -> PathBuf {
        self.root.join("recordings")
    }

    pub fn frames(&self) -> PathBuf {
        self.root.join("frames")
    }
}
