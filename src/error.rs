//! Errors surfaced by capture, rendering and recording operations.

/// Errors that can occur while driving a capture session.
///
/// Lookup failures (`SessionNotFound`, `AlreadyRecording`, `NotRecording`) are
/// returned immediately. `TransientFrameWrite` only ever appears inside the
/// recording loop, where it is logged and counted instead of propagated.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Session not found: {id}")]
    SessionNotFound { id: String },

    #[error("Session {id} is already recording")]
    AlreadyRecording { id: String },

    #[error("Session {id} is not recording")]
    NotRecording { id: String },

    #[error("Recording captured no frames")]
    EmptyRecording,

    #[error("Render failed: {0}")]
    Render(String),

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("Failed to write frame {index}: {source}")]
    TransientFrameWrite {
        index: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown theme '{name}'. Available: {available}")]
    UnknownTheme { name: String, available: String },

    #[error("Terminal process error: {0}")]
    Pty(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used across the library.
pub type Result<T> = std::result::Result<T, CaptureError>;
