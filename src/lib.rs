//! termsnap: capture live terminal sessions.
//!
//! A process runs on a pseudo-terminal, its output is fed through a terminal
//! emulator, and the resulting screen can be captured as plain text, ANSI
//! text, SVG, PNG, or recorded over time into an animated GIF.

pub mod animation;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod files;
pub mod journal;
pub mod raster;
pub mod recording;
pub mod render;
pub mod session;
pub mod terminal;
pub mod theme;

pub use config::Config;
pub use error::{CaptureError, Result};
pub use session::{Session, SessionSpec, SessionStore, StoreSettings};
