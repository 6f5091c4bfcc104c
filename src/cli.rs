//! Command-line interface definition.
//!
//! Lives in the library so `xtask` can build the man page from it.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Capture terminal sessions as screenshots and GIF recordings.
#[derive(Debug, Parser)]
#[command(name = "termsnap", version = VERSION, about, long_about = None)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Version string with build metadata.
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("TERMSNAP_BUILD_DATE"),
    ", ",
    env!("VERGEN_GIT_SHA"),
    ")"
);

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a command, send input, and save a screenshot of the screen
    #[command(long_about = "Run a command on a pseudo-terminal, optionally send it input, \
        and save the final screen as PNG, SVG, ANSI and plain text.\n\n\
        Example:\n  termsnap screenshot --send 'ls --color\\r' -- bash")]
    Screenshot(ScreenshotArgs),

    /// Run a command and record the screen as an animated GIF
    #[command(long_about = "Run a command on a pseudo-terminal and record the screen as a GIF.\n\n\
        Recording lasts until the command exits, --duration-ms elapses, or Ctrl-C is pressed.\n\n\
        Example:\n  termsnap record --fps 15 --duration-ms 3000 -- htop")]
    Record(RecordArgs),

    /// List the built-in color themes
    Themes,

    /// Inspect the configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file location
    Path,
}

/// Options shared by every subcommand that runs a session.
#[derive(Debug, Clone, Args)]
pub struct SessionArgs {
    /// Input to send after start. Accepts \r \n \t \x1b \xHH \uHHHH. Repeatable.
    #[arg(short, long = "send", value_name = "INPUT")]
    pub send: Vec<String>,

    /// Wait after starting and after each input, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 500)]
    pub wait_ms: u64,

    /// Color theme (see `termsnap themes`)
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Terminal columns
    #[arg(long)]
    pub cols: Option<u16>,

    /// Terminal rows
    #[arg(long)]
    pub rows: Option<u16>,

    /// Output file name, without extension
    #[arg(short, long)]
    pub name: Option<String>,

    /// Root directory for session output
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<std::path::PathBuf>,

    /// Command to run, followed by its arguments
    #[arg(last = true, required = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct ScreenshotArgs {
    #[command(flatten)]
    pub session: SessionArgs,
}

#[derive(Debug, Clone, Args)]
pub struct RecordArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Frames per second (max 30)
    #[arg(long)]
    pub fps: Option<u32>,

    /// Stop recording after this many milliseconds
    #[arg(short, long, value_name = "MS")]
    pub duration_ms: Option<u64>,
}
