//! termsnap binary entry point.

mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use termsnap::cli::{Cli, Commands, ConfigCommands};

/// Log filter: `RUST_LOG`, then `TERMSNAP_LOG`, then the `-v` count.
fn log_filter(verbose: u8) -> EnvFilter {
    let level = std::env::var("RUST_LOG")
        .or_else(|_| std::env::var("TERMSNAP_LOG"))
        .unwrap_or_else(|_| {
            match verbose {
                0 => "warn",
                1 => "info",
                _ => "debug",
            }
            .to_string()
        });
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
}

#[cfg(not(tarpaulin_include))]
fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries command output, logs go to stderr
    tracing_subscriber::registry()
        .with(log_filter(cli.verbose))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Screenshot(args) => commands::screenshot::handle(args),
        Commands::Record(args) => commands::record::handle(args),
        Commands::Themes => commands::themes::handle(),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(),
            ConfigCommands::Path => commands::config::handle_path(),
        },
        Commands::Completions { shell } => commands::completions::handle(shell),
    }
}
