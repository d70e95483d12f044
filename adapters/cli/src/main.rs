#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Tileshift from a line-oriented script.

mod command;
mod session;
mod settings;

use std::{
    fs::File,
    io::{self, BufReader},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::{
    session::{EventFormat, Session},
    settings::Settings,
};

/// Command-line arguments accepted by the Tileshift CLI.
#[derive(Debug, Parser)]
#[command(name = "tileshift", version, about = "Play Tileshift in the terminal")]
struct CliArgs {
    /// TOML file with `[board]`, `[[goals]]` and `[input]` tables.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Overrides the board seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Overrides the board width.
    #[arg(long)]
    width: Option<u32>,
    /// Overrides the board height.
    #[arg(long)]
    height: Option<u32>,
    /// How board events are printed.
    #[arg(long, value_enum, default_value_t = EventFormat::Text)]
    events: EventFormat,
    /// Reads commands from a file instead of standard input.
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,
}

/// Entry point for the Tileshift command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing();

    let mut settings = Settings::load(args.config.as_deref())?;
    settings.override_board(args.seed, args.width, args.height);

    let stdout = io::stdout();
    let mut session = Session::start(&settings, args.events, stdout.lock())?;
    match args.script {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            session.run(BufReader::new(file))
        }
        None => session.run(io::stdin().lock()),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
