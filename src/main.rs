mod currencies;
mod error;
mod models;
mod session;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::debug;

use crate::session::Session;

/// Interactive currency converter over a local JSON rate table.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the currency rate file
    #[arg(long, default_value = "currencies.json")]
    file: PathBuf,
}

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    debug!("Loading currency data from {}", args.file.display());
    let table = currencies::load_currency_data(&args.file)
        .map_err(|e| anyhow::anyhow!("Failed to load currency data: {}", e))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(&table, stdin.lock(), stdout.lock());
    session.run()
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();
}
