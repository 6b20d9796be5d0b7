// warden/src/main.rs
//! Entry point for the warden CLI.
//! License: MIT OR Apache-2.0

mod cli;
mod commands;
mod logger;

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Pick up WARDEN_HASH_SALT / WARDEN_ENV from a local .env when present.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let forced_level = if cli.debug {
        Some(LevelFilter::Debug)
    } else if cli.quiet {
        Some(LevelFilter::Error)
    } else {
        None
    };
    logger::init_logger(forced_level);

    match cli.command {
        Commands::Redact(cmd) => commands::redact::run(cmd),
        Commands::Scan(cmd) => commands::scan::run(cmd),
        Commands::Rules(cmd) => commands::rules::run(cmd),
    }
}
