// warden/src/logger.rs
//! Logger initialization for the warden CLI.
//! License: MIT OR Apache-2.0

use log::LevelFilter;

/// Initializes `env_logger`, honoring `RUST_LOG` unless an explicit level is
/// forced by a CLI flag. Safe to call more than once; later calls are no-ops.
pub fn init_logger(forced_level: Option<LevelFilter>) {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = forced_level {
        builder.filter_level(level);
    }
    // Logs belong on stderr; stdout carries redacted output.
    builder.target(env_logger::Target::Stderr);
    let _ = builder.try_init();
}
