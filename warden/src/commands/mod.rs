// warden/src/commands/mod.rs
//! Command implementations and the helpers they share.
//! License: MIT OR Apache-2.0

pub mod redact;
pub mod rules;
pub mod scan;

use anyhow::{Context, Result};
use log::debug;
use std::io::Read;
use std::path::Path;
use warden_core::{CustomRuleSpec, EngineConfig, HashSalt, RedactionEngine};

/// Reads the whole input from a file, or from stdin when no file is given.
pub(crate) fn read_input(input_file: Option<&Path>) -> Result<String> {
    match input_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading from stdin")?;
            Ok(buffer)
        }
    }
}

/// Loads the policy from `--config`, or the embedded default policy.
pub(crate) fn load_config(config_file: Option<&Path>) -> Result<EngineConfig> {
    match config_file {
        Some(path) => EngineConfig::load_from_file(path),
        None => EngineConfig::load_default_policy(),
    }
}

/// Builds an engine, registering any custom rules from `--rules`.
///
/// The hashing salt is mandatory even for runs that never reach the HASH
/// level: an engine that cannot pseudonymize must not be constructible.
pub(crate) fn build_engine(
    config_file: Option<&Path>,
    rules_file: Option<&Path>,
) -> Result<RedactionEngine> {
    let config = load_config(config_file)?;
    let salt = HashSalt::from_env()
        .context("a hashing salt is required; set WARDEN_HASH_SALT (or put it in .env)")?;
    let engine = RedactionEngine::new(config, salt)?;

    if let Some(path) = rules_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading rules file {}", path.display()))?;
        let specs: Vec<CustomRuleSpec> = serde_yml::from_str(&text)
            .with_context(|| format!("parsing rules file {}", path.display()))?;
        debug!("Registering {} custom rule(s) from {}.", specs.len(), path.display());
        for spec in specs {
            let id = spec.id.clone();
            engine
                .add_custom_rule(spec)
                .with_context(|| format!("registering custom rule '{}'", id))?;
        }
    }
    Ok(engine)
}

/// Writes output to a file, or to stdout when no file is given.
pub(crate) fn write_output(output_file: Option<&Path>, content: &str) -> Result<()> {
    match output_file {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("writing output file {}", path.display())),
        None => {
            println!("{}", content.trim_end_matches('\n'));
            Ok(())
        }
    }
}
