// warden/src/commands/redact.rs
//! The `redact` command: scrub a text or JSON input and emit the result.
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde_json::Value;
use warden_core::{RedactionResult, RuleCategory};

use crate::cli::RedactCommand;
use crate::commands::{build_engine, read_input, write_output};

pub fn run(cmd: RedactCommand) -> Result<()> {
    let engine = build_engine(cmd.config.as_deref(), cmd.rules.as_deref())?;
    let input = read_input(cmd.input_file.as_deref())?;

    let exempt: Option<Vec<RuleCategory>> = if cmd.exempt.is_empty() {
        None
    } else {
        Some(cmd.exempt.iter().map(|c| (*c).into()).collect())
    };
    let role = cmd.role.as_deref();
    let level = cmd.level.map(Into::into);

    let results: Vec<RedactionResult>;
    if cmd.json {
        let value: Value = serde_json::from_str(&input)
            .context("parsing input as JSON (drop --json for plain text)")?;
        let out = engine.redact_value(&value, role, level, exempt.as_deref())?;
        let rendered =
            serde_json::to_string_pretty(&out.redacted).context("serializing redacted JSON")?;
        write_output(cmd.output.as_deref(), &rendered)?;
        results = out.summary;
    } else {
        let result = engine.redact(&input, role, level, exempt.as_deref());
        write_output(cmd.output.as_deref(), &result.redacted_text)?;
        results = vec![result];
    }

    if cmd.summary {
        print_summary(&results);
    }
    Ok(())
}

/// Per-rule counts and classifications on stderr. Never matched text.
fn print_summary(results: &[RedactionResult]) {
    let mut any = false;
    for result in results {
        for redaction in &result.redactions_applied {
            if !any {
                eprintln!("{}", "Redaction Summary".bold());
                any = true;
            }
            eprintln!(
                "  {}: {} match(es) [{}/{}]",
                redaction.rule_id,
                redaction.match_count,
                redaction.category,
                redaction.severity
            );
        }
    }
    if !any {
        eprintln!("No redaction matches found.");
    }
}
