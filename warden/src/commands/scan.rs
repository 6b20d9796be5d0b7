// warden/src/commands/scan.rs
//! The `scan` command: detection-only reporting, with an optional exit-code
//! gate for export pipelines.
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use warden_core::DetectionReport;

use crate::cli::ScanCommand;
use crate::commands::{build_engine, read_input};

pub fn run(cmd: ScanCommand) -> Result<()> {
    let engine = build_engine(cmd.config.as_deref(), cmd.rules.as_deref())?;
    let input = read_input(cmd.input_file.as_deref())?;

    let report = engine.contains_pii(&input);

    if cmd.json {
        let rendered =
            serde_json::to_string_pretty(&report).context("serializing detection report")?;
        println!("{}", rendered);
    } else {
        print_report(&report);
    }

    if cmd.fail_on_pii && report.has_pii {
        let categories: Vec<String> = report.categories.iter().map(|c| c.to_string()).collect();
        eprintln!(
            "Blocked: sensitive data present (categories: {}).",
            categories.join(", ")
        );
        std::process::exit(2);
    }
    Ok(())
}

fn print_report(report: &DetectionReport) {
    if !report.has_pii {
        eprintln!("No sensitive data detected.");
        return;
    }
    eprintln!("{}", "Detection Summary".bold());
    for rule_match in &report.rule_matches {
        eprintln!(
            "  {}: {} match(es) [{}/{}]",
            rule_match.rule_id, rule_match.count, rule_match.category, rule_match.severity
        );
    }
    let categories: Vec<String> = report.categories.iter().map(|c| c.to_string()).collect();
    eprintln!("Categories: {}", categories.join(", "));
}
