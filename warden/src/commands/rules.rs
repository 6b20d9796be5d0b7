// warden/src/commands/rules.rs
//! The `rules` command: list the registered rules and their statistics.
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use warden_core::{RuleInfo, RuleRegistry, RuleStats};

use crate::cli::RulesCommand;

#[derive(Serialize)]
struct RulesReport {
    rules: Vec<RuleInfo>,
    stats: RuleStats,
}

pub fn run(cmd: RulesCommand) -> Result<()> {
    let registry = RuleRegistry::with_builtin_rules()?;
    let report = RulesReport {
        rules: registry.infos(),
        stats: registry.stats(),
    };

    if cmd.json {
        let rendered = serde_json::to_string_pretty(&report).context("serializing rules report")?;
        println!("{}", rendered);
        return Ok(());
    }

    println!(
        "{} ({} registered, {} enabled)",
        "Rules".bold(),
        report.stats.total_rules,
        report.stats.enabled_rules
    );
    for rule in &report.rules {
        println!(
            "  {:<16} {:<28} {:>10}/{:<8} {}",
            rule.id,
            rule.name,
            rule.category.to_string(),
            rule.severity.to_string(),
            if rule.enabled { "enabled" } else { "disabled" }
        );
    }
    println!();
    for (category, count) in &report.stats.rules_by_category {
        println!("  {:<12} {}", category.to_string(), count);
    }
    Ok(())
}
