// warden/src/cli.rs
//! This file defines the command-line interface (CLI) for the warden binary,
//! including all available commands and their arguments.
//! License: MIT OR Apache-2.0

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use warden_core::{RedactionLevel, RuleCategory};

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "warden",
    author = "Warden Team",
    version = env!("CARGO_PKG_VERSION"),
    about = "Redact sensitive data from text and JSON",
    long_about = "Warden is a command-line utility for scrubbing personally identifiable \
and sensitive information from text-based data before it crosses a trust boundary. It \
redacts logs, documents, and JSON payloads according to a configurable rule set and \
role-based policy.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Suppress all informational messages.
    #[arg(long, short = 'q', help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long, short = 'd', help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `warden` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Redacts an input file or stdin according to the active policy.
    #[command(about = "Redacts an input file or stdin according to the active policy.")]
    Redact(RedactCommand),

    /// Scans an input for sensitive data and reports what is present without redacting.
    #[command(about = "Scans an input for sensitive data without redacting it.")]
    Scan(ScanCommand),

    /// Lists the registered detection rules and their statistics.
    #[command(about = "Lists the registered detection rules and their statistics.")]
    Rules(RulesCommand),
}

/// Arguments for the `redact` command.
#[derive(Parser, Debug)]
pub struct RedactCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Write redacted output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a file instead of stdout.")]
    pub output: Option<PathBuf>,

    /// Caller role used for level resolution (e.g. "solicitor").
    #[arg(long, value_name = "ROLE", help = "Caller role used to resolve the redaction level.")]
    pub role: Option<String>,

    /// Explicit redaction level, overriding role and environment policy.
    #[arg(long, value_name = "LEVEL", help = "Explicit redaction level, overriding the policy.")]
    pub level: Option<LevelArg>,

    /// Categories to exempt from redaction for this run (comma-separated).
    #[arg(long, value_delimiter = ',', value_name = "CATEGORY", help = "Exempt these categories (comma-separated).")]
    pub exempt: Vec<CategoryArg>,

    /// Treat the input as a JSON document and redact every string leaf.
    #[arg(long, help = "Treat the input as a JSON document and redact every string leaf.")]
    pub json: bool,

    /// Print a per-rule redaction summary to stderr (counts only, never matched text).
    #[arg(long, help = "Print a per-rule redaction summary to stderr.")]
    pub summary: bool,

    /// Path to a custom redaction policy file (YAML).
    #[arg(long = "config", value_name = "FILE", help = "Path to a custom redaction policy file (YAML).")]
    pub config: Option<PathBuf>,

    /// Path to a YAML file of additional custom rules to register.
    #[arg(long = "rules", value_name = "FILE", help = "Path to a YAML file of additional custom rules.")]
    pub rules: Option<PathBuf>,
}

/// Arguments for the `scan` command.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Path to a custom redaction policy file (YAML).
    #[arg(long = "config", value_name = "FILE", help = "Path to a custom redaction policy file (YAML).")]
    pub config: Option<PathBuf>,

    /// Path to a YAML file of additional custom rules to register.
    #[arg(long = "rules", value_name = "FILE", help = "Path to a YAML file of additional custom rules.")]
    pub rules: Option<PathBuf>,

    /// Print the detection report as JSON to stdout.
    #[arg(long = "json", help = "Print the detection report as JSON to stdout.")]
    pub json: bool,

    /// Exit with a non-zero code when sensitive data is detected.
    #[arg(long = "fail-on-pii", help = "Exit with a non-zero code when sensitive data is detected.")]
    pub fail_on_pii: bool,
}

/// Arguments for the `rules` command.
#[derive(Parser, Debug)]
pub struct RulesCommand {
    /// Print rules and statistics as JSON to stdout.
    #[arg(long = "json", help = "Print rules and statistics as JSON to stdout.")]
    pub json: bool,
}

/// Redaction level choices exposed on the command line.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum LevelArg {
    /// Pass data through untouched (trusted path).
    None,
    /// Mask most characters while preserving format.
    Partial,
    /// Replace matches with fixed category tags.
    Full,
    /// Replace matches with deterministic pseudonym tokens.
    Hash,
}

impl From<LevelArg> for RedactionLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::None => RedactionLevel::None,
            LevelArg::Partial => RedactionLevel::Partial,
            LevelArg::Full => RedactionLevel::Full,
            LevelArg::Hash => RedactionLevel::Hash,
        }
    }
}

/// Rule category choices exposed on the command line.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum CategoryArg {
    Pii,
    Financial,
    Legal,
    Contact,
    Identifier,
}

impl From<CategoryArg> for RuleCategory {
    fn from(category: CategoryArg) -> Self {
        match category {
            CategoryArg::Pii => RuleCategory::Pii,
            CategoryArg::Financial => RuleCategory::Financial,
            CategoryArg::Legal => RuleCategory::Legal,
            CategoryArg::Contact => RuleCategory::Contact,
            CategoryArg::Identifier => RuleCategory::Identifier,
        }
    }
}
