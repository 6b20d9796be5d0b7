// warden-core/src/lib.rs
//! # Warden Core Library
//!
//! `warden-core` scrubs personally identifiable and sensitive information
//! out of text and structured data before it crosses a trust boundary, such
//! as an API response, a log line, or an export file. It provides an ordered registry
//! of pattern-based detection rules, a policy layer that resolves *how much*
//! to redact from the caller's role and environment, and an engine that
//! applies redactions to strings and to arbitrarily nested JSON values
//! without corrupting already-redacted output.
//!
//! The library performs no I/O, never suspends, and persists nothing; every
//! operation is synchronous and bounded by input size.
//!
//! ## Modules
//!
//! * `policy`: Redaction levels and the `EngineConfig` policy with its
//!   precedence-based level resolution.
//! * `rules`: Rule definitions, level-polymorphic replacement strategies,
//!   and the built-in UK-legal-stack rule set.
//! * `registry`: The shared, ordered rule arena with runtime registration
//!   and enable/disable toggling.
//! * `engine`: The redaction engine: scanning, overlap-guarded replacement,
//!   and detection-only reporting.
//! * `walker`: Shape-preserving traversal of nested JSON values.
//! * `pseudonym`: Deterministic salted hashing for the HASH level.
//! * `validators`: Programmatic checks (NINO structure, Luhn) that cut
//!   regex false positives.
//! * `report`: Result, detection, and audit-projection types.
//! * `errors`: The `WardenError` type.
//!
//! ## Usage Example
//!
//! ```rust
//! use warden_core::{EngineConfig, HashSalt, RedactionEngine};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     // 1. Start from the embedded default policy (conservative FULL default).
//!     let config = EngineConfig::load_default_policy()?;
//!
//!     // 2. The hashing salt arrives out-of-band; never hard-code it.
//!     let salt = HashSalt::new("rotate-me-per-deployment")?;
//!
//!     // 3. Build the engine over the built-in rule set.
//!     let engine = RedactionEngine::new(config, salt)?;
//!
//!     // 4. Redact on behalf of an untrusted caller.
//!     let result = engine.redact(
//!         "Contact John Smith at john.smith@example.com",
//!         Some("guest"),
//!         None,
//!         None,
//!     );
//!     assert_eq!(
//!         result.redacted_text,
//!         "Contact [NAME_REDACTED] at [EMAIL_REDACTED]",
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`WardenError`]; policy-file loading uses
//! `anyhow::Error` with context, as those errors surface directly to
//! operators. Logging triggered by redaction is best-effort by construction
//! and can never alter a returned result.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod engine;
pub mod errors;
pub mod policy;
pub mod pseudonym;
pub mod registry;
pub mod report;
pub mod rules;
pub mod validators;
pub mod walker;

/// Re-exports the engine, the single entry point for redaction, detection,
/// and rule administration.
pub use engine::RedactionEngine;

/// Re-exports the custom error type for clear error reporting.
pub use errors::WardenError;

/// Re-exports policy types: levels and the process-wide configuration.
pub use policy::{EngineConfig, RedactionLevel, ENVIRONMENT_VAR};

/// Re-exports the pseudonymization primitives for the HASH level.
pub use pseudonym::{HashPseudonymizer, HashSalt, SALT_VAR};

/// Re-exports the rule registry and its stats aggregation.
pub use registry::{RuleRegistry, RuleStats};

/// Re-exports result and report types produced by engine calls.
pub use report::{
    redact_sensitive, AuditEntry, DetectionReport, MatchPosition, RedactionResult,
    RuleMatchCount, RuleRedaction,
};

/// Re-exports rule definition types for custom rule authors.
pub use rules::{
    builtin_rules, CustomRuleSpec, LevelTable, PartialStrategy, RedactionRule, RuleCategory,
    RuleInfo, Severity, MAX_PATTERN_LENGTH,
};

/// Re-exports the walker's output type and depth cap.
pub use walker::{RedactedValue, MAX_VALUE_DEPTH};
