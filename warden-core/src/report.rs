//! Result and report types produced by the redaction engine, plus the
//! PII-safe logging helpers used across the library.
//!
//! Results are ephemeral values with no identity beyond the call that
//! produced them; nothing in this module persists state. The audit boundary
//! lives here too: [`RedactionResult::audit_entries`] is the only projection
//! downstream log writers should persist, and it carries counts and
//! classifications, never matched text.
//!
//! License: MIT OR Apache-2.0

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::policy::RedactionLevel;
use crate::rules::{RuleCategory, Severity};

lazy_static! {
    /// Initialized once to decide whether raw matched text may appear in
    /// debug logs. Off by default; local debugging only.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("WARDEN_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// Collapses a sensitive string to a length hint for log output.
pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

/// What a debug log line may show for a matched value.
pub(crate) fn loggable(sensitive: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive.to_string()
    } else {
        redact_sensitive(sensitive)
    }
}

/// A single substitution, with offsets into the text as it stood when the
/// owning rule was applied (earlier rules' replacements already in place).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPosition {
    pub start: usize,
    pub end: usize,
    pub original: String,
    pub redacted: String,
}

/// Everything one rule did to one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRedaction {
    pub rule_id: String,
    pub category: RuleCategory,
    pub severity: Severity,
    pub match_count: usize,
    pub positions: Vec<MatchPosition>,
}

/// The outcome of a single redacting call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionResult {
    pub original_text: String,
    pub redacted_text: String,
    pub redactions_applied: Vec<RuleRedaction>,
    pub level: RedactionLevel,
    /// RFC 3339 timestamp of when the call ran.
    pub timestamp: String,
}

impl RedactionResult {
    /// True when no rule touched the input.
    pub fn is_clean(&self) -> bool {
        self.redactions_applied.is_empty()
    }

    /// Total substitutions across all rules.
    pub fn total_matches(&self) -> usize {
        self.redactions_applied.iter().map(|r| r.match_count).sum()
    }

    /// Audit-safe projection: classifications and counts only. Downstream
    /// writers persist these, never the result itself.
    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        self.redactions_applied
            .iter()
            .map(|r| AuditEntry {
                timestamp: self.timestamp.clone(),
                rule_id: r.rule_id.clone(),
                category: r.category,
                severity: r.severity,
                match_count: r.match_count,
                level: self.level,
            })
            .collect()
    }
}

/// One persistable audit record per applied rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: String,
    pub rule_id: String,
    pub category: RuleCategory,
    pub severity: Severity,
    pub match_count: usize,
    pub level: RedactionLevel,
}

/// Read-only detection outcome; reports presence without mutating anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub has_pii: bool,
    pub categories: BTreeSet<RuleCategory>,
    pub severities: BTreeSet<Severity>,
    pub rule_matches: Vec<RuleMatchCount>,
}

/// Per-rule hit count inside a [`DetectionReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMatchCount {
    pub rule_id: String,
    pub category: RuleCategory,
    pub severity: Severity,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_sensitive_short_string() {
        assert_eq!(redact_sensitive("abc"), "[REDACTED]".to_string());
    }

    #[test]
    fn redact_sensitive_long_string() {
        assert_eq!(redact_sensitive("123456789"), "[REDACTED: 9 chars]".to_string());
    }

    #[test]
    fn audit_entries_carry_no_matched_text() {
        let result = RedactionResult {
            original_text: "ring 07700 900123".to_string(),
            redacted_text: "ring [PHONE_REDACTED]".to_string(),
            redactions_applied: vec![RuleRedaction {
                rule_id: "uk_phone".to_string(),
                category: RuleCategory::Contact,
                severity: Severity::Medium,
                match_count: 1,
                positions: vec![MatchPosition {
                    start: 5,
                    end: 17,
                    original: "07700 900123".to_string(),
                    redacted: "[PHONE_REDACTED]".to_string(),
                }],
            }],
            level: RedactionLevel::Full,
            timestamp: "2025-01-01T00:00:00Z".to_string(),
        };
        let entries = result.audit_entries();
        assert_eq!(entries.len(), 1);
        let serialized = serde_json::to_string(&entries).unwrap();
        assert!(!serialized.contains("07700"));
        assert_eq!(entries[0].match_count, 1);
    }
}
