//! Detection rule definitions for `warden-core`.
//!
//! A [`RedactionRule`] couples a precompiled pattern with a category, a
//! severity, and a [`LevelTable`] holding one replacement behavior per
//! redaction level. The built-in set targets the identifiers that circulate
//! in a UK legal-services stack (NINOs, sort codes, case references) next to
//! the universal ones (emails, phone numbers, card numbers).
//!
//! Rule authoring discipline: every pattern uses bounded quantifiers
//! (explicit digit/character counts, never an unbounded `.+`) so matching
//! stays linear in input length. This is enforced by review at definition
//! time, not by a runtime safeguard.
//!
//! License: MIT OR Apache-2.0

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::WardenError;

/// Maximum allowed length for a rule pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Broad classification of what a rule detects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    Pii,
    Financial,
    Legal,
    Contact,
    Identifier,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleCategory::Pii => "PII",
            RuleCategory::Financial => "FINANCIAL",
            RuleCategory::Legal => "LEGAL",
            RuleCategory::Contact => "CONTACT",
            RuleCategory::Identifier => "IDENTIFIER",
        };
        write!(f, "{}", name)
    }
}

/// How damaging a leak of this data class would be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        };
        write!(f, "{}", name)
    }
}

/// Format-preserving masking strategies for the PARTIAL level.
///
/// Data-driven rather than function-valued so rules stay serializable and a
/// rule's whole level behavior can be read off its definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PartialStrategy {
    /// Keep the first `head` and last `tail` characters, mask the rest.
    Edges { head: usize, tail: usize },
    /// Keep the first character of the local part and the whole domain.
    EmailLocalPart,
    /// NINO layout: two prefix characters, then the fixed `XX XX XX X` mask.
    NinoGroups,
    /// Mask every digit except the last `tail`, keeping separators visible.
    DigitsKeepTail { tail: usize },
    /// Reduce each word to its initial ("John Smith" -> "J. S.").
    Initials,
    /// Mask every alphanumeric character.
    All,
}

impl PartialStrategy {
    /// Applies the mask to a matched substring.
    pub fn apply(&self, matched: &str) -> String {
        match self {
            PartialStrategy::Edges { head, tail } => {
                let total = matched.chars().count();
                matched
                    .chars()
                    .enumerate()
                    .map(|(i, c)| {
                        if i < *head || i + *tail >= total {
                            c
                        } else if c.is_alphanumeric() {
                            'X'
                        } else {
                            c
                        }
                    })
                    .collect()
            }
            PartialStrategy::EmailLocalPart => match matched.split_once('@') {
                Some((local, domain)) => {
                    let mut out = String::with_capacity(matched.len());
                    let mut chars = local.chars();
                    if let Some(first) = chars.next() {
                        out.push(first);
                    }
                    out.extend(chars.map(|_| '*'));
                    out.push('@');
                    out.push_str(domain);
                    out
                }
                None => PartialStrategy::All.apply(matched),
            },
            PartialStrategy::NinoGroups => {
                let prefix: String = matched
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .take(2)
                    .collect();
                format!("{}XX XX XX X", prefix)
            }
            PartialStrategy::DigitsKeepTail { tail } => {
                let digit_total = matched.chars().filter(|c| c.is_ascii_digit()).count();
                let mask_until = digit_total.saturating_sub(*tail);
                let mut seen = 0usize;
                let mut out = String::with_capacity(matched.len());
                for c in matched.chars() {
                    if c.is_ascii_digit() {
                        out.push(if seen < mask_until { 'X' } else { c });
                        seen += 1;
                    } else {
                        out.push(c);
                    }
                }
                out
            }
            PartialStrategy::Initials => matched
                .split_whitespace()
                .filter_map(|word| word.chars().next())
                .map(|c| format!("{}.", c))
                .collect::<Vec<_>>()
                .join(" "),
            PartialStrategy::All => matched
                .chars()
                .map(|c| if c.is_alphanumeric() { 'X' } else { c })
                .collect(),
        }
    }
}

/// One replacement behavior per redaction level, colocated on the rule.
///
/// NONE is the identity and never reaches a rule: the engine short-circuits
/// before scanning. FULL emits `full_token` verbatim, PARTIAL applies the
/// masking strategy, and HASH feeds `hash_prefix` to the pseudonymizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTable {
    pub full_token: String,
    pub partial: PartialStrategy,
    pub hash_prefix: String,
}

/// Post-match checks that a regex alone cannot express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Refiner {
    /// HMRC structural rules for National Insurance numbers.
    UkNino,
    /// Luhn checksum for card numbers.
    Luhn,
    /// Trims leading/trailing non-name words from capitalized-word runs.
    PersonName,
}

/// A single detection rule with its compiled pattern.
#[derive(Debug, Clone)]
pub struct RedactionRule {
    /// Unique identifier (e.g. "uk_nino"). Stable across registry snapshots.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    pub description: Option<String>,
    /// Precompiled pattern; compiled once when the rule enters the registry.
    pub pattern: Regex,
    pub category: RuleCategory,
    pub severity: Severity,
    pub enabled: bool,
    pub levels: LevelTable,
    pub refiner: Option<Refiner>,
}

impl RedactionRule {
    /// Serializable, mutation-proof view of this rule for callers.
    pub fn info(&self) -> RuleInfo {
        RuleInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            pattern: self.pattern.as_str().to_string(),
            category: self.category,
            severity: self.severity,
            enabled: self.enabled,
        }
    }
}

/// Snapshot view of a rule, safe to hand out across the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleInfo {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub pattern: String,
    pub category: RuleCategory,
    pub severity: Severity,
    pub enabled: bool,
}

/// A user-supplied rule definition, as it arrives from a config file or API
/// call, before pattern compilation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomRuleSpec {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub pattern: String,
    pub category: RuleCategory,
    pub severity: Severity,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub full_token: Option<String>,
    pub partial: Option<PartialStrategy>,
    pub hash_prefix: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl CustomRuleSpec {
    /// Compiles the spec into a registrable rule, deriving any omitted level
    /// behaviors from the rule id.
    pub fn compile(self) -> Result<RedactionRule, WardenError> {
        let pattern = compile_pattern(&self.id, &self.pattern)?;
        let tag = self
            .id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect::<String>();
        Ok(RedactionRule {
            name: self.name.unwrap_or_else(|| self.id.clone()),
            description: self.description,
            pattern,
            category: self.category,
            severity: self.severity,
            enabled: self.enabled,
            levels: LevelTable {
                full_token: self
                    .full_token
                    .unwrap_or_else(|| format!("[{}_REDACTED]", tag)),
                partial: self
                    .partial
                    .unwrap_or(PartialStrategy::Edges { head: 1, tail: 1 }),
                hash_prefix: self.hash_prefix.unwrap_or(tag),
            },
            refiner: None,
            id: self.id,
        })
    }
}

/// Compiles a pattern string with the library-wide limits applied.
pub fn compile_pattern(rule_id: &str, pattern: &str) -> Result<Regex, WardenError> {
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(WardenError::PatternLengthExceeded(
            rule_id.to_string(),
            pattern.len(),
            MAX_PATTERN_LENGTH,
        ));
    }
    RegexBuilder::new(pattern)
        .size_limit(10 * (1 << 20))
        .build()
        .map_err(|e| WardenError::RuleCompilation(rule_id.to_string(), e))
}

struct BuiltinRule {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    pattern: &'static str,
    category: RuleCategory,
    severity: Severity,
    full_token: &'static str,
    partial: PartialStrategy,
    hash_prefix: &'static str,
    refiner: Option<Refiner>,
}

// Registration order is significant: when two rules could match overlapping
// input, the earlier rule wins the span. Specific, validated formats come
// before broad numeric and word-shape patterns.
const BUILTIN_RULES: &[BuiltinRule] = &[
    BuiltinRule {
        id: "email",
        name: "Email address",
        description: "RFC-plausible email addresses",
        pattern: r"[A-Za-z0-9._%+-]{1,64}@[A-Za-z0-9.-]{1,255}\.[A-Za-z]{2,12}",
        category: RuleCategory::Contact,
        severity: Severity::High,
        full_token: "[EMAIL_REDACTED]",
        partial: PartialStrategy::EmailLocalPart,
        hash_prefix: "EMAIL",
        refiner: None,
    },
    BuiltinRule {
        id: "uk_phone",
        name: "UK phone number",
        description: "UK mobile and landline numbers, +44 or 0 prefixed",
        pattern: r"\b(?:\+44\s?|\(?0)\d{2,4}\)?[\s-]?\d{3,4}[\s-]?\d{3,4}\b",
        category: RuleCategory::Contact,
        severity: Severity::Medium,
        full_token: "[PHONE_REDACTED]",
        partial: PartialStrategy::DigitsKeepTail { tail: 3 },
        hash_prefix: "PHONE",
        refiner: None,
    },
    BuiltinRule {
        id: "uk_nino",
        name: "National Insurance number",
        description: "UK NINO, validated against HMRC structural rules",
        pattern: r"\b[A-Za-z]{2}\s?\d{2}\s?\d{2}\s?\d{2}\s?[A-Da-d]\b",
        category: RuleCategory::Identifier,
        severity: Severity::Critical,
        full_token: "[NINO_REDACTED]",
        partial: PartialStrategy::NinoGroups,
        hash_prefix: "NINO",
        refiner: Some(Refiner::UkNino),
    },
    BuiltinRule {
        id: "card_number",
        name: "Payment card number",
        description: "13-16 digit card numbers, Luhn-validated",
        pattern: r"\b\d{4}[ -]?\d{4}[ -]?\d{4}[ -]?\d{1,4}\b",
        category: RuleCategory::Financial,
        severity: Severity::Critical,
        full_token: "[CARD_REDACTED]",
        partial: PartialStrategy::DigitsKeepTail { tail: 4 },
        hash_prefix: "CARD",
        refiner: Some(Refiner::Luhn),
    },
    BuiltinRule {
        id: "sort_code",
        name: "Bank sort code",
        description: "UK sort codes in the dashed 00-00-00 form",
        pattern: r"\b\d{2}-\d{2}-\d{2}\b",
        category: RuleCategory::Financial,
        severity: Severity::High,
        full_token: "[SORT_CODE_REDACTED]",
        partial: PartialStrategy::DigitsKeepTail { tail: 2 },
        hash_prefix: "SORT",
        refiner: None,
    },
    BuiltinRule {
        id: "bank_account",
        name: "Bank account number",
        description: "Eight consecutive digits (UK account number shape)",
        pattern: r"\b\d{8}\b",
        category: RuleCategory::Financial,
        severity: Severity::Critical,
        full_token: "[ACCOUNT_REDACTED]",
        partial: PartialStrategy::DigitsKeepTail { tail: 2 },
        hash_prefix: "ACCOUNT",
        refiner: None,
    },
    BuiltinRule {
        id: "case_reference",
        name: "Case reference",
        description: "Internal case/claim references such as CASE-2024-00123",
        pattern: r"\b[A-Z]{2,4}-\d{4}-\d{3,6}\b",
        category: RuleCategory::Legal,
        severity: Severity::Medium,
        full_token: "[CASE_REF_REDACTED]",
        partial: PartialStrategy::Edges { head: 4, tail: 2 },
        hash_prefix: "CASE",
        refiner: None,
    },
    BuiltinRule {
        id: "date_of_birth",
        name: "Date of birth",
        description: "Day/month/four-digit-year dates",
        pattern: r"\b\d{1,2}[/-]\d{1,2}[/-](?:19|20)\d{2}\b",
        category: RuleCategory::Pii,
        severity: Severity::High,
        full_token: "[DOB_REDACTED]",
        partial: PartialStrategy::DigitsKeepTail { tail: 4 },
        hash_prefix: "DOB",
        refiner: None,
    },
    BuiltinRule {
        id: "uk_postcode",
        name: "UK postcode",
        description: "Outward + inward UK postcode pairs",
        pattern: r"\b[A-Za-z]{1,2}\d[A-Za-z0-9]?\s?\d[A-Za-z]{2}\b",
        category: RuleCategory::Pii,
        severity: Severity::Medium,
        full_token: "[POSTCODE_REDACTED]",
        partial: PartialStrategy::Edges { head: 2, tail: 0 },
        hash_prefix: "POSTCODE",
        refiner: None,
    },
    // Deliberately last: runs of capitalized words are the broadest and most
    // false-positive-prone pattern in the set. The refiner trims non-name
    // words off the span ("Contact John Smith" -> "John Smith") but remains a
    // heuristic, not a name recognizer.
    BuiltinRule {
        id: "person_name",
        name: "Person name",
        description: "Two to four consecutive capitalized words (heuristic)",
        pattern: r"\b[A-Z][a-z]{1,19}(?: [A-Z][a-z]{1,19}){1,3}\b",
        category: RuleCategory::Pii,
        severity: Severity::High,
        full_token: "[NAME_REDACTED]",
        partial: PartialStrategy::Initials,
        hash_prefix: "NAME",
        refiner: Some(Refiner::PersonName),
    },
];

/// Builds the built-in rule set in its normative registration order.
pub fn builtin_rules() -> Result<Vec<RedactionRule>, WardenError> {
    BUILTIN_RULES
        .iter()
        .map(|b| {
            Ok(RedactionRule {
                id: b.id.to_string(),
                name: b.name.to_string(),
                description: Some(b.description.to_string()),
                pattern: compile_pattern(b.id, b.pattern)?,
                category: b.category,
                severity: b.severity,
                enabled: true,
                levels: LevelTable {
                    full_token: b.full_token.to_string(),
                    partial: b.partial.clone(),
                    hash_prefix: b.hash_prefix.to_string(),
                },
                refiner: b.refiner,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_rules_compile_with_unique_ids() {
        let rules = builtin_rules().unwrap();
        assert!(rules.len() >= 10);
        let mut ids: Vec<&str> = rules.iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), rules.len());
    }

    #[test]
    fn edges_mask_keeps_head_and_separators() {
        let masked = PartialStrategy::Edges { head: 2, tail: 0 }.apply("SW1A 1AA");
        assert_eq!(masked, "SWXX XXX");
    }

    #[test]
    fn nino_groups_mask_matches_hmrc_layout() {
        let masked = PartialStrategy::NinoGroups.apply("AB123456C");
        assert_eq!(masked, "ABXX XX XX X");
        let spaced = PartialStrategy::NinoGroups.apply("AB 12 34 56 C");
        assert_eq!(spaced, "ABXX XX XX X");
    }

    #[test]
    fn digits_keep_tail_preserves_separators() {
        let masked = PartialStrategy::DigitsKeepTail { tail: 2 }.apply("12-34-56");
        assert_eq!(masked, "XX-XX-X6");
    }

    #[test]
    fn email_mask_keeps_domain() {
        let masked = PartialStrategy::EmailLocalPart.apply("john.smith@example.com");
        assert_eq!(masked, "j*********@example.com");
    }

    #[test]
    fn initials_mask() {
        assert_eq!(PartialStrategy::Initials.apply("John Smith"), "J. S.");
    }

    #[test]
    fn custom_spec_derives_tokens_from_id() {
        let spec = CustomRuleSpec {
            id: "staff_id".to_string(),
            name: None,
            description: None,
            pattern: r"\bSTF-\d{5}\b".to_string(),
            category: RuleCategory::Identifier,
            severity: Severity::Medium,
            enabled: true,
            full_token: None,
            partial: None,
            hash_prefix: None,
        };
        let rule = spec.compile().unwrap();
        assert_eq!(rule.levels.full_token, "[STAFF_ID_REDACTED]");
        assert_eq!(rule.levels.hash_prefix, "STAFF_ID");
    }

    #[test]
    fn oversized_pattern_is_rejected() {
        let spec = CustomRuleSpec {
            id: "huge".to_string(),
            name: None,
            description: None,
            pattern: "a".repeat(MAX_PATTERN_LENGTH + 1),
            category: RuleCategory::Pii,
            severity: Severity::Low,
            enabled: true,
            full_token: None,
            partial: None,
            hash_prefix: None,
        };
        assert!(matches!(
            spec.compile(),
            Err(WardenError::PatternLengthExceeded(_, _, _))
        ));
    }
}
