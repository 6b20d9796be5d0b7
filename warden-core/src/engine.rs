//! engine.rs - The redaction engine: scanning, masking, and detection.
//!
//! The engine is a stateless pipeline over the shared rule registry: every
//! operation resolves a level, snapshots the rules, and walks the input. No
//! I/O, no suspension, nothing persisted. `redact` and `contains_pii` are
//! read-only with respect to shared state and safe to call concurrently;
//! rule mutation goes through the registry's single-writer lock.
//!
//! License: MIT OR Apache-2.0

use chrono::Utc;
use log::{debug, info};
use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::Arc;

use crate::errors::WardenError;
use crate::policy::{EngineConfig, RedactionLevel};
use crate::pseudonym::{HashPseudonymizer, HashSalt};
use crate::registry::{RuleRegistry, RuleStats};
use crate::report::{
    loggable, DetectionReport, MatchPosition, RedactionResult, RuleMatchCount, RuleRedaction,
};
use crate::rules::{CustomRuleSpec, RedactionRule, Refiner, RuleCategory, RuleInfo};
use crate::validators;
use crate::walker::{self, RedactedValue};

/// The redaction engine over a shared rule registry.
#[derive(Debug)]
pub struct RedactionEngine {
    registry: Arc<RuleRegistry>,
    config: EngineConfig,
    hasher: HashPseudonymizer,
}

impl RedactionEngine {
    /// Builds an engine over the built-in rule set.
    ///
    /// The salt is mandatory: an engine that cannot pseudonymize would have
    /// to fall back to plaintext at the HASH level, and that must not be
    /// constructible.
    pub fn new(config: EngineConfig, salt: HashSalt) -> Result<Self, WardenError> {
        let registry = Arc::new(RuleRegistry::with_builtin_rules()?);
        Ok(Self::with_registry(config, salt, registry))
    }

    /// Builds an engine over a caller-provided registry, e.g. one shared
    /// with another engine instance or preloaded with custom rules.
    pub fn with_registry(
        config: EngineConfig,
        salt: HashSalt,
        registry: Arc<RuleRegistry>,
    ) -> Self {
        Self {
            registry,
            config,
            hasher: HashPseudonymizer::new(salt),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolves the effective level for a call; see
    /// [`EngineConfig::resolve_level`] for the precedence contract.
    pub fn resolve_level(
        &self,
        role: Option<&str>,
        explicit: Option<RedactionLevel>,
    ) -> RedactionLevel {
        self.config.resolve_level(role, explicit)
    }

    /// Scans `text` against every enabled, non-exempted rule in registration
    /// order and applies the level's replacement strategy to each match.
    ///
    /// `exemptions` overrides the policy's exempted categories for this call
    /// when provided. Position offsets in the result refer to the text as it
    /// stood when the owning rule ran.
    pub fn redact(
        &self,
        text: &str,
        role: Option<&str>,
        level: Option<RedactionLevel>,
        exemptions: Option<&[RuleCategory]>,
    ) -> RedactionResult {
        let level = self.resolve_level(role, level);
        let timestamp = Utc::now().to_rfc3339();

        // The explicit trusted bypass: the only case that skips scanning.
        if level == RedactionLevel::None || text.is_empty() {
            return RedactionResult {
                original_text: text.to_string(),
                redacted_text: text.to_string(),
                redactions_applied: Vec::new(),
                level,
                timestamp,
            };
        }

        let exempt = exemptions.unwrap_or(&self.config.exempted_categories);
        let mut current = text.to_string();
        let mut applied: Vec<RuleRedaction> = Vec::new();
        // Spans holding replacement tokens inserted during this pass. The
        // bracket heuristic below only protects tokens from *previous* calls;
        // hash tokens contain hex digits, so without interval tracking a
        // broad numeric rule could re-match inside them.
        let mut occupied: Vec<Range<usize>> = Vec::new();

        for rule in self
            .registry
            .snapshot()
            .iter()
            .filter(|r| r.enabled && !exempt.contains(&r.category))
        {
            let hits = self.collect_hits(rule, &current, &occupied);
            if hits.is_empty() {
                continue;
            }
            debug!("Rule '{}' matched {} span(s).", rule.id, hits.len());

            let mut positions = Vec::with_capacity(hits.len());
            // Rightmost first, so earlier offsets stay valid while the
            // string's length changes under replacement.
            for (start, end) in hits {
                let original = current[start..end].to_string();
                let replacement = self.replacement_for(rule, level, &original);
                debug!(
                    "Rule '{}': replacing {} at {}..{}.",
                    rule.id,
                    loggable(&original),
                    start,
                    end
                );
                current.replace_range(start..end, &replacement);

                let delta = replacement.len() as isize - (end - start) as isize;
                for span in occupied.iter_mut().filter(|s| s.start >= end) {
                    span.start = (span.start as isize + delta) as usize;
                    span.end = (span.end as isize + delta) as usize;
                }
                occupied.push(start..start + replacement.len());
                positions.push(MatchPosition {
                    start,
                    end,
                    original,
                    redacted: replacement,
                });
            }
            positions.reverse();
            applied.push(RuleRedaction {
                rule_id: rule.id.clone(),
                category: rule.category,
                severity: rule.severity,
                match_count: positions.len(),
                positions,
            });
        }

        if self.config.log_redactions && !applied.is_empty() {
            // Counts and categories only, never matched text. `log` macros
            // cannot fail, so this can never alter the returned result.
            let categories: BTreeSet<String> =
                applied.iter().map(|r| r.category.to_string()).collect();
            info!(
                "Applied {} redaction(s) across {} rule(s) at level {} (categories: {:?}).",
                applied.iter().map(|r| r.match_count).sum::<usize>(),
                applied.len(),
                level,
                categories
            );
        }

        RedactionResult {
            original_text: text.to_string(),
            redacted_text: current,
            redactions_applied: applied,
            level,
            timestamp,
        }
    }

    /// Recursively redacts every string leaf of a JSON value, preserving
    /// container shape. See [`crate::walker`] for the traversal contract.
    pub fn redact_value(
        &self,
        value: &serde_json::Value,
        role: Option<&str>,
        level: Option<RedactionLevel>,
        exemptions: Option<&[RuleCategory]>,
    ) -> Result<RedactedValue, WardenError> {
        walker::redact_value(self, value, role, level, exemptions)
    }

    /// Read-only scan reporting which categories and severities of sensitive
    /// data are present. Ignores levels and exemptions entirely: callers use
    /// this to decide whether an operation should proceed at all, and that
    /// decision deserves the unfiltered picture.
    pub fn contains_pii(&self, text: &str) -> DetectionReport {
        let mut categories = BTreeSet::new();
        let mut severities = BTreeSet::new();
        let mut rule_matches = Vec::new();

        if !text.is_empty() {
            for rule in self.registry.snapshot().iter().filter(|r| r.enabled) {
                let count = rule
                    .pattern
                    .find_iter(text)
                    .filter(|m| Self::refiner_accepts(rule, m.as_str()))
                    .count();
                if count > 0 {
                    categories.insert(rule.category);
                    severities.insert(rule.severity);
                    rule_matches.push(RuleMatchCount {
                        rule_id: rule.id.clone(),
                        category: rule.category,
                        severity: rule.severity,
                        count,
                    });
                }
            }
        }

        DetectionReport {
            has_pii: !rule_matches.is_empty(),
            categories,
            severities,
            rule_matches,
        }
    }

    /// Registers a custom rule at the end of the scan order. Fails on a
    /// duplicate id, leaving the registry unchanged.
    pub fn add_custom_rule(&self, spec: CustomRuleSpec) -> Result<(), WardenError> {
        self.registry.register(spec.compile()?)
    }

    /// Enables or disables a rule; returns `false` for unknown ids.
    pub fn toggle_rule(&self, id: &str, enabled: bool) -> bool {
        self.registry.toggle(id, enabled)
    }

    /// Snapshot of every registered rule.
    pub fn rules(&self) -> Vec<RuleInfo> {
        self.registry.infos()
    }

    /// Rule counts by enabled state, category, and severity.
    pub fn stats(&self) -> RuleStats {
        self.registry.stats()
    }

    /// Finds the surviving matches of one rule against the current text,
    /// returned in descending start order ready for replacement.
    fn collect_hits(
        &self,
        rule: &RedactionRule,
        current: &str,
        occupied: &[Range<usize>],
    ) -> Vec<(usize, usize)> {
        let mut hits = Vec::new();
        for m in rule.pattern.find_iter(current) {
            let (mut start, mut end) = (m.start(), m.end());
            let span = &current[start..end];
            // Overlap guard, part one: a span containing a bracket is (part
            // of) a placeholder token from an earlier pass over this text.
            if span.contains('[') || span.contains(']') {
                continue;
            }
            // Part two: never re-match text substituted during this pass.
            if occupied.iter().any(|s| start < s.end && s.start < end) {
                continue;
            }
            match rule.refiner {
                Some(Refiner::UkNino) if !validators::is_valid_uk_nino(span) => continue,
                Some(Refiner::Luhn) if !validators::is_valid_card_number(span) => continue,
                Some(Refiner::PersonName) => match validators::refine_person_name(span) {
                    Some((trim_start, trim_end)) => {
                        end = start + trim_end;
                        start += trim_start;
                    }
                    None => continue,
                },
                _ => {}
            }
            hits.push((start, end));
        }
        hits.sort_by(|a, b| b.0.cmp(&a.0));
        hits
    }

    fn refiner_accepts(rule: &RedactionRule, span: &str) -> bool {
        match rule.refiner {
            Some(Refiner::UkNino) => validators::is_valid_uk_nino(span),
            Some(Refiner::Luhn) => validators::is_valid_card_number(span),
            Some(Refiner::PersonName) => validators::refine_person_name(span).is_some(),
            None => true,
        }
    }

    fn replacement_for(
        &self,
        rule: &RedactionRule,
        level: RedactionLevel,
        matched: &str,
    ) -> String {
        match level {
            // Unreachable in practice: NONE short-circuits before scanning.
            RedactionLevel::None => matched.to_string(),
            RedactionLevel::Full => rule.levels.full_token.clone(),
            RedactionLevel::Partial => {
                if self.config.preserve_format {
                    rule.levels.partial.apply(matched)
                } else {
                    rule.levels.full_token.clone()
                }
            }
            RedactionLevel::Hash => self.hasher.token(matched, &rule.levels.hash_prefix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{PartialStrategy, Severity};

    fn test_engine() -> RedactionEngine {
        let mut config = EngineConfig::default();
        config
            .role_levels
            .insert("admin".to_string(), RedactionLevel::None);
        config
            .role_levels
            .insert("solicitor".to_string(), RedactionLevel::Partial);
        RedactionEngine::new(config, HashSalt::new("engine-test-salt").unwrap()).unwrap()
    }

    #[test]
    fn full_redaction_replaces_name_and_email() {
        let engine = test_engine();
        let result = engine.redact(
            "Contact John Smith at john.smith@example.com",
            Some("guest"),
            None,
            None,
        );
        assert_eq!(
            result.redacted_text,
            "Contact [NAME_REDACTED] at [EMAIL_REDACTED]"
        );
        assert_eq!(result.level, RedactionLevel::Full);
        let ids: Vec<&str> = result
            .redactions_applied
            .iter()
            .map(|r| r.rule_id.as_str())
            .collect();
        assert!(ids.contains(&"email"));
        assert!(ids.contains(&"person_name"));
    }

    #[test]
    fn partial_redaction_masks_nino_in_hmrc_layout() {
        let engine = test_engine();
        let result = engine.redact("AB123456C", Some("solicitor"), None, None);
        assert_eq!(result.redacted_text, "ABXX XX XX X");
        assert_eq!(result.level, RedactionLevel::Partial);
    }

    #[test]
    fn none_level_bypasses_scanning() {
        let engine = test_engine();
        let result = engine.redact("AB123456C", Some("admin"), None, None);
        assert_eq!(result.redacted_text, "AB123456C");
        assert!(result.is_clean());
    }

    #[test]
    fn explicit_level_overrides_admin_bypass() {
        let engine = test_engine();
        let result = engine.redact(
            "AB123456C",
            Some("admin"),
            Some(RedactionLevel::Full),
            None,
        );
        assert_eq!(result.redacted_text, "[NINO_REDACTED]");
    }

    #[test]
    fn full_redaction_is_idempotent() {
        let engine = test_engine();
        let input = "Ring 07700 900123 about case CASE-2024-00123, sort code 12-34-56.";
        let once = engine.redact(input, Some("guest"), None, None);
        let twice = engine.redact(&once.redacted_text, Some("guest"), None, None);
        assert_eq!(once.redacted_text, twice.redacted_text);
        assert!(twice.is_clean());
    }

    #[test]
    fn hash_level_is_deterministic_and_distinguishes_inputs() {
        let engine = test_engine();
        let a = engine.redact("12-34-56", None, Some(RedactionLevel::Hash), None);
        let b = engine.redact("12-34-56", None, Some(RedactionLevel::Hash), None);
        assert_eq!(a.redacted_text, b.redacted_text);
        assert!(a.redacted_text.starts_with("[SORT_"));

        let c = engine.redact("65-43-21", None, Some(RedactionLevel::Hash), None);
        assert_ne!(a.redacted_text, c.redacted_text);
    }

    #[test]
    fn raw_match_never_survives_redaction() {
        let engine = test_engine();
        for level in [
            RedactionLevel::Partial,
            RedactionLevel::Full,
            RedactionLevel::Hash,
        ] {
            let result = engine.redact("card 4111 1111 1111 1111", None, Some(level), None);
            assert!(
                !result.redacted_text.contains("4111 1111 1111 1111"),
                "raw card number survived at {level}"
            );
        }
    }

    #[test]
    fn no_builtin_sample_survives_any_redacting_level() {
        let samples = [
            ("email", "john.smith@example.com"),
            ("uk_phone", "07700 900123"),
            ("uk_nino", "AB123456C"),
            ("card_number", "4111 1111 1111 1111"),
            ("sort_code", "12-34-56"),
            ("bank_account", "12345678"),
            ("case_reference", "CASE-2024-00123"),
            ("date_of_birth", "12/03/1985"),
            ("uk_postcode", "SW1A 1AA"),
            ("person_name", "John Smith"),
        ];
        let engine = test_engine();
        for (rule_id, sample) in samples {
            for level in [
                RedactionLevel::Partial,
                RedactionLevel::Full,
                RedactionLevel::Hash,
            ] {
                let result = engine.redact(sample, None, Some(level), None);
                assert!(
                    !result.redacted_text.contains(sample),
                    "sample for '{rule_id}' survived verbatim at {level}"
                );
                assert!(!result.is_clean(), "sample for '{rule_id}' was not matched");
            }
        }
    }

    #[test]
    fn hash_tokens_are_protected_from_broad_numeric_rules() {
        // A hash digest can be all digits; the in-pass interval guard must
        // stop the bank_account rule from re-matching inside the token.
        let engine = test_engine();
        let result = engine.redact(
            "sort 12-34-56 and account 12345678",
            None,
            Some(RedactionLevel::Hash),
            None,
        );
        let sort_tokens = result.redacted_text.matches("[SORT_").count();
        let account_tokens = result.redacted_text.matches("[ACCOUNT_").count();
        assert_eq!(sort_tokens, 1);
        assert_eq!(account_tokens, 1);
        assert!(!result.redacted_text.contains("[["));
    }

    #[test]
    fn luhn_failures_are_not_redacted_as_cards() {
        let engine = test_engine();
        let result = engine.redact("4111 1111 1111 1112", None, Some(RedactionLevel::Full), None);
        assert!(!result.redacted_text.contains("[CARD_REDACTED]"));
    }

    #[test]
    fn exempted_categories_pass_through() {
        let engine = test_engine();
        let result = engine.redact(
            "mail john.smith@example.com",
            Some("guest"),
            None,
            Some(&[RuleCategory::Contact]),
        );
        assert_eq!(result.redacted_text, "mail john.smith@example.com");
        assert!(result.is_clean());
    }

    #[test]
    fn empty_input_yields_empty_clean_result() {
        let engine = test_engine();
        let result = engine.redact("", Some("guest"), None, None);
        assert_eq!(result.redacted_text, "");
        assert!(result.is_clean());
    }

    #[test]
    fn disabled_rules_are_skipped() {
        let engine = test_engine();
        assert!(engine.toggle_rule("email", false));
        let result = engine.redact("mail john.smith@example.com", Some("guest"), None, None);
        assert!(result.redacted_text.contains("john.smith@example.com"));
    }

    #[test]
    fn detection_reports_categories_without_mutating() {
        let engine = test_engine();
        let report = engine.contains_pii("Sort code 12-34-56 for John Smith");
        assert!(report.has_pii);
        assert!(report.categories.contains(&RuleCategory::Financial));
        assert!(report.categories.contains(&RuleCategory::Pii));
        assert!(report.severities.contains(&Severity::High));
    }

    #[test]
    fn detection_is_clean_on_generic_text() {
        let engine = test_engine();
        let report = engine.contains_pii("This is a generic message.");
        assert!(!report.has_pii);
        assert!(report.categories.is_empty());
        assert!(report.severities.is_empty());
        assert!(report.rule_matches.is_empty());
    }

    #[test]
    fn duplicate_custom_rule_is_rejected() {
        let engine = test_engine();
        let before = engine.rules().len();
        let spec = CustomRuleSpec {
            id: "email".to_string(),
            name: None,
            description: None,
            pattern: r"\bx{1,4}\b".to_string(),
            category: RuleCategory::Contact,
            severity: Severity::Low,
            enabled: true,
            full_token: None,
            partial: Some(PartialStrategy::All),
            hash_prefix: None,
        };
        assert!(engine.add_custom_rule(spec).is_err());
        assert_eq!(engine.rules().len(), before);
    }

    #[test]
    fn custom_rule_participates_in_redaction() {
        let engine = test_engine();
        let spec = CustomRuleSpec {
            id: "staff_id".to_string(),
            name: Some("Staff identifier".to_string()),
            description: None,
            pattern: r"\bSTF-\d{5}\b".to_string(),
            category: RuleCategory::Identifier,
            severity: Severity::Medium,
            enabled: true,
            full_token: None,
            partial: None,
            hash_prefix: None,
        };
        engine.add_custom_rule(spec).unwrap();
        let result = engine.redact("raised by STF-00421", Some("guest"), None, None);
        assert_eq!(result.redacted_text, "raised by [STAFF_ID_REDACTED]");
    }

    #[test]
    fn positions_record_the_applied_substitutions() {
        let engine = test_engine();
        let result = engine.redact("sort 12-34-56 here", Some("guest"), None, None);
        let sort = result
            .redactions_applied
            .iter()
            .find(|r| r.rule_id == "sort_code")
            .unwrap();
        assert_eq!(sort.match_count, 1);
        let pos = &sort.positions[0];
        assert_eq!(pos.original, "12-34-56");
        assert_eq!(pos.redacted, "[SORT_CODE_REDACTED]");
        assert_eq!(&result.original_text[pos.start..pos.end], "12-34-56");
    }
}
