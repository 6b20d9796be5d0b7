//! registry.rs - The shared, ordered collection of detection rules.
//!
//! Rules live in an append-only arena behind a single `RwLock`: reads take
//! cheap snapshots, while `register`/`toggle` serialize against each other
//! and against concurrent readers. Registration order is significant (the
//! engine scans rules in the order they entered the registry), and rules are
//! never deleted, only disabled.
//!
//! License: MIT OR Apache-2.0

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::errors::WardenError;
use crate::rules::{builtin_rules, RedactionRule, RuleCategory, RuleInfo, Severity};

/// Ordered rule arena with runtime registration and enable/disable toggling.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: RwLock<Vec<RedactionRule>>,
}

impl RuleRegistry {
    /// An empty registry; callers register every rule themselves.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the built-in rule set in its normative order.
    pub fn with_builtin_rules() -> Result<Self, WardenError> {
        let rules = builtin_rules()?;
        debug!("Registry initialized with {} built-in rules.", rules.len());
        Ok(Self {
            rules: RwLock::new(rules),
        })
    }

    /// Appends a rule. Fails without modifying the registry when the id is
    /// already taken; a duplicate is never a silent overwrite.
    pub fn register(&self, rule: RedactionRule) -> Result<(), WardenError> {
        let mut rules = self.rules.write().unwrap();
        if rules.iter().any(|existing| existing.id == rule.id) {
            return Err(WardenError::DuplicateRule(rule.id));
        }
        debug!("Registering rule '{}' at position {}.", rule.id, rules.len());
        rules.push(rule);
        Ok(())
    }

    /// Flips the enabled flag of an existing rule. Returns `false` when the
    /// id is unknown.
    pub fn toggle(&self, id: &str, enabled: bool) -> bool {
        let mut rules = self.rules.write().unwrap();
        match rules.iter_mut().find(|rule| rule.id == id) {
            Some(rule) => {
                debug!("Rule '{}' enabled={} -> {}.", id, rule.enabled, enabled);
                rule.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Owned copies of every rule, in registration order. Mutating the
    /// returned rules has no effect on the registry.
    pub fn snapshot(&self) -> Vec<RedactionRule> {
        self.rules.read().unwrap().clone()
    }

    /// Serializable views of every rule, in registration order.
    pub fn infos(&self) -> Vec<RuleInfo> {
        self.rules.read().unwrap().iter().map(|r| r.info()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.read().unwrap().is_empty()
    }

    /// Aggregates rule counts for operational visibility.
    pub fn stats(&self) -> RuleStats {
        let rules = self.rules.read().unwrap();
        let mut stats = RuleStats {
            total_rules: rules.len(),
            ..RuleStats::default()
        };
        for rule in rules.iter() {
            if rule.enabled {
                stats.enabled_rules += 1;
            } else {
                stats.disabled_rules += 1;
            }
            *stats.rules_by_category.entry(rule.category).or_insert(0) += 1;
            *stats.rules_by_severity.entry(rule.severity).or_insert(0) += 1;
        }
        stats
    }
}

/// Rule counts by enabled state, category, and severity. Ordered maps keep
/// the output deterministic for operators diffing successive reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleStats {
    pub total_rules: usize,
    pub enabled_rules: usize,
    pub disabled_rules: usize,
    pub rules_by_category: BTreeMap<RuleCategory, usize>,
    pub rules_by_severity: BTreeMap<Severity, usize>,
}
