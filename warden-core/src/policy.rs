//! Policy configuration for `warden-core`.
//!
//! This module defines the redaction levels, the process-wide `EngineConfig`
//! policy, and the level resolution logic that decides how aggressively a
//! given caller's data is masked. It handles serialization/deserialization of
//! YAML policy files and provides utilities for loading them.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::rules::RuleCategory;

/// Environment variable consulted when `EngineConfig::environment` is unset.
pub const ENVIRONMENT_VAR: &str = "WARDEN_ENV";

/// How aggressively a detected match is masked.
///
/// `None` passes data through untouched (trusted/admin path), `Partial`
/// preserves format while masking most characters, `Full` replaces matches
/// with a fixed category tag, and `Hash` replaces them with a deterministic,
/// non-reversible pseudonym token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedactionLevel {
    None,
    Partial,
    #[default]
    Full,
    Hash,
}

impl fmt::Display for RedactionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RedactionLevel::None => "none",
            RedactionLevel::Partial => "partial",
            RedactionLevel::Full => "full",
            RedactionLevel::Hash => "hash",
        };
        write!(f, "{}", name)
    }
}

/// Process-wide redaction policy, set once at engine construction.
///
/// Everything here is effectively immutable for the lifetime of the engine;
/// the only mutable policy surface is the per-rule enabled flag held by the
/// rule registry. The hashing salt is deliberately *not* part of this struct
/// so it never ends up in a policy file; it is injected separately via
/// [`crate::pseudonym::HashSalt`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fallback level when neither the caller nor the environment says otherwise.
    pub default_level: RedactionLevel,
    /// Per-role level overrides (e.g. "admin" -> none, "solicitor" -> partial).
    pub role_levels: HashMap<String, RedactionLevel>,
    /// Per-deployment-environment level overrides, keyed by environment name.
    pub environment_overrides: HashMap<String, RedactionLevel>,
    /// Categories excluded from redaction unless a call overrides the set.
    pub exempted_categories: Vec<RuleCategory>,
    /// Emit a count/category summary via `log` after each redacting call.
    pub log_redactions: bool,
    /// When false, PARTIAL behaves like FULL (no format-preserving masks).
    pub preserve_format: bool,
    /// Explicit environment name; falls back to `WARDEN_ENV` when unset.
    pub environment: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_level: RedactionLevel::Full,
            role_levels: HashMap::new(),
            environment_overrides: HashMap::new(),
            exempted_categories: Vec::new(),
            log_redactions: false,
            preserve_format: true,
            environment: None,
        }
    }
}

impl EngineConfig {
    /// Loads a policy from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading redaction policy from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read policy file {}", path.display()))?;
        let config: EngineConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse policy file {}", path.display()))?;
        Ok(config)
    }

    /// Loads the embedded default policy (conservative FULL default, admin
    /// bypass, partial masking for solicitors).
    pub fn load_default_policy() -> Result<Self> {
        debug!("Loading default policy from embedded string...");
        let default_yaml = include_str!("../config/default_policy.yaml");
        let config: EngineConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default policy")?;
        Ok(config)
    }

    /// Resolves the effective redaction level for a call.
    ///
    /// Precedence, strictly in this order: explicit level argument, role
    /// mapping, environment override, global default. An unrecognized role or
    /// environment falls through to the conservative default, never to
    /// `None`: absence of information must not reduce protection.
    pub fn resolve_level(
        &self,
        role: Option<&str>,
        explicit: Option<RedactionLevel>,
    ) -> RedactionLevel {
        if let Some(level) = explicit {
            return level;
        }
        if let Some(role) = role {
            if let Some(level) = self.role_levels.get(role) {
                return *level;
            }
        }
        if let Some(env) = self.current_environment() {
            if let Some(level) = self.environment_overrides.get(&env) {
                return *level;
            }
        }
        self.default_level
    }

    fn current_environment(&self) -> Option<String> {
        self.environment
            .clone()
            .or_else(|| std::env::var(ENVIRONMENT_VAR).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_roles() -> EngineConfig {
        let mut config = EngineConfig::default();
        config
            .role_levels
            .insert("admin".to_string(), RedactionLevel::None);
        config
            .role_levels
            .insert("solicitor".to_string(), RedactionLevel::Partial);
        config
    }

    #[test]
    fn explicit_level_beats_role_mapping() {
        let config = config_with_roles();
        let level = config.resolve_level(Some("admin"), Some(RedactionLevel::Full));
        assert_eq!(level, RedactionLevel::Full);
    }

    #[test]
    fn role_mapping_beats_default() {
        let config = config_with_roles();
        assert_eq!(
            config.resolve_level(Some("solicitor"), None),
            RedactionLevel::Partial
        );
    }

    #[test]
    fn unknown_role_falls_through_to_default() {
        let config = config_with_roles();
        assert_eq!(config.resolve_level(Some("intruder"), None), RedactionLevel::Full);
    }

    #[test]
    fn environment_override_beats_default() {
        let mut config = EngineConfig::default();
        config.environment = Some("staging".to_string());
        config
            .environment_overrides
            .insert("staging".to_string(), RedactionLevel::Partial);
        assert_eq!(config.resolve_level(None, None), RedactionLevel::Partial);
    }

    #[test]
    fn unknown_environment_falls_through_to_default() {
        let mut config = EngineConfig::default();
        config.environment = Some("staging".to_string());
        config
            .environment_overrides
            .insert("production".to_string(), RedactionLevel::Partial);
        assert_eq!(config.resolve_level(None, None), RedactionLevel::Full);
    }

    #[test]
    fn default_policy_parses() {
        let config = EngineConfig::load_default_policy().unwrap();
        assert_eq!(config.default_level, RedactionLevel::Full);
        assert_eq!(
            config.role_levels.get("admin"),
            Some(&RedactionLevel::None)
        );
        assert_eq!(
            config.role_levels.get("solicitor"),
            Some(&RedactionLevel::Partial)
        );
    }
}
