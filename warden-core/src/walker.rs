//! walker.rs - Shape-preserving redaction of nested JSON values.
//!
//! Strings are passed through the redactor; arrays map element-wise
//! preserving order and length; objects map key-wise preserving every key
//! (and key order, via `serde_json`'s ordered maps); numbers, booleans, and
//! null pass through untouched and are never pattern-matched.
//!
//! `serde_json::Value` is a tree, so reference cycles cannot be constructed;
//! the depth cap below exists to bound recursion on pathologically nested
//! input. Exceeding it is an error rather than a silent truncation, since a
//! partially walked value might leak what the caller believed was scrubbed.
//!
//! License: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::engine::RedactionEngine;
use crate::errors::WardenError;
use crate::policy::RedactionLevel;
use crate::report::RedactionResult;
use crate::rules::RuleCategory;

/// Maximum supported nesting depth for [`RedactionEngine::redact_value`].
pub const MAX_VALUE_DEPTH: usize = 64;

/// A redacted value plus the per-leaf results collected in traversal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactedValue {
    pub redacted: Value,
    /// Non-empty results only; leaves with nothing to redact contribute none.
    pub summary: Vec<RedactionResult>,
}

pub(crate) fn redact_value(
    engine: &RedactionEngine,
    value: &Value,
    role: Option<&str>,
    level: Option<RedactionLevel>,
    exemptions: Option<&[RuleCategory]>,
) -> Result<RedactedValue, WardenError> {
    // Resolve once so every leaf sees the same level, then short-circuit the
    // trusted bypass without walking at all.
    let level = engine.resolve_level(role, level);
    if level == RedactionLevel::None {
        return Ok(RedactedValue {
            redacted: value.clone(),
            summary: Vec::new(),
        });
    }

    let mut summary = Vec::new();
    let redacted = walk(engine, value, level, exemptions, 0, &mut summary)?;
    Ok(RedactedValue { redacted, summary })
}

fn walk(
    engine: &RedactionEngine,
    value: &Value,
    level: RedactionLevel,
    exemptions: Option<&[RuleCategory]>,
    depth: usize,
    summary: &mut Vec<RedactionResult>,
) -> Result<Value, WardenError> {
    if depth > MAX_VALUE_DEPTH {
        return Err(WardenError::MaxDepthExceeded(MAX_VALUE_DEPTH));
    }
    match value {
        Value::String(text) => {
            let result = engine.redact(text, None, Some(level), exemptions);
            let redacted = Value::String(result.redacted_text.clone());
            if !result.is_clean() {
                summary.push(result);
            }
            Ok(redacted)
        }
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(walk(engine, item, level, exemptions, depth + 1, summary)?);
            }
            Ok(Value::Array(out))
        }
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, item) in map {
                out.insert(
                    key.clone(),
                    walk(engine, item, level, exemptions, depth + 1, summary)?,
                );
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}
