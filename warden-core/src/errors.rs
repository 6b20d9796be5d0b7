//! errors.rs - Custom error types for the warden-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR Apache-2.0

use thiserror::Error;

/// This enum represents all possible error types in the `warden-core` library.
///
/// `#[non_exhaustive]` signals to consumers that new variants may be added in
/// future versions, so they cannot match exhaustively and break on upgrade.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WardenError {
    #[error("a rule with id '{0}' is already registered")]
    DuplicateRule(String),

    #[error("failed to compile pattern for rule '{0}': {1}")]
    RuleCompilation(String, regex::Error),

    #[error("rule '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("hashing salt must not be empty")]
    EmptySalt,

    #[error("hashing salt not configured: environment variable {0} is not set")]
    SaltNotConfigured(&'static str),

    #[error("value nesting exceeds the maximum supported depth of {0}")]
    MaxDepthExceeded(usize),

    #[error("an unexpected I/O error occurred: {0}")]
    Io(#[from] std::io::Error),
}
