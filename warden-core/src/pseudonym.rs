//! Deterministic, salted pseudonymization for the HASH redaction level.
//!
//! The same underlying value always maps to the same token, so downstream
//! systems can correlate records without ever seeing the original. The 8-hex
//! truncation (32 bits) is an operational correlation tag, not a
//! cryptographic identifier.
//!
//! License: MIT OR Apache-2.0

use sha2::{Digest, Sha256};
use std::fmt;

use crate::errors::WardenError;

/// Environment variable consulted by [`HashSalt::from_env`].
pub const SALT_VAR: &str = "WARDEN_HASH_SALT";

/// A secret salt supplied out-of-band, never hard-coded or serialized.
///
/// An empty salt would make tokens trivially precomputable, so construction
/// rejects it outright: the engine must not be buildable with a broken
/// hashing subsystem.
#[derive(Clone)]
pub struct HashSalt(Vec<u8>);

impl HashSalt {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, WardenError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(WardenError::EmptySalt);
        }
        Ok(Self(bytes))
    }

    /// Reads the salt from the `WARDEN_HASH_SALT` environment variable.
    pub fn from_env() -> Result<Self, WardenError> {
        match std::env::var(SALT_VAR) {
            Ok(value) => Self::new(value.into_bytes()),
            Err(_) => Err(WardenError::SaltNotConfigured(SALT_VAR)),
        }
    }
}

// The salt is a secret; Debug must not leak it into logs or panics.
impl fmt::Debug for HashSalt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashSalt(<{} bytes>)", self.0.len())
    }
}

/// Deterministic one-way transform used by the HASH redaction level.
#[derive(Debug, Clone)]
pub struct HashPseudonymizer {
    salt: HashSalt,
}

impl HashPseudonymizer {
    pub fn new(salt: HashSalt) -> Self {
        Self { salt }
    }

    /// Produces `[PREFIX_XXXXXXXX]` where `XXXXXXXX` is the first 8 hex
    /// characters of SHA-256(input ‖ salt), uppercased.
    pub fn token(&self, input: &str, prefix: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(input.as_bytes());
        hasher.update(&self.salt.0);
        let digest = hex::encode(hasher.finalize());
        format!("[{}_{}]", prefix, digest[..8].to_ascii_uppercase())
    }
}
