use battletanks_common::EntityKind;
use sha2::{Digest, Sha256};
use std::fmt;

/// Errors from interpreting a hex prefix as an integer seed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeedError {
    #[error("seed hex needs at least 8 characters, got {0}")]
    TooShort(usize),
    #[error("invalid hex in seed prefix: {0:?}")]
    InvalidHex(String),
}

/// Lowercase hex SHA-256 of the UTF-8 bytes of `text`.
pub fn digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Interpret the first 8 hex characters (32 bits) of a digest as an unsigned integer.
pub fn to_int32(hex: &str) -> Result<u32, SeedError> {
    let prefix = hex.get(..8).ok_or(SeedError::TooShort(hex.len()))?;
    u32::from_str_radix(prefix, 16).map_err(|_| SeedError::InvalidHex(prefix.to_owned()))
}

/// A SHA-256 hex digest known to be well-formed.
///
/// Only constructible through hashing, so [`SeedHex::seed`] cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeedHex(String);

impl SeedHex {
    /// Session seed for a room: `digest(room_id + ":" + seed_word)`.
    pub fn for_session(room_id: &str, seed_word: &str) -> Self {
        Self(digest(&format!("{room_id}:{seed_word}")))
    }

    /// Sub-seed for one entity: `digest(self + "::" + kind + "::" + key)`.
    ///
    /// `key` is the display name for users and the spawn index for foes and food.
    pub fn sub_seed(&self, kind: EntityKind, key: &str) -> Self {
        Self(digest(&format!("{}::{}::{}", self.0, kind.tag(), key)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// First 32 bits of the digest.
    pub fn seed(&self) -> u32 {
        match to_int32(&self.0) {
            Ok(seed) => seed,
            // digests are always 64 lowercase hex characters
            Err(err) => unreachable!("SeedHex built from a SHA-256 digest: {err}"),
        }
    }
}

impl fmt::Display for SeedHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
