//! Container names, record keys, and generations
//!
//! - [`Namespace`]: top-level data container, analogous to a database
//! - [`SetName`]: named subdivision within a namespace, analogous to a
//!   table; sets are never pre-declared, they come into existence with
//!   the first record written to them
//! - [`RecordKey`]: record identity (namespace, set, key-digest); the
//!   user key string is retained for debuggability but identity is the
//!   digest
//! - [`Generation`]: per-record write counter

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::{xxh3_64_with_seed, xxh3_128};

/// Digest length in bytes for record identity.
pub const DIGEST_LEN: usize = 20;

/// 20-byte record key digest computed from (set, user key).
pub type KeyDigest = [u8; DIGEST_LEN];

/// Top-level container name (non-empty UTF-8 text)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Namespace(String);

impl Namespace {
    /// Create a namespace name; rejects empty text.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::TypeArgument("namespace must be non-empty".to_string()));
        }
        Ok(Namespace(name))
    }

    /// The name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Set name within a namespace (non-empty UTF-8 text)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SetName(String);

impl SetName {
    /// Create a set name; rejects empty text.
    ///
    /// The empty string is not a set name — at the admin surface it is
    /// the "whole namespace" marker and maps to `Option::None`.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::TypeArgument("set name must be non-empty".to_string()));
        }
        Ok(SetName(name))
    }

    /// The name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Record identity: (namespace, set, key-digest)
///
/// The digest is a pure function of (set, user key), so derived
/// equality and hashing agree with digest identity. The user key
/// string rides along for logging and debugging.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    /// Namespace containing the record
    pub namespace: Namespace,
    /// Set the record belongs to
    pub set: SetName,
    /// 20-byte digest of (set, user key)
    pub digest: KeyDigest,
    /// Original user key, retained for debuggability
    pub user_key: String,
}

impl RecordKey {
    /// Build a record key, computing the digest from (set, user key).
    pub fn new(namespace: Namespace, set: SetName, user_key: impl Into<String>) -> Self {
        let user_key = user_key.into();
        let digest = compute_digest(&set, &user_key);
        RecordKey {
            namespace,
            set,
            digest,
            user_key,
        }
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.namespace, self.set, self.user_key)
    }
}

/// Compute the 20-byte digest for (set, user key).
///
/// xxh3-derived, identity only — no security claim. The set name is part
/// of the digest input so identical user keys in different sets never
/// collide by construction.
pub fn compute_digest(set: &SetName, user_key: &str) -> KeyDigest {
    let mut buf = Vec::with_capacity(set.as_str().len() + 1 + user_key.len());
    buf.extend_from_slice(set.as_str().as_bytes());
    buf.push(0);
    buf.extend_from_slice(user_key.as_bytes());

    let wide = xxh3_128(&buf).to_le_bytes();
    let tail = xxh3_64_with_seed(&buf, 0x7464_6967_6573_7431).to_le_bytes();

    let mut digest = [0u8; DIGEST_LEN];
    digest[..16].copy_from_slice(&wide);
    digest[16..].copy_from_slice(&tail[..4]);
    digest
}

/// Per-record write counter
///
/// Starts at 1 on the first write of a key and increments on each
/// overwrite. A write that replaces a logically-truncated record is a
/// fresh write and restarts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(u32);

impl Generation {
    /// Generation of a freshly written record
    pub const INITIAL: Generation = Generation(1);

    /// The generation after one more write
    #[inline]
    pub fn bump(&self) -> Generation {
        Generation(self.0.wrapping_add(1))
    }

    /// Raw counter value
    #[inline]
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
