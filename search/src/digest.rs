//! Domain-separated SHA-256 digests for trace artifacts.
//!
//! The domain prefix is hashed ahead of the payload and ends in a NUL byte,
//! so digests taken under different prefixes never collide by concatenation.

use std::fmt;

use sha2::{Digest, Sha256};

/// Domain prefix for expansion trace hashing.
pub const DOMAIN_SEARCH_TRACE: &[u8] = b"ASTRAL::SEARCH_TRACE::V1\0";

/// A SHA-256 digest. Displays as `sha256:<lowercase hex>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TraceDigest([u8; 32]);

impl TraceDigest {
    /// Algorithm label used in the display form.
    pub const ALGORITHM: &'static str = "sha256";

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex of the digest bytes.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for TraceDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", Self::ALGORITHM, self.to_hex())
    }
}

/// Hash `data` under `domain`.
#[must_use]
pub fn canonical_hash(domain: &[u8], data: &[u8]) -> TraceDigest {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(data);
    TraceDigest(hasher.finalize().into())
}
