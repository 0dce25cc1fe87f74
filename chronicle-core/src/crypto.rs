//! Digest primitives for Chronicle.
//!
//! Every structure in the workspace is parameterised over a caller-supplied
//! hash function. The default is SHA-256 via the `sha2` crate. Leaf and
//! internal digests carry the RFC 6962 domain-separation prefixes so that an
//! internal node digest can never be passed off as a leaf digest.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::error::{Error, Result};

/// RFC 6962 prefix for leaf digests.
const LEAF_PREFIX: u8 = 0x00;

/// RFC 6962 prefix for internal node digests.
const NODE_PREFIX: u8 = 0x01;

/// A 32-byte digest value.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hash([u8; 32]);

impl Hash {
    /// The zero digest (used as a sentinel in tests and benches).
    pub const ZERO: Self = Self([0u8; 32]);

    /// Create a digest from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Create from hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(Error::invalid_hash(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Check if this is the zero digest.
    pub fn is_zero(&self) -> bool {
        self == &Self::ZERO
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// An injected hash primitive: arbitrary bytes in, one [`Hash`] out.
///
/// Implementations must be pure and must always emit 32 bytes (the `Hash`
/// width). [`sha256`] is the default everywhere a `None` hash function is
/// accepted.
pub type HashFn = fn(&[u8]) -> Hash;

/// The default hash primitive: SHA-256.
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    Hash(hasher.finalize().into())
}

/// Compute the digest of a leaf: `H(0x00 || data)`.
pub fn leaf_digest(data: &[u8], hash_fn: HashFn) -> Hash {
    let mut buf = Vec::with_capacity(1 + data.len());
    buf.push(LEAF_PREFIX);
    buf.extend_from_slice(data);
    hash_fn(&buf)
}

/// Compute the digest of an internal node: `H(0x01 || left || right)`.
pub fn node_digest(left: &Hash, right: &Hash, hash_fn: HashFn) -> Hash {
    let mut buf = [0u8; 65];
    buf[0] = NODE_PREFIX;
    buf[1..33].copy_from_slice(left.as_bytes());
    buf[33..65].copy_from_slice(right.as_bytes());
    hash_fn(&buf)
}
