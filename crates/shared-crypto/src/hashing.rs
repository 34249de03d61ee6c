//! # Canonical Hashing
//!
//! SHA3-256 is the single hash function of the protocol. Block IDs,
//! transaction IDs, Merkle leaves and nodes, and the signing payload all go
//! through [`hash`] or one of its thin wrappers.

use sha3::{Digest, Sha3_256};

/// Hash output length in bytes.
pub const HASH_LEN: usize = 32;

/// SHA3-256 output (256-bit).
pub type Hash = [u8; HASH_LEN];

/// Root of an empty Merkle tree: `SHA3-256("")`.
///
/// Deliberately not all zeros, so an empty set never collides with a set
/// holding a single all-zero leaf.
pub const EMPTY_ROOT: Hash = [
    0xa7, 0xff, 0xc6, 0xf8, 0xbf, 0x1e, 0xd7, 0x66, 0x51, 0xc1, 0x47, 0x56, 0xa0, 0x61, 0xd6, 0x62,
    0xf5, 0x80, 0xff, 0x4d, 0xe4, 0x3b, 0x49, 0xfa, 0x82, 0xd8, 0x0a, 0x4b, 0x80, 0xf8, 0x43, 0x4a,
];

/// Stateful SHA3-256 hasher.
pub struct Sha3Hasher {
    inner: Sha3_256,
}

impl Sha3Hasher {
    /// Create new hasher.
    pub fn new() -> Self {
        Self {
            inner: Sha3_256::new(),
        }
    }

    /// Create a hasher already primed with a domain tag.
    pub fn with_tag(tag: &[u8]) -> Self {
        let mut hasher = Self::new();
        hasher.update(tag);
        hasher
    }

    /// Update with data.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    /// Finalize and return hash.
    pub fn finalize(self) -> Hash {
        self.inner.finalize().into()
    }
}

impl Default for Sha3Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash data with SHA3-256 (one-shot).
pub fn hash(data: &[u8]) -> Hash {
    Sha3_256::digest(data).into()
}

/// Hash the concatenation of multiple inputs.
pub fn hash_many(inputs: &[&[u8]]) -> Hash {
    let mut hasher = Sha3Hasher::new();
    for input in inputs {
        hasher.update(input);
    }
    hasher.finalize()
}

/// Hash `data` under a domain tag: `SHA3-256(tag || data)`.
pub fn tagged_hash(tag: &[u8], data: &[u8]) -> Hash {
    hash_many(&[tag, data])
}

/// Short hex prefix of a hash, for log lines.
pub fn short_hex(hash: &Hash) -> String {
    hex::encode(&hash[..8])
}
