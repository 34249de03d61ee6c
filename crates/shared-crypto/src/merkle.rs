//! # Binary Merkle Tree
//!
//! ALGORITHM: bottom-up pairwise tree over an ordered leaf list.
//!
//! - Each leaf enters the tree as `H(0x00 || leaf)`.
//! - Adjacent nodes combine as `H(0x01 || left || right)`.
//! - An odd trailing node is promoted unchanged to the next level (no padding).
//! - An empty leaf list has root [`EMPTY_ROOT`].
//!
//! Leaf order is part of the commitment: transactions commit in program
//! order, contract and nonce sets in their canonical (sorted) order.
//!
//! A single leaf still goes through the leaf prefix, so `root([x]) != x`.

use crate::errors::CryptoError;
use crate::hashing::{Hash, Sha3Hasher, EMPTY_ROOT};

/// Domain prefix for leaf hashing.
pub const LEAF_PREFIX: u8 = 0x00;

/// Domain prefix for interior node hashing.
pub const NODE_PREFIX: u8 = 0x01;

/// Hash a leaf into its tree node.
pub fn leaf_hash(leaf: &Hash) -> Hash {
    let mut hasher = Sha3Hasher::with_tag(&[LEAF_PREFIX]);
    hasher.update(leaf);
    hasher.finalize()
}

/// Combine two child nodes into their parent.
pub fn node_hash(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Sha3Hasher::with_tag(&[NODE_PREFIX]);
    hasher.update(left).update(right);
    hasher.finalize()
}

/// Compute the Merkle root of an ordered leaf list.
pub fn merkle_root(leaves: &[Hash]) -> Hash {
    if leaves.is_empty() {
        return EMPTY_ROOT;
    }

    let mut level: Vec<Hash> = leaves.iter().map(leaf_hash).collect();
    while level.len() > 1 {
        level = next_level(&level);
    }
    level[0]
}

fn next_level(level: &[Hash]) -> Vec<Hash> {
    level
        .chunks(2)
        .map(|pair| match pair {
            [left, right] => node_hash(left, right),
            // Odd node out: promoted as-is
            _ => pair[0],
        })
        .collect()
}

/// Position of a sibling relative to the node being proven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiblingPosition {
    /// Sibling is the left child; the proven node is on the right.
    Left,
    /// Sibling is the right child; the proven node is on the left.
    Right,
}

/// One level of an inclusion proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofStep {
    /// Hash of the sibling node.
    pub sibling: Hash,
    /// Which side the sibling sits on.
    pub position: SiblingPosition,
}

/// Inclusion proof for a single leaf.
///
/// Levels where the proven node was promoted without a sibling contribute
/// no step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleProof {
    /// Index of the proven leaf.
    pub leaf_index: usize,
    /// Sibling path from the leaf level up to the root.
    pub path: Vec<ProofStep>,
}

impl MerkleProof {
    /// Recompute the root from `leaf` and compare with `root`.
    pub fn verify(&self, leaf: &Hash, root: &Hash) -> bool {
        let mut current = leaf_hash(leaf);
        for step in &self.path {
            current = match step.position {
                SiblingPosition::Left => node_hash(&step.sibling, &current),
                SiblingPosition::Right => node_hash(&current, &step.sibling),
            };
        }
        current == *root
    }
}

/// A Merkle tree that keeps every level, for proof generation.
///
/// `levels[0]` holds the hashed leaves, the last level holds the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    levels: Vec<Vec<Hash>>,
}

impl MerkleTree {
    /// Build the tree from an ordered leaf list.
    pub fn build(leaves: &[Hash]) -> Self {
        if leaves.is_empty() {
            return Self { levels: Vec::new() };
        }

        let mut levels = vec![leaves.iter().map(leaf_hash).collect::<Vec<_>>()];
        while let Some(top) = levels.last() {
            if top.len() <= 1 {
                break;
            }
            let next = next_level(top);
            levels.push(next);
        }

        Self { levels }
    }

    /// Root hash; [`EMPTY_ROOT`] for an empty tree.
    pub fn root(&self) -> Hash {
        self.levels
            .last()
            .and_then(|top| top.first())
            .copied()
            .unwrap_or(EMPTY_ROOT)
    }

    /// Number of leaves committed.
    pub fn leaf_count(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    /// Generate an inclusion proof for the leaf at `index`.
    pub fn prove(&self, index: usize) -> Result<MerkleProof, CryptoError> {
        let leaf_count = self.leaf_count();
        if index >= leaf_count {
            return Err(CryptoError::LeafIndexOutOfRange { index, leaf_count });
        }

        let mut path = Vec::new();
        let mut idx = index;
        // The top level is the root and has no siblings.
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling_idx = idx ^ 1;
            if let Some(sibling) = level.get(sibling_idx) {
                let position = if idx % 2 == 0 {
                    SiblingPosition::Right
                } else {
                    SiblingPosition::Left
                };
                path.push(ProofStep {
                    sibling: *sibling,
                    position,
                });
            }
            idx /= 2;
        }

        Ok(MerkleProof {
            leaf_index: index,
            path,
        })
    }
}
